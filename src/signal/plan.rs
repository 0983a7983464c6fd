use log::trace;
use crate::config::SignalConfig;
use crate::error::{SignalError, SignalResult};
use crate::signal::{Segment, SegmentLibrary};
use crate::types::SignalFloat;

/// One step of a frame: a segment repeated some number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanEntry {
    pub segment: String,
    pub repeat: usize,
}

impl PlanEntry {
    pub fn new(segment: impl Into<String>, repeat: usize) -> Self {
        Self {
            segment: segment.into(),
            repeat,
        }
    }
}

/// A segment placed in the frame, in playback order.
#[derive(Debug, Clone, Copy)]
pub struct PlanInstance<'a> {
    pub segment: &'a Segment,

    /// How many display lines came before this one in the frame, for display lines only.
    pub display_index: Option<usize>,

    /// The video matrix row this display line shows.
    pub line_index: Option<usize>,
}

/// The ordered description of one whole frame. Every entry is checked against the library when
/// the plan is built, so expansion can't run into a missing segment later on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePlan {
    entries: Vec<PlanEntry>,
}

impl SequencePlan {
    /// Build a plan, failing if an entry names a segment the library doesn't define or repeats
    /// zero times.
    pub fn new(entries: Vec<PlanEntry>, library: &SegmentLibrary) -> SignalResult<Self> {
        let plan = Self { entries };
        plan.check(library)?;
        Ok(plan)
    }

    /// Check every entry against a library.
    pub fn check(&self, library: &SegmentLibrary) -> SignalResult<()> {
        for entry in &self.entries {
            library.resolve(&entry.segment)?;
            if entry.repeat == 0 {
                return Err(SignalError::InvalidPlan {
                    reason: format!("'{}' is repeated zero times", entry.segment),
                });
            }
        }

        Ok(())
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// The total number of segment instances the plan expands to.
    pub fn instance_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.repeat).sum()
    }

    /// The length of the frame in line periods.
    pub fn frame_lines(&self, library: &SegmentLibrary, config: &SignalConfig) -> SignalResult<SignalFloat> {
        let mut total = 0.0;
        for entry in &self.entries {
            total += library.resolve(&entry.segment)?.duration() * entry.repeat as SignalFloat;
        }

        Ok(total / config.line_period)
    }

    /// Expand the plan into segment instances and number the display lines.
    ///
    /// Each display line gets the next `display_index`. The matrix row it shows restarts at 0 with
    /// every field and advances by the scan's row stride, wrapping at the vertical resolution. A
    /// field ends at the first vertical sync segment after a display line, or when the display
    /// line segment itself changes, so `[even × 287, odd × 287]` starts the second field at row 0
    /// with or without sync lines in between. For interlaced scan both fields walk the same matrix
    /// height at twice the line rate.
    pub fn expand<'a>(
        &self,
        library: &'a SegmentLibrary,
        config: &SignalConfig,
    ) -> SignalResult<Vec<PlanInstance<'a>>> {
        let stride = config.scan.row_stride();
        let rows = config.vertical_resolution.max(1);

        let mut instances = Vec::with_capacity(self.instance_count());
        let mut display_index = 0;
        let mut field_line = 0;
        let mut field = 0;
        let mut last_display: Option<&str> = None;

        for entry in &self.entries {
            let segment = library.resolve(&entry.segment)?;

            for _ in 0..entry.repeat {
                let switched = segment.is_display_line()
                    && last_display.map_or(false, |label| label != segment.label());
                if (segment.is_vertical_sync() || switched) && field_line > 0 {
                    trace!("field {} ended after {} display lines", field, field_line);
                    field += 1;
                    field_line = 0;
                }

                let (display, line) = if segment.is_display_line() {
                    let line = (field_line * stride) % rows;
                    last_display = Some(segment.label());
                    let display = display_index;
                    display_index += 1;
                    field_line += 1;
                    (Some(display), Some(line))
                } else {
                    (None, None)
                };

                instances.push(PlanInstance {
                    segment,
                    display_index: display,
                    line_index: line,
                });
            }
        }

        Ok(instances)
    }
}
