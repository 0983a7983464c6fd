use std::collections::BTreeMap;
use crate::config::SignalConfig;
use crate::error::{SignalError, SignalResult};
use crate::types::{Breakpoint, SampleTime, SampleValue};

/// A named waveform template: breakpoints relative to the start of the segment. Two breakpoints
/// at the same relative time make an instantaneous edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    label: String,
    breakpoints: Vec<Breakpoint>,
    is_display_line: bool,
    is_vertical_sync: bool,
}

impl Segment {
    /// Create a plain sync/blanking segment.
    pub fn new(label: impl Into<String>, breakpoints: Vec<Breakpoint>) -> Self {
        Self {
            label: label.into(),
            breakpoints,
            is_display_line: false,
            is_vertical_sync: false,
        }
    }

    /// Mark the segment as a display line, which gets active video laid over it.
    pub fn display_line(mut self) -> Self {
        self.is_display_line = true;
        self
    }

    /// Mark the segment as part of a vertical sync region, which starts a new field.
    pub fn vertical_sync(mut self) -> Self {
        self.is_vertical_sync = true;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn is_display_line(&self) -> bool {
        self.is_display_line
    }

    pub fn is_vertical_sync(&self) -> bool {
        self.is_vertical_sync
    }

    /// How far the next segment starts after this one, which is the time of the last breakpoint.
    pub fn duration(&self) -> SampleTime {
        self.breakpoints.last().map_or(0.0, |&(time, _)| time)
    }

    /// Check the breakpoints are time ordered and stay within the given voltage range.
    pub fn validate(&self, min_level: SampleValue, max_level: SampleValue) -> SignalResult<()> {
        if self.breakpoints.is_empty() {
            return Err(SignalError::invalid_segment(&self.label, "no breakpoints"));
        }

        let mut last_time = 0.0;
        for (idx, &(time, value)) in self.breakpoints.iter().enumerate() {
            if !time.is_finite() || !value.is_finite() {
                return Err(SignalError::invalid_segment(
                    &self.label,
                    format!("breakpoint {} is not finite", idx),
                ));
            }
            if time < last_time {
                return Err(SignalError::invalid_segment(
                    &self.label,
                    format!("breakpoint {} at {:e}s goes back in time", idx, time),
                ));
            }
            if value < min_level || value > max_level {
                return Err(SignalError::invalid_segment(
                    &self.label,
                    format!(
                        "breakpoint {} voltage {} outside [{}, {}]",
                        idx, value, min_level, max_level
                    ),
                ));
            }
            last_time = time;
        }

        Ok(())
    }
}

/// The catalog of segments for one signal standard, looked up by name.
#[derive(Debug, Clone)]
pub struct SegmentLibrary {
    min_level: SampleValue,
    max_level: SampleValue,
    segments: BTreeMap<String, Segment>,
}

impl SegmentLibrary {
    /// Create an empty library that accepts voltages between the sync tip and white.
    pub fn new(config: &SignalConfig) -> Self {
        Self {
            min_level: config.sync_level,
            max_level: config.white_level,
            segments: BTreeMap::new(),
        }
    }

    /// Validate a segment and register it under its label.
    pub fn insert(&mut self, segment: Segment) -> SignalResult<()> {
        segment.validate(self.min_level, self.max_level)?;
        if self.segments.contains_key(segment.label()) {
            return Err(SignalError::DuplicateSegment {
                name: segment.label().to_string(),
            });
        }

        self.segments.insert(segment.label().to_string(), segment);
        Ok(())
    }

    /// Builder form of `insert`.
    pub fn with(mut self, segment: Segment) -> SignalResult<Self> {
        self.insert(segment)?;
        Ok(self)
    }

    /// Look up a segment by name.
    pub fn resolve(&self, name: &str) -> SignalResult<&Segment> {
        self.segments.get(name).ok_or_else(|| SignalError::UnknownSegment {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.segments.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The shortest non-zero segment duration. Zero length markers don't count.
    pub fn shortest_duration(&self) -> Option<SampleTime> {
        self.segments
            .values()
            .map(Segment::duration)
            .filter(|&duration| duration > 0.0)
            .min_by(SampleTime::total_cmp)
    }
}
