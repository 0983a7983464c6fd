use crate::config::SignalConfig;
use crate::error::{SignalError, SignalResult};
use crate::signal::{PlanInstance, Timeline};
use crate::types::{Breakpoint, SampleTime, SampleValue, SignalFloat};

/// The gray levels shown during active video, indexed by horizontal sample and then by line.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMatrix {
    horizontal: usize,
    vertical: usize,
    levels: Vec<SampleValue>,
}

impl VideoMatrix {
    /// Create a matrix from levels stored sample by sample, each sample holding `vertical`
    /// consecutive lines.
    pub fn new(horizontal: usize, vertical: usize, levels: Vec<SampleValue>) -> SignalResult<Self> {
        if levels.len() != horizontal * vertical {
            return Err(SignalError::InvalidVideoMatrix {
                reason: format!(
                    "expected {}x{} = {} levels, got {}",
                    horizontal,
                    vertical,
                    horizontal * vertical,
                    levels.len()
                ),
            });
        }

        Ok(Self {
            horizontal,
            vertical,
            levels,
        })
    }

    /// Create a matrix by evaluating `f(sample, line)` for every cell.
    pub fn from_fn(
        horizontal: usize,
        vertical: usize,
        mut f: impl FnMut(usize, usize) -> SampleValue,
    ) -> Self {
        let mut levels = Vec::with_capacity(horizontal * vertical);
        for sample in 0..horizontal {
            for line in 0..vertical {
                levels.push(f(sample, line));
            }
        }

        Self {
            horizontal,
            vertical,
            levels,
        }
    }

    /// The default test pattern: equal width bands stepping from black on the left to white on
    /// the right, the same on every line.
    pub fn gray_bands(
        horizontal: usize,
        vertical: usize,
        black: SampleValue,
        white: SampleValue,
    ) -> Self {
        let steps = horizontal.saturating_sub(1).max(1) as SignalFloat;
        Self::from_fn(horizontal, vertical, |sample, _| {
            black + (white - black) * sample as SignalFloat / steps
        })
    }

    /// A matrix with no horizontal samples, which produces no active video at all.
    pub fn empty(vertical: usize) -> Self {
        Self {
            horizontal: 0,
            vertical,
            levels: Vec::new(),
        }
    }

    pub fn horizontal_resolution(&self) -> usize {
        self.horizontal
    }

    pub fn vertical_resolution(&self) -> usize {
        self.vertical
    }

    /// The level of a sample on a line, or `None` past the last sample or in a matrix with no
    /// lines. The line wraps around the vertical resolution.
    pub fn level(&self, sample: usize, line: usize) -> Option<SampleValue> {
        if sample >= self.horizontal || self.vertical == 0 {
            return None;
        }

        self.levels.get(sample * self.vertical + line % self.vertical).copied()
    }

    /// Check every level lies between black and white.
    pub fn validate(&self, config: &SignalConfig) -> SignalResult<()> {
        if let Some(idx) = self.levels.iter().position(|&level| !config.in_video_range(level)) {
            return Err(SignalError::InvalidVideoMatrix {
                reason: format!(
                    "level {} at sample {}, line {} outside [{}, {}]",
                    self.levels[idx],
                    idx / self.vertical,
                    idx % self.vertical,
                    config.black_level,
                    config.white_level
                ),
            });
        }

        Ok(())
    }
}

/// The active video part of one display line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveWindow {
    pub line_index: usize,
    pub start: SampleTime,
    pub end: SampleTime,
}

impl ActiveWindow {
    pub fn contains(&self, time: SampleTime) -> bool {
        time >= self.start && time <= self.end
    }
}

/// The active video waveform for a whole frame, on the same time base as the timeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayTimeline {
    points: Vec<Breakpoint>,
    windows: Vec<ActiveWindow>,
}

impl OverlayTimeline {
    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    /// The active window of every display line, in playback order.
    pub fn windows(&self) -> &[ActiveWindow] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Generate the active video for every display line in the frame.
///
/// Each display line's active window is split into one equal slot per horizontal sample, and each
/// slot is a flat plateau at that sample's level for the line's matrix row. After the last slot
/// the line drops back to black. A matrix with no samples adds no points.
pub fn overlay(
    instances: &[PlanInstance],
    timeline: &Timeline,
    matrix: &VideoMatrix,
    config: &SignalConfig,
) -> OverlayTimeline {
    let samples = if matrix.vertical_resolution() == 0 {
        0
    } else {
        matrix.horizontal_resolution()
    };
    let mut result = OverlayTimeline::default();

    for (instance, &offset) in instances.iter().zip(timeline.segment_starts()) {
        let Some(line_index) = instance.line_index else {
            continue;
        };

        let start = offset + config.active_window_offset();
        let end = start + config.visual_time;
        result.windows.push(ActiveWindow {
            line_index,
            start,
            end,
        });

        if samples == 0 {
            continue;
        }

        let boundary = |i: usize| -> SampleTime {
            if i == samples {
                end
            } else {
                start + (end - start) * i as SignalFloat / samples as SignalFloat
            }
        };

        result.points.reserve(samples * 2 + 1);
        for sample in 0..samples {
            let level = matrix.level(sample, line_index).unwrap_or(config.black_level);
            result.points.push((boundary(sample), level));
            result.points.push((boundary(sample + 1), level));
        }
        result.points.push((end, config.black_level));
    }

    result
}
