use crate::error::{SignalError, SignalResult};
use crate::types::{SampleTime, SampleValue, SignalFloat};

/// The length of time for each PAL scanline in seconds.
pub const PAL_LINE_PERIOD: SignalFloat = 64e-6;

/// The width of the horizontal sync pulse at the start of every PAL line.
pub const PAL_LINE_SYNC: SignalFloat = 4.7e-6;

/// The width of an equalizing pulse, half the line sync.
pub const PAL_SHORT_SYNC: SignalFloat = 2.35e-6;

/// The width of a broad (vertical) sync pulse. Broad pulses come in half-line pairs, each
/// serrated by a line sync width of blanking before the next half line starts.
pub const PAL_BROAD_SYNC: SignalFloat = PAL_LINE_PERIOD / 2.0 - PAL_LINE_SYNC;

/// The gap between the end of the line sync and the start of active video.
pub const PAL_FRONT_PORCH: SignalFloat = 1.65e-6;

/// The length of the active video part of each line.
pub const PAL_VISUAL_TIME: SignalFloat = 52e-6;

/// Whatever is left of the line after active video, until the next line sync.
pub const PAL_BACK_PORCH: SignalFloat =
    PAL_LINE_PERIOD - PAL_LINE_SYNC - PAL_FRONT_PORCH - PAL_VISUAL_TIME;

/// The number of video rows addressed by a full PAL frame.
pub const PAL_VERTICAL_RESOLUTION: usize = 576;

/// The pixel clock of 640x480@60 VGA, all the VGA timings are whole pixel counts of it.
pub const VGA_PIXEL_CLOCK: SignalFloat = 25.175e6;

/// The length of a VGA line, 800 pixels.
pub const VGA_LINE_PERIOD: SignalFloat = 800.0 / VGA_PIXEL_CLOCK;

/// The width of the VGA horizontal sync pulse, 96 pixels.
pub const VGA_LINE_SYNC: SignalFloat = 96.0 / VGA_PIXEL_CLOCK;

/// The blanking between sync and video, 48 pixels. This is the "back porch" in VGA terms but it
/// sits where the active window offset expects the front porch.
pub const VGA_FRONT_PORCH: SignalFloat = 48.0 / VGA_PIXEL_CLOCK;

/// The active video part of a VGA line, 640 pixels.
pub const VGA_VISUAL_TIME: SignalFloat = 640.0 / VGA_PIXEL_CLOCK;

/// The blanking after active video, 16 pixels.
pub const VGA_BACK_PORCH: SignalFloat = 16.0 / VGA_PIXEL_CLOCK;

/// In composite VGA the vertical sync line is held low for the whole line except for a
/// serration at the end, so the "broad" pulse is almost a full line.
pub const VGA_BROAD_SYNC: SignalFloat = VGA_LINE_PERIOD - VGA_LINE_SYNC;

/// The number of visible VGA lines.
pub const VGA_VERTICAL_RESOLUTION: usize = 480;

/// The sync tip, the lowest level in the signal.
pub const SYNC_LEVEL: SampleValue = 0.0;

/// The blanking/black level.
pub const BLACK_LEVEL: SampleValue = 0.3;

/// The peak white level.
pub const WHITE_LEVEL: SampleValue = 1.0;

/// The number of gray bands across a line in the default video pattern.
pub const DEFAULT_HORIZONTAL_RESOLUTION: usize = 8;

/// The default duplicate repair step, as a fraction of the shortest segment duration.
pub const DEFAULT_EPSILON_FRACTION: SignalFloat = 0.01;

/// How display lines address rows of the video matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Each field walks the full matrix height at twice the line rate.
    Interlaced,
    /// One field per frame, one row per display line.
    Progressive,
}

impl Scan {
    /// How many matrix rows to advance per display line.
    pub fn row_stride(self) -> usize {
        match self {
            Scan::Interlaced => 2,
            Scan::Progressive => 1,
        }
    }
}

/// The time shift used to separate coincident timestamps. Whatever it resolves to is also the
/// worst case timing error introduced per repaired point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepairEpsilon {
    /// A fraction of the shortest segment in the library, so it scales with the signal.
    Relative(SignalFloat),
    /// A fixed step in seconds.
    Absolute(SampleTime),
}

/// All the timing and voltage constants of one signal standard. Built once, never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub line_period: SampleTime,
    pub line_sync: SampleTime,
    pub short_sync: SampleTime,
    pub broad_sync: SampleTime,
    pub front_porch: SampleTime,
    pub back_porch: SampleTime,
    pub visual_time: SampleTime,
    pub sync_level: SampleValue,
    pub black_level: SampleValue,
    pub white_level: SampleValue,
    /// Samples per active line. A video matrix must have exactly this many, or none at all.
    pub horizontal_resolution: usize,
    pub vertical_resolution: usize,
    pub scan: Scan,
    pub repair_epsilon: RepairEpsilon,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self::pal()
    }
}

impl SignalConfig {
    /// 625 line interlaced PAL timing.
    pub fn pal() -> Self {
        Self {
            line_period: PAL_LINE_PERIOD,
            line_sync: PAL_LINE_SYNC,
            short_sync: PAL_SHORT_SYNC,
            broad_sync: PAL_BROAD_SYNC,
            front_porch: PAL_FRONT_PORCH,
            back_porch: PAL_BACK_PORCH,
            visual_time: PAL_VISUAL_TIME,
            sync_level: SYNC_LEVEL,
            black_level: BLACK_LEVEL,
            white_level: WHITE_LEVEL,
            horizontal_resolution: DEFAULT_HORIZONTAL_RESOLUTION,
            vertical_resolution: PAL_VERTICAL_RESOLUTION,
            scan: Scan::Interlaced,
            repair_epsilon: RepairEpsilon::Relative(DEFAULT_EPSILON_FRACTION),
        }
    }

    /// 640x480@60 VGA timing with composite sync.
    pub fn vga() -> Self {
        Self {
            line_period: VGA_LINE_PERIOD,
            line_sync: VGA_LINE_SYNC,
            short_sync: VGA_LINE_SYNC,
            broad_sync: VGA_BROAD_SYNC,
            front_porch: VGA_FRONT_PORCH,
            back_porch: VGA_BACK_PORCH,
            visual_time: VGA_VISUAL_TIME,
            sync_level: SYNC_LEVEL,
            black_level: BLACK_LEVEL,
            white_level: WHITE_LEVEL,
            horizontal_resolution: DEFAULT_HORIZONTAL_RESOLUTION,
            vertical_resolution: VGA_VERTICAL_RESOLUTION,
            scan: Scan::Progressive,
            repair_epsilon: RepairEpsilon::Relative(DEFAULT_EPSILON_FRACTION),
        }
    }

    /// Where active video starts, relative to the start of a line.
    pub fn active_window_offset(&self) -> SampleTime {
        self.line_sync + self.front_porch
    }

    /// Check the constants describe a usable signal.
    pub fn validate(&self) -> SignalResult<()> {
        let timings = [
            ("line_period", self.line_period),
            ("line_sync", self.line_sync),
            ("short_sync", self.short_sync),
            ("broad_sync", self.broad_sync),
            ("visual_time", self.visual_time),
        ];
        for (name, value) in timings {
            if !value.is_finite() || value <= 0.0 {
                return Err(SignalError::invalid_config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in [("front_porch", self.front_porch), ("back_porch", self.back_porch)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SignalError::invalid_config(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.active_window_offset() + self.visual_time > self.line_period {
            return Err(SignalError::invalid_config(format!(
                "active video window ends at {:e}s, past the {:e}s line",
                self.active_window_offset() + self.visual_time,
                self.line_period
            )));
        }

        let levels = [self.sync_level, self.black_level, self.white_level];
        if levels.iter().any(|level| !level.is_finite())
            || self.sync_level > self.black_level
            || self.black_level >= self.white_level
        {
            return Err(SignalError::invalid_config(format!(
                "levels must satisfy sync <= black < white, got {} / {} / {}",
                self.sync_level, self.black_level, self.white_level
            )));
        }

        if self.vertical_resolution == 0 {
            return Err(SignalError::invalid_config("vertical_resolution must not be zero"));
        }

        let epsilon = match self.repair_epsilon {
            RepairEpsilon::Relative(fraction) => fraction,
            RepairEpsilon::Absolute(step) => step,
        };
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(SignalError::invalid_config(format!(
                "repair epsilon must be positive, got {}",
                epsilon
            )));
        }

        Ok(())
    }

    /// Whether a voltage can appear in active video.
    pub fn in_video_range(&self, value: SampleValue) -> bool {
        value >= self.black_level && value <= self.white_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        SignalConfig::pal().validate().unwrap();
        SignalConfig::vga().validate().unwrap();
    }

    #[test]
    fn pal_line_adds_up() {
        let pal = SignalConfig::pal();
        let total = pal.line_sync + pal.front_porch + pal.visual_time + pal.back_porch;
        assert!((total - pal.line_period).abs() < 1e-15);
        assert!((pal.broad_sync - 27.3e-6).abs() < 1e-15);
        assert!((pal.active_window_offset() - 6.35e-6).abs() < 1e-15);
    }

    #[test]
    fn vga_line_is_800_pixels() {
        let vga = SignalConfig::vga();
        let total = vga.line_sync + vga.front_porch + vga.visual_time + vga.back_porch;
        assert!((total - vga.line_period).abs() < 1e-15);
        assert!((vga.line_period - 31.777e-6).abs() < 1e-9);
    }

    #[test]
    fn rejects_window_past_line_end() {
        let mut config = SignalConfig::pal();
        config.visual_time = 60e-6;
        assert!(matches!(config.validate(), Err(SignalError::InvalidConfig { .. })));
    }

    #[test]
    fn rejects_inverted_levels() {
        let mut config = SignalConfig::pal();
        config.black_level = 1.2;
        assert!(matches!(config.validate(), Err(SignalError::InvalidConfig { .. })));
    }

    #[test]
    fn rejects_non_positive_epsilon() {
        let mut config = SignalConfig::pal();
        config.repair_epsilon = RepairEpsilon::Absolute(0.0);
        assert!(config.validate().is_err());
        config.repair_epsilon = RepairEpsilon::Relative(SignalFloat::NAN);
        assert!(config.validate().is_err());
    }
}
