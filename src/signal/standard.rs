use crate::config::SignalConfig;
use crate::error::SignalResult;
use crate::signal::{PlanEntry, Segment, SegmentLibrary, SequencePlan};
use crate::types::{Breakpoint, SampleTime};

/// Half a line with a short sync pulse.
pub const EQUALIZING: &str = "equalizing";

/// Half a line that is mostly sync, the vertical sync proper.
pub const BROAD: &str = "broad";

/// A full line with a line sync and nothing but blanking after it.
pub const BLANK_LINE: &str = "blank_line";

/// A full line with a line sync that carries active video.
pub const DISPLAY_LINE: &str = "display_line";

/// Half a blank line, used where the field boundary falls mid line.
pub const HALF_LINE: &str = "half_line";

/// A full VGA line held at sync, serrated at the end.
pub const VSYNC_LINE: &str = "vsync_line";

/// A single sync tip breakpoint closing the frame, where the next frame's first edge would be.
pub const FRAME_END: &str = "frame_end";

/// The display lines in each PAL field.
pub const PAL_DISPLAY_LINES_PER_FIELD: usize = 287;

/// A pulse at the sync tip for `width`, then blanking until `length`.
fn pulse(config: &SignalConfig, width: SampleTime, length: SampleTime) -> Vec<Breakpoint> {
    vec![
        (0.0, config.sync_level),
        (width, config.sync_level),
        (width, config.black_level),
        (length, config.black_level),
    ]
}

/// The segments shared by every standard: blank and display lines and the frame terminator.
fn line_segments(config: &SignalConfig) -> SignalResult<SegmentLibrary> {
    let line = pulse(config, config.line_sync, config.line_period);

    SegmentLibrary::new(config)
        .with(Segment::new(BLANK_LINE, line.clone()))?
        .with(Segment::new(DISPLAY_LINE, line).display_line())?
        .with(Segment::new(FRAME_END, vec![(0.0, config.sync_level)]))
}

/// The PAL segment set.
pub fn pal_library(config: &SignalConfig) -> SignalResult<SegmentLibrary> {
    let half = config.line_period / 2.0;

    line_segments(config)?
        .with(Segment::new(EQUALIZING, pulse(config, config.short_sync, half)).vertical_sync())?
        .with(Segment::new(BROAD, pulse(config, config.broad_sync, half)).vertical_sync())?
        .with(Segment::new(HALF_LINE, pulse(config, config.line_sync, half)))
}

/// Two interlaced PAL fields, 625 lines in all.
///
/// Each field opens with five equalizing pulses, five broad pulses and five more equalizing
/// pulses, then blank lines up to the first of its display lines. The first field ends on a half
/// line so the second field's vertical sync starts mid line, and a last equalizing pulse closes
/// the frame.
pub fn pal_plan(library: &SegmentLibrary) -> SignalResult<SequencePlan> {
    let vertical_sync = [
        PlanEntry::new(EQUALIZING, 5),
        PlanEntry::new(BROAD, 5),
        PlanEntry::new(EQUALIZING, 5),
    ];

    let mut entries = Vec::new();
    entries.extend(vertical_sync.iter().cloned());
    entries.push(PlanEntry::new(BLANK_LINE, 17));
    entries.push(PlanEntry::new(DISPLAY_LINE, PAL_DISPLAY_LINES_PER_FIELD));
    entries.push(PlanEntry::new(HALF_LINE, 1));

    entries.extend(vertical_sync.iter().cloned());
    entries.push(PlanEntry::new(BLANK_LINE, 18));
    entries.push(PlanEntry::new(DISPLAY_LINE, PAL_DISPLAY_LINES_PER_FIELD));
    entries.push(PlanEntry::new(EQUALIZING, 1));
    entries.push(PlanEntry::new(FRAME_END, 1));

    SequencePlan::new(entries, library)
}

/// The VGA segment set.
pub fn vga_library(config: &SignalConfig) -> SignalResult<SegmentLibrary> {
    line_segments(config)?.with(
        Segment::new(VSYNC_LINE, pulse(config, config.broad_sync, config.line_period)).vertical_sync(),
    )
}

/// One progressive 525 line VGA frame: two vertical sync lines, 33 lines of back porch, the
/// visible lines, and 10 lines of front porch.
pub fn vga_plan(library: &SegmentLibrary, config: &SignalConfig) -> SignalResult<SequencePlan> {
    SequencePlan::new(
        vec![
            PlanEntry::new(VSYNC_LINE, 2),
            PlanEntry::new(BLANK_LINE, 33),
            PlanEntry::new(DISPLAY_LINE, config.vertical_resolution),
            PlanEntry::new(BLANK_LINE, 10),
            PlanEntry::new(FRAME_END, 1),
        ],
        library,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pal_frame_is_625_lines() {
        let config = SignalConfig::pal();
        let library = pal_library(&config).unwrap();
        let plan = pal_plan(&library).unwrap();
        let lines = plan.frame_lines(&library, &config).unwrap();
        assert!((lines - 625.0).abs() < 1e-9, "{} lines", lines);
    }

    #[test]
    fn pal_fields_share_rows() {
        let config = SignalConfig::pal();
        let library = pal_library(&config).unwrap();
        let plan = pal_plan(&library).unwrap();
        let rows: Vec<_> = plan
            .expand(&library, &config)
            .unwrap()
            .iter()
            .filter_map(|i| i.line_index)
            .collect();

        assert_eq!(rows.len(), 2 * PAL_DISPLAY_LINES_PER_FIELD);
        assert_eq!(rows[PAL_DISPLAY_LINES_PER_FIELD - 1], 572);
        assert_eq!(rows[PAL_DISPLAY_LINES_PER_FIELD], 0);
        assert_eq!(rows[..PAL_DISPLAY_LINES_PER_FIELD], rows[PAL_DISPLAY_LINES_PER_FIELD..]);
    }

    #[test]
    fn pal_broad_pulses_are_serrated_half_lines() {
        let config = SignalConfig::pal();
        let library = pal_library(&config).unwrap();
        let broad = library.resolve(BROAD).unwrap();
        assert!(broad.is_vertical_sync());
        assert_eq!(broad.duration(), 32e-6);
        assert_eq!(broad.breakpoints()[1], (config.broad_sync, 0.0));
        assert!((config.line_period / 2.0 - config.broad_sync - config.line_sync).abs() < 1e-15);
    }

    #[test]
    fn vga_frame_is_525_lines() {
        let config = SignalConfig::vga();
        let library = vga_library(&config).unwrap();
        let plan = vga_plan(&library, &config).unwrap();
        let lines = plan.frame_lines(&library, &config).unwrap();
        assert!((lines - 525.0).abs() < 1e-9, "{} lines", lines);

        let rows: Vec<_> = plan
            .expand(&library, &config)
            .unwrap()
            .iter()
            .filter_map(|i| i.line_index)
            .collect();
        assert_eq!(rows, (0..480).collect::<Vec<_>>());
    }

    #[test]
    fn frame_end_is_a_zero_length_marker() {
        let library = pal_library(&SignalConfig::pal()).unwrap();
        let end = library.resolve(FRAME_END).unwrap();
        assert_eq!(end.duration(), 0.0);
        assert_eq!(library.shortest_duration(), Some(32e-6));
    }
}
