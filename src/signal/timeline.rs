use crate::signal::PlanInstance;
use crate::types::{Breakpoint, SampleTime};

/// The sync and blanking part of a frame, with every segment instance placed at its absolute
/// start time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    points: Vec<Breakpoint>,

    /// The absolute start of each instance, in the same order as the instances.
    starts: Vec<SampleTime>,

    end: SampleTime,
}

impl Timeline {
    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    pub fn segment_starts(&self) -> &[SampleTime] {
        &self.starts
    }

    /// The time the last instance finishes, i.e. the frame length.
    pub fn end(&self) -> SampleTime {
        self.end
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Lay out the instances back to back. Each one starts where the previous one's duration ends,
/// so the resulting times never go backwards.
pub fn assemble(instances: &[PlanInstance]) -> Timeline {
    let capacity = instances.iter().map(|i| i.segment.breakpoints().len()).sum();
    let mut points = Vec::with_capacity(capacity);
    let mut starts = Vec::with_capacity(instances.len());
    let mut offset = 0.0;

    for instance in instances {
        starts.push(offset);
        points.extend(
            instance
                .segment
                .breakpoints()
                .iter()
                .map(|&(time, value)| (offset + time, value)),
        );
        offset += instance.segment.duration();
    }

    Timeline {
        points,
        starts,
        end: offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignalConfig;
    use crate::signal::{PlanEntry, Segment, SegmentLibrary, SequencePlan};

    fn blank_line_library() -> SegmentLibrary {
        SegmentLibrary::new(&SignalConfig::pal())
            .with(Segment::new(
                "blank_line",
                vec![(0.0, 0.0), (4.7e-6, 0.0), (4.7e-6, 0.3), (64.05e-6, 0.3)],
            ))
            .unwrap()
    }

    #[test]
    fn two_blank_lines() {
        let library = blank_line_library();
        let plan = SequencePlan::new(vec![PlanEntry::new("blank_line", 2)], &library).unwrap();
        let instances = plan.expand(&library, &SignalConfig::pal()).unwrap();
        let timeline = assemble(&instances);

        let expected_times = [0.0, 4.7e-6, 4.7e-6, 64.05e-6, 64.05e-6, 68.75e-6, 68.75e-6, 128.1e-6];
        let expected_values = [0.0, 0.0, 0.3, 0.3, 0.0, 0.0, 0.3, 0.3];

        assert_eq!(timeline.len(), 8);
        for (idx, &(time, value)) in timeline.points().iter().enumerate() {
            assert!(
                (time - expected_times[idx]).abs() < 1e-18,
                "t[{}]={:e}, expected {:e}",
                idx,
                time,
                expected_times[idx]
            );
            assert_eq!(value, expected_values[idx]);
        }

        // Coincident edges stay exactly coincident until the merger repairs them.
        assert_eq!(timeline.points()[1].0, timeline.points()[2].0);
        assert_eq!(timeline.points()[5].0, timeline.points()[6].0);
        assert_eq!(timeline.segment_starts(), &[0.0, 64.05e-6]);
        assert!((timeline.end() - 128.1e-6).abs() < 1e-18);
    }

    #[test]
    fn offsets_advance_by_duration() {
        let library = blank_line_library()
            .with(Segment::new("half", vec![(0.0, 0.0), (2.35e-6, 0.0), (2.35e-6, 0.3), (32e-6, 0.3)]))
            .unwrap()
            .with(Segment::new("end", vec![(0.0, 0.0)]))
            .unwrap();
        let plan = SequencePlan::new(
            vec![
                PlanEntry::new("half", 3),
                PlanEntry::new("blank_line", 2),
                PlanEntry::new("end", 1),
            ],
            &library,
        )
        .unwrap();
        let instances = plan.expand(&library, &SignalConfig::pal()).unwrap();
        let timeline = assemble(&instances);

        let starts = timeline.segment_starts();
        assert_eq!(starts.len(), instances.len());
        for k in 1..starts.len() {
            assert_eq!(starts[k], starts[k - 1] + instances[k - 1].segment.duration());
        }
        for pair in timeline.points().windows(2) {
            assert!(pair[0].0 <= pair[1].0);
        }
    }

    #[test]
    fn empty_plan_gives_empty_timeline() {
        let timeline = assemble(&[]);
        assert!(timeline.is_empty());
        assert_eq!(timeline.end(), 0.0);
    }
}
