use crate::error::{SignalError, SignalResult};
use crate::types::{Breakpoint, SampleTime, SampleValue};

/// The merged signal, with strictly increasing times. This is what gets written out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinalSequence {
    points: Vec<Breakpoint>,
}

impl FinalSequence {
    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    pub fn times(&self) -> impl Iterator<Item = SampleTime> + '_ {
        self.points.iter().map(|&(time, _)| time)
    }

    pub fn voltages(&self) -> impl Iterator<Item = SampleValue> + '_ {
        self.points.iter().map(|&(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The time of the last breakpoint.
    pub fn duration(&self) -> SampleTime {
        self.points.last().map_or(0.0, |&(time, _)| time)
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.points.windows(2).all(|pair| pair[0].0 < pair[1].0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Breakpoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a FinalSequence {
    type Item = &'a Breakpoint;
    type IntoIter = std::slice::Iter<'a, Breakpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Merge the timeline and the overlay into one sequence.
///
/// Points are sorted by time with a stable sort, so where two points share a time the timeline's
/// point comes first and each input keeps its own order. Coincident times are then spread apart
/// by at most `epsilon` with `repair_duplicates`. Voltages are never changed or dropped.
pub fn merge(
    timeline: &[Breakpoint],
    overlay: &[Breakpoint],
    epsilon: SampleTime,
) -> SignalResult<FinalSequence> {
    check_epsilon(epsilon)?;

    let mut points = Vec::with_capacity(timeline.len() + overlay.len());
    points.extend_from_slice(timeline);
    points.extend_from_slice(overlay);
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    repair_duplicates(&mut points, epsilon)?;
    Ok(FinalSequence { points })
}

/// Make the times of a time sorted sequence strictly increasing. Returns how many points were
/// moved.
///
/// Each run of `k` points sharing a time keeps its first point where it is and spreads the rest
/// forward in equal steps of `min(epsilon / (k - 1), gap / k)`, where `gap` is the distance to the
/// next distinct time. So no point moves by more than `epsilon`, none is pushed up to or past the
/// next original time, and points outside the run are left alone. This is a known, bounded timing
/// distortion: a repaired edge is up to `epsilon` later than it should be.
pub fn repair_duplicates(points: &mut [Breakpoint], epsilon: SampleTime) -> SignalResult<usize> {
    check_epsilon(epsilon)?;

    let mut moved = 0;
    let mut start = 0;
    while start < points.len() {
        let time = points[start].0;
        let mut end = start + 1;
        while end < points.len() && points[end].0 == time {
            end += 1;
        }

        let next = points.get(end).map(|&(next, _)| next);
        if matches!(next, Some(next) if next < time) {
            return Err(SignalError::UnsortedBreakpoints { index: end });
        }

        let count = end - start;
        if count > 1 {
            let mut step = epsilon / (count - 1) as SampleTime;
            if let Some(next) = next {
                step = step.min((next - time) / count as SampleTime);
            }

            let mut previous = time;
            for (idx, point) in points[start + 1..end].iter_mut().enumerate() {
                let mut repaired = time + step * (idx + 1) as SampleTime;
                if repaired <= previous {
                    repaired = next_up(previous);
                }
                if matches!(next, Some(next) if repaired >= next) {
                    return Err(SignalError::invalid_config(format!(
                        "{} points at {:e}s can't be separated before {:e}s",
                        count,
                        time,
                        next.unwrap_or(time)
                    )));
                }

                point.0 = repaired;
                previous = repaired;
            }
            moved += count - 1;
        }

        start = end;
    }

    Ok(moved)
}

/// The smallest time after `time`.
fn next_up(time: SampleTime) -> SampleTime {
    if time == 0.0 {
        return SampleTime::from_bits(1);
    }

    let bits = time.to_bits();
    if time > 0.0 {
        SampleTime::from_bits(bits + 1)
    } else {
        SampleTime::from_bits(bits - 1)
    }
}

fn check_epsilon(epsilon: SampleTime) -> SignalResult<()> {
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(SignalError::invalid_config(format!(
            "repair epsilon must be positive, got {}",
            epsilon
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: SampleTime = 1e-9;

    #[test]
    fn separates_coincident_edges() {
        let timeline = [
            (0.0, 0.0),
            (4.7e-6, 0.0),
            (4.7e-6, 0.3),
            (64.05e-6, 0.3),
            (64.05e-6, 0.0),
            (68.75e-6, 0.0),
            (68.75e-6, 0.3),
            (128.1e-6, 0.3),
        ];

        let merged = merge(&timeline, &[], EPSILON).unwrap();
        assert!(merged.is_strictly_increasing());
        assert_eq!(merged.len(), 8);

        let times: Vec<_> = merged.times().collect();
        assert!((times[2] - times[1] - EPSILON).abs() < 1e-18);
        assert!((times[4] - times[3] - EPSILON).abs() < 1e-18);
        assert!((times[6] - times[5] - EPSILON).abs() < 1e-18);
        assert_eq!(times[1], 4.7e-6);
        assert_eq!(times[5], timeline[5].0);

        let voltages: Vec<_> = merged.voltages().collect();
        assert_eq!(voltages, [0.0, 0.0, 0.3, 0.3, 0.0, 0.0, 0.3, 0.3]);
    }

    #[test]
    fn timeline_wins_ties() {
        let timeline = [(0.0, 0.0), (1e-6, 0.3), (5e-6, 0.3)];
        let overlay = [(1e-6, 0.8), (3e-6, 0.8), (3e-6, 0.3)];

        let merged = merge(&timeline, &overlay, EPSILON).unwrap();
        let voltages: Vec<_> = merged.voltages().collect();
        assert_eq!(voltages, [0.0, 0.3, 0.8, 0.8, 0.3, 0.3]);
        assert!(merged.is_strictly_increasing());
    }

    #[test]
    fn runs_of_duplicates_spread_within_epsilon() {
        let mut points = vec![(1.0, 0.0), (1.0, 0.1), (1.0, 0.2), (1.0, 0.3)];
        let moved = repair_duplicates(&mut points, 0.5).unwrap();
        assert_eq!(moved, 3);
        let expected = [1.0, 1.0 + 0.5 / 3.0, 1.0 + 1.0 / 3.0, 1.5];
        for (point, expected) in points.iter().zip(expected) {
            assert!((point.0 - expected).abs() < 1e-12, "{} != {}", point.0, expected);
        }
    }

    #[test]
    fn close_followers_stay_put() {
        let mut points = vec![(0.0, 0.0), (0.0, 0.1), (0.5, 0.2), (2.0, 0.3)];
        repair_duplicates(&mut points, 1.0).unwrap();
        let times: Vec<_> = points.iter().map(|p| p.0).collect();
        assert_eq!(times, [0.0, 0.25, 0.5, 2.0]);
    }

    #[test]
    fn narrow_plateaus_do_not_drift() {
        // Plateau edges 1ns apart, each shared by two points, with a much larger epsilon.
        let mut points = Vec::new();
        for step in 0..1000 {
            let time = step as SampleTime * 1e-9;
            points.push((time, 0.5));
            points.push((time, 0.6));
        }
        points.push((1e-6, 0.3));
        let original = points.clone();

        repair_duplicates(&mut points, 0.32e-6).unwrap();
        for (idx, (repaired, original)) in points.iter().zip(&original).enumerate() {
            let shift = repaired.0 - original.0;
            assert!(shift >= 0.0 && shift <= 0.32e-6, "point {} moved {:e}s", idx, shift);
            assert!(shift <= 0.5e-9 + 1e-20, "point {} moved past its gap: {:e}s", idx, shift);
        }
        assert_eq!(points.last().unwrap().0, 1e-6);
        for pair in points.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
    }

    #[test]
    fn unsorted_input_is_an_error() {
        let mut points = vec![(1.0, 0.0), (1.0, 0.1), (0.5, 0.2)];
        assert!(matches!(
            repair_duplicates(&mut points, 0.1),
            Err(SignalError::UnsortedBreakpoints { index: 2 })
        ));
    }

    #[test]
    fn first_pair_is_repaired_too() {
        let mut points = vec![(0.0, 0.0), (0.0, 0.3)];
        repair_duplicates(&mut points, EPSILON).unwrap();
        assert_eq!(points[1].0, EPSILON);
    }

    #[test]
    fn does_not_touch_inputs() {
        let timeline = vec![(0.0, 0.0), (0.0, 0.3)];
        let overlay = vec![(0.0, 0.5)];
        let merged = merge(&timeline, &overlay, EPSILON).unwrap();
        assert_eq!(timeline, [(0.0, 0.0), (0.0, 0.3)]);
        assert_eq!(overlay, [(0.0, 0.5)]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn rejects_bad_epsilon() {
        assert!(merge(&[], &[], 0.0).is_err());
        assert!(merge(&[], &[], -1e-9).is_err());
        assert!(repair_duplicates(&mut [], SampleTime::INFINITY).is_err());
    }

    #[test]
    fn empty_inputs_merge_to_nothing() {
        let merged = merge(&[], &[], EPSILON).unwrap();
        assert!(merged.is_empty());
        assert!(merged.is_strictly_increasing());
        assert_eq!(merged.duration(), 0.0);
    }
}
