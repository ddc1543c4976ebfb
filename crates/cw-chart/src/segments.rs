//! Proportional segment layout
//!
//! One segment per group, in group order, sweeping a share of the full turn
//! proportional to the group's aggregate. Angles accumulate from 0, so the
//! final end angle equals `2π` only up to floating-point drift.

use crate::grouping::CategoryGroup;
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// One full turn in radians
pub const FULL_TURN: f64 = TAU;

/// Tolerance for angle and sum comparisons
pub const ANGLE_EPSILON: f64 = 1e-9;

/// One angular slice of the donut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Category the slice belongs to
    pub category_key: String,
    /// Aggregate magnitude of the category
    pub value: f64,
    /// Share of the total, in `[0, 1]`
    pub proportion: f64,
    /// Inclusive start angle (radians)
    pub start_angle: f64,
    /// Exclusive end angle (radians)
    pub end_angle: f64,
    /// Position-derived palette index
    pub color_index: usize,
}

impl Segment {
    /// Angular width
    #[inline]
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// End angle revealed at `progress` (clamped to `[0, 1]`)
    #[inline]
    #[must_use]
    pub fn partial_end_angle(&self, progress: f64) -> f64 {
        self.start_angle + self.sweep() * progress.clamp(0.0, 1.0)
    }

    /// Whether `angle` (radians, any turn) falls in `[start, end)`
    #[must_use]
    pub fn contains_angle(&self, angle: f64) -> bool {
        let angle = angle.rem_euclid(FULL_TURN);
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// Relative weight of each group, scaled so that summing cannot overflow
///
/// Weights are aggregates divided by the largest one. A category whose own
/// sum overflowed is rescaled from its members, which are always finite.
fn group_weights(groups: &[CategoryGroup]) -> Vec<f64> {
    let largest = groups
        .iter()
        .map(|g| g.aggregate_magnitude)
        .fold(0.0, f64::max);
    if largest.is_finite() {
        if largest <= 0.0 {
            return vec![0.0; groups.len()];
        }
        return groups
            .iter()
            .map(|g| g.aggregate_magnitude / largest)
            .collect();
    }

    let largest = groups
        .iter()
        .flat_map(|g| &g.records)
        .map(|r| r.magnitude)
        .fold(0.0, f64::max);
    if largest <= 0.0 || !largest.is_finite() {
        return vec![0.0; groups.len()];
    }
    groups
        .iter()
        .map(|g| g.records.iter().map(|r| r.magnitude / largest).sum())
        .collect()
}

/// Lay out groups as segments
///
/// Returns no segments when the total magnitude is zero. Segment `i`
/// corresponds to group `i`. Proportions stay exact even when the total
/// itself exceeds the `f64` range.
#[must_use]
pub fn generate_segments(groups: &[CategoryGroup], palette: &Palette) -> Vec<Segment> {
    let weights = group_weights(groups);
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return Vec::new();
    }

    let mut running = 0.0;
    let segments: Vec<Segment> = groups
        .iter()
        .zip(&weights)
        .enumerate()
        .map(|(position, (group, weight))| {
            let proportion = weight / total_weight;
            let sweep = proportion * FULL_TURN;
            let segment = Segment {
                category_key: group.key.clone(),
                value: group.aggregate_magnitude,
                proportion,
                start_angle: running,
                end_angle: running + sweep,
                color_index: palette.index_for(position),
            };
            running += sweep;
            segment
        })
        .collect();

    tracing::trace!(segments = segments.len(), drift = running - FULL_TURN, "segments laid out");
    segments
}

/// Index of the segment under `angle`, if any
///
/// The last non-empty segment also owns the gap between its end and `2π`
/// left by floating-point drift.
#[must_use]
pub fn segment_at_angle(segments: &[Segment], angle: f64) -> Option<usize> {
    let angle = angle.rem_euclid(FULL_TURN);
    segments
        .iter()
        .position(|s| s.contains_angle(angle))
        .or_else(|| {
            segments
                .iter()
                .rposition(|s| s.sweep() > 0.0)
                .filter(|&last| angle >= segments[last].start_angle)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn group(key: &str, aggregate: f64) -> CategoryGroup {
        CategoryGroup {
            key: key.to_string(),
            records: Vec::new(),
            aggregate_magnitude: aggregate,
            newest_timestamp: DateTime::UNIX_EPOCH,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < ANGLE_EPSILON
    }

    #[test]
    fn zero_total_has_no_segments() {
        let palette = Palette::default();
        assert!(generate_segments(&[], &palette).is_empty());
        assert!(generate_segments(&[group("A", 0.0), group("B", 0.0)], &palette).is_empty());
    }

    #[test]
    fn proportions_and_angles() {
        let segments = generate_segments(
            &[group("Transport", 80.0), group("Food", 20.0)],
            &Palette::default(),
        );

        assert_eq!(segments.len(), 2);
        assert!(approx(segments[0].proportion, 0.8));
        assert!(approx(segments[0].start_angle, 0.0));
        assert!(approx(segments[0].end_angle, 1.6 * std::f64::consts::PI));
        assert!(approx(segments[1].start_angle, segments[0].end_angle));
        assert!(approx(segments[1].end_angle, FULL_TURN));
        assert_eq!(segments[1].color_index, 1);
    }

    #[test]
    fn zero_group_keeps_alignment() {
        let segments = generate_segments(
            &[group("A", 0.0), group("B", 10.0)],
            &Palette::default(),
        );
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].sweep(), 0.0);
        assert_eq!(segments[1].category_key, "B");
    }

    #[test]
    fn colors_wrap_around_palette() {
        let palette = Palette::new(["#000", "#fff"]).unwrap();
        let groups: Vec<_> = (0..5).map(|i| group(&format!("g{i}"), 1.0)).collect();
        let indices: Vec<_> = generate_segments(&groups, &palette)
            .iter()
            .map(|s| s.color_index)
            .collect();
        assert_eq!(indices, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn partial_end_angle_interpolates() {
        let segment = Segment {
            category_key: "A".into(),
            value: 1.0,
            proportion: 0.5,
            start_angle: 1.0,
            end_angle: 3.0,
            color_index: 0,
        };
        assert_eq!(segment.partial_end_angle(0.0), 1.0);
        assert_eq!(segment.partial_end_angle(0.5), 2.0);
        assert_eq!(segment.partial_end_angle(1.0), 3.0);
        assert_eq!(segment.partial_end_angle(7.0), 3.0);
    }

    #[test]
    fn hit_testing_by_angle() {
        let segments = generate_segments(
            &[group("A", 1.0), group("B", 1.0)],
            &Palette::default(),
        );
        assert_eq!(segment_at_angle(&segments, 0.1), Some(0));
        assert_eq!(segment_at_angle(&segments, 4.0), Some(1));
        assert_eq!(segment_at_angle(&segments, FULL_TURN + 0.1), Some(0));
    }

    #[test]
    fn drift_gap_before_full_turn_belongs_to_last_segment() {
        let mut segments = generate_segments(
            &[group("A", 1.0), group("B", 1.0), group("C", 0.0)],
            &Palette::default(),
        );
        segments[1].end_angle = FULL_TURN - 1e-12;
        segments[2].start_angle = segments[1].end_angle;
        segments[2].end_angle = segments[1].end_angle;

        assert_eq!(segment_at_angle(&segments, FULL_TURN - 1e-13), Some(1));
        assert_eq!(segment_at_angle(&segments, -1e-13), Some(1));
        assert_eq!(segment_at_angle(&[], 1.0), None);
    }

    #[test]
    fn huge_aggregates_still_span_the_full_turn() {
        let segments = generate_segments(
            &[group("A", 1e308), group("B", 1e308), group("C", 5e307)],
            &Palette::default(),
        );

        assert_eq!(segments.len(), 3);
        assert!(approx(segments[0].proportion, 0.4));
        assert!(approx(segments[2].proportion, 0.2));
        assert!(approx(segments[2].end_angle, FULL_TURN));
    }

    #[test]
    fn overflowing_category_is_rescaled_from_members() {
        let member = |magnitude: f64| cw_record::Record {
            id: cw_record::RecordId::new("m"),
            name: None,
            category: "A".into(),
            magnitude,
            timestamp: DateTime::UNIX_EPOCH,
            footprint: None,
            extra: indexmap::IndexMap::new(),
        };
        let overflowed = CategoryGroup {
            key: "A".into(),
            records: vec![member(1e308), member(1e308)],
            aggregate_magnitude: f64::INFINITY,
            newest_timestamp: DateTime::UNIX_EPOCH,
        };
        let mut small = group("B", 1e308);
        small.records = vec![member(1e308)];

        let segments = generate_segments(&[overflowed, small], &Palette::default());

        assert!(approx(segments[0].proportion, 2.0 / 3.0));
        assert!(approx(segments[1].end_angle, FULL_TURN));
    }
}
