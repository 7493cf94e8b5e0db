use serde::{Deserialize, Serialize};

use super::config::{AssessmentScheme, CaMode};

/// Raw marks entered for one subject. Any score may be missing while a
/// result is still being drafted.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct SubjectScoreEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca1_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca2_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca3_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca4_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_score: Option<f64>,
}

impl SubjectScoreEntry {
    fn ca_scores(&self) -> [Option<f64>; 4] {
        [self.ca1_score, self.ca2_score, self.ca3_score, self.ca4_score]
    }

    /// True when no score has been entered at all.
    pub fn is_blank(&self) -> bool {
        self.ca_scores()
            .iter()
            .chain(std::iter::once(&self.exam_score))
            .all(|s| s.map_or(true, f64::is_nan))
    }
}

/// CA and exam contributions of a weighted subject total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedScore {
    pub ca: f64,
    pub exam: f64,
    pub total: f64,
}

/// Clamp a raw score to `[0, max]`. Missing and NaN scores count as 0.
pub fn clamp_score(score: Option<f64>, max: f64) -> f64 {
    match score {
        Some(v) if !v.is_nan() => v.clamp(0.0, max.max(0.0)),
        _ => 0.0,
    }
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weighted subject total in 0..=100, rounded to 2 decimals.
pub fn compute_weighted_total(entry: &SubjectScoreEntry, scheme: &AssessmentScheme) -> f64 {
    weighted_breakdown(entry, scheme).total
}

/// Same computation as [`compute_weighted_total`], keeping the CA and exam
/// contributions apart for report columns.
pub fn weighted_breakdown(entry: &SubjectScoreEntry, scheme: &AssessmentScheme) -> WeightedScore {
    let ca = match scheme.ca_mode() {
        CaMode::Single(weight) => clamp_score(entry.ca1_score, 100.0) * (weight as f64 / 100.0),
        // Each component's weight is also its maximum raw mark.
        CaMode::Split(weights) => entry
            .ca_scores()
            .iter()
            .zip(weights.iter())
            .map(|(score, max)| clamp_score(*score, *max as f64))
            .sum(),
    };

    let exam_weight = scheme.exam_percentage() as f64 / 100.0;
    let exam = clamp_score(entry.exam_score, 100.0) * exam_weight;

    WeightedScore {
        ca: round2(ca),
        exam: round2(exam),
        total: round2(ca + exam),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(ca: u32, exam: u32) -> AssessmentScheme {
        AssessmentScheme {
            ca: Some(ca),
            exam: Some(exam),
            ..AssessmentScheme::empty()
        }
    }

    fn split(weights: [u32; 4], exam: u32) -> AssessmentScheme {
        AssessmentScheme {
            ca1: Some(weights[0]),
            ca2: Some(weights[1]),
            ca3: Some(weights[2]),
            ca4: Some(weights[3]),
            exam: Some(exam),
            ..AssessmentScheme::empty()
        }
    }

    fn entry(ca: [Option<f64>; 4], exam: Option<f64>) -> SubjectScoreEntry {
        SubjectScoreEntry {
            ca1_score: ca[0],
            ca2_score: ca[1],
            ca3_score: ca[2],
            ca4_score: ca[3],
            exam_score: exam,
        }
    }

    #[test]
    fn test_single_ca_weighting() {
        let e = entry([Some(80.0), None, None, None], Some(50.0));
        assert_eq!(compute_weighted_total(&e, &single(60, 40)), 68.0);
    }

    #[test]
    fn test_split_ca_weighting() {
        let e = entry(
            [Some(5.0), Some(8.0), Some(10.0), Some(3.0)],
            Some(90.0),
        );
        assert_eq!(compute_weighted_total(&e, &split([10, 10, 10, 10], 60)), 80.0);
    }

    #[test]
    fn test_single_ca_clamped_to_100() {
        let scheme = single(50, 50);
        let over = entry([Some(150.0), None, None, None], Some(60.0));
        let capped = entry([Some(100.0), None, None, None], Some(60.0));
        assert_eq!(
            compute_weighted_total(&over, &scheme),
            compute_weighted_total(&capped, &scheme)
        );
        assert_eq!(compute_weighted_total(&over, &scheme), 80.0);
    }

    #[test]
    fn test_split_component_clamped_to_its_weight() {
        let scheme = split([10, 10, 0, 0], 80);
        let e = entry([Some(25.0), Some(-4.0), Some(9.0), None], Some(100.0));
        // ca1 -> 10, ca2 -> 0, ca3 has weight 0 -> 0
        assert_eq!(compute_weighted_total(&e, &scheme), 90.0);
    }

    #[test]
    fn test_missing_and_nan_scores_count_as_zero() {
        let scheme = single(30, 70);
        let e = entry([Some(f64::NAN), None, None, None], None);
        assert_eq!(compute_weighted_total(&e, &scheme), 0.0);

        let e = entry([None, None, None, None], Some(f64::NAN));
        assert_eq!(compute_weighted_total(&e, &scheme), 0.0);
    }

    #[test]
    fn test_exam_clamped_and_negative_ignored() {
        let scheme = single(30, 70);
        let e = entry([Some(-20.0), None, None, None], Some(140.0));
        assert_eq!(compute_weighted_total(&e, &scheme), 70.0);
    }

    #[test]
    fn test_exam_weight_defaults_to_remainder() {
        let scheme = AssessmentScheme {
            ca: Some(40),
            ..AssessmentScheme::empty()
        };
        let e = entry([Some(50.0), None, None, None], Some(50.0));
        // 50 * 0.4 + 50 * 0.6
        assert_eq!(compute_weighted_total(&e, &scheme), 50.0);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let scheme = single(30, 70);
        let e = entry([Some(33.333), None, None, None], Some(66.667));
        // 9.9999 + 46.6669
        assert_eq!(compute_weighted_total(&e, &scheme), 56.67);
    }

    #[test]
    fn test_breakdown_parts() {
        let e = entry([Some(80.0), None, None, None], Some(50.0));
        let parts = weighted_breakdown(&e, &single(60, 40));
        assert_eq!(parts.ca, 48.0);
        assert_eq!(parts.exam, 20.0);
        assert_eq!(parts.total, 68.0);
    }

    #[test]
    fn test_is_blank() {
        assert!(SubjectScoreEntry::default().is_blank());
        assert!(entry([Some(f64::NAN), None, None, None], None).is_blank());
        assert!(!entry([None, None, None, None], Some(0.0)).is_blank());
    }
}
