use std::collections::BTreeMap;

use super::points::{grade_point, WORST_POINT};

/// Subjects every candidate is graded on.
pub const CORE_SUBJECTS: [&str; 4] = ["mathematics", "english", "social", "science"];

/// Subjects the best two grade points are taken from.
pub const ELECTIVE_SUBJECTS: [&str; 6] = [
    "career_technology",
    "rme",
    "ict",
    "creative_arts",
    "gh_language",
    "french",
];

/// Number of electives counted towards the aggregate.
pub const COUNTED_ELECTIVES: usize = 2;

/// Raw mock scores keyed by subject. `None` is a subject left blank.
pub type MockScores = BTreeMap<String, Option<f64>>;

/// Score for `subject`, or `None` when it is missing, blank or NaN.
pub fn present_score(scores: &MockScores, subject: &str) -> Option<f64> {
    scores
        .get(subject)
        .copied()
        .flatten()
        .filter(|v| !v.is_nan())
        .map(|v| v.clamp(0.0, 100.0))
}

/// Sum of the four core grade points and the two best elective grade points.
/// Lower is better: 6 is the best possible aggregate, 54 the worst.
pub fn aggregate(scores: &MockScores) -> u32 {
    let core: u32 = CORE_SUBJECTS
        .iter()
        .map(|subject| {
            present_score(scores, subject)
                .map(grade_point)
                .unwrap_or(WORST_POINT) as u32
        })
        .sum();

    let mut electives: Vec<u8> = ELECTIVE_SUBJECTS
        .iter()
        .filter_map(|subject| present_score(scores, subject).map(grade_point))
        .collect();
    electives.sort_unstable();
    electives.resize(electives.len().max(COUNTED_ELECTIVES), WORST_POINT);

    let best: u32 = electives
        .iter()
        .take(COUNTED_ELECTIVES)
        .map(|p| *p as u32)
        .sum();

    core + best
}

/// Mean of all positive scores (any subject), rounded to the nearest integer.
/// Zero and blank scores are skipped; 0 when nothing is left.
pub fn raw_average(scores: &MockScores) -> u32 {
    let counted: Vec<f64> = scores
        .values()
        .filter_map(|s| s.filter(|v| *v > 0.0))
        .map(|v| v.clamp(0.0, 100.0))
        .collect();

    if counted.is_empty() {
        return 0;
    }
    let mean = counted.iter().sum::<f64>() / counted.len() as f64;
    mean.round() as u32
}
