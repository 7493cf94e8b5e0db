/// Lower bound of each grade point, best first. Anything under the last
/// threshold is grade point 9.
const THRESHOLDS: [(f64, u8); 8] = [
    (80.0, 1),
    (70.0, 2),
    (65.0, 3),
    (60.0, 4),
    (55.0, 5),
    (50.0, 6),
    (45.0, 7),
    (35.0, 8),
];

/// Worst grade point, also used for subjects with no score.
pub const WORST_POINT: u8 = 9;

/// Convert a 0-100 score to a mock-exam grade point (1 = best, 9 = worst).
pub fn grade_point(score: f64) -> u8 {
    THRESHOLDS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, point)| *point)
        .unwrap_or(WORST_POINT)
}
