pub mod config;
pub mod grade;
pub mod validation;
pub mod weighting;

pub use config::*;
pub use grade::{default_bands, default_grade, resolve_grade, select_scale, LetterGrade};
pub use validation::{grading_warnings, validate_grading};
pub use weighting::{compute_weighted_total, round2, weighted_breakdown, SubjectScoreEntry, WeightedScore};
