pub mod aggregate;
pub mod points;
pub mod summary;

pub use aggregate::{
    aggregate, present_score, raw_average, MockScores, CORE_SUBJECTS, ELECTIVE_SUBJECTS,
};
pub use points::{grade_point, WORST_POINT};
pub use summary::{summarize, MockSummary};
