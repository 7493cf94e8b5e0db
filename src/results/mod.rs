pub mod cohort;
pub mod storage;
pub mod types;

pub use cohort::group_by_cohort;
pub use storage::{
    expand_patterns, load_mock_sheet, load_results, load_results_file, save_json_report,
};
pub use types::{
    CohortKey, MockEntry, MockSheet, ResultsFile, StudentResult, SubjectResult, FILE_VERSION,
};
