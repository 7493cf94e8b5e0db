pub mod card;

pub use card::{
    build_cohort_report, build_report, CohortReport, ReportCard, ReportDocument, SubjectLine,
};
