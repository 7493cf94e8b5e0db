use serde::{Deserialize, Serialize};
use std::fmt;

use crate::grading::SubjectScoreEntry;
use crate::mock::MockScores;

/// Current version of the results and mock sheet file formats.
pub const FILE_VERSION: u32 = 1;

/// Students are ranked against others sharing the same class, academic year
/// and term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CohortKey {
    pub class_id: String,
    pub academic_year: String,
    pub term: String,
}

impl fmt::Display for CohortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} term {}",
            self.class_id, self.academic_year, self.term
        )
    }
}

/// Raw marks for one subject on a student's result.
///
/// Read through [`SubjectRow`] so a misspelt score key is an error instead of
/// a silently missing mark.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(from = "SubjectRow")]
pub struct SubjectResult {
    pub subject: String,
    #[serde(flatten)]
    pub scores: SubjectScoreEntry,
}

/// On-disk layout of a subject row.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SubjectRow {
    subject: String,
    #[serde(default)]
    ca1_score: Option<f64>,
    #[serde(default)]
    ca2_score: Option<f64>,
    #[serde(default)]
    ca3_score: Option<f64>,
    #[serde(default)]
    ca4_score: Option<f64>,
    #[serde(default)]
    exam_score: Option<f64>,
}

impl From<SubjectRow> for SubjectResult {
    fn from(row: SubjectRow) -> Self {
        Self {
            subject: row.subject,
            scores: SubjectScoreEntry {
                ca1_score: row.ca1_score,
                ca2_score: row.ca2_score,
                ca3_score: row.ca3_score,
                ca4_score: row.ca4_score,
                exam_score: row.exam_score,
            },
        }
    }
}

/// A student's result for one class, academic year and term.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StudentResult {
    pub student_id: String,
    pub student_name: String,
    pub class_id: String,
    pub academic_year: String,
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default)]
    pub subjects: Vec<SubjectResult>,
}

impl StudentResult {
    pub fn cohort_key(&self) -> CohortKey {
        CohortKey {
            class_id: self.class_id.trim().to_string(),
            academic_year: self.academic_year.trim().to_string(),
            term: self.term.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResultsFile {
    pub version: u32,
    #[serde(default)]
    pub results: Vec<StudentResult>,
}

/// One candidate's scores on a mock-exam sheet.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MockEntry {
    pub student_id: String,
    pub student_name: String,
    #[serde(default)]
    pub scores: MockScores,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MockSheet {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default)]
    pub entries: Vec<MockEntry>,
}
