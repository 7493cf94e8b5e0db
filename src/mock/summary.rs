use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::aggregate::{aggregate, present_score, raw_average};
use super::points::grade_point;
use crate::results::MockEntry;

/// Mock-exam outcome for one student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockSummary {
    pub student_id: String,
    pub student_name: String,
    pub aggregate: u32,
    pub raw_average: u32,
    /// Grade point per subject that has a score
    pub points: BTreeMap<String, u8>,
}

impl MockSummary {
    pub fn from_entry(entry: &MockEntry) -> Self {
        let points = entry
            .scores
            .keys()
            .filter_map(|subject| {
                present_score(&entry.scores, subject).map(|s| (subject.clone(), grade_point(s)))
            })
            .collect();

        Self {
            student_id: entry.student_id.clone(),
            student_name: entry.student_name.clone(),
            aggregate: aggregate(&entry.scores),
            raw_average: raw_average(&entry.scores),
            points,
        }
    }
}

/// Summaries ordered best first: lowest aggregate, then highest raw average,
/// then name.
pub fn summarize(entries: &[MockEntry]) -> Vec<MockSummary> {
    let mut summaries: Vec<MockSummary> = entries.iter().map(MockSummary::from_entry).collect();
    summaries.sort_by(|a, b| {
        a.aggregate
            .cmp(&b.aggregate)
            .then_with(|| b.raw_average.cmp(&a.raw_average))
            .then_with(|| compare_names(&a.student_name, &b.student_name))
    });
    summaries
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
