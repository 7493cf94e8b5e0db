use std::collections::BTreeMap;

use super::types::{CohortKey, StudentResult};

/// Split results into cohorts. Within a cohort a student appears once; a
/// later result for the same student id replaces the earlier one.
pub fn group_by_cohort(results: Vec<StudentResult>) -> BTreeMap<CohortKey, Vec<StudentResult>> {
    let mut cohorts: BTreeMap<CohortKey, Vec<StudentResult>> = BTreeMap::new();
    for result in results {
        let members = cohorts.entry(result.cohort_key()).or_default();
        match members.iter_mut().find(|m| m.student_id == result.student_id) {
            Some(existing) => {
                tracing::warn!(
                    student = %result.student_id,
                    cohort = %result.cohort_key(),
                    "duplicate result, keeping the last one"
                );
                *existing = result;
            }
            None => members.push(result),
        }
    }
    cohorts
}
