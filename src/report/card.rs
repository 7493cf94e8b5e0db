use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::grading::{
    resolve_grade, round2, select_scale, weighted_breakdown, AssessmentScheme, LetterGrade,
    ScaleSet,
};
use crate::ranking::{compute_positions, Ranking, StudentTotal};
use crate::results::{group_by_cohort, CohortKey, StudentResult, SubjectResult};

/// One subject row on a report card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectLine {
    pub subject: String,
    pub ca: f64,
    pub exam: f64,
    pub total: f64,
    pub grade: String,
    pub remark: String,
    /// Position within the cohort for this subject, empty when unranked
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCard {
    pub student_id: String,
    pub student_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub subjects: Vec<SubjectLine>,
    pub overall_total: f64,
    pub average: f64,
    pub grade: LetterGrade,
    /// Overall position within the cohort, empty when unranked
    pub position: String,
    #[serde(skip)]
    rank: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortReport {
    pub cohort: CohortKey,
    /// Students with a positive overall total
    pub total_students: usize,
    pub cards: Vec<ReportCard>,
}

impl CohortReport {
    pub fn card(&self, student_id: &str) -> Option<&ReportCard> {
        self.cards.iter().find(|c| c.student_id == student_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub generated_at: DateTime<Utc>,
    pub scheme: AssessmentScheme,
    pub cohorts: Vec<CohortReport>,
}

fn subject_key(subject: &str) -> String {
    subject.trim().to_lowercase()
}

/// A student's subject rows with repeated subjects collapsed. The last row
/// for a subject wins and takes the place of the first one.
fn distinct_subjects(member: &StudentResult) -> Vec<&SubjectResult> {
    let mut rows: Vec<&SubjectResult> = Vec::with_capacity(member.subjects.len());
    for entry in &member.subjects {
        let key = subject_key(&entry.subject);
        match rows.iter_mut().find(|row| subject_key(&row.subject) == key) {
            Some(existing) => {
                tracing::warn!(
                    student = %member.student_id,
                    subject = %entry.subject,
                    "duplicate subject, keeping the last one"
                );
                *existing = entry;
            }
            None => rows.push(entry),
        }
    }
    rows
}

/// Build report cards for every student of one cohort.
///
/// `members` must be the complete snapshot for the cohort, since positions
/// are computed across it.
pub fn build_cohort_report(
    cohort: &CohortKey,
    members: &[StudentResult],
    scheme: &AssessmentScheme,
    scales: &[ScaleSet],
) -> CohortReport {
    // subject key -> every member's total in that subject
    let mut subject_totals: BTreeMap<String, Vec<StudentTotal>> = BTreeMap::new();
    let mut overall: Vec<StudentTotal> = Vec::with_capacity(members.len());
    let rows: Vec<Vec<&SubjectResult>> = members.iter().map(distinct_subjects).collect();

    for (member, subjects) in members.iter().zip(&rows) {
        let mut sum = 0.0;
        for entry in subjects {
            let parts = weighted_breakdown(&entry.scores, scheme);
            sum += parts.total;
            subject_totals
                .entry(subject_key(&entry.subject))
                .or_default()
                .push(StudentTotal::new(member.student_id.clone(), parts.total));
        }
        overall.push(StudentTotal::new(member.student_id.clone(), round2(sum)));
    }

    let subject_rankings: BTreeMap<String, Ranking> = subject_totals
        .iter()
        .map(|(subject, totals)| (subject.clone(), compute_positions(totals)))
        .collect();
    let overall_ranking = compute_positions(&overall);

    let mut cards: Vec<ReportCard> = members
        .iter()
        .zip(rows.iter().zip(overall.iter()))
        .map(|(member, (subjects, total))| {
            let bands = select_scale(
                scales,
                member.department.as_deref(),
                Some(cohort.academic_year.as_str()),
                Some(cohort.term.as_str()),
            );

            let lines: Vec<SubjectLine> = subjects
                .iter()
                .map(|entry| {
                    let parts = weighted_breakdown(&entry.scores, scheme);
                    let letter = resolve_grade(parts.total, bands);
                    let position = subject_rankings
                        .get(&subject_key(&entry.subject))
                        .map(|r| r.position_of(&member.student_id).to_string())
                        .unwrap_or_default();
                    SubjectLine {
                        subject: entry.subject.clone(),
                        ca: parts.ca,
                        exam: parts.exam,
                        total: parts.total,
                        grade: letter.grade,
                        remark: letter.remark,
                        position,
                    }
                })
                .collect();

            let entered = subjects
                .iter()
                .filter(|s| !s.scores.is_blank())
                .count();
            let average = if entered > 0 {
                round2(total.total / entered as f64)
            } else {
                0.0
            };

            ReportCard {
                student_id: member.student_id.clone(),
                student_name: member.student_name.clone(),
                department: member.department.clone(),
                subjects: lines,
                overall_total: total.total,
                average,
                grade: resolve_grade(average, bands),
                position: overall_ranking.position_of(&member.student_id).to_string(),
                rank: overall_ranking.get(&member.student_id).map(|p| p.position),
            }
        })
        .collect();

    cards.sort_by(compare_cards);

    tracing::debug!(
        cohort = %cohort,
        students = members.len(),
        ranked = overall_ranking.total_students,
        "built cohort report"
    );

    CohortReport {
        cohort: cohort.clone(),
        total_students: overall_ranking.total_students,
        cards,
    }
}

/// Ranked cards by position, unranked after them, names breaking ties.
fn compare_cards(a: &ReportCard, b: &ReportCard) -> Ordering {
    let by_rank = match (a.rank, b.rank) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_rank.then_with(|| {
        a.student_name
            .to_lowercase()
            .cmp(&b.student_name.to_lowercase())
    })
}

/// Group results into cohorts and build a report for each.
pub fn build_report(
    results: Vec<StudentResult>,
    scheme: &AssessmentScheme,
    scales: &[ScaleSet],
) -> ReportDocument {
    let cohorts = group_by_cohort(results)
        .iter()
        .map(|(key, members)| build_cohort_report(key, members, scheme, scales))
        .collect();

    ReportDocument {
        generated_at: Utc::now(),
        scheme: scheme.clone(),
        cohorts,
    }
}
