use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::ordinal::ordinal;

/// One student's total within a cohort (same class, academic year and term).
#[derive(Debug, Clone, PartialEq)]
pub struct StudentTotal {
    pub id: String,
    pub total: f64,
}

impl StudentTotal {
    pub fn new(id: impl Into<String>, total: f64) -> Self {
        Self {
            id: id.into(),
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedPosition {
    pub position: u32,
    pub ordinal: String,
}

/// Positions for a cohort snapshot.
///
/// Students whose total is not positive are left out: they have no entry in
/// `positions` and are not counted in `total_students`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    pub positions: HashMap<String, RankedPosition>,
    pub total_students: usize,
}

impl Ranking {
    pub fn get(&self, id: &str) -> Option<&RankedPosition> {
        self.positions.get(id)
    }

    /// Ordinal for `id`, or `""` for students left out of the ranking.
    pub fn position_of(&self, id: &str) -> &str {
        self.positions
            .get(id)
            .map(|p| p.ordinal.as_str())
            .unwrap_or("")
    }

    /// "3rd of 25" style label; empty for unranked students.
    pub fn position_label(&self, id: &str) -> String {
        match self.positions.get(id) {
            Some(p) => format!("{} of {}", p.ordinal, self.total_students),
            None => String::new(),
        }
    }
}

/// Standard competition ranking ("1224"): equal totals share a position and
/// the next distinct total skips ahead by the size of the tied group.
///
/// The result does not depend on the order of `students`, except that a
/// repeated id keeps only its last entry.
pub fn compute_positions(students: &[StudentTotal]) -> Ranking {
    let mut latest: HashMap<&str, &StudentTotal> = HashMap::with_capacity(students.len());
    for student in students {
        if latest.insert(student.id.as_str(), student).is_some() {
            tracing::warn!(id = %student.id, "repeated id in ranking, keeping the last total");
        }
    }

    // NaN fails the comparison, so it is excluded along with zero and negatives.
    let mut ranked: Vec<&StudentTotal> =
        latest.values().copied().filter(|s| s.total > 0.0).collect();
    let excluded = latest.len() - ranked.len();
    if excluded > 0 {
        tracing::debug!(excluded, "students without a positive total left out of ranking");
    }

    ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(Ordering::Equal));

    let mut positions = HashMap::with_capacity(ranked.len());
    let mut position: u32 = 1;
    for group in ranked.chunk_by(|a, b| a.total == b.total) {
        for student in group {
            positions.insert(
                student.id.clone(),
                RankedPosition {
                    position,
                    ordinal: ordinal(position),
                },
            );
        }
        position += group.len() as u32;
    }

    Ranking {
        positions,
        total_students: ranked.len(),
    }
}
