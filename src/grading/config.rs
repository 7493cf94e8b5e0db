use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::SchemeError;

/// Assessment (SBA) scheme: how continuous assessment and exam combine into
/// a subject total.
///
/// When `ca` is set it is the single combined CA weight and `ca1..ca4` are
/// ignored. Otherwise each `caN` is both the weight and the maximum raw value
/// of that component. `exam` defaults to whatever the CA weight leaves of 100.
///
/// Example YAML:
/// ```yaml
/// scheme:
///   name: Split SBA
///   ca1: 10
///   ca2: 10
///   ca3: 10
///   ca4: 10
///   exam: 60
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AssessmentScheme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca1: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca2: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca3: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca4: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<u32>,
}

impl Default for AssessmentScheme {
    fn default() -> Self {
        Self {
            name: Some("Standard SBA".to_string()),
            ca: Some(30),
            ca1: None,
            ca2: None,
            ca3: None,
            ca4: None,
            exam: Some(70),
        }
    }
}

/// How the CA part of a scheme is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaMode {
    /// One combined CA score, scaled by its weight.
    Single(u32),
    /// Up to four CA components, each capped at its own weight.
    Split([u32; 4]),
}

impl AssessmentScheme {
    /// Empty scheme with no keys set.
    pub fn empty() -> Self {
        Self {
            name: None,
            ca: None,
            ca1: None,
            ca2: None,
            ca3: None,
            ca4: None,
            exam: None,
        }
    }

    /// Build a scheme from key/value pairs, rejecting unknown and repeated keys.
    pub fn from_pairs<I, K>(name: Option<String>, pairs: I) -> Result<Self, SchemeError>
    where
        I: IntoIterator<Item = (K, u32)>,
        K: AsRef<str>,
    {
        let mut scheme = Self::empty();
        scheme.name = name;
        let mut seen = HashSet::new();

        for (key, value) in pairs {
            let key = key.as_ref().trim().to_ascii_lowercase();
            let slot = match key.as_str() {
                "ca" => &mut scheme.ca,
                "ca1" => &mut scheme.ca1,
                "ca2" => &mut scheme.ca2,
                "ca3" => &mut scheme.ca3,
                "ca4" => &mut scheme.ca4,
                "exam" => &mut scheme.exam,
                _ => return Err(SchemeError::UnknownKey(key.clone())),
            };
            if !seen.insert(key.clone()) {
                return Err(SchemeError::DuplicateKey(key));
            }
            *slot = Some(value);
        }

        Ok(scheme)
    }

    pub fn ca_mode(&self) -> CaMode {
        match self.ca {
            Some(weight) => CaMode::Single(weight),
            None => CaMode::Split([
                self.ca1.unwrap_or(0),
                self.ca2.unwrap_or(0),
                self.ca3.unwrap_or(0),
                self.ca4.unwrap_or(0),
            ]),
        }
    }

    /// Combined CA weight in percent.
    pub fn ca_percentage(&self) -> u32 {
        match self.ca_mode() {
            CaMode::Single(weight) => weight,
            CaMode::Split(weights) => weights.iter().fold(0u32, |acc, w| acc.saturating_add(*w)),
        }
    }

    /// Exam weight in percent. Falls back to `100 - ca_percentage`, floored at 0.
    pub fn exam_percentage(&self) -> u32 {
        self.exam
            .unwrap_or_else(|| 100u32.saturating_sub(self.ca_percentage()))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed scheme)")
    }
}

/// Parses `"ca1=10, ca2=10, exam=60"` style scheme strings.
impl FromStr for AssessmentScheme {
    type Err = SchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut pairs = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((key, value)) = entry.split_once('=') else {
                return Err(SchemeError::Malformed {
                    entry: entry.to_string(),
                    reason: "expected key=value".to_string(),
                });
            };
            let value: u32 = value.trim().parse().map_err(|e| SchemeError::Malformed {
                entry: entry.to_string(),
                reason: format!("{}", e),
            })?;
            pairs.push((key.to_string(), value));
        }
        Self::from_pairs(None, pairs)
    }
}

/// One band of a grading scale. Both ends are inclusive.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradingBand {
    pub from: f64,
    pub to: f64,
    pub grade: String,
    #[serde(default)]
    pub remark: String,
}

impl GradingBand {
    pub fn new(from: f64, to: f64, grade: &str, remark: &str) -> Self {
        Self {
            from,
            to,
            grade: grade.to_string(),
            remark: remark.to_string(),
        }
    }

    pub fn contains(&self, total: f64) -> bool {
        self.from <= total && total <= self.to
    }
}

/// Grading scale scoped to a department, academic year and/or term.
/// A missing filter matches anything.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScaleSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,

    pub bands: Vec<GradingBand>,
}

impl ScaleSet {
    /// Human-readable scope, e.g. `science/2024-2025/term 1`.
    pub fn scope_label(&self) -> String {
        let parts: Vec<String> = [
            self.department.clone(),
            self.academic_year.clone(),
            self.term.as_ref().map(|t| format!("term {}", t)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            "any".to_string()
        } else {
            parts.join("/")
        }
    }
}
