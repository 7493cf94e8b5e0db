use serde::{Deserialize, Serialize};

use crate::grading::{AssessmentScheme, ScaleSet};

/// Top-level config file.
///
/// Example YAML:
/// ```yaml
/// scheme:
///   name: Standard SBA
///   ca: 30
///   exam: 70
/// grading_scales:
///   - department: science
///     bands:
///       - { from: 75, to: 100, grade: "1", remark: Highest }
///       - { from: 0, to: 74.99, grade: "2", remark: Higher }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scheme: AssessmentScheme,

    /// Scoped grading scales; an empty list means the default ladder
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grading_scales: Vec<ScaleSet>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{default_bands, CaMode};

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            scheme: AssessmentScheme::default(),
            grading_scales: vec![ScaleSet {
                department: Some("Science".to_string()),
                bands: default_bands(),
                ..ScaleSet::default()
            }],
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config.scheme, AssessmentScheme::default());
        assert!(config.grading_scales.is_empty());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
scheme:
  name: Split SBA
  ca1: 10
  ca2: 10
  ca3: 10
  ca4: 10
  exam: 60
grading_scales:
  - department: science
    academic_year: 2025/2026
    bands:
      - { from: 80, to: 100, grade: A1, remark: Excellent }
      - { from: 0, to: 79.99, grade: B2 }
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.scheme.ca_mode(), CaMode::Split([10, 10, 10, 10]));
        let set = &config.grading_scales[0];
        assert_eq!(set.department.as_deref(), Some("science"));
        assert_eq!(set.academic_year.as_deref(), Some("2025/2026"));
        assert_eq!(set.bands.len(), 2);
        assert_eq!(set.bands[1].remark, "");
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let yaml = r#"
scheme:
  ca: 30
queries: []
"#;
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_unknown_band_key_rejected() {
        let yaml = r#"
grading_scales:
  - bands:
      - { from: 0, to: 100, grade: A, points: 4 }
"#;
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }
}
