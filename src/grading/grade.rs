use serde::Serialize;

use super::config::{GradingBand, ScaleSet};

/// Letter grade and remark printed on a report card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterGrade {
    pub grade: String,
    pub remark: String,
}

impl LetterGrade {
    fn new(grade: &str, remark: &str) -> Self {
        Self {
            grade: grade.to_string(),
            remark: remark.to_string(),
        }
    }
}

/// Ladder used when no configured band covers a total.
///
/// | Total  | Grade | Remark       |
/// |--------|-------|--------------|
/// | >= 80  | A     | Excellent    |
/// | >= 70  | B     | Very Good    |
/// | >= 60  | C     | Good         |
/// | >= 50  | D     | Satisfactory |
/// | >= 40  | E     | Weak         |
/// | < 40   | F     | Very Weak    |
pub const DEFAULT_LADDER: [(f64, &str, &str); 5] = [
    (80.0, "A", "Excellent"),
    (70.0, "B", "Very Good"),
    (60.0, "C", "Good"),
    (50.0, "D", "Satisfactory"),
    (40.0, "E", "Weak"),
];

pub fn default_grade(total: f64) -> LetterGrade {
    DEFAULT_LADDER
        .iter()
        .find(|(min, _, _)| total >= *min)
        .map(|(_, grade, remark)| LetterGrade::new(grade, remark))
        .unwrap_or_else(|| LetterGrade::new("F", "Very Weak"))
}

/// The default ladder expressed as bands, used to seed new configs.
pub fn default_bands() -> Vec<GradingBand> {
    let mut upper = 100.0;
    let mut bands: Vec<GradingBand> = DEFAULT_LADDER
        .iter()
        .map(|(min, grade, remark)| {
            let band = GradingBand::new(*min, upper, grade, remark);
            upper = min - 0.01;
            band
        })
        .collect();
    bands.push(GradingBand::new(0.0, upper, "F", "Very Weak"));
    bands
}

/// First band containing `total` wins; otherwise the default ladder applies.
pub fn resolve_grade(total: f64, bands: &[GradingBand]) -> LetterGrade {
    match bands.iter().find(|band| band.contains(total)) {
        Some(band) => LetterGrade {
            grade: band.grade.clone(),
            remark: band.remark.clone(),
        },
        None => {
            if !bands.is_empty() {
                tracing::debug!(total, "no grading band matched, using default ladder");
            }
            default_grade(total)
        }
    }
}

/// Pick the bands of the most specific scale set whose filters all match.
/// Equally specific sets resolve to the earlier one. No match yields an
/// empty slice, which means the default ladder.
pub fn select_scale<'a>(
    sets: &'a [ScaleSet],
    department: Option<&str>,
    academic_year: Option<&str>,
    term: Option<&str>,
) -> &'a [GradingBand] {
    fn matches(filter: &Option<String>, value: Option<&str>) -> bool {
        match filter {
            None => true,
            Some(f) => value.is_some_and(|v| f.trim().eq_ignore_ascii_case(v.trim())),
        }
    }

    let mut best: Option<(&ScaleSet, usize)> = None;
    for set in sets {
        if !(matches(&set.department, department)
            && matches(&set.academic_year, academic_year)
            && matches(&set.term, term))
        {
            continue;
        }
        let specificity = [&set.department, &set.academic_year, &set.term]
            .iter()
            .filter(|f| f.is_some())
            .count();
        if best.map_or(true, |(_, s)| specificity > s) {
            best = Some((set, specificity));
        }
    }

    best.map(|(set, _)| set.bands.as_slice()).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, "A", "Excellent")]
    #[case(80.0, "A", "Excellent")]
    #[case(79.9, "B", "Very Good")]
    #[case(70.0, "B", "Very Good")]
    #[case(69.99, "C", "Good")]
    #[case(60.0, "C", "Good")]
    #[case(59.99, "D", "Satisfactory")]
    #[case(50.0, "D", "Satisfactory")]
    #[case(49.99, "E", "Weak")]
    #[case(40.0, "E", "Weak")]
    #[case(39.99, "F", "Very Weak")]
    #[case(0.0, "F", "Very Weak")]
    fn test_default_ladder_boundaries(#[case] total: f64, #[case] grade: &str, #[case] remark: &str) {
        assert_eq!(resolve_grade(total, &[]), LetterGrade::new(grade, remark));
    }

    #[test]
    fn test_first_matching_band_wins() {
        let bands = vec![
            GradingBand::new(75.0, 100.0, "1", "Highest"),
            GradingBand::new(70.0, 100.0, "2", "Higher"),
        ];
        assert_eq!(resolve_grade(80.0, &bands), LetterGrade::new("1", "Highest"));
        assert_eq!(resolve_grade(72.0, &bands), LetterGrade::new("2", "Higher"));
    }

    #[test]
    fn test_unmatched_total_falls_back_to_default() {
        let bands = vec![
            GradingBand::new(80.0, 100.0, "1", "Highest"),
            GradingBand::new(70.0, 79.0, "2", "Higher"),
        ];
        assert_eq!(resolve_grade(79.5, &bands), LetterGrade::new("B", "Very Good"));
        assert_eq!(resolve_grade(12.0, &bands), LetterGrade::new("F", "Very Weak"));
    }

    #[test]
    fn test_default_bands_agree_with_ladder() {
        let bands = default_bands();
        assert_eq!(bands.len(), 6);
        for total in [0.0, 39.99, 40.0, 55.5, 60.0, 79.99, 80.0, 100.0] {
            assert_eq!(resolve_grade(total, &bands), default_grade(total));
        }
    }

    fn set(department: Option<&str>, term: Option<&str>, grade: &str) -> ScaleSet {
        ScaleSet {
            department: department.map(str::to_string),
            academic_year: None,
            term: term.map(str::to_string),
            bands: vec![GradingBand::new(0.0, 100.0, grade, "")],
        }
    }

    #[test]
    fn test_select_most_specific_scale() {
        let sets = vec![
            set(None, None, "general"),
            set(Some("Science"), None, "science"),
            set(Some("Science"), Some("2"), "science-t2"),
        ];

        let pick = |d, t| select_scale(&sets, d, None, t)[0].grade.clone();
        assert_eq!(pick(Some("science"), Some("2")), "science-t2");
        assert_eq!(pick(Some("science"), Some("1")), "science");
        assert_eq!(pick(Some("arts"), Some("2")), "general");
        assert_eq!(pick(None, None), "general");
    }

    #[test]
    fn test_select_scale_none_matching() {
        let sets = vec![set(Some("science"), None, "science")];
        assert!(select_scale(&sets, Some("arts"), None, None).is_empty());
        assert!(select_scale(&[], None, None, None).is_empty());
    }

    #[test]
    fn test_select_scale_tie_keeps_first() {
        let sets = vec![
            set(Some("science"), None, "first"),
            set(None, Some("1"), "second"),
        ];
        let bands = select_scale(&sets, Some("science"), None, Some("1"));
        assert_eq!(bands[0].grade, "first");
    }
}
