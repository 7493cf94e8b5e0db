use super::config::{AssessmentScheme, CaMode, GradingBand, ScaleSet};

/// Validate grading configuration at startup.
/// Returns all validation errors at once (not just the first).
///
/// Weight sums and band layout are only reported by [`grading_warnings`];
/// scores are clamped rather than rejected, so those never fail the config.
pub fn validate_grading(scheme: &AssessmentScheme, scales: &[ScaleSet]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref name) = scheme.name {
        if name.trim().is_empty() {
            errors.push("scheme.name: must not be empty".to_string());
        }
    }

    for (i, set) in scales.iter().enumerate() {
        if set.bands.is_empty() {
            errors.push(format!("grading_scales[{}].bands: must not be empty", i));
        }
        for (j, band) in set.bands.iter().enumerate() {
            let path = format!("grading_scales[{}].bands[{}]", i, j);
            if !band.from.is_finite() || !band.to.is_finite() {
                errors.push(format!("{}: from/to must be finite numbers", path));
            } else if band.from > band.to {
                errors.push(format!(
                    "{}: from ({}) is greater than to ({})",
                    path, band.from, band.to
                ));
            }
            if band.grade.trim().is_empty() {
                errors.push(format!("{}.grade: must not be empty", path));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Non-fatal observations about a grading configuration.
pub fn grading_warnings(scheme: &AssessmentScheme, scales: &[ScaleSet]) -> Vec<String> {
    let mut warnings = Vec::new();

    let ca = scheme.ca_percentage();
    let exam = scheme.exam_percentage();
    let sum = ca.saturating_add(exam);
    if sum != 100 {
        let effect = if sum > 100 {
            "totals can exceed 100"
        } else {
            "totals cannot reach 100"
        };
        warnings.push(format!(
            "scheme: CA ({}) and exam ({}) weights sum to {}, {}",
            ca, exam, sum, effect
        ));
    }

    if matches!(scheme.ca_mode(), CaMode::Single(_))
        && [scheme.ca1, scheme.ca2, scheme.ca3, scheme.ca4]
            .iter()
            .any(Option::is_some)
    {
        warnings.push("scheme: 'ca' is set, so ca1..ca4 are ignored".to_string());
    }

    for (i, set) in scales.iter().enumerate() {
        let label = format!("grading_scales[{}] ({})", i, set.scope_label());
        warnings.extend(band_layout_warnings(&label, &set.bands));
    }

    warnings
}

fn band_layout_warnings(label: &str, bands: &[GradingBand]) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut sorted: Vec<&GradingBand> = bands
        .iter()
        .filter(|b| b.from.is_finite() && b.to.is_finite() && b.from <= b.to)
        .collect();
    if sorted.is_empty() {
        return warnings;
    }
    sorted.sort_by(|a, b| a.from.total_cmp(&b.from));

    for band in &sorted {
        if band.from < 0.0 || band.to > 100.0 {
            warnings.push(format!(
                "{}: band {} ({}-{}) reaches outside 0-100",
                label, band.grade, band.from, band.to
            ));
        }
    }

    for pair in sorted.windows(2) {
        let (low, high) = (pair[0], pair[1]);
        if high.from <= low.to {
            warnings.push(format!(
                "{}: bands {} and {} overlap, the one listed first wins",
                label, low.grade, high.grade
            ));
        } else if high.from - low.to > 1.0 {
            warnings.push(format!(
                "{}: totals between {} and {} match no band and use the default ladder",
                label, low.to, high.from
            ));
        }
    }

    let lowest = sorted[0].from;
    let highest = sorted.iter().map(|b| b.to).fold(f64::MIN, f64::max);
    if lowest > 0.0 || highest < 100.0 {
        warnings.push(format!(
            "{}: bands cover {}-{} only, other totals use the default ladder",
            label, lowest, highest
        ));
    }

    warnings
}
