/// GAVI score severity bands.
///
/// A GAVI score is a normalized 0-100 groundwater health value. The four
/// bands below are the single source of truth for severity labels, badge
/// colors, map marker colors, and map legends - all other modules reference
/// this table rather than hardcoding thresholds.
///
/// The bands are half-open intervals `[lower, upper)` with the lower bound
/// inclusive, so a boundary value always belongs to the higher band. The
/// set is non-overlapping and covers `[0, 100)` with no gaps.

// ---------------------------------------------------------------------------
// Band definitions
// ---------------------------------------------------------------------------

/// Severity category for a GAVI score, in ascending order of health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GaviCategory {
    Critical,
    Stressed,
    Watch,
    Safe,
}

impl GaviCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GaviCategory::Critical => "critical",
            GaviCategory::Stressed => "stressed",
            GaviCategory::Watch => "watch",
            GaviCategory::Safe => "safe",
        }
    }
}

impl std::fmt::Display for GaviCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One severity band: a half-open score interval mapped to display metadata.
pub struct SeverityBand {
    pub category: GaviCategory,
    /// Inclusive lower bound.
    pub lower: f64,
    /// Exclusive upper bound.
    pub upper: f64,
    pub label: &'static str,
    /// Hex color used for badges, markers, and legends.
    pub color: &'static str,
    pub description: &'static str,
}

/// The full GAVI taxonomy, ascending. Process-wide read-only configuration;
/// there is no reload or mutation path.
pub static GAVI_BANDS: &[SeverityBand; 4] = &[
    SeverityBand {
        category: GaviCategory::Critical,
        lower: 0.0,
        upper: 25.0,
        label: "Critical",
        color: "#d32f2f",
        description: "Immediate intervention required",
    },
    SeverityBand {
        category: GaviCategory::Stressed,
        lower: 25.0,
        upper: 50.0,
        label: "Stressed",
        color: "#f57c00",
        description: "Close monitoring needed",
    },
    SeverityBand {
        category: GaviCategory::Watch,
        lower: 50.0,
        upper: 75.0,
        label: "Watch",
        color: "#fbc02d",
        description: "Stable but declining",
    },
    SeverityBand {
        category: GaviCategory::Safe,
        lower: 75.0,
        upper: 100.0,
        label: "Safe",
        color: "#388e3c",
        description: "Healthy groundwater levels",
    },
];

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Maps a GAVI score to its severity band. Total: never fails.
///
/// Out-of-range scores clamp into the nearest band (below 0 is critical,
/// 100 and above is safe). Non-finite scores classify as critical - the
/// fail-safe default for data we cannot interpret.
pub fn classify_score(score: f64) -> &'static SeverityBand {
    if !score.is_finite() {
        return &GAVI_BANDS[0];
    }
    if score < 25.0 {
        &GAVI_BANDS[0]
    } else if score < 50.0 {
        &GAVI_BANDS[1]
    } else if score < 75.0 {
        &GAVI_BANDS[2]
    } else {
        &GAVI_BANDS[3]
    }
}

/// Marker/badge color for a score. Shorthand for `classify_score(s).color`.
pub fn color_for_score(score: f64) -> &'static str {
    classify_score(score).color
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_values_belong_to_higher_band() {
        // Half-open intervals: each lower bound lands in its own band.
        let cases = [
            (0.0, GaviCategory::Critical),
            (24.999, GaviCategory::Critical),
            (25.0, GaviCategory::Stressed),
            (49.999, GaviCategory::Stressed),
            (50.0, GaviCategory::Watch),
            (74.999, GaviCategory::Watch),
            (75.0, GaviCategory::Safe),
            (99.999, GaviCategory::Safe),
        ];
        for (score, expected) in cases {
            assert_eq!(
                classify_score(score).category,
                expected,
                "score {} should classify as {}",
                score,
                expected
            );
        }
    }

    #[test]
    fn test_bands_cover_range_without_gaps_or_overlap() {
        // Each band's upper bound must equal the next band's lower bound,
        // and the full table must span [0, 100).
        assert_eq!(GAVI_BANDS[0].lower, 0.0);
        assert_eq!(GAVI_BANDS[GAVI_BANDS.len() - 1].upper, 100.0);
        for pair in GAVI_BANDS.windows(2) {
            assert_eq!(
                pair[0].upper, pair[1].lower,
                "band '{}' must abut band '{}'",
                pair[0].label, pair[1].label
            );
            assert!(pair[0].lower < pair[0].upper);
        }
    }

    #[test]
    fn test_every_score_matches_exactly_one_band() {
        let mut s = 0.0;
        while s < 100.0 {
            let matching = GAVI_BANDS
                .iter()
                .filter(|b| s >= b.lower && s < b.upper)
                .count();
            assert_eq!(matching, 1, "score {} should match exactly one band", s);
            s += 0.25;
        }
    }

    #[test]
    fn test_out_of_range_scores_clamp_to_nearest_band() {
        assert_eq!(classify_score(-10.0).category, GaviCategory::Critical);
        assert_eq!(classify_score(100.0).category, GaviCategory::Safe);
        assert_eq!(classify_score(250.0).category, GaviCategory::Safe);
    }

    #[test]
    fn test_non_finite_scores_classify_as_critical() {
        // Fail-safe default: a score we cannot interpret is treated as the
        // most severe case, never silently as healthy.
        assert_eq!(classify_score(f64::NAN).category, GaviCategory::Critical);
        assert_eq!(classify_score(f64::INFINITY).category, GaviCategory::Critical);
        assert_eq!(classify_score(f64::NEG_INFINITY).category, GaviCategory::Critical);
    }

    #[test]
    fn test_colors_are_distinct_hex_values() {
        let mut seen = std::collections::HashSet::new();
        for band in GAVI_BANDS.iter() {
            assert!(band.color.starts_with('#') && band.color.len() == 7);
            assert!(seen.insert(band.color), "duplicate color {}", band.color);
        }
    }

    #[test]
    fn test_classification_is_stable_across_calls() {
        for s in [0.0, 12.5, 37.5, 62.5, 87.5] {
            let a = classify_score(s);
            let b = classify_score(s);
            assert!(std::ptr::eq(a, b), "repeated calls must return the same band");
        }
    }

    #[test]
    fn test_color_for_score_matches_band_color() {
        assert_eq!(color_for_score(10.0), "#d32f2f");
        assert_eq!(color_for_score(30.0), "#f57c00");
        assert_eq!(color_for_score(60.0), "#fbc02d");
        assert_eq!(color_for_score(90.0), "#388e3c");
    }
}
