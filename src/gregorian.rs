// 📅 Gregorian Year Extractor - "1938 - 2019" → birth 1938, death 2019

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// ============================================================================
// TYPES
// ============================================================================

/// Gregorian side of a memorial entry. `year` is the death year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GregorianDateInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub raw_text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GregorianYears {
    pub birth_year: Option<i32>,
    pub death_year: Option<i32>,
}

// ============================================================================
// EXTRACTOR
// ============================================================================

static YEAR_PATTERN: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::expect_used)]
fn year_pattern() -> &'static Regex {
    YEAR_PATTERN.get_or_init(|| {
        Regex::new(r"(?-u:\b)(?:19|20)\d{2}(?-u:\b)").expect("static year pattern is valid")
    })
}

/// Finds 4-digit years between 1900 and 2099 in OCR text.
/// ASCII word boundaries: Hebrew prefixes glued to a year (ב2019) still match.
#[derive(Debug, Clone, Default)]
pub struct GregorianYearExtractor;

impl GregorianYearExtractor {
    pub fn new() -> Self {
        GregorianYearExtractor
    }

    /// Pick birth / death years out of free text.
    ///
    /// - no year: both empty
    /// - one year: death year only (most stones carry just that)
    /// - several: smallest is birth, largest is death; anything in between is
    ///   dropped
    pub fn extract(&self, text: &str) -> GregorianYears {
        let mut years: Vec<i32> = year_pattern()
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();

        match years.len() {
            0 => GregorianYears::default(),
            1 => GregorianYears {
                birth_year: None,
                death_year: years.first().copied(),
            },
            _ => {
                years.sort_unstable();
                GregorianYears {
                    birth_year: years.first().copied(),
                    death_year: years.last().copied(),
                }
            }
        }
    }

    /// Extract and wrap the death year with the raw text
    pub fn date_info(&self, text: &str) -> GregorianDateInfo {
        GregorianDateInfo {
            year: self.extract(text).death_year,
            raw_text: text.to_string(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> GregorianYears {
        GregorianYearExtractor::new().extract(text)
    }

    #[test]
    fn test_birth_and_death_range() {
        let years = extract("1938 - 2019");
        assert_eq!(years.birth_year, Some(1938));
        assert_eq!(years.death_year, Some(2019));
    }

    #[test]
    fn test_single_year_is_death_year() {
        let years = extract("2019");
        assert_eq!(years.birth_year, None);
        assert_eq!(years.death_year, Some(2019));
    }

    #[test]
    fn test_no_gregorian_year() {
        assert_eq!(extract("נפטר תשע\"ט"), GregorianYears::default());
        assert_eq!(extract(""), GregorianYears::default());
    }

    #[test]
    fn test_out_of_range_years_ignored() {
        assert_eq!(extract("1899 - 2100"), GregorianYears::default());
        assert_eq!(extract("19380").death_year, None);
    }

    #[test]
    fn test_unordered_years_are_sorted() {
        let years = extract("נפטר 2019 נולד 1938");
        assert_eq!(years.birth_year, Some(1938));
        assert_eq!(years.death_year, Some(2019));
    }

    #[test]
    fn test_middle_years_are_dropped() {
        // known limitation: only min and max survive
        let years = extract("1938 1967 2019");
        assert_eq!(years.birth_year, Some(1938));
        assert_eq!(years.death_year, Some(2019));
    }

    #[test]
    fn test_years_with_attached_hebrew_prefix() {
        let years = extract("נפטר ב2019");
        assert_eq!(years.birth_year, None);
        assert_eq!(years.death_year, Some(2019));

        let years = extract("מ1938 עד 2019");
        assert_eq!(years.birth_year, Some(1938));
        assert_eq!(years.death_year, Some(2019));

        assert_eq!(extract("ב2019ה").death_year, Some(2019));
    }

    #[test]
    fn test_years_inside_hebrew_text() {
        let years = extract("1920-1995 ת.נ.צ.ב.ה");
        assert_eq!(years.birth_year, Some(1920));
        assert_eq!(years.death_year, Some(1995));
    }

    #[test]
    fn test_date_info_keeps_raw_text() {
        let info = GregorianYearExtractor::new().date_info("1938 - 2019");
        assert_eq!(info.year, Some(2019));
        assert_eq!(info.raw_text, "1938 - 2019");
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = GregorianYearExtractor::new();
        assert_eq!(extractor.extract("1938 - 2019"), extractor.extract("1938 - 2019"));
    }
}
