// ⚖️ Date Consistency Validator - does the Hebrew date match the Gregorian years?
//
//   Hebrew phrase ──parse──► (day?, month?, year?) ──convert──► Gregorian date
//   Gregorian text ──extract──► death year
//   |converted year - death year| <= tolerance  →  consistent
//
// Missing or unconvertible data is NOT a discrepancy: the result stays
// consistent and carries a note. OCR is noisy; false alarms cost more than misses.

use crate::calendar::{CalendarConverter, HebrewCalendar};
use crate::config::ValidatorConfig;
use crate::gregorian::{GregorianDateInfo, GregorianYearExtractor};
use crate::hebrew_date::{HebrewDateInfo, HebrewDateParser};
use crate::memorial::MemorialEntry;
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// ============================================================================
// VALIDATION RESULT
// ============================================================================

/// Outcome for one memorial entry (JSON field names are camelCase)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateValidationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hebrew_date: Option<HebrewDateInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gregorian_date: Option<GregorianDateInfo>,

    pub is_consistent: bool,

    /// Gregorian date the Hebrew inscription actually converts to (YYYY-MM-DD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_gregorian_date: Option<String>,

    /// Hebrew date of January 1 of the recorded Gregorian year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_hebrew_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrepancy_explanation: Option<String>,
}

impl DateValidationResult {
    fn consistent(
        hebrew: HebrewDateInfo,
        gregorian: GregorianDateInfo,
        explanation: Option<String>,
    ) -> Self {
        DateValidationResult {
            hebrew_date: Some(hebrew),
            gregorian_date: Some(gregorian),
            is_consistent: true,
            expected_gregorian_date: None,
            expected_hebrew_date: None,
            discrepancy_explanation: explanation,
        }
    }

    pub fn is_flagged(&self) -> bool {
        !self.is_consistent
    }

    /// One-line status for CLI output
    pub fn summary(&self) -> String {
        match (self.is_consistent, &self.discrepancy_explanation) {
            (true, None) => "OK".to_string(),
            (true, Some(note)) => format!("OK (note: {})", note),
            (false, Some(explanation)) => format!("MISMATCH: {}", explanation),
            (false, None) => "MISMATCH".to_string(),
        }
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Cross-checks Hebrew and Gregorian dates of memorial entries.
///
/// Generic over the calendar collaborator; `HebrewCalendar` by default.
pub struct DateConsistencyValidator<C = HebrewCalendar> {
    converter: C,
    parser: HebrewDateParser,
    extractor: GregorianYearExtractor,
    config: ValidatorConfig,
}

impl DateConsistencyValidator<HebrewCalendar> {
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self::with_converter(HebrewCalendar::new(), config)
    }
}

impl Default for DateConsistencyValidator<HebrewCalendar> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CalendarConverter> DateConsistencyValidator<C> {
    pub fn with_converter(converter: C, config: ValidatorConfig) -> Self {
        DateConsistencyValidator {
            converter,
            parser: HebrewDateParser::new(),
            extractor: GregorianYearExtractor::new(),
            config,
        }
    }

    /// Validate one pair of date strings. Never fails.
    pub fn validate(&self, hebrew_text: &str, gregorian_text: &str) -> DateValidationResult {
        let hebrew = self.parser.parse(hebrew_text);
        let gregorian = self.extractor.date_info(gregorian_text);

        let (hebrew_year, death_year) = match (hebrew.year, gregorian.year) {
            (Some(hebrew_year), Some(death_year)) => (hebrew_year, death_year),
            (None, None) => {
                debug!("no dates on either side");
                return DateValidationResult::consistent(hebrew, gregorian, None);
            }
            (None, Some(_)) => {
                let note = format!(
                    "Hebrew year could not be read from \"{}\"; date check skipped",
                    hebrew.raw_text.trim()
                );
                return DateValidationResult::consistent(hebrew, gregorian, Some(note));
            }
            (Some(_), None) => {
                let note = format!(
                    "No Gregorian death year found in \"{}\"; date check skipped",
                    gregorian.raw_text.trim()
                );
                return DateValidationResult::consistent(hebrew, gregorian, Some(note));
            }
        };

        if !hebrew.is_complete() {
            debug!(
                default_day = self.config.default_day,
                default_month = self.config.default_month,
                "partial Hebrew date, filling the gaps"
            );
        }

        let day = hebrew.day.unwrap_or(self.config.default_day);
        let month = hebrew.month_numeric.unwrap_or(self.config.default_month);

        let converted = match self.converter.hebrew_to_gregorian(day, month, hebrew_year) {
            Ok(date) => date,
            Err(e) => {
                warn!(day, month, hebrew_year, error = %e, "Hebrew date not convertible");
                let note = format!(
                    "Could not convert Hebrew date \"{}\" to a Gregorian date: {}",
                    hebrew.raw_text.trim(),
                    e
                );
                return DateValidationResult::consistent(hebrew, gregorian, Some(note));
            }
        };

        let difference = (converted.year() - death_year).abs();
        debug!(%converted, death_year, difference, "compared years");

        if difference <= self.config.year_tolerance {
            return DateValidationResult::consistent(hebrew, gregorian, None);
        }

        let expected_gregorian = converted.format("%Y-%m-%d").to_string();
        let expected_hebrew = self.hebrew_new_year_of(death_year);

        let explanation = format!(
            "Hebrew date \"{}\" corresponds to {} ({}), but the recorded Gregorian year is {}",
            hebrew.raw_text.trim(),
            converted.year(),
            expected_gregorian,
            death_year
        );

        DateValidationResult {
            hebrew_date: Some(hebrew),
            gregorian_date: Some(gregorian),
            is_consistent: false,
            expected_gregorian_date: Some(expected_gregorian),
            expected_hebrew_date: expected_hebrew,
            discrepancy_explanation: Some(explanation),
        }
    }

    pub fn validate_entry(&self, entry: &MemorialEntry) -> DateValidationResult {
        self.validate(&entry.hebrew_death_date, &entry.gregorian_years)
    }

    /// Validate every entry; `result[i]` belongs to `entries[i]`
    pub fn validate_all(&self, entries: &[MemorialEntry]) -> Vec<DateValidationResult> {
        let results: Vec<DateValidationResult> = entries
            .par_iter()
            .map(|entry| self.validate_entry(entry))
            .collect();

        info!(
            entries = results.len(),
            flagged = results.iter().filter(|r| r.is_flagged()).count(),
            "validated memorial entries"
        );

        results
    }

    /// Hebrew rendering of January 1 of the given Gregorian year
    fn hebrew_new_year_of(&self, gregorian_year: i32) -> Option<String> {
        let january_first = NaiveDate::from_ymd_opt(gregorian_year, 1, 1)?;
        self.converter
            .gregorian_to_hebrew(january_first)
            .ok()
            .map(|date| date.format_hebrew())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CalendarError, HebrewDate};

    /// Collaborator that rejects everything
    struct RejectingCalendar;

    impl CalendarConverter for RejectingCalendar {
        fn hebrew_to_gregorian(&self, _day: u32, _month: u32, year: i32) -> Result<NaiveDate, CalendarError> {
            Err(CalendarError::YearOutOfRange(year))
        }

        fn gregorian_to_hebrew(&self, date: NaiveDate) -> Result<HebrewDate, CalendarError> {
            Err(CalendarError::DateOutOfRange(date))
        }
    }

    fn validate(hebrew: &str, gregorian: &str) -> DateValidationResult {
        DateConsistencyValidator::new().validate(hebrew, gregorian)
    }

    #[test]
    fn test_both_missing_is_consistent_without_note() {
        let result = validate("", "");

        assert!(result.is_consistent);
        assert_eq!(result.discrepancy_explanation, None);
        assert_eq!(result.expected_gregorian_date, None);
        assert_eq!(result.summary(), "OK");
    }

    #[test]
    fn test_missing_hebrew_year_is_consistent_with_note() {
        let result = validate("סיון", "2019");

        assert!(result.is_consistent);
        let note = result.discrepancy_explanation.unwrap();
        assert!(note.contains("Hebrew year"), "{}", note);
    }

    #[test]
    fn test_missing_gregorian_year_is_consistent_with_note() {
        let result = validate("תש״פ", "נפטר תשע\"ט");

        assert!(result.is_consistent);
        let note = result.discrepancy_explanation.unwrap();
        assert!(note.contains("Gregorian"), "{}", note);
    }

    #[test]
    fn test_matching_dates() {
        let result = validate("י\"א סיון תשע\"ט", "2019");

        assert!(result.is_consistent);
        assert_eq!(result.discrepancy_explanation, None);
        assert_eq!(result.hebrew_date.as_ref().and_then(|h| h.year), Some(5779));
        assert_eq!(result.gregorian_date.as_ref().and_then(|g| g.year), Some(2019));
    }

    #[test]
    fn test_matching_range_uses_death_year() {
        let result = validate("נפ' י\"א סיון תשע\"ט", "1938 - 2019");
        assert!(result.is_consistent);
    }

    #[test]
    fn test_mismatch_names_both_years() {
        let result = validate("תש״פ", "1990");

        assert!(!result.is_consistent);
        assert!(result.is_flagged());

        let explanation = result.discrepancy_explanation.clone().unwrap();
        assert!(explanation.contains("2019"), "{}", explanation);
        assert!(explanation.contains("1990"), "{}", explanation);
        assert!(explanation.contains("תש״פ"), "{}", explanation);

        // 15 Tishrei 5780 by default
        assert_eq!(result.expected_gregorian_date.as_deref(), Some("2019-10-14"));
        assert_eq!(result.expected_hebrew_date.as_deref(), Some("ד׳ טבת תש״נ"));
        assert!(result.summary().starts_with("MISMATCH"));
    }

    #[test]
    fn test_prefixed_gregorian_year_is_checked() {
        let result = validate("תש״פ", "נפטר ב1990");

        assert!(!result.is_consistent);
        assert_eq!(result.gregorian_date.as_ref().and_then(|g| g.year), Some(1990));
    }

    #[test]
    fn test_year_boundary_tolerance() {
        // 15 Tishrei 5780 is October 2019; a stone saying 2020 is within one year
        assert!(validate("תש״פ", "2020").is_consistent);
        assert!(validate("תש״פ", "2018").is_consistent);
        assert!(!validate("תש״פ", "2021").is_consistent);
    }

    #[test]
    fn test_configured_tolerance() {
        let config = ValidatorConfig {
            year_tolerance: 2,
            ..ValidatorConfig::default()
        };
        let validator = DateConsistencyValidator::with_config(config);

        assert!(validator.validate("תש״פ", "2021").is_consistent);
        assert!(!validator.validate("תש״פ", "2022").is_consistent);
    }

    #[test]
    fn test_unconvertible_day_is_consistent_with_note() {
        // Iyar never has a 30th
        let result = validate("ל׳ אייר תש״פ", "2020");

        assert!(result.is_consistent);
        let note = result.discrepancy_explanation.unwrap();
        assert!(note.contains("Could not convert"), "{}", note);
    }

    #[test]
    fn test_adar_two_in_common_year_is_consistent_with_note() {
        let result = validate("י״ד אדר ב׳ תשפ״ה", "2025");

        assert!(result.is_consistent);
        assert_eq!(result.hebrew_date.as_ref().and_then(|h| h.month_numeric), Some(13));
        assert!(result.discrepancy_explanation.is_some());
    }

    #[test]
    fn test_rejecting_collaborator_never_flags() {
        let validator =
            DateConsistencyValidator::with_converter(RejectingCalendar, ValidatorConfig::default());
        let result = validator.validate("תש״פ", "1990");

        assert!(result.is_consistent);
        assert!(result.discrepancy_explanation.is_some());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let validator = DateConsistencyValidator::new();
        assert_eq!(
            validator.validate("תש״פ", "1990"),
            validator.validate("תש״פ", "1990")
        );
    }

    #[test]
    fn test_validate_all_preserves_order() {
        let validator = DateConsistencyValidator::new();

        let entries: Vec<MemorialEntry> = (0..50)
            .map(|i| {
                if i % 3 == 0 {
                    MemorialEntry::new("תש״פ", "1990")
                } else if i % 3 == 1 {
                    MemorialEntry::new("י\"א סיון תשע\"ט", "2019")
                } else {
                    MemorialEntry::new("", &format!("{}", 1950 + i))
                }
            })
            .collect();

        let results = validator.validate_all(&entries);

        assert_eq!(results.len(), entries.len());
        for (entry, result) in entries.iter().zip(&results) {
            assert_eq!(result, &validator.validate_entry(entry));
        }
        assert!(results[0].is_flagged());
        assert!(!results[1].is_flagged());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(validate("תש״פ", "1990")).unwrap();

        assert_eq!(json["isConsistent"], false);
        assert_eq!(json["hebrewDate"]["year"], 5780);
        assert_eq!(json["gregorianDate"]["year"], 1990);
        assert!(json["discrepancyExplanation"].is_string());
        assert!(json["expectedGregorianDate"].is_string());
        assert!(json["expectedHebrewDate"].is_string());

        let json = serde_json::to_value(validate("", "")).unwrap();
        assert_eq!(json["isConsistent"], true);
        assert!(json.get("discrepancyExplanation").is_none());
        assert!(json.get("expectedGregorianDate").is_none());
    }
}
