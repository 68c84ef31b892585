// Memorial Dates - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod calendar;    // Hebrew <-> Gregorian conversion
pub mod config;      // Validator settings
pub mod db;          // Report history (SQLite)
pub mod gematria;    // Hebrew numerals
pub mod gregorian;   // Gregorian year extraction
pub mod hebrew_date; // Free-text Hebrew date parsing
pub mod memorial;    // OCR entry loading
pub mod months;      // Month name resolution
pub mod report;      // Per-page reports
pub mod validator;   // Date consistency check

// Re-export commonly used types
pub use calendar::{CalendarConverter, CalendarError, HebrewCalendar, HebrewDate};
pub use config::ValidatorConfig;
pub use db::{
    get_all_reports, get_report, get_report_summaries, insert_report, setup_database,
    verify_count, ReportSummary,
};
pub use gregorian::{GregorianDateInfo, GregorianYearExtractor, GregorianYears};
pub use hebrew_date::{HebrewDateInfo, HebrewDateParser};
pub use memorial::{load_memorials, parse_memorials_json, MemorialEntry};
pub use report::{EntryReport, PageReport};
pub use validator::{DateConsistencyValidator, DateValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
