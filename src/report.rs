// 📋 Page Report - one validation result per memorial entry, in stone order

use crate::calendar::CalendarConverter;
use crate::memorial::MemorialEntry;
use crate::validator::{DateConsistencyValidator, DateValidationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// ENTRY REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryReport {
    pub entry: MemorialEntry,
    pub validation: DateValidationResult,
}

// ============================================================================
// PAGE REPORT
// ============================================================================

/// Everything found on one uploaded page (a stone may list several people)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    /// Stable identity (UUID)
    pub id: String,

    /// Uploaded file name or other label
    pub source: String,

    pub created_at: DateTime<Utc>,

    pub entries: Vec<EntryReport>,
}

impl PageReport {
    /// Validate all entries and assemble the report (entry order preserved)
    pub fn build<C: CalendarConverter>(
        source: &str,
        entries: Vec<MemorialEntry>,
        validator: &DateConsistencyValidator<C>,
    ) -> Self {
        let results = validator.validate_all(&entries);

        let entries = entries
            .into_iter()
            .zip(results)
            .map(|(entry, validation)| EntryReport { entry, validation })
            .collect();

        PageReport {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.to_string(),
            created_at: Utc::now(),
            entries,
        }
    }

    pub fn flagged(&self) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(|e| e.validation.is_flagged())
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged().count()
    }

    pub fn is_clean(&self) -> bool {
        self.flagged_count() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} memorial entries, {} date discrepancies",
            self.source,
            self.entries.len(),
            self.flagged_count()
        )
    }

    /// Hash of the date strings, for duplicate detection in the history store.
    /// NOTE: not the identity (that's `id`); the same page uploaded twice hashes
    /// the same.
    pub fn compute_idempotency_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for report in &self.entries {
            hasher.update(report.entry.hebrew_death_date.as_bytes());
            hasher.update([0x1f]);
            hasher.update(report.entry.gregorian_years.as_bytes());
            hasher.update([0x1e]);
        }
        format!("{:x}", hasher.finalize())
    }
}

// ============================================================================
// TESTS
// ============================================================================
