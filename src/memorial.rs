// 🪦 Memorial Entries - what the OCR step hands us, one per inscription
// JSON (bare list or { "memorials": [...] }) or CSV with camelCase headers.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

// ============================================================================
// MEMORIAL ENTRY
// ============================================================================

/// One deceased person's inscription block.
/// Only the two date strings feed the validator; name and relationship ride
/// along for the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorialEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,

    /// e.g. י"א סיון תשע"ט
    #[serde(default)]
    pub hebrew_death_date: String,

    /// e.g. "1938 - 2019" or a bare year
    #[serde(default)]
    pub gregorian_years: String,
}

impl MemorialEntry {
    pub fn new(hebrew_death_date: &str, gregorian_years: &str) -> Self {
        MemorialEntry {
            name: None,
            relationship: None,
            hebrew_death_date: hebrew_death_date.to_string(),
            gregorian_years: gregorian_years.to_string(),
        }
    }

    /// Builder pattern: add name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Builder pattern: add relationship ("אבינו", "אמנו", ...)
    pub fn with_relationship(mut self, relationship: &str) -> Self {
        self.relationship = Some(relationship.to_string());
        self
    }

    /// Label for logs and summaries
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

// ============================================================================
// LOADERS
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum MemorialDocument {
    List(Vec<MemorialEntry>),
    Page { memorials: Vec<MemorialEntry> },
}

/// Parse the OCR response: a bare list or an object with a `memorials` list
pub fn parse_memorials_json(content: &str) -> Result<Vec<MemorialEntry>> {
    let document: MemorialDocument =
        serde_json::from_str(content).context("Failed to parse memorial JSON")?;

    Ok(match document {
        MemorialDocument::List(entries) => entries,
        MemorialDocument::Page { memorials } => memorials,
    })
}

pub fn load_json(path: &Path) -> Result<Vec<MemorialEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read memorial file: {}", path.display()))?;

    parse_memorials_json(&content)
}

/// CSV headers: name,relationship,hebrewDeathDate,gregorianYears
pub fn load_csv(path: &Path) -> Result<Vec<MemorialEntry>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut entries = Vec::new();

    for (line_num, result) in rdr.deserialize().enumerate() {
        let entry: MemorialEntry = result.with_context(|| {
            format!("Failed to parse CSV line {} in {}", line_num + 2, path.display())
        })?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Pick the loader from the file extension (.csv, anything else is JSON)
pub fn load_memorials(path: &Path) -> Result<Vec<MemorialEntry>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let entries = if is_csv {
        load_csv(path)?
    } else {
        load_json(path)?
    };

    info!(count = entries.len(), path = %path.display(), "loaded memorial entries");
    Ok(entries)
}

// ============================================================================
// TESTS
// ============================================================================
