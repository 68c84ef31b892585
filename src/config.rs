// ⚙️ Validator Configuration - tolerance and fallback date parts
// Loaded from JSON; every field is optional and falls back to the defaults below.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Allowed |converted year - recorded year|. 1 absorbs the Tishrei / January
    /// boundary.
    #[serde(default = "ValidatorConfig::default_year_tolerance")]
    pub year_tolerance: i32,

    /// Day used when the inscription has none
    #[serde(default = "ValidatorConfig::default_day")]
    pub default_day: u32,

    /// Month used when the inscription has none (7 = Tishrei)
    #[serde(default = "ValidatorConfig::default_month")]
    pub default_month: u32,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            year_tolerance: Self::default_year_tolerance(),
            default_day: Self::default_day(),
            default_month: Self::default_month(),
        }
    }
}

impl ValidatorConfig {
    fn default_year_tolerance() -> i32 {
        1
    }

    fn default_day() -> u32 {
        15
    }

    fn default_month() -> u32 {
        7
    }

    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Failed to parse config JSON")?;
        config.check()?;
        Ok(config)
    }

    /// Reject values the converter could never accept
    pub fn check(&self) -> Result<()> {
        if self.year_tolerance < 0 {
            anyhow::bail!("year_tolerance must be >= 0, got {}", self.year_tolerance);
        }
        if !(1..=30).contains(&self.default_day) {
            anyhow::bail!("default_day must be in 1..=30, got {}", self.default_day);
        }
        if !(1..=13).contains(&self.default_month) {
            anyhow::bail!("default_month must be in 1..=13, got {}", self.default_month);
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
