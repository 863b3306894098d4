use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },
    #[error("Invalid extraction config: {0}")]
    Invalid(String),
}

/// Inclusive range of values treated as a calendar year rather than an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: u32,
    pub max: u32,
}

impl YearRange {
    pub fn contains(&self, value: Decimal) -> bool {
        value >= Decimal::from(self.min) && value <= Decimal::from(self.max)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self { min: 2000, max: 2035 }
    }
}

/// Tunables for the extraction heuristics. Every field has a default so a
/// TOML file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Symbols/abbreviations marking a monetary value. Matched case-insensitively.
    pub currency_markers: Vec<String>,
    /// Added to a token's height when it carries a currency marker.
    pub currency_boost: f32,
    /// Substrings that disqualify a token as a plain amount candidate.
    pub exclusion_keywords: Vec<String>,
    /// Regex fragments that disqualify a token, matched anywhere in the text.
    pub exclusion_patterns: Vec<String>,
    pub year_range: YearRange,
    /// Longer numerals are phone numbers or reference codes.
    pub max_amount_digits: usize,
    /// Month-name prefixes; any trailing letters are allowed after them.
    pub month_names: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            currency_markers: strings(&["₹", "Rs.", "Rs", "INR"]),
            currency_boost: 10.0,
            exclusion_keywords: strings(&[
                "failed",
                "success",
                "transaction",
                "id",
                "ref",
                "date",
                "time",
                "pm",
                "am",
            ]),
            exclusion_patterns: strings(&[r"202\d"]),
            year_range: YearRange::default(),
            max_amount_digits: 8,
            month_names: strings(&[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]),
        }
    }
}

impl ExtractionConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Structural checks. Pattern syntax is checked when the extractor compiles them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::Invalid("currency_markers must not be empty".into()));
        }
        if self.month_names.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::Invalid("month_names must not be empty".into()));
        }
        if !self.currency_boost.is_finite() {
            return Err(ConfigError::Invalid("currency_boost must be finite".into()));
        }
        if self.year_range.min > self.year_range.max {
            return Err(ConfigError::Invalid(format!(
                "year_range min {} exceeds max {}",
                self.year_range.min, self.year_range.max
            )));
        }
        if self.max_amount_digits == 0 {
            return Err(ConfigError::Invalid("max_amount_digits must be at least 1".into()));
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
