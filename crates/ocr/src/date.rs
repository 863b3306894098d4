use paysnap_core::ConfigError;
use regex::Regex;

use crate::amount::compile;

/// Matches `12 Jan 2023` / `3 September 2024` style dates and numeric
/// `12/05/2023` / `1-5-23` dates as a single alternation, so the leftmost
/// date in the text wins. No calendar validation, no day/month reordering.
#[derive(Debug, Clone)]
pub(crate) struct DateMatcher {
    pattern: Regex,
}

impl DateMatcher {
    pub(crate) fn new(month_names: &[String]) -> Result<Self, ConfigError> {
        let months = month_names
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        let pattern = compile(&format!(
            r"(?i)(\d{{1,2}}\s+(?:{months})[a-z]*\s+\d{{4}})|(\d{{1,2}}[/-]\d{{1,2}}[/-]\d{{2,4}})"
        ))?;
        Ok(Self { pattern })
    }

    pub(crate) fn find(&self, text: &str) -> Option<String> {
        self.pattern.find(text).map(|m| m.as_str().to_string())
    }
}
