use paysnap_core::{
    digit_count, normalize_amount, parse_amount, ConfigError, ExtractionConfig, OcrToken, YearRange,
};
use regex::Regex;

/// A token text that might hold the amount, with its ranking score.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountCandidate {
    pub raw_text: String,
    /// Token height, plus the currency boost when `boosted`.
    pub priority: f32,
    /// Position of the source token in the normalized token list.
    pub token_index: usize,
    pub boosted: bool,
}

/// Compiled amount heuristics: candidate generation, validation and the
/// full-text regex fallback.
#[derive(Debug, Clone)]
pub(crate) struct AmountMatcher {
    currency: Regex,
    exclusion: Option<Regex>,
    fallback: Regex,
    boost: f32,
    year_range: YearRange,
    max_digits: usize,
}

impl AmountMatcher {
    pub(crate) fn new(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let markers = marker_alternation(&config.currency_markers);

        let mut exclusions: Vec<String> = config
            .exclusion_keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| regex::escape(k))
            .collect();
        exclusions.extend(
            config
                .exclusion_patterns
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| format!("(?:{p})")),
        );
        let exclusion = if exclusions.is_empty() {
            None
        } else {
            Some(compile(&format!("(?i){}", exclusions.join("|")))?)
        };

        Ok(Self {
            currency: compile(&format!("(?i)(?:{markers})"))?,
            exclusion,
            fallback: compile(&format!(r"(?i)(?:{markers})\s*([\d, ]+(?:\.\d{{1,2}})?)"))?,
            boost: config.currency_boost,
            year_range: config.year_range,
            max_digits: config.max_amount_digits,
        })
    }

    /// Candidates in evaluation order: priority descending, then source token
    /// index ascending, boosted before plain for the same token.
    pub(crate) fn candidates(&self, tokens: &[OcrToken]) -> Vec<AmountCandidate> {
        let mut by_height: Vec<(usize, &OcrToken)> = tokens.iter().enumerate().collect();
        by_height.sort_by(|a, b| rank_height(b.1.height).total_cmp(&rank_height(a.1.height)));

        let mut candidates = Vec::new();
        for (token_index, token) in by_height {
            let height = rank_height(token.height);
            if self.currency.is_match(&token.text) {
                candidates.push(AmountCandidate {
                    raw_text: token.text.clone(),
                    priority: height + self.boost,
                    token_index,
                    boosted: true,
                });
            }
            if self.is_potential_amount(&token.text) {
                candidates.push(AmountCandidate {
                    raw_text: token.text.clone(),
                    priority: height,
                    token_index,
                    boosted: false,
                });
            }
        }

        candidates.sort_by(|a, b| {
            b.priority
                .total_cmp(&a.priority)
                .then(a.token_index.cmp(&b.token_index))
                .then(b.boosted.cmp(&a.boosted))
        });
        candidates
    }

    fn is_potential_amount(&self, text: &str) -> bool {
        if !text.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }
        !self.exclusion.as_ref().is_some_and(|re| re.is_match(text))
    }

    /// First candidate whose normalized value is neither year-like nor too long.
    pub(crate) fn select(&self, candidates: &[AmountCandidate]) -> Option<String> {
        for candidate in candidates {
            let normalized = normalize_amount(&candidate.raw_text);
            if normalized.is_empty() {
                continue;
            }
            let Some(value) = parse_amount(&normalized) else {
                tracing::trace!(raw = %candidate.raw_text, %normalized, "amount candidate does not parse");
                continue;
            };
            if self.year_range.contains(value) {
                tracing::trace!(%normalized, "amount candidate looks like a year");
                continue;
            }
            if digit_count(&normalized) > self.max_digits {
                tracing::trace!(%normalized, "amount candidate has too many digits");
                continue;
            }
            tracing::debug!(
                amount = %normalized,
                priority = candidate.priority,
                boosted = candidate.boosted,
                "amount selected from token"
            );
            return Some(normalized);
        }
        None
    }

    /// Currency-prefixed numeral anywhere in the assembled text.
    pub(crate) fn fallback(&self, full_text: &str) -> Option<String> {
        let numeral = self.fallback.captures(full_text)?.get(1)?.as_str();
        let normalized = normalize_amount(numeral);
        if normalized.is_empty() {
            return None;
        }
        tracing::debug!(amount = %normalized, "amount taken from text fallback");
        Some(normalized)
    }
}

// `total_cmp` orders -0.0 below 0.0; equal heights must tie.
fn rank_height(height: f32) -> f32 {
    if height == 0.0 {
        0.0
    } else {
        height
    }
}

// Longest first so "Rs." is preferred over "Rs" at the same position.
fn marker_alternation(markers: &[String]) -> String {
    let mut markers: Vec<&str> = markers
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .collect();
    markers.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    markers.dedup();
    markers
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

pub(crate) fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::Pattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
