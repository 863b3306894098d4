use paysnap_core::{validate_tokens, ConfigError, ExtractionConfig, ExtractionResult, OcrToken, TokenError};

use crate::amount::{AmountCandidate, AmountMatcher};
use crate::date::DateMatcher;
use crate::tokens::{assemble_text, normalize_tokens};
use crate::upi;

/// Layout-agnostic receipt field extraction.
///
/// Patterns are compiled once in [`Extractor::new`]; `extract` holds no state
/// between calls and is safe to share across threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractionConfig,
    amount: AmountMatcher,
    date: DateMatcher,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let amount = AmountMatcher::new(&config)?;
        let date = DateMatcher::new(&config.month_names)?;
        Ok(Self { config, amount, date })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract amount, UPI id and date from OCR tokens given in reading order.
    ///
    /// Fields that cannot be found are set to the `"Not Found"` sentinel. The
    /// only error is a token that breaks the input contract.
    pub fn extract(&self, tokens: &[OcrToken]) -> Result<ExtractionResult, TokenError> {
        validate_tokens(tokens)?;

        let tokens = normalize_tokens(tokens);
        let full_text = assemble_text(&tokens);

        let amount = self.extract_amount(&tokens, &full_text);
        let upi_id = self.extract_upi_id(&full_text);
        let date = self.extract_date(&full_text);

        tracing::debug!(
            tokens = tokens.len(),
            amount = amount.is_some(),
            upi_id = upi_id.is_some(),
            date = date.is_some(),
            "receipt fields extracted"
        );

        Ok(ExtractionResult::new(amount, upi_id, date, full_text))
    }

    // ── Amount ────────────────────────────────────────────────────────────────

    /// Largest valid token first; currency-prefixed regex over the text if
    /// no token qualifies.
    pub fn extract_amount(&self, tokens: &[OcrToken], full_text: &str) -> Option<String> {
        let candidates = self.amount_candidates(tokens);
        self.select_amount(&candidates)
            .or_else(|| self.fallback_amount(full_text))
    }

    pub fn amount_candidates(&self, tokens: &[OcrToken]) -> Vec<AmountCandidate> {
        self.amount.candidates(tokens)
    }

    pub fn select_amount(&self, candidates: &[AmountCandidate]) -> Option<String> {
        self.amount.select(candidates)
    }

    pub fn fallback_amount(&self, full_text: &str) -> Option<String> {
        self.amount.fallback(full_text)
    }

    // ── UPI id / date ─────────────────────────────────────────────────────────

    pub fn extract_upi_id(&self, full_text: &str) -> Option<String> {
        upi::extract_upi_id(full_text)
    }

    pub fn extract_date(&self, full_text: &str) -> Option<String> {
        self.date.find(full_text)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default()).expect("built-in extraction config is valid")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use paysnap_core::NOT_FOUND;
    use proptest::prelude::*;

    fn tok(text: &str, height: f32) -> OcrToken {
        OcrToken::new(text, height)
    }

    fn extract(tokens: &[OcrToken]) -> ExtractionResult {
        Extractor::default().extract(tokens).unwrap()
    }

    // ── Whole receipts ────────────────────────────────────────────────────────

    #[test]
    fn gpay_style_receipt() {
        let tokens = vec![
            tok("₹500", 64.0),
            tok("Paid", 18.0),
            tok("to", 18.0),
            tok("RAVI", 20.0),
            tok("KUMAR", 20.0),
            tok("ravi.kumar@upi", 14.0),
            tok("12", 14.0),
            tok("Jan", 14.0),
            tok("2023,", 14.0),
            tok("10:45", 14.0),
            tok("am", 14.0),
            tok("UPI", 12.0),
            tok("transaction", 12.0),
            tok("ID", 12.0),
            tok("301234567890", 12.0),
        ];
        let r = extract(&tokens);
        assert_eq!(r.amount, "500");
        assert_eq!(r.upi_id, "ravi.kumar@upi");
        assert_eq!(r.date, "12 Jan 2023");
        assert!(r.raw_text.starts_with("₹500 Paid to RAVI"));
    }

    #[test]
    fn phonepe_style_receipt_with_separate_marker() {
        let tokens = vec![
            tok("Transaction", 16.0),
            tok("Successful", 16.0),
            tok("12/05/2023", 12.0),
            tok("Paid", 14.0),
            tok("to", 14.0),
            tok("shop.99@ybl", 14.0),
            tok("₹", 30.0),
            tok("3,400", 48.0),
            tok("+919876543210", 12.0),
        ];
        let r = extract(&tokens);
        assert_eq!(r.amount, "3400");
        assert_eq!(r.upi_id, "shop.99@ybl");
        assert_eq!(r.date, "12/05/2023");
    }

    #[test]
    fn empty_token_list() {
        let r = extract(&[]);
        assert_eq!(
            r,
            ExtractionResult {
                amount: NOT_FOUND.into(),
                upi_id: NOT_FOUND.into(),
                date: NOT_FOUND.into(),
                raw_text: String::new(),
            }
        );
    }

    #[test]
    fn blank_tokens_only() {
        let r = extract(&[tok("", 10.0), tok("  ", 40.0)]);
        assert!(r.is_empty());
        assert_eq!(r.raw_text, "");
    }

    #[test]
    fn negative_height_is_contract_error() {
        let err = Extractor::default()
            .extract(&[tok("₹5", 10.0), tok("x", -2.0)])
            .unwrap_err();
        assert_eq!(err, TokenError::InvalidHeight { index: 1, height: -2.0 });
    }

    // ── Amount ranking ────────────────────────────────────────────────────────

    #[test]
    fn taller_plain_number_beats_small_marker() {
        // 45 > 20 + 10
        let r = extract(&[tok("₹", 20.0), tok("500", 45.0)]);
        assert_eq!(r.amount, "500");
    }

    #[test]
    fn boosted_marker_number_wins_when_boost_crosses() {
        // 40 + 10 > 45
        let r = extract(&[tok("₹250", 40.0), tok("900", 45.0)]);
        assert_eq!(r.amount, "250");
    }

    #[test]
    fn much_taller_plain_number_beats_boost() {
        // 30 + 10 < 45
        let r = extract(&[tok("₹250", 30.0), tok("900", 45.0)]);
        assert_eq!(r.amount, "900");
    }

    #[test]
    fn year_token_alone_is_not_found() {
        let r = extract(&[tok("2024", 80.0)]);
        assert_eq!(r.amount, NOT_FOUND);
    }

    #[test]
    fn year_rejected_then_next_candidate() {
        let r = extract(&[tok("₹2030", 50.0), tok("150", 20.0)]);
        assert_eq!(r.amount, "150");
    }

    #[test]
    fn regex_fallback_when_no_token_validates() {
        // Marker and digits split across tokens, every digit token excluded.
        let tokens = vec![tok("Rs.", 20.0), tok("1,", 18.0), tok("250.50", 18.0), tok("ref", 10.0)];
        let extractor = Extractor::new(ExtractionConfig {
            exclusion_patterns: vec![r"\d".into()],
            ..ExtractionConfig::default()
        })
        .unwrap();
        let r = extractor.extract(&tokens).unwrap();
        assert_eq!(r.amount, "1250.5");
    }

    #[test]
    fn amount_candidates_exposed_in_order() {
        let c = Extractor::default().amount_candidates(&[tok("₹", 20.0), tok("500", 45.0)]);
        let texts: Vec<_> = c.iter().map(|c| c.raw_text.as_str()).collect();
        assert_eq!(texts, vec!["500", "₹"]);
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    #[test]
    fn rejects_invalid_config() {
        let config = ExtractionConfig { month_names: vec![], ..ExtractionConfig::default() };
        assert!(matches!(Extractor::new(config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn custom_year_range_and_digit_limit() {
        let extractor = Extractor::new(ExtractionConfig {
            exclusion_patterns: vec![],
            year_range: paysnap_core::YearRange { min: 1900, max: 1999 },
            max_amount_digits: 3,
            ..ExtractionConfig::default()
        })
        .unwrap();
        let r = extractor
            .extract(&[tok("1995", 60.0), tok("2024", 50.0), tok("4500", 40.0), tok("75", 30.0)])
            .unwrap();
        assert_eq!(r.amount, "75");
    }

    proptest! {
        #[test]
        fn selected_amount_is_never_year_like_or_long(
            tokens in prop::collection::vec(("[0-9₹Rs., ]{1,14}", 0.0f32..100.0), 0..8)
        ) {
            let tokens: Vec<OcrToken> = tokens.into_iter().map(|(t, h)| OcrToken::new(t, h)).collect();
            let extractor = Extractor::default();
            let candidates = extractor.amount_candidates(&tokens);
            if let Some(amount) = extractor.select_amount(&candidates) {
                let value = paysnap_core::parse_amount(&amount).unwrap();
                prop_assert!(!extractor.config().year_range.contains(value));
                prop_assert!(paysnap_core::digit_count(&amount) <= 8);
            }
        }

        #[test]
        fn extraction_never_fails_on_valid_heights(
            tokens in prop::collection::vec(("\\PC{0,12}", 0.0f32..200.0), 0..12)
        ) {
            let tokens: Vec<OcrToken> = tokens.into_iter().map(|(t, h)| OcrToken::new(t, h)).collect();
            let r = Extractor::default().extract(&tokens).unwrap();
            prop_assert!(!r.amount.is_empty());
        }
    }
}
