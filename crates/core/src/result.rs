use serde::{Deserialize, Serialize};

/// Sentinel stored in a field when nothing could be extracted for it.
pub const NOT_FOUND: &str = "Not Found";

/// The three extracted fields plus the assembled OCR text.
///
/// Each field holds either a normalized value or [`NOT_FOUND`]. `raw_text` is
/// always the assembled text, never the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub amount: String,
    pub upi_id: String,
    pub date: String,
    pub raw_text: String,
}

impl ExtractionResult {
    pub fn new(
        amount: Option<String>,
        upi_id: Option<String>,
        date: Option<String>,
        raw_text: String,
    ) -> Self {
        Self {
            amount: or_sentinel(amount),
            upi_id: or_sentinel(upi_id),
            date: or_sentinel(date),
            raw_text,
        }
    }

    pub fn has_amount(&self) -> bool {
        self.amount != NOT_FOUND
    }

    pub fn has_upi_id(&self) -> bool {
        self.upi_id != NOT_FOUND
    }

    pub fn has_date(&self) -> bool {
        self.date != NOT_FOUND
    }

    /// True when none of the three fields was found.
    pub fn is_empty(&self) -> bool {
        !self.has_amount() && !self.has_upi_id() && !self.has_date()
    }
}

fn or_sentinel(value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NOT_FOUND.to_string(),
    }
}
