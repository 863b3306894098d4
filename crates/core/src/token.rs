use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A recognized text fragment and its bounding-box height in pixels.
///
/// Height is the only geometry the extraction engine looks at: it stands in
/// for font size. Tokens arrive in the OCR engine's reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrToken {
    #[serde(default, deserialize_with = "text_from_scalar")]
    pub text: String,
    pub height: f32,
}

impl OcrToken {
    pub fn new(text: impl Into<String>, height: f32) -> Self {
        Self { text: text.into(), height }
    }

    /// Empty or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenError {
    #[error("Token {index} has invalid height {height} (must be a finite value >= 0)")]
    InvalidHeight { index: usize, height: f32 },
}

/// Reject tokens that break the input contract. A negative or non-finite
/// height means the upstream OCR collaborator is broken.
pub fn validate_tokens(tokens: &[OcrToken]) -> Result<(), TokenError> {
    match tokens
        .iter()
        .enumerate()
        .find(|(_, t)| !t.height.is_finite() || t.height < 0.0)
    {
        Some((index, t)) => Err(TokenError::InvalidHeight { index, height: t.height }),
        None => Ok(()),
    }
}

// Some OCR backends hand back numeric-looking words as numbers.
fn text_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "token text must be a string or number, got {other}"
        ))),
    }
}
