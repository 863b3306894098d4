pub mod amount;
pub mod config;
pub mod result;
pub mod token;

pub use amount::{digit_count, normalize_amount, parse_amount};
pub use config::{ConfigError, ExtractionConfig, YearRange};
pub use result::{ExtractionResult, NOT_FOUND};
pub use token::{validate_tokens, OcrToken, TokenError};
