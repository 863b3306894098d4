use std::sync::OnceLock;

use regex::Regex;

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// handle@provider; no bank-handle allowlist.
re!(re_upi_id, r"[a-zA-Z0-9.\-_]{3,}@[a-zA-Z]{3,}");

/// First UPI-style payment address in the text.
pub fn extract_upi_id(text: &str) -> Option<String> {
    re_upi_id().find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_dotted_handle() {
        assert_eq!(
            extract_upi_id("Paid to RAVI ravi.kumar@upi on 12 Jan"),
            Some("ravi.kumar@upi".to_string())
        );
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(
            extract_upi_id("From: me_123@okhdfcbank To: shop-99@paytm"),
            Some("me_123@okhdfcbank".to_string())
        );
    }

    #[test]
    fn short_handle_or_provider_rejected() {
        assert_eq!(extract_upi_id("ab@okaxis"), None);
        assert_eq!(extract_upi_id("ravi@ok"), None);
    }

    #[test]
    fn provider_stops_at_non_letter() {
        assert_eq!(extract_upi_id("9876543210@ybl."), Some("9876543210@ybl".to_string()));
    }

    #[test]
    fn none_without_at_sign() {
        assert_eq!(extract_upi_id("UPI transaction successful"), None);
        assert_eq!(extract_upi_id(""), None);
    }
}
