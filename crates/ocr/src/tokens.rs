use paysnap_core::OcrToken;

/// Drop tokens with empty or whitespace-only text. Order is preserved.
pub fn normalize_tokens(tokens: &[OcrToken]) -> Vec<OcrToken> {
    tokens.iter().filter(|t| !t.is_blank()).cloned().collect()
}

/// Join token texts with single spaces, in reading order. Heights are lost,
/// so this text is only a fallback search surface.
pub fn assemble_text(tokens: &[OcrToken]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
