use paysnap_core::OcrToken;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available: build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
/// Implementations accept PNG image bytes and return word tokens in reading order.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<OcrToken>, OcrError>;
}

impl OcrBackend for Box<dyn OcrBackend> {
    fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<OcrToken>, OcrError> {
        (**self).recognize(image_bytes)
    }
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a preset token list regardless of the image.
pub struct MockRecognizer {
    pub tokens: Vec<OcrToken>,
}

impl MockRecognizer {
    pub fn new(tokens: Vec<OcrToken>) -> Self {
        Self { tokens }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<Vec<OcrToken>, OcrError> {
        Ok(self.tokens.clone())
    }
}

/// Stand-in used when no OCR engine was compiled in.
pub struct UnavailableRecognizer;

impl OcrBackend for UnavailableRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<Vec<OcrToken>, OcrError> {
        Err(OcrError::NotAvailable)
    }
}

// ── Tesseract TSV ─────────────────────────────────────────────────────────────

const TSV_WORD_LEVEL: &str = "5";

/// Parse Tesseract TSV output into word tokens.
///
/// Columns: level, page, block, par, line, word, left, top, width, height,
/// conf, text. Only word rows are kept; the header and malformed rows are
/// skipped. Empty words are kept and left to token normalization.
pub fn parse_tsv(tsv: &str) -> Vec<OcrToken> {
    tsv.lines().filter_map(parse_tsv_row).collect()
}

fn parse_tsv_row(row: &str) -> Option<OcrToken> {
    let cols: Vec<&str> = row.split('\t').collect();
    if cols.len() < 12 || cols[0].trim() != TSV_WORD_LEVEL {
        return None;
    }
    let height: f32 = cols[9].trim().parse().ok()?;
    Some(OcrToken::new(cols[11], height))
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use super::{parse_tsv, OcrBackend, OcrError};
    use leptess::{LepTess, Variable};
    use paysnap_core::OcrToken;

    /// Page segmentation mode 6: a single uniform block of text.
    const PAGE_SEG_MODE: &str = "6";

    pub struct TesseractRecognizer {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractRecognizer {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<OcrToken>, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_variable(Variable::TesseditPagesegMode, PAGE_SEG_MODE)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let tsv = lt.get_tsv_text(0).map_err(|e| OcrError::Engine(e.to_string()))?;
            Ok(parse_tsv(&tsv))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t720\t1280\t-1\t
2\t1\t1\t0\t0\t0\t40\t60\t300\t90\t-1\t
4\t1\t1\t1\t1\t0\t40\t60\t300\t90\t-1\t
5\t1\t1\t1\t1\t1\t40\t60\t40\t62\t91.5\t₹500
5\t1\t1\t1\t1\t2\t90\t60\t10\t11\t-1\t
5\t1\t1\t1\t2\t1\t40\t140\t80\t14\t96.1\tPaid
5\t1\t1\t1\t2\t2\t130\tbad\t20\tbad\t96.1\tto
5\t1\t1\t1\t2\t3\t130
";

    #[test]
    fn mock_returns_preset_tokens() {
        let r = MockRecognizer::new(vec![OcrToken::new("₹500", 40.0)]);
        assert_eq!(r.recognize(b"fake image data").unwrap(), vec![OcrToken::new("₹500", 40.0)]);
        assert_eq!(r.recognize(b"").unwrap().len(), 1);
    }

    #[test]
    fn unavailable_always_errors() {
        assert!(matches!(UnavailableRecognizer.recognize(b"x"), Err(OcrError::NotAvailable)));
    }

    #[test]
    fn boxed_backend_delegates() {
        let boxed: Box<dyn OcrBackend> = Box::new(MockRecognizer::new(vec![OcrToken::new("a", 1.0)]));
        assert_eq!(boxed.recognize(b"").unwrap().len(), 1);
    }

    #[test]
    fn parse_tsv_keeps_word_rows_in_order() {
        let tokens = parse_tsv(SAMPLE_TSV);
        assert_eq!(
            tokens,
            vec![
                OcrToken::new("₹500", 62.0),
                OcrToken::new("", 11.0),
                OcrToken::new("Paid", 14.0),
            ]
        );
    }

    #[test]
    fn parse_tsv_empty_input() {
        assert!(parse_tsv("").is_empty());
    }
}
