use paysnap_core::{ExtractionResult, OcrToken, TokenError};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use crate::extract::Extractor;
use crate::hash;
use crate::preprocess;
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
    #[error("OCR backend returned invalid tokens: {0}")]
    Tokens(#[from] TokenError),
}

/// The result of a single receipt processing run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// SHA-256 hex digest of the uploaded image.
    pub image_hash: String,
    /// Tokens as returned by the OCR backend.
    pub tokens: Vec<OcrToken>,
    pub result: ExtractionResult,
}

/// Orchestrates: hash → preprocess → OCR → extract.
pub struct ReceiptPipeline<R: OcrBackend> {
    recognizer: R,
    extractor: Extractor,
    max_dimension: Option<u32>,
}

impl<R: OcrBackend> ReceiptPipeline<R> {
    pub fn new(recognizer: R, extractor: Extractor) -> Self {
        Self { recognizer, extractor, max_dimension: None }
    }

    /// Downscale images whose longer side exceeds `max_dimension` before OCR.
    pub fn with_max_dimension(mut self, max_dimension: Option<u32>) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Process a file on disk.
    pub async fn process_file(&self, path: &Path) -> Result<ScanOutcome, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        self.process_bytes(&bytes)
    }

    /// Process raw image bytes. CPU-bound; call from a blocking context.
    pub fn process_bytes(&self, data: &[u8]) -> Result<ScanOutcome, PipelineError> {
        let image_hash = hash::image_hash(data);
        let image_bytes = preprocess::prepare_for_ocr_from_bytes(data, self.max_dimension)?;
        let tokens = self.recognizer.recognize(&image_bytes)?;
        tracing::debug!(%image_hash, tokens = tokens.len(), "image recognized");
        let result = self.extractor.extract(&tokens)?;
        Ok(ScanOutcome { image_hash, tokens, result })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
