pub mod amount;
pub mod date;
pub mod extract;
pub mod hash;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod tokens;
pub mod upi;

pub use amount::AmountCandidate;
pub use extract::Extractor;
pub use hash::{image_hash, sha256_bytes, to_hex};
pub use pipeline::{PipelineError, ReceiptPipeline, ScanOutcome};
pub use preprocess::{prepare_for_ocr, prepare_for_ocr_from_bytes, PreprocessError};
pub use recognizer::{parse_tsv, MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};
pub use tokens::{assemble_text, normalize_tokens};
pub use upi::extract_upi_id;
