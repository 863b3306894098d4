use paysnap_ocr::{OcrBackend, ReceiptPipeline};
use paysnap_storage::DbPool;

pub struct AppState {
    pub db: DbPool,
    pub pipeline: ReceiptPipeline<Box<dyn OcrBackend>>,
}
