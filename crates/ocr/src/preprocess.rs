use image::DynamicImage;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Load an image file, convert it for OCR and return PNG bytes.
pub fn prepare_for_ocr(path: &Path, max_dimension: Option<u32>) -> Result<Vec<u8>, PreprocessError> {
    let img = image::open(path)?;
    encode_as_png(to_grayscale(img, max_dimension))
}

/// Process raw image bytes (JPEG / PNG / WEBP / …) and return grayscale PNG bytes.
pub fn prepare_for_ocr_from_bytes(
    data: &[u8],
    max_dimension: Option<u32>,
) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_as_png(to_grayscale(img, max_dimension))
}

/// Grayscale only. Contrast stretching or thresholding would distort glyph
/// heights, which the amount heuristic reads as font size.
fn to_grayscale(img: DynamicImage, max_dimension: Option<u32>) -> DynamicImage {
    let img = match max_dimension {
        Some(max) if img.width() > max || img.height() > max => {
            img.resize(max, max, image::imageops::FilterType::Lanczos3)
        }
        _ => img,
    };
    DynamicImage::ImageLuma8(img.to_luma8())
}

fn encode_as_png(img: DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
