//! Bridging from the `image` crate into the core grayscale buffer.

use std::path::Path;

use shelf_audit_core::GrayImage;

use crate::AnalyzeError;

/// Convert a decoded `image::DynamicImage` into the core grayscale buffer.
pub fn gray_from_dynamic(img: &image::DynamicImage) -> GrayImage {
    let luma = img.to_luma8();
    GrayImage {
        width: luma.width() as usize,
        height: luma.height() as usize,
        data: luma.into_raw(),
    }
}

/// Load an image file and convert it to grayscale.
pub fn load_gray(path: &Path) -> Result<GrayImage, AnalyzeError> {
    let img = image::ImageReader::open(path)
        .map_err(image::ImageError::IoError)?
        .decode()?;
    Ok(gray_from_dynamic(&img))
}
