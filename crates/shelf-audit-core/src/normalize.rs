//! Image normalization: bring arbitrary input sizes into the working
//! resolution shared by every geometry pass downstream.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::image::{sample_bilinear_u8, GrayImage, GrayImageView};
use crate::InvalidImageError;

/// Working-resolution constraints.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NormalizeParams {
    /// Target size for the longer image side.
    pub target_width: usize,
    /// Skip resizing when a side is already within this distance of the target.
    pub size_buffer: usize,
    /// Height clamp after aspect-preserving resize.
    pub min_height: usize,
    pub max_height: usize,
    /// Inputs smaller than this on either side are rejected outright.
    pub min_dimension: usize,
}

impl Default for NormalizeParams {
    fn default() -> Self {
        Self {
            target_width: 600,
            size_buffer: 50,
            min_height: 400,
            max_height: 1200,
            min_dimension: 8,
        }
    }
}

/// A canonical grayscale frame plus the original dimensions it came from.
///
/// Detections arrive in original-image coordinates; `scale_x`/`scale_y`
/// carry them into normalized space.
#[derive(Clone, Debug)]
pub struct NormalizedImage {
    pub image: GrayImage,
    pub original_width: usize,
    pub original_height: usize,
}

impl NormalizedImage {
    #[inline]
    pub fn scale_x(&self) -> f32 {
        self.image.width as f32 / self.original_width as f32
    }

    #[inline]
    pub fn scale_y(&self) -> f32 {
        self.image.height as f32 / self.original_height as f32
    }
}

/// Resize an input frame to the working resolution, preserving aspect ratio.
///
/// Frames already near the target size pass through untouched. Output height
/// is clamped to `[min_height, max_height]` with the width following the
/// aspect ratio.
pub fn normalize(
    src: &GrayImageView<'_>,
    params: &NormalizeParams,
) -> Result<NormalizedImage, InvalidImageError> {
    if src.data.is_empty() {
        return Err(InvalidImageError::EmptyBuffer);
    }
    if src.width < params.min_dimension || src.height < params.min_dimension {
        return Err(InvalidImageError::Degenerate {
            width: src.width,
            height: src.height,
            min: params.min_dimension,
        });
    }
    let expected = src.width * src.height;
    if src.data.len() != expected {
        return Err(InvalidImageError::BufferMismatch {
            expected,
            got: src.data.len(),
        });
    }

    let width = src.width;
    let height = src.height;
    let target = params.target_width;
    let near_target = |side: usize| side.abs_diff(target) <= params.size_buffer;

    if near_target(width) || near_target(height) {
        debug!("normalize: {width}x{height} already near target, skipping resize");
        return Ok(NormalizedImage {
            image: GrayImage {
                width,
                height,
                data: src.data.to_vec(),
            },
            original_width: width,
            original_height: height,
        });
    }

    let aspect = width as f32 / height as f32;
    let (mut new_width, mut new_height) = if width > height {
        (target, (target as f32 / aspect).round() as usize)
    } else {
        ((target as f32 * aspect).round() as usize, target)
    };

    if new_height < params.min_height {
        new_height = params.min_height;
        new_width = (params.min_height as f32 * aspect).round() as usize;
    } else if new_height > params.max_height {
        new_height = params.max_height;
        new_width = (params.max_height as f32 * aspect).round() as usize;
    }
    new_width = new_width.max(1);
    new_height = new_height.max(1);

    debug!("normalize: {width}x{height} -> {new_width}x{new_height}");

    let sx = width as f32 / new_width as f32;
    let sy = height as f32 / new_height as f32;
    let mut data = Vec::with_capacity(new_width * new_height);
    for y in 0..new_height {
        let src_y = (y as f32 + 0.5) * sy - 0.5;
        for x in 0..new_width {
            let src_x = (x as f32 + 0.5) * sx - 0.5;
            data.push(sample_bilinear_u8(src, src_x, src_y));
        }
    }

    Ok(NormalizedImage {
        image: GrayImage {
            width: new_width,
            height: new_height,
            data,
        },
        original_width: width,
        original_height: height,
    })
}
