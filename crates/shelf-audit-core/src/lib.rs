//! Core types and utilities for retail shelf auditing.
//!
//! This crate is intentionally small and purely structural. It does *not*
//! depend on any concrete object detector or image decoding library; callers
//! hand it raw grayscale buffers and detection lists.

mod geometry;
mod image;
mod logger;
mod normalize;

pub use image::{sample_bilinear, sample_bilinear_u8, GrayImage, GrayImageView};
pub use normalize::{normalize, NormalizeParams, NormalizedImage};

pub use geometry::{
    BoundingBox, BoundingBoxError, Detection, GridCandidate, GridDimensions, StrategySource,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

/// Errors for malformed or degenerate input images.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidImageError {
    #[error("image buffer length mismatch (expected {expected} bytes, got {got})")]
    BufferMismatch { expected: usize, got: usize },
    #[error("degenerate image dimensions ({width}x{height}, minimum {min} px per side)")]
    Degenerate { width: usize, height: usize, min: usize },
    #[error("empty image buffer")]
    EmptyBuffer,
}
