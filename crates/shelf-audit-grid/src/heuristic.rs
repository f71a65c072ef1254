//! Aspect-ratio fallback strategy.
//!
//! No image content is inspected beyond the frame shape. Wide frames are
//! assumed to be single or double shelf bands with several facings; tall
//! frames stack more shelves with fewer facings. Confidence is a fixed low
//! constant so this grid only wins when the image-driven strategies fail.

use log::debug;

use shelf_audit_core::{GrayImageView, GridCandidate, GridDimensions, StrategySource};

use crate::params::HeuristicStrategyParams;
use crate::strategy::GridStrategy;

pub struct HeuristicStrategy {
    params: HeuristicStrategyParams,
}

impl HeuristicStrategy {
    pub fn new(params: HeuristicStrategyParams) -> Self {
        Self { params }
    }

    /// Grid implied by the frame shape alone. Always yields a valid shape.
    pub fn dims_for(width: usize, height: usize) -> GridDimensions {
        let aspect = width as f32 / height as f32;
        let (rows, columns) = if aspect > 2.5 {
            (1, (width / 150).clamp(3, 6))
        } else if aspect > 1.8 {
            (2, (width / 120).clamp(3, 6))
        } else if aspect > 1.2 {
            (if height < 500 { 2 } else { 3 }, (width / 100).clamp(3, 5))
        } else if aspect > 0.8 {
            (3, (width / 150).clamp(2, 4))
        } else {
            ((height / 150).clamp(3, 4), (width / 200).clamp(2, 3))
        };
        GridDimensions { rows, columns }
    }
}

impl GridStrategy for HeuristicStrategy {
    fn source(&self) -> StrategySource {
        StrategySource::Heuristic
    }

    fn detect(&self, img: &GrayImageView<'_>) -> Option<GridCandidate> {
        if img.width == 0 || img.height == 0 {
            return None;
        }
        let dims = Self::dims_for(img.width, img.height);
        debug!(
            "heuristic strategy: {}x{} frame -> {}x{}",
            img.width, img.height, dims.rows, dims.columns
        );
        Some(GridCandidate {
            dims,
            confidence: self.params.confidence,
            source: StrategySource::Heuristic,
        })
    }
}
