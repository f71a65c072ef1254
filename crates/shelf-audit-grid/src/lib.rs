//! Shelf grid inference from image geometry.
//!
//! No grid is given: the detector derives `(rows, columns)` from the image
//! alone, running an ordered chain of independent strategies and keeping the
//! best-confidence valid candidate.
//!
//! ## Quickstart
//!
//! ```
//! use shelf_audit_core::GrayImage;
//! use shelf_audit_grid::{GridDetectParams, GridDetector};
//!
//! let img = GrayImage::from_vec(64, 48, vec![128; 64 * 48]).unwrap();
//! let detector = GridDetector::new(GridDetectParams::default());
//!
//! // A featureless frame has no line or contour evidence; the aspect-ratio
//! // heuristic still produces a usable grid.
//! let detection = detector.detect_or_fallback(&img.view());
//! assert!(detection.dims.rows >= 1 && detection.dims.columns >= 1);
//! ```
//!
//! Strategy chain, in priority order:
//! 1. [`LineStrategy`] — edge extraction, directional long-run accumulation,
//!    separator clustering. Rows and columns come from shelf and product
//!    separator counts.
//! 2. [`ContourStrategy`] — multi-pass adaptive thresholding, connected
//!    region centroids, 1-D clustering of centroids into rows and columns.
//! 3. [`HeuristicStrategy`] — aspect-ratio lookup with a fixed low
//!    confidence, so it only wins when the image-driven strategies fail.
//!
//! Candidates outside the configured row/column bounds are discarded; ties
//! on confidence break by strategy priority.

mod contours;
mod detector;
mod filter;
mod heuristic;
mod lines;
mod params;
mod strategy;

pub use contours::ContourStrategy;
pub use detector::{GridDetectError, GridDetection, GridDetector};
pub use heuristic::HeuristicStrategy;
pub use lines::LineStrategy;
pub use params::{
    ContourStrategyParams, GridDetectParams, HeuristicStrategyParams, LineStrategyParams,
};
pub use strategy::GridStrategy;
