//! High-level facade crate for the `shelf-audit-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying engine crates
//! - end-to-end helpers that normalize an image, infer the shelf grid, map
//!   externally supplied detections into cells and evaluate planogram
//!   compliance
//! - (feature-gated) `image` crate bridging and a CLI binary.
//!
//! ## Quickstart
//!
//! ```
//! use shelf_audit::{analyze, AnalyzeParams, Planogram};
//! use shelf_audit::core::{BoundingBox, Detection, GrayImage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = GrayImage::from_vec(600, 400, vec![180; 600 * 400])?;
//! let planogram: Planogram = serde_json::from_str(
//!     r#"{ "id": "pg-1", "name": "cooler", "shelves": [
//!         { "row": 0, "sections": [ { "column": 0, "expected_product": "cola" } ] } ] }"#,
//! )?;
//! let detections = vec![Detection {
//!     label: "cola".to_string(),
//!     bbox: BoundingBox::new(10.0, 10.0, 90.0, 190.0)?,
//!     confidence: 0.8,
//! }];
//!
//! let report = analyze(&img.view(), &planogram, &detections, &AnalyzeParams::default())?;
//! println!("score: {}", report.compliance_result.compliance_score);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `shelf_audit::core`: images, normalization, detections, grid types.
//! - `shelf_audit::grid`: grid inference strategies and the fallback chain.
//! - `shelf_audit::compliance`: planogram model, position mapping, evaluation.
//!
//! The pipeline is a pure, synchronous computation per invocation: nothing is
//! shared between concurrent analyses, so calls are safe to run on any worker
//! pool without locking.

pub use shelf_audit_compliance as compliance;
pub use shelf_audit_core as core;
pub use shelf_audit_grid as grid;

pub use shelf_audit_compliance::{
    ComplianceIssue, ComplianceResult, IssueType, Planogram, PlanogramSection, PlanogramShelf,
    Severity,
};
pub use shelf_audit_core::{Detection, GridDimensions, StrategySource};
pub use shelf_audit_grid::{GridDetectParams, GridDetector};

mod analyze;
mod report;

pub use analyze::{analyze, detect_grid, AnalyzeError, AnalyzeParams};
pub use report::{AnalysisReport, GridReport};

#[cfg(feature = "image")]
pub mod imageio;
