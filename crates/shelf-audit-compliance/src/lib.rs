//! Planogram model and compliance evaluation.
//!
//! Given a declared expected layout and a set of detections already mapped
//! into grid cells, this crate produces a deterministic, explainable
//! per-position compliance report. The planogram is a read-only snapshot
//! owned by an external catalog; nothing here mutates or stores it.

mod evaluate;
mod issue;
mod mapper;
mod planogram;

pub use evaluate::{
    evaluate, CellStatus, ComplianceIssue, ComplianceResult, EvaluatorParams, GridCell,
    GridMismatchWarning,
};
pub use issue::{classify, labels_match, IssueType, ObservedState, Severity};
pub use mapper::{map_detections, CellDetections, DetectionGrid};
pub use planogram::{Planogram, PlanogramError, PlanogramSection, PlanogramShelf};
