//! Compliance evaluation: planogram vs mapped detection grid.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::issue::{classify, labels_match, IssueType, ObservedState, Severity};
use crate::mapper::DetectionGrid;
use crate::planogram::Planogram;

use shelf_audit_core::GridDimensions;

/// Evaluation policy.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EvaluatorParams {
    /// Minimal score counting as compliant. The default demands an exact
    /// 100: a single issue makes the shelf non-compliant.
    pub compliance_threshold: f32,
}

impl Default for EvaluatorParams {
    fn default() -> Self {
        Self {
            compliance_threshold: 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    Compliant,
    WrongProduct,
    Undetected,
    NoProductExpected,
}

/// Per-position render of the evaluation, compliant cells included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
    pub status: CellStatus,
    pub expected: String,
    pub found: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplianceIssue {
    pub row: usize,
    pub column: usize,
    pub issue_type: IssueType,
    pub expected: String,
    pub found: String,
    pub severity: Severity,
}

/// Aggregate note raised when the planogram declares positions beyond the
/// detected grid. Skipped sections are excluded from scoring; this is never
/// a fatal error and never per-cell issues.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridMismatchWarning {
    pub skipped_sections: usize,
    pub planogram_rows: usize,
    pub planogram_columns: usize,
    pub detected: GridDimensions,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub is_compliant: bool,
    pub compliance_score: f32,
    pub issues: Vec<ComplianceIssue>,
    pub correct_placements: usize,
    pub total_positions: usize,
    pub planogram_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub grid_mismatch: Option<GridMismatchWarning>,
    #[serde(skip)]
    pub cells: Vec<GridCell>,
}

/// Evaluate a planogram against the mapped detection grid.
///
/// Scoring covers only sections with a non-empty `expected_product`; the
/// score is the percentage of those holding a matching product, and an empty
/// scoring set is vacuously compliant.
pub fn evaluate(
    planogram: &Planogram,
    grid: &DetectionGrid,
    params: &EvaluatorParams,
) -> ComplianceResult {
    let dims = grid.dims;
    let mut issues = Vec::new();
    let mut cells = Vec::new();
    let mut correct_placements = 0usize;
    let mut total_positions = 0usize;
    let mut skipped_sections = 0usize;

    for shelf in &planogram.shelves {
        for section in &shelf.sections {
            let (row, column) = (shelf.row, section.column);
            if row >= dims.rows || column >= dims.columns {
                skipped_sections += 1;
                continue;
            }

            let expected = section.expected_product.trim();
            let found = grid.dominant(row, column).unwrap_or("").to_string();

            if expected.is_empty() {
                cells.push(GridCell {
                    row,
                    column,
                    status: CellStatus::NoProductExpected,
                    expected: String::new(),
                    found,
                });
                continue;
            }
            total_positions += 1;

            let observed = match grid.dominant(row, column) {
                Some(label) => ObservedState::Found(label.to_string()),
                None if grid.is_marked_empty(row, column) => ObservedState::MarkedEmpty,
                None => ObservedState::Missing,
            };

            if let ObservedState::Found(label) = &observed {
                if labels_match(expected, &section.allowed_variants, label) {
                    correct_placements += 1;
                    cells.push(GridCell {
                        row,
                        column,
                        status: CellStatus::Compliant,
                        expected: expected.to_string(),
                        found,
                    });
                    continue;
                }
            }

            let (issue_type, severity) = classify(&observed);
            debug!("issue at ({row}, {column}): {issue_type:?} expected '{expected}'");
            issues.push(ComplianceIssue {
                row,
                column,
                issue_type,
                expected: expected.to_string(),
                found: found.clone(),
                severity,
            });
            cells.push(GridCell {
                row,
                column,
                status: match issue_type {
                    IssueType::WrongProduct => CellStatus::WrongProduct,
                    IssueType::OutOfStock | IssueType::Undetected => CellStatus::Undetected,
                },
                expected: expected.to_string(),
                found,
            });
        }
    }

    let grid_mismatch = if skipped_sections > 0 {
        let (planogram_rows, planogram_columns) = planogram.extent();
        warn!(
            "planogram '{}' declares {planogram_rows}x{planogram_columns} but detected grid is \
             {}x{}; skipping {skipped_sections} out-of-range sections",
            planogram.name, dims.rows, dims.columns
        );
        Some(GridMismatchWarning {
            skipped_sections,
            planogram_rows,
            planogram_columns,
            detected: dims,
        })
    } else {
        None
    };

    let compliance_score = if total_positions > 0 {
        100.0 * correct_placements as f32 / total_positions as f32
    } else {
        // No scored positions: vacuously compliant.
        100.0
    };

    ComplianceResult {
        is_compliant: compliance_score >= params.compliance_threshold,
        compliance_score,
        issues,
        correct_placements,
        total_positions,
        planogram_name: planogram.name.clone(),
        grid_mismatch,
        cells,
    }
}
