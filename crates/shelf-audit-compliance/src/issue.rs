//! Pure classification of a cell's observed state into issue kind and
//! severity. Kept apart from the evaluator so the severity policy can change
//! without touching evaluation control flow.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    WrongProduct,
    /// The detector saw an explicitly empty slot where product belongs.
    OutOfStock,
    /// Nothing was detected at the position at all.
    Undetected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// What the mapped detection grid holds at one expected position.
#[derive(Clone, Debug, PartialEq)]
pub enum ObservedState {
    /// No detection of any kind landed in the cell.
    Missing,
    /// The detector flagged the slot as visibly empty.
    MarkedEmpty,
    /// A product label, the cell's dominant detection.
    Found(String),
}

/// Case-insensitive match of a found label against the expected product or
/// any of its allowed variants.
pub fn labels_match(expected: &str, variants: &[String], found: &str) -> bool {
    let found = found.trim().to_lowercase();
    if found == expected.trim().to_lowercase() {
        return true;
    }
    variants.iter().any(|v| v.trim().to_lowercase() == found)
}

/// Issue kind and severity for a non-compliant observed state.
///
/// All three kinds currently rank high: a wrong, empty or unseen slot each
/// needs a store visit. `Medium` and `Low` remain in the report vocabulary
/// for policies that grade issues more finely.
pub fn classify(observed: &ObservedState) -> (IssueType, Severity) {
    match observed {
        ObservedState::MarkedEmpty => (IssueType::OutOfStock, Severity::High),
        ObservedState::Missing => (IssueType::Undetected, Severity::High),
        ObservedState::Found(_) => (IssueType::WrongProduct, Severity::High),
    }
}
