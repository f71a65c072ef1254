use std::collections::BTreeMap;

use serde::Serialize;

use shelf_audit_compliance::ComplianceResult;
use shelf_audit_core::{GridDimensions, StrategySource};

/// Grid-only mode output. Serializes as `{ "grid_dimensions": { ... } }`;
/// the winning strategy and its confidence ride along for diagnostics only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GridReport {
    pub grid_dimensions: GridDimensions,
    #[serde(skip)]
    pub source: StrategySource,
    #[serde(skip)]
    pub confidence: f32,
}

/// Full analysis mode output.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    /// Image-wide detection count per label, empty markers included.
    pub detected_counts: BTreeMap<String, usize>,
    /// Expected products at slots the detector flagged as visibly empty;
    /// the restock list.
    pub empty_shelf_items: Vec<String>,
    pub compliance_result: ComplianceResult,
    #[serde(skip)]
    pub grid: GridReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_report_serializes_per_interface_contract() {
        let report = GridReport {
            grid_dimensions: GridDimensions { rows: 3, columns: 4 },
            source: StrategySource::Lines,
            confidence: 0.9,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "grid_dimensions": { "rows": 3, "columns": 4 } })
        );
    }
}
