use serde::{Deserialize, Serialize};

/// Parameters for the line-based strategy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LineStrategyParams {
    /// Edge pixels must exceed this fraction of the max gradient magnitude.
    pub edge_threshold_rel: f32,
    /// A horizontal edge run shorter than `max(h_run_min_px, width / h_run_div)`
    /// does not count as shelf-separator evidence.
    pub h_run_min_px: usize,
    pub h_run_div: usize,
    /// Same for vertical runs: `max(v_run_min_px, height / v_run_div)`.
    pub v_run_min_px: usize,
    pub v_run_div: usize,
    /// A row qualifies as a shelf separator when its accumulated run length
    /// exceeds `width * min_shelf_width_ratio`.
    pub min_shelf_width_ratio: f32,
    /// A column qualifies as a product separator when its accumulated run
    /// length exceeds `height * min_product_height_ratio`.
    pub min_product_height_ratio: f32,
    /// Minimal spacing between shelf separators, as a fraction of height.
    pub row_min_spacing_frac: f32,
    /// Minimal spacing between product separators, as a fraction of width.
    pub col_min_spacing_frac: f32,
}

impl Default for LineStrategyParams {
    fn default() -> Self {
        Self {
            edge_threshold_rel: 0.25,
            h_run_min_px: 20,
            h_run_div: 15,
            v_run_min_px: 15,
            v_run_div: 20,
            min_shelf_width_ratio: 0.4,
            min_product_height_ratio: 0.25,
            row_min_spacing_frac: 0.15,
            col_min_spacing_frac: 0.08,
        }
    }
}

/// Parameters for the contour/threshold strategy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContourStrategyParams {
    /// Adaptive-threshold window half-sizes, one segmentation pass each.
    /// Multiple passes cover different lighting assumptions.
    pub block_radii: Vec<usize>,
    /// Pixels darker than `local mean - offset` are foreground.
    pub offset: i16,
    /// Region area band, as fractions of the image area.
    pub min_area_frac: f32,
    pub max_area_frac: f32,
    /// Minimal number of accepted regions before clustering is attempted.
    pub min_regions: usize,
    /// Centroid clustering gaps, as fractions of height (rows) and width
    /// (columns).
    pub row_gap_frac: f32,
    pub col_gap_frac: f32,
}

impl Default for ContourStrategyParams {
    fn default() -> Self {
        Self {
            block_radii: vec![8, 16],
            offset: 10,
            min_area_frac: 0.0008,
            max_area_frac: 0.25,
            min_regions: 4,
            row_gap_frac: 0.15,
            col_gap_frac: 0.08,
        }
    }
}

/// Parameters for the aspect-ratio fallback.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeuristicStrategyParams {
    /// Fixed confidence reported for heuristic grids. Low on purpose: the
    /// fallback should only win when image evidence is absent.
    pub confidence: f32,
}

impl Default for HeuristicStrategyParams {
    fn default() -> Self {
        Self { confidence: 0.25 }
    }
}

/// Detector-level parameters: strategy configs plus candidate bounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridDetectParams {
    pub lines: LineStrategyParams,
    pub contours: ContourStrategyParams,
    pub heuristic: HeuristicStrategyParams,
    /// Practical shelf-size ceiling; candidates beyond it are discarded.
    pub max_rows: usize,
    pub max_cols: usize,
    /// Image-driven candidates below this confidence are discarded.
    pub min_confidence: f32,
}

impl Default for GridDetectParams {
    fn default() -> Self {
        Self {
            lines: LineStrategyParams::default(),
            contours: ContourStrategyParams::default(),
            heuristic: HeuristicStrategyParams::default(),
            max_rows: 12,
            max_cols: 12,
            min_confidence: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_roundtrip_through_json() {
        let params = GridDetectParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: GridDetectParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_rows, params.max_rows);
        assert_eq!(back.lines.h_run_min_px, params.lines.h_run_min_px);
        assert_eq!(back.contours.block_radii, params.contours.block_radii);
    }
}
