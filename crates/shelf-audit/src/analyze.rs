use log::debug;
use serde::{Deserialize, Serialize};

use shelf_audit_compliance::{evaluate, map_detections, EvaluatorParams, Planogram, PlanogramError};
use shelf_audit_core::{
    normalize, Detection, GrayImageView, InvalidImageError, NormalizeParams,
};
use shelf_audit_grid::{GridDetectError, GridDetectParams, GridDetector};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::report::{AnalysisReport, GridReport};

/// Errors produced by the end-to-end helpers.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    InvalidImage(#[from] InvalidImageError),

    #[error(transparent)]
    GridDetection(#[from] GridDetectError),

    #[error(transparent)]
    Planogram(#[from] PlanogramError),

    #[cfg(feature = "image")]
    #[error("failed to load image: {0}")]
    ImageLoad(#[from] ::image::ImageError),
}

/// Full pipeline configuration, one struct per stage.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeParams {
    pub normalize: NormalizeParams,
    pub grid: GridDetectParams,
    pub evaluator: EvaluatorParams,
}

/// Grid-only mode: normalize and infer the shelf grid, strictly.
///
/// Used by planogram-authoring flows that only need the layout. Fails with
/// [`GridDetectError`] when every strategy declines.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width, height = img.height))
)]
pub fn detect_grid(
    img: &GrayImageView<'_>,
    params: &AnalyzeParams,
) -> Result<GridReport, AnalyzeError> {
    let normalized = normalize(img, &params.normalize)?;
    let detector = GridDetector::new(params.grid.clone());
    let detection = detector.detect(&normalized.image.view())?;
    debug!(
        "grid {}x{} via {} (confidence {:.2})",
        detection.dims.rows,
        detection.dims.columns,
        detection.source.as_str(),
        detection.confidence
    );
    Ok(GridReport {
        grid_dimensions: detection.dims,
        source: detection.source,
        confidence: detection.confidence,
    })
}

/// Full analysis: normalize, infer the grid (never failing outright), map
/// detections into cells and evaluate planogram compliance.
///
/// `detections` are expected in *original* image coordinates; they are
/// rescaled into the normalized frame before mapping.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, planogram, detections, params),
        fields(width = img.width, height = img.height, planogram = %planogram.name)
    )
)]
pub fn analyze(
    img: &GrayImageView<'_>,
    planogram: &Planogram,
    detections: &[Detection],
    params: &AnalyzeParams,
) -> Result<AnalysisReport, AnalyzeError> {
    planogram.validate()?;

    let normalized = normalize(img, &params.normalize)?;
    let detector = GridDetector::new(params.grid.clone());
    // Some grid is better than none for reporting purposes.
    let detection = detector.detect_or_fallback(&normalized.image.view());

    let (sx, sy) = (normalized.scale_x(), normalized.scale_y());
    let scaled: Vec<Detection> = detections
        .iter()
        .map(|d| Detection {
            label: d.label.clone(),
            bbox: d.bbox.scaled(sx, sy),
            confidence: d.confidence,
        })
        .collect();

    let grid = map_detections(
        detection.dims,
        normalized.image.width,
        normalized.image.height,
        &scaled,
    );
    let compliance_result = evaluate(planogram, &grid, &params.evaluator);
    debug!(
        "planogram '{}': score {:.1}, {} issues on a {}x{} grid ({})",
        planogram.name,
        compliance_result.compliance_score,
        compliance_result.issues.len(),
        detection.dims.rows,
        detection.dims.columns,
        detection.source.as_str()
    );

    // Restock list: expected products at slots the detector flagged empty.
    let mut empty_shelf_items = Vec::new();
    for shelf in &planogram.shelves {
        for section in &shelf.sections {
            if section.expected_product.is_empty() {
                continue;
            }
            if grid.is_marked_empty(shelf.row, section.column) {
                empty_shelf_items.push(section.expected_product.clone());
            }
        }
    }

    Ok(AnalysisReport {
        detected_counts: grid.label_counts.clone(),
        empty_shelf_items,
        compliance_result,
        grid: GridReport {
            grid_dimensions: detection.dims,
            source: detection.source,
            confidence: detection.confidence,
        },
    })
}
