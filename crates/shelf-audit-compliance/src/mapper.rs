//! Position mapping: detections in image coordinates to grid cells.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, warn};

use shelf_audit_core::{Detection, GridDimensions};

/// Everything that landed in one grid cell.
#[derive(Clone, Debug, Default)]
pub struct CellDetections {
    pub detections: Vec<Detection>,
    /// Raw count per non-empty-marker label, for inventory reporting.
    pub label_counts: HashMap<String, usize>,
    /// Highest-confidence non-empty-marker label, if any.
    pub dominant: Option<String>,
    /// The detector flagged this slot as visibly empty.
    pub empty_marked: bool,
}

/// Detections aggregated into an R x C uniform partition of the image.
#[derive(Clone, Debug)]
pub struct DetectionGrid {
    pub dims: GridDimensions,
    cells: HashMap<(usize, usize), CellDetections>,
    /// Image-wide count per label, empty markers included.
    pub label_counts: BTreeMap<String, usize>,
    /// Cells holding an empty-marker detection.
    pub empty_cells: HashSet<(usize, usize)>,
}

impl DetectionGrid {
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellDetections> {
        self.cells.get(&(row, column))
    }

    pub fn is_marked_empty(&self, row: usize, column: usize) -> bool {
        self.empty_cells.contains(&(row, column))
    }

    /// Dominant product label at a position, if one was detected.
    pub fn dominant(&self, row: usize, column: usize) -> Option<&str> {
        self.cells
            .get(&(row, column))
            .and_then(|c| c.dominant.as_deref())
    }
}

/// Assign each detection to the partition cell containing its bounding-box
/// centroid and aggregate per-cell state.
///
/// `width` and `height` are the dimensions of the analyzed (normalized)
/// image; detections must already be in that coordinate space. Centroids
/// outside the image are dropped with a diagnostic, never an error.
pub fn map_detections(
    dims: GridDimensions,
    width: usize,
    height: usize,
    detections: &[Detection],
) -> DetectionGrid {
    let mut cells: HashMap<(usize, usize), CellDetections> = HashMap::new();
    let mut label_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut empty_cells: HashSet<(usize, usize)> = HashSet::new();
    // Highest confidence seen per cell, to derive the dominant label.
    let mut best_confidence: HashMap<(usize, usize), f32> = HashMap::new();

    for det in detections {
        let (cx, cy) = det.bbox.center();
        if cx < 0.0 || cy < 0.0 || cx >= width as f32 || cy >= height as f32 {
            warn!(
                "dropping detection '{}' with centroid ({cx:.1}, {cy:.1}) outside {width}x{height}",
                det.label
            );
            continue;
        }
        let key = dims.cell_of(cx, cy, width, height);
        debug!("detection '{}' -> cell {key:?}", det.label);

        *label_counts.entry(det.label.clone()).or_insert(0) += 1;
        let cell = cells.entry(key).or_default();

        if det.is_empty_marker() {
            cell.empty_marked = true;
            empty_cells.insert(key);
        } else {
            *cell.label_counts.entry(det.label.clone()).or_insert(0) += 1;
            let best = best_confidence.entry(key).or_insert(f32::NEG_INFINITY);
            if det.confidence > *best {
                *best = det.confidence;
                cell.dominant = Some(det.label.clone());
            }
        }
        cell.detections.push(det.clone());
    }

    DetectionGrid {
        dims,
        cells,
        label_counts,
        empty_cells,
    }
}
