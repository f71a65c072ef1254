use serde::{Deserialize, Serialize};

/// Labels the external detector uses for an explicitly empty shelf slot.
const EMPTY_MARKER_LABELS: [&str; 4] = ["empty_shelf", "empty", "empty_space", "emptyspace"];

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BoundingBoxError {
    #[error("inverted bounding box (x: {x_min}..{x_max}, y: {y_min}..{y_max})")]
    Inverted {
        x_min: f32,
        y_min: f32,
        x_max: f32,
        y_max: f32,
    },
    #[error("non-finite bounding box coordinate")]
    NonFinite,
}

/// Axis-aligned box in image pixel coordinates, `x_min < x_max`, `y_min < y_max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Result<Self, BoundingBoxError> {
        if ![x_min, y_min, x_max, y_max].iter().all(|v| v.is_finite()) {
            return Err(BoundingBoxError::NonFinite);
        }
        if x_min >= x_max || y_min >= y_max {
            return Err(BoundingBoxError::Inverted {
                x_min,
                y_min,
                x_max,
                y_max,
            });
        }
        Ok(Self {
            x_min,
            y_min,
            x_max,
            y_max,
        })
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Centroid, the point used for grid cell assignment.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (
            (self.x_min + self.x_max) * 0.5,
            (self.y_min + self.y_max) * 0.5,
        )
    }

    /// Rescale from one image space into another.
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self {
            x_min: self.x_min * sx,
            y_min: self.y_min * sy,
            x_max: self.x_max * sx,
            y_max: self.y_max * sy,
        }
    }
}

/// One labeled object reported by the external detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    pub confidence: f32,
}

impl Detection {
    /// Whether the detector flagged this slot as visibly empty rather than
    /// holding a product.
    pub fn is_empty_marker(&self) -> bool {
        let label = self.label.to_lowercase();
        EMPTY_MARKER_LABELS.iter().any(|m| *m == label)
    }
}

/// Detected or declared shelf grid shape. Both counts are at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub rows: usize,
    pub columns: usize,
}

impl GridDimensions {
    pub fn new(rows: usize, columns: usize) -> Option<Self> {
        if rows == 0 || columns == 0 {
            return None;
        }
        Some(Self { rows, columns })
    }

    /// Map an image point to the uniform-partition cell containing it.
    ///
    /// Out-of-bounds points clamp to the nearest edge cell, matching how the
    /// detector may report boxes that touch the image border.
    pub fn cell_of(&self, x: f32, y: f32, width: usize, height: usize) -> (usize, usize) {
        let cell_w = width as f32 / self.columns as f32;
        let cell_h = height as f32 / self.rows as f32;
        let col = (x / cell_w).floor() as isize;
        let row = (y / cell_h).floor() as isize;
        (
            row.clamp(0, self.rows as isize - 1) as usize,
            col.clamp(0, self.columns as isize - 1) as usize,
        )
    }
}

/// Which grid inference strategy produced a candidate.
///
/// Variants are ordered by priority: line evidence beats contour evidence
/// beats the aspect-ratio heuristic. `Ord` encodes the tie-break so the
/// selection code can compare sources directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategySource {
    Lines,
    Contours,
    Heuristic,
}

impl StrategySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategySource::Lines => "lines",
            StrategySource::Contours => "contours",
            StrategySource::Heuristic => "heuristic",
        }
    }
}

/// One strategy's proposal, consumed within a single detector invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCandidate {
    pub dims: GridDimensions,
    pub confidence: f32,
    pub source: StrategySource,
}
