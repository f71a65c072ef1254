use log::{debug, warn};
use serde::{Deserialize, Serialize};

use shelf_audit_core::{GrayImageView, GridCandidate, GridDimensions, StrategySource};

use crate::contours::ContourStrategy;
use crate::heuristic::HeuristicStrategy;
use crate::lines::LineStrategy;
use crate::params::GridDetectParams;
use crate::strategy::GridStrategy;

/// Errors returned by the grid detector.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridDetectError {
    #[error("all grid strategies exhausted without a valid candidate")]
    NoValidCandidate,
}

/// The winning grid plus diagnostics about where it came from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridDetection {
    pub dims: GridDimensions,
    pub confidence: f32,
    pub source: StrategySource,
}

/// Ordered fallback chain of grid-inference strategies.
///
/// Strategies run in priority order; all valid candidates are collected and
/// the highest-confidence one wins, ties broken by priority. Register extra
/// approaches with [`GridDetector::with_strategy`].
pub struct GridDetector {
    params: GridDetectParams,
    strategies: Vec<Box<dyn GridStrategy>>,
}

impl GridDetector {
    pub fn new(params: GridDetectParams) -> Self {
        let strategies: Vec<Box<dyn GridStrategy>> = vec![
            Box::new(LineStrategy::new(params.lines.clone())),
            Box::new(ContourStrategy::new(params.contours.clone())),
            Box::new(HeuristicStrategy::new(params.heuristic.clone())),
        ];
        Self { params, strategies }
    }

    /// Append a custom strategy to the end of the chain (lowest priority).
    pub fn with_strategy(mut self, strategy: Box<dyn GridStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn params(&self) -> &GridDetectParams {
        &self.params
    }

    /// Strict detection: fails when no strategy produces a valid candidate.
    pub fn detect(&self, img: &GrayImageView<'_>) -> Result<GridDetection, GridDetectError> {
        let mut best: Option<GridCandidate> = None;
        for strategy in &self.strategies {
            let Some(cand) = strategy.detect(img) else {
                debug!("strategy {} declined", strategy.source().as_str());
                continue;
            };
            if !self.accepts(&cand) {
                debug!(
                    "strategy {} candidate {}x{} (confidence {:.2}) rejected",
                    cand.source.as_str(),
                    cand.dims.rows,
                    cand.dims.columns,
                    cand.confidence
                );
                continue;
            }
            // Strictly-greater keeps the earlier (higher priority) strategy
            // on equal confidence.
            let replace = match &best {
                Some(b) => cand.confidence > b.confidence,
                None => true,
            };
            if replace {
                best = Some(cand);
            }
        }

        let cand = best.ok_or(GridDetectError::NoValidCandidate)?;
        debug!(
            "grid: {}x{} from {} (confidence {:.2})",
            cand.dims.rows,
            cand.dims.columns,
            cand.source.as_str(),
            cand.confidence
        );
        Ok(GridDetection {
            dims: cand.dims,
            confidence: cand.confidence,
            source: cand.source,
        })
    }

    /// Forgiving detection: falls back to the aspect-ratio grid when the
    /// chain is exhausted. Some grid beats none for reporting purposes.
    pub fn detect_or_fallback(&self, img: &GrayImageView<'_>) -> GridDetection {
        match self.detect(img) {
            Ok(detection) => detection,
            Err(err) => {
                warn!("{err}, forcing aspect-ratio fallback");
                let dims = HeuristicStrategy::dims_for(img.width.max(1), img.height.max(1));
                GridDetection {
                    dims,
                    confidence: self.params.heuristic.confidence,
                    source: StrategySource::Heuristic,
                }
            }
        }
    }

    fn accepts(&self, cand: &GridCandidate) -> bool {
        let GridDimensions { rows, columns } = cand.dims;
        if rows < 1 || columns < 1 || rows > self.params.max_rows || columns > self.params.max_cols
        {
            return false;
        }
        if cand.source != StrategySource::Heuristic {
            // A near-degenerate grid from image evidence is usually a missed
            // detection, not a one-shelf display.
            if (rows == 1 && columns <= 2) || (columns == 1 && rows <= 2) {
                return false;
            }
            if cand.confidence < self.params.min_confidence {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedStrategy {
        cand: Option<GridCandidate>,
        source: StrategySource,
    }

    impl GridStrategy for FixedStrategy {
        fn source(&self) -> StrategySource {
            self.source
        }
        fn detect(&self, _img: &GrayImageView<'_>) -> Option<GridCandidate> {
            self.cand
        }
    }

    fn fixed(source: StrategySource, rows: usize, columns: usize, confidence: f32) -> FixedStrategy {
        FixedStrategy {
            cand: Some(GridCandidate {
                dims: GridDimensions { rows, columns },
                confidence,
                source,
            }),
            source,
        }
    }

    fn bare_detector() -> GridDetector {
        GridDetector {
            params: GridDetectParams::default(),
            strategies: Vec::new(),
        }
    }

    fn tiny_view() -> shelf_audit_core::GrayImage {
        shelf_audit_core::GrayImage::from_vec(32, 32, vec![0; 32 * 32]).unwrap()
    }

    #[test]
    fn highest_confidence_wins() {
        let det = bare_detector()
            .with_strategy(Box::new(fixed(StrategySource::Lines, 3, 4, 0.5)))
            .with_strategy(Box::new(fixed(StrategySource::Contours, 2, 5, 0.9)));
        let img = tiny_view();
        let out = det.detect(&img.view()).unwrap();
        assert_eq!(out.source, StrategySource::Contours);
        assert_eq!(out.dims, GridDimensions { rows: 2, columns: 5 });
    }

    #[test]
    fn ties_break_by_priority_order() {
        let det = bare_detector()
            .with_strategy(Box::new(fixed(StrategySource::Lines, 3, 4, 0.7)))
            .with_strategy(Box::new(fixed(StrategySource::Contours, 2, 5, 0.7)));
        let img = tiny_view();
        let out = det.detect(&img.view()).unwrap();
        assert_eq!(out.source, StrategySource::Lines);
    }

    #[test]
    fn out_of_bounds_candidates_are_discarded() {
        let det = bare_detector()
            .with_strategy(Box::new(fixed(StrategySource::Lines, 13, 4, 0.9)))
            .with_strategy(Box::new(fixed(StrategySource::Contours, 3, 3, 0.4)));
        let img = tiny_view();
        let out = det.detect(&img.view()).unwrap();
        assert_eq!(out.source, StrategySource::Contours);
    }

    #[test]
    fn near_degenerate_image_candidates_are_discarded() {
        let det =
            bare_detector().with_strategy(Box::new(fixed(StrategySource::Lines, 1, 2, 0.9)));
        let img = tiny_view();
        assert_eq!(
            det.detect(&img.view()).unwrap_err(),
            GridDetectError::NoValidCandidate
        );
    }

    #[test]
    fn low_confidence_image_candidates_are_discarded() {
        let det =
            bare_detector().with_strategy(Box::new(fixed(StrategySource::Contours, 3, 3, 0.1)));
        let img = tiny_view();
        assert!(det.detect(&img.view()).is_err());
    }

    #[test]
    fn fallback_never_fails() {
        let det = bare_detector();
        let img = tiny_view();
        let out = det.detect_or_fallback(&img.view());
        assert_eq!(out.source, StrategySource::Heuristic);
        assert!(out.dims.rows >= 1 && out.dims.columns >= 1);
    }

    #[test]
    fn default_chain_handles_featureless_frame() {
        // Neither lines nor contours find anything; the heuristic member of
        // the default chain answers.
        let det = GridDetector::new(GridDetectParams::default());
        let img = shelf_audit_core::GrayImage::from_vec(640, 480, vec![128; 640 * 480]).unwrap();
        let out = det.detect(&img.view()).unwrap();
        assert_eq!(out.source, StrategySource::Heuristic);
        assert!(out.dims.rows <= 12 && out.dims.columns <= 12);
    }
}
