use shelf_audit_core::{GrayImageView, GridCandidate, StrategySource};

/// One grid-inference approach.
///
/// Strategies are independent: each looks at the image alone and either
/// proposes a `(rows, columns, confidence)` candidate or declines with
/// `None`. The detector owns the ordering and the selection rule, so adding
/// an approach is a registration, not a control-flow rewrite.
pub trait GridStrategy {
    fn source(&self) -> StrategySource;

    fn detect(&self, img: &GrayImageView<'_>) -> Option<GridCandidate>;
}
