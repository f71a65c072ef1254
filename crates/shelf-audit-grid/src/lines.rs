//! Line-based grid strategy.
//!
//! Shelf boards show up as long horizontal edges, product dividers as long
//! vertical ones. The strategy extracts an edge map, accumulates directional
//! long runs per row and per column, turns high-vote rows/columns into
//! separator positions, and counts grid cells between separators.

use log::debug;

use shelf_audit_core::{GrayImageView, GridCandidate, GridDimensions, StrategySource};

use crate::filter::filter_close_lines;
use crate::params::LineStrategyParams;
use crate::strategy::GridStrategy;

/// Absolute gradient floor: below this the frame is considered featureless
/// regardless of the relative threshold.
const MIN_GRADIENT: f32 = 48.0;

pub struct LineStrategy {
    params: LineStrategyParams,
}

impl LineStrategy {
    pub fn new(params: LineStrategyParams) -> Self {
        Self { params }
    }
}

impl GridStrategy for LineStrategy {
    fn source(&self) -> StrategySource {
        StrategySource::Lines
    }

    fn detect(&self, img: &GrayImageView<'_>) -> Option<GridCandidate> {
        let (width, height) = (img.width, img.height);
        if width < 8 || height < 8 {
            return None;
        }
        let p = &self.params;

        let blurred = gaussian3(img);
        let edges = edge_map(&blurred, width, height, p.edge_threshold_rel)?;

        // Horizontal evidence: long edge runs along rows.
        let h_run_min = p.h_run_min_px.max(width / p.h_run_div);
        let mut row_votes = vec![0usize; height];
        for y in 0..height {
            accumulate_runs(&edges[y * width..(y + 1) * width], h_run_min, &mut |run| {
                row_votes[y] += run;
            });
        }
        let min_row_vote = (width as f32 * p.min_shelf_width_ratio) as usize;
        let raw_rows = vote_bands(&row_votes, min_row_vote);
        let shelf_seps =
            filter_close_lines(&raw_rows, height as f32 * p.row_min_spacing_frac);

        // Vertical evidence: long edge runs along columns.
        let v_run_min = p.v_run_min_px.max(height / p.v_run_div);
        let mut col_votes = vec![0usize; width];
        for x in 0..width {
            let column: Vec<bool> = (0..height).map(|y| edges[y * width + x]).collect();
            accumulate_runs(&column, v_run_min, &mut |run| {
                col_votes[x] += run;
            });
        }
        let min_col_vote = (height as f32 * p.min_product_height_ratio) as usize;
        let raw_cols = vote_bands(&col_votes, min_col_vote);
        let product_seps =
            filter_close_lines(&raw_cols, width as f32 * p.col_min_spacing_frac);

        let raw_total = raw_rows.len() + raw_cols.len();
        if raw_total == 0 {
            debug!("line strategy: no separator evidence");
            return None;
        }

        // Interior separators split the frame; the outer borders are implicit.
        let rows = shelf_seps.len() + 1;
        let columns = product_seps.len() + 1;
        let confidence =
            ((shelf_seps.len() + product_seps.len()) as f32 / raw_total as f32).clamp(0.0, 1.0);
        debug!(
            "line strategy: {} shelf + {} product separators -> {rows}x{columns} (confidence {confidence:.2})",
            shelf_seps.len(),
            product_seps.len()
        );

        Some(GridCandidate {
            dims: GridDimensions::new(rows, columns)?,
            confidence,
            source: StrategySource::Lines,
        })
    }
}

/// 3x3 Gaussian blur (1-2-1 separable weights), edge pixels replicated.
fn gaussian3(img: &GrayImageView<'_>) -> Vec<u8> {
    let (w, h) = (img.width, img.height);
    let at = |x: isize, y: isize| -> u32 {
        let x = x.clamp(0, w as isize - 1) as usize;
        let y = y.clamp(0, h as isize - 1) as usize;
        img.data[y * w + x] as u32
    };
    let mut out = vec![0u8; w * h];
    for y in 0..h as isize {
        for x in 0..w as isize {
            let mut acc = 0u32;
            for (dy, wy) in [(-1isize, 1u32), (0, 2), (1, 1)] {
                for (dx, wx) in [(-1isize, 1u32), (0, 2), (1, 1)] {
                    acc += wy * wx * at(x + dx, y + dy);
                }
            }
            out[y as usize * w + x as usize] = (acc / 16) as u8;
        }
    }
    out
}

/// Sobel magnitude thresholded relative to the image maximum.
///
/// Returns `None` for frames with no gradient worth speaking of.
fn edge_map(gray: &[u8], w: usize, h: usize, threshold_rel: f32) -> Option<Vec<bool>> {
    let at = |x: isize, y: isize| -> f32 {
        let x = x.clamp(0, w as isize - 1) as usize;
        let y = y.clamp(0, h as isize - 1) as usize;
        gray[y * w + x] as f32
    };
    let mut mag = vec![0f32; w * h];
    let mut max_mag = 0f32;
    for y in 0..h as isize {
        for x in 0..w as isize {
            let gx = at(x + 1, y - 1) + 2.0 * at(x + 1, y) + at(x + 1, y + 1)
                - at(x - 1, y - 1)
                - 2.0 * at(x - 1, y)
                - at(x - 1, y + 1);
            let gy = at(x - 1, y + 1) + 2.0 * at(x, y + 1) + at(x + 1, y + 1)
                - at(x - 1, y - 1)
                - 2.0 * at(x, y - 1)
                - at(x + 1, y - 1);
            let m = (gx * gx + gy * gy).sqrt();
            max_mag = max_mag.max(m);
            mag[y as usize * w + x as usize] = m;
        }
    }
    if max_mag < MIN_GRADIENT {
        return None;
    }
    let threshold = (threshold_rel * max_mag).max(MIN_GRADIENT);
    Some(mag.iter().map(|&m| m >= threshold).collect())
}

/// Feed every run of consecutive `true` values at least `min_len` long into
/// the callback.
fn accumulate_runs(line: &[bool], min_len: usize, emit: &mut impl FnMut(usize)) {
    let mut run = 0usize;
    for &on in line {
        if on {
            run += 1;
            continue;
        }
        if run >= min_len {
            emit(run);
        }
        run = 0;
    }
    if run >= min_len {
        emit(run);
    }
}

/// Collapse consecutive high-vote positions into band midpoints.
///
/// A physical separator a few pixels thick lights up neighboring rows (or
/// columns); each contiguous group becomes one position.
fn vote_bands(votes: &[usize], min_vote: usize) -> Vec<usize> {
    let mut bands = Vec::new();
    let mut start: Option<usize> = None;
    for (i, &v) in votes.iter().enumerate() {
        if v > min_vote {
            start.get_or_insert(i);
        } else if let Some(s) = start.take() {
            bands.push((s + i - 1) / 2);
        }
    }
    if let Some(s) = start {
        bands.push((s + votes.len() - 1) / 2);
    }
    bands
}
