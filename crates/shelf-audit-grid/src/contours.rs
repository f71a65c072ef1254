//! Contour/threshold grid strategy.
//!
//! Products sit as dark blobs against a lit shelf. Several adaptive
//! threshold passes (different window sizes, so different lighting
//! assumptions) segment candidate regions; their centroids, clustered by y
//! and by x, give row and column counts directly.

use log::debug;
use nalgebra::Point2;

use shelf_audit_core::{GrayImageView, GridCandidate, GridDimensions, StrategySource};

use crate::filter::cluster_1d;
use crate::params::ContourStrategyParams;
use crate::strategy::GridStrategy;

pub struct ContourStrategy {
    params: ContourStrategyParams,
}

impl ContourStrategy {
    pub fn new(params: ContourStrategyParams) -> Self {
        Self { params }
    }
}

impl GridStrategy for ContourStrategy {
    fn source(&self) -> StrategySource {
        StrategySource::Contours
    }

    fn detect(&self, img: &GrayImageView<'_>) -> Option<GridCandidate> {
        let (width, height) = (img.width, img.height);
        if width < 8 || height < 8 {
            return None;
        }
        let p = &self.params;
        let area = (width * height) as f32;
        let min_area = (area * p.min_area_frac) as usize;
        let max_area = (area * p.max_area_frac) as usize;

        let integral = integral_image(img);
        let mut centroids: Vec<Point2<f32>> = Vec::new();
        for &radius in &p.block_radii {
            let mask = adaptive_mask(img, &integral, radius, p.offset);
            let regions = connected_regions(&mask, width, height, min_area, max_area);
            debug!(
                "contour strategy: radius {radius} -> {} regions in area band",
                regions.len()
            );
            centroids.extend(regions);
        }
        if centroids.len() < p.min_regions {
            debug!(
                "contour strategy: only {} regions, need {}",
                centroids.len(),
                p.min_regions
            );
            return None;
        }

        let ys: Vec<f32> = centroids.iter().map(|c| c.y).collect();
        let xs: Vec<f32> = centroids.iter().map(|c| c.x).collect();
        let row_clusters = cluster_1d(&ys, height as f32 * p.row_gap_frac);
        let col_clusters = cluster_1d(&xs, width as f32 * p.col_gap_frac);
        let rows = row_clusters.len();
        let columns = col_clusters.len();
        if rows == 0 || columns == 0 {
            return None;
        }

        // Tight clusters relative to the implied cell size mean a regular
        // layout; loose ones mean noise.
        let cell_h = height as f32 / rows as f32;
        let cell_w = width as f32 / columns as f32;
        let row_residual =
            row_clusters.iter().map(|c| c.residual).sum::<f32>() / rows as f32 / cell_h;
        let col_residual =
            col_clusters.iter().map(|c| c.residual).sum::<f32>() / columns as f32 / cell_w;
        let confidence = 1.0 / (1.0 + row_residual + col_residual);
        debug!(
            "contour strategy: {} centroids -> {rows}x{columns} (confidence {confidence:.2})",
            centroids.len()
        );

        Some(GridCandidate {
            dims: GridDimensions::new(rows, columns)?,
            confidence,
            source: StrategySource::Contours,
        })
    }
}

/// Summed-area table with a zero top row and left column.
fn integral_image(img: &GrayImageView<'_>) -> Vec<u64> {
    let (w, h) = (img.width, img.height);
    let stride = w + 1;
    let mut integral = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += img.data[y * w + x] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }
    integral
}

/// Mark pixels darker than their local window mean by more than `offset`.
fn adaptive_mask(
    img: &GrayImageView<'_>,
    integral: &[u64],
    radius: usize,
    offset: i16,
) -> Vec<bool> {
    let (w, h) = (img.width, img.height);
    let stride = w + 1;
    let mut mask = vec![false; w * h];
    for y in 0..h {
        let y0 = y.saturating_sub(radius);
        let y1 = (y + radius + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(radius);
            let x1 = (x + radius + 1).min(w);
            let count = ((x1 - x0) * (y1 - y0)) as u64;
            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let mean = (sum / count) as i32;
            mask[y * w + x] = (img.data[y * w + x] as i32) < mean - offset as i32;
        }
    }
    mask
}

/// 4-connected components of the mask; returns centroids of components in
/// the `[min_area, max_area]` band.
fn connected_regions(
    mask: &[bool],
    w: usize,
    h: usize,
    min_area: usize,
    max_area: usize,
) -> Vec<Point2<f32>> {
    let mut visited = vec![false; w * h];
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for start in 0..w * h {
        if !mask[start] || visited[start] {
            continue;
        }
        visited[start] = true;
        stack.push(start);
        let mut count = 0usize;
        let (mut sum_x, mut sum_y) = (0u64, 0u64);

        while let Some(idx) = stack.pop() {
            let (x, y) = (idx % w, idx / w);
            count += 1;
            sum_x += x as u64;
            sum_y += y as u64;

            let mut push = |nx: usize, ny: usize| {
                let nidx = ny * w + nx;
                if mask[nidx] && !visited[nidx] {
                    visited[nidx] = true;
                    stack.push(nidx);
                }
            };
            if x > 0 {
                push(x - 1, y);
            }
            if x + 1 < w {
                push(x + 1, y);
            }
            if y > 0 {
                push(x, y - 1);
            }
            if y + 1 < h {
                push(x, y + 1);
            }
        }

        if count >= min_area && count <= max_area {
            regions.push(Point2::new(
                sum_x as f32 / count as f32,
                sum_y as f32 / count as f32,
            ));
        }
    }
    regions
}
