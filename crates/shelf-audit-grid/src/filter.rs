//! 1-D position clustering shared by the image-driven strategies.

/// Merge candidate separator positions that sit closer than `min_distance`,
/// keeping the first of each group.
///
/// Input need not be sorted. Grid separators found a few pixels apart are a
/// single physical edge; this collapses them.
pub(crate) fn filter_close_lines(positions: &[usize], min_distance: f32) -> Vec<usize> {
    if positions.is_empty() {
        return Vec::new();
    }
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    let mut filtered = vec![sorted[0]];
    for &pos in &sorted[1..] {
        if (pos - *filtered.last().unwrap()) as f32 >= min_distance {
            filtered.push(pos);
        }
    }
    filtered
}

/// A group of nearby 1-D values.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Cluster {
    pub center: f32,
    pub count: usize,
    /// Mean absolute deviation of members from the center.
    pub residual: f32,
}

/// Group sorted-by-value samples into clusters split wherever the gap
/// between consecutive values reaches `min_gap`.
pub(crate) fn cluster_1d(values: &[f32], min_gap: f32) -> Vec<Cluster> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut clusters = Vec::new();
    let mut start = 0usize;
    for i in 1..=sorted.len() {
        let split = i == sorted.len() || sorted[i] - sorted[i - 1] >= min_gap;
        if !split {
            continue;
        }
        let members = &sorted[start..i];
        let center = members.iter().sum::<f32>() / members.len() as f32;
        let residual =
            members.iter().map(|v| (v - center).abs()).sum::<f32>() / members.len() as f32;
        clusters.push(Cluster {
            center,
            count: members.len(),
            residual,
        });
        start = i;
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn close_lines_collapse() {
        let merged = filter_close_lines(&[100, 103, 250, 255, 400], 20.0);
        assert_eq!(merged, vec![100, 250, 400]);
    }

    #[test]
    fn close_lines_handle_unsorted_input() {
        let merged = filter_close_lines(&[400, 100, 250], 20.0);
        assert_eq!(merged, vec![100, 250, 400]);
    }

    #[test]
    fn close_lines_empty() {
        assert!(filter_close_lines(&[], 10.0).is_empty());
    }

    #[test]
    fn cluster_splits_on_gap() {
        let clusters = cluster_1d(&[10.0, 12.0, 11.0, 50.0, 52.0], 20.0);
        assert_eq!(clusters.len(), 2);
        assert_relative_eq!(clusters[0].center, 11.0);
        assert_eq!(clusters[0].count, 3);
        assert_relative_eq!(clusters[1].center, 51.0);
    }

    #[test]
    fn cluster_residual_is_mean_abs_deviation() {
        let clusters = cluster_1d(&[8.0, 12.0], 20.0);
        assert_eq!(clusters.len(), 1);
        assert_relative_eq!(clusters[0].residual, 2.0);
    }
}
