use kiddo::immutable::float::kdtree::ImmutableKdTree;

/// Indices of the points that survive statistical outlier filtering.
///
/// For every point the mean distance to its `k_neighbors` nearest neighbors
/// is computed. Points whose mean distance exceeds the global mean of these
/// distances by more than `std_ratio` standard deviations are rejected.
/// The zero-distance self match is never counted as a neighbor.
///
/// # Arguments
///
/// * `points` - The point set to filter.
/// * `k_neighbors` - Number of nearest neighbors per point.
/// * `std_ratio` - Standard deviation multiplier of the rejection threshold.
///
/// # Returns
///
/// Indices of the retained points, in their original order. With fewer than
/// two points, or `k_neighbors == 0`, every index is retained.
pub fn statistical_inliers(points: &[[f64; 3]], k_neighbors: usize, std_ratio: f64) -> Vec<usize> {
    if points.len() <= 1 || k_neighbors == 0 {
        return (0..points.len()).collect();
    }

    // build kdtree over the cloud to speed up the nearest neighbor search
    let kdtree: ImmutableKdTree<f64, u32, 3, 32> = ImmutableKdTree::new_from_slice(points);

    // mean distance from each point to its k nearest neighbors
    let mean_distances = points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let neighbors = kdtree.nearest_n::<kiddo::SquaredEuclidean>(
                point,
                std::num::NonZero::new(k_neighbors + 1).unwrap(),
            );
            let mut sum = 0.0;
            let mut count = 0usize;
            for nn in neighbors.iter() {
                if nn.item as usize == i {
                    continue;
                }
                sum += nn.distance.sqrt();
                count += 1;
                if count == k_neighbors {
                    break;
                }
            }
            if count == 0 {
                0.0
            } else {
                sum / count as f64
            }
        })
        .collect::<Vec<_>>();

    let mean = mean_distances.iter().sum::<f64>() / mean_distances.len() as f64;
    let variance = mean_distances
        .iter()
        .map(|d| (d - mean).powi(2))
        .sum::<f64>()
        / mean_distances.len() as f64;
    let threshold = mean + std_ratio * variance.sqrt();

    let inliers = mean_distances
        .iter()
        .enumerate()
        .filter(|(_, d)| **d <= threshold)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    log::debug!(
        "outlier filter kept {}/{} points, threshold {:.6}",
        inliers.len(),
        points.len(),
        threshold
    );

    inliers
}
