use crate::aligner::AlignError;

/// Ratio of smallest to largest variance below which the covariance matrix is
/// treated as rank deficient.
pub const RANK_RATIO_EPSILON: f64 = 1e-9;

/// Principal axes of a point set, sorted by variance.
#[derive(Debug, Clone)]
pub struct PrincipalAxes {
    /// Unit-length principal axes, one per row, largest variance first.
    pub axes: [[f64; 3]; 3],
    /// Variance along each axis, same order as `axes`.
    pub variances: [f64; 3],
}

/// Arithmetic mean of a set of points.
///
/// PRECONDITION: points is non-empty.
pub fn centroid(points: &[[f64; 3]]) -> [f64; 3] {
    let mut mean = [0.0; 3];
    for point in points {
        mean[0] += point[0];
        mean[1] += point[1];
        mean[2] += point[2];
    }
    let n = points.len() as f64;
    [mean[0] / n, mean[1] / n, mean[2] / n]
}

/// Covariance matrix of `points` about `center`, normalized by the point count.
pub fn covariance(points: &[[f64; 3]], center: &[f64; 3]) -> [[f64; 3]; 3] {
    let mut cov = [[0.0; 3]; 3];
    for point in points {
        let centered = [
            point[0] - center[0],
            point[1] - center[1],
            point[2] - center[2],
        ];
        for (i, &ci) in centered.iter().enumerate() {
            for (j, &cj) in centered.iter().enumerate() {
                cov[i][j] += ci * cj;
            }
        }
    }
    let n = points.len() as f64;
    for row in &mut cov {
        for val in row {
            *val /= n;
        }
    }
    cov
}

/// Principal axes of a point set via decomposition of its covariance matrix.
///
/// The covariance of a point set is symmetric positive semi-definite, so its
/// singular value decomposition coincides with the eigendecomposition: the
/// singular values are the variances along the principal axes. The solver's
/// native output order is not relied upon; eigenpairs are sorted by
/// descending variance before they are returned.
///
/// # Arguments
///
/// * `points` - The point set, already filtered of outliers.
/// * `center` - The centroid of `points`.
///
/// # Returns
///
/// The sorted principal axes, or [`AlignError::DegenerateInput`] when the
/// smallest variance falls below [`RANK_RATIO_EPSILON`] of the largest
/// (coplanar, collinear or coincident points).
pub fn principal_axes(
    points: &[[f64; 3]],
    center: &[f64; 3],
) -> Result<PrincipalAxes, AlignError> {
    let cov = covariance(points, center);
    let cov_mat = faer::Mat::<f64>::from_fn(3, 3, |i, j| cov[i][j]);

    let svd = cov_mat.svd();
    let u = svd.u();
    let s = svd.s_diagonal();

    let eigenvalues = [s.read(0), s.read(1), s.read(2)];
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigenvalues[b]
            .partial_cmp(&eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let axes = order.map(|j| [u.read(0, j), u.read(1, j), u.read(2, j)]);
    let variances = order.map(|j| eigenvalues[j]);

    if variances[0] <= 0.0 {
        return Err(AlignError::DegenerateInput(0.0));
    }
    let rank_ratio = variances[2] / variances[0];
    if rank_ratio < RANK_RATIO_EPSILON {
        return Err(AlignError::DegenerateInput(rank_ratio));
    }

    Ok(PrincipalAxes { axes, variances })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use manhattan_3d::linalg::dot3;

    // lattice with extents 8 x 4 x 2, so variances order as x > y > z
    fn anisotropic_grid() -> Vec<[f64; 3]> {
        let mut points = Vec::new();
        for i in 0..9 {
            for j in 0..5 {
                for k in 0..3 {
                    points.push([i as f64, j as f64, k as f64]);
                }
            }
        }
        points
    }

    #[test]
    fn test_centroid() {
        let points = vec![[1.0, 2.0, 3.0], [3.0, 2.0, 1.0], [2.0, 2.0, 2.0]];
        assert_eq!(centroid(&points), [2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_covariance_is_symmetric() {
        let points = anisotropic_grid();
        let c = centroid(&points);
        let cov = covariance(&points, &c);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(cov[i][j], cov[j][i], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_principal_axes_of_grid() {
        let points = anisotropic_grid();
        let c = centroid(&points);
        let pca = principal_axes(&points, &c).unwrap();

        assert!(pca.variances[0] >= pca.variances[1]);
        assert!(pca.variances[1] >= pca.variances[2]);

        // axes of an axis-aligned lattice are the canonical axes up to sign
        assert_relative_eq!(pca.axes[0][0].abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(pca.axes[1][1].abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(pca.axes[2][2].abs(), 1.0, epsilon = 1e-9);

        // unit length, mutually orthogonal
        for i in 0..3 {
            assert_relative_eq!(dot3(&pca.axes[i], &pca.axes[i]), 1.0, epsilon = 1e-9);
            assert_relative_eq!(
                dot3(&pca.axes[i], &pca.axes[(i + 1) % 3]),
                0.0,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_coplanar_points_are_degenerate() {
        let mut points = Vec::new();
        for i in 0..6 {
            for j in 0..6 {
                points.push([i as f64, j as f64, 0.0]);
            }
        }
        let c = centroid(&points);
        assert!(matches!(
            principal_axes(&points, &c),
            Err(AlignError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_collinear_points_are_degenerate() {
        let points = (0..10).map(|i| [i as f64, 0.0, 0.0]).collect::<Vec<_>>();
        let c = centroid(&points);
        assert!(matches!(
            principal_axes(&points, &c),
            Err(AlignError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let points = vec![[1.0, 1.0, 1.0]; 8];
        let c = centroid(&points);
        assert!(matches!(
            principal_axes(&points, &c),
            Err(AlignError::DegenerateInput(_))
        ));
    }
}
