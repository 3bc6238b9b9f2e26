use manhattan_3d::linalg::{cross3, det33, dot3, normalized3, transform_points3d};
use manhattan_3d::pointcloud::PointCloud;

use crate::outlier::statistical_inliers;
use crate::pca::{centroid, principal_axes};

/// Minimum number of points required for a meaningful covariance fit.
pub const MIN_POINTS: usize = 4;

/// Errors produced by [`align_to_manhattan`].
#[derive(Debug, thiserror::Error)]
pub enum AlignError {
    /// Fewer than [`MIN_POINTS`] points survived outlier filtering.
    #[error("need at least 4 points for a covariance fit, {0} left after filtering")]
    InsufficientPoints(usize),

    /// Covariance rank < 3: coplanar, collinear or coincident points.
    #[error("degenerate point distribution, covariance variance ratio {0:.3e}")]
    DegenerateInput(f64),

    /// Color count does not match point count.
    #[error("point and color counts differ: {points} points, {colors} colors")]
    MismatchedColors {
        /// Number of points in the input cloud.
        points: usize,
        /// Number of colors in the input cloud.
        colors: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate in point {0}")]
    NonFiniteCoordinate(usize),
}

/// Configuration for [`align_to_manhattan`].
#[derive(Debug, Clone)]
pub struct AlignParams {
    /// Number of nearest neighbors used by the statistical outlier filter.
    pub k_neighbors: usize,
    /// Standard deviation multiplier of the outlier rejection threshold.
    pub std_ratio: f64,
    /// Whether points rejected by the outlier filter are also removed from
    /// the aligned output cloud. With `false` the full input set is
    /// transformed and the filter only affects the covariance fit.
    pub drop_outliers_from_output: bool,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            k_neighbors: 20,
            std_ratio: 2.0,
            drop_outliers_from_output: true,
        }
    }
}

/// Result of aligning a point cloud to the Manhattan world frame.
#[derive(Debug, Clone)]
pub struct AlignmentResult {
    /// Rotation whose rows are the resolved x/y/z world axes expressed in the
    /// input frame. Orthonormal with determinant +1.
    pub rotation: [[f64; 3]; 3],
    /// Centroid of the filtered point set; the pivot of the rotation.
    pub centroid: [f64; 3],
    /// The aligned cloud. Whether filtered outliers appear in it is decided
    /// by [`AlignParams::drop_outliers_from_output`].
    pub cloud: PointCloud,
    /// Number of points the covariance was fitted on.
    pub num_fitted: usize,
}

/// Align a point cloud to the Manhattan world axes.
///
/// Statistical outliers are filtered out, the principal axes of the remaining
/// points are extracted by PCA, and a proper rotation is assembled that maps
/// the dominant structural directions onto the world axes, with the
/// smallest-variance axis taken as vertical and oriented toward positive Z.
/// The rotation is applied about the centroid of the filtered set:
/// `aligned = R * (point - centroid) + centroid`.
///
/// The computation is deterministic and holds no shared state; it is safe to
/// call concurrently on independent clouds.
///
/// # Arguments
///
/// * `cloud` - The input cloud; never mutated. Colors, if present, are
///   carried through to the output unchanged and in point order.
/// * `params` - Filter settings and the outlier output policy.
///
/// # Returns
///
/// The rotation, the pivot centroid and the aligned cloud, or an
/// [`AlignError`] describing why the input cannot be aligned.
pub fn align_to_manhattan(
    cloud: &PointCloud,
    params: &AlignParams,
) -> Result<AlignmentResult, AlignError> {
    validate_input(cloud)?;

    // filtering pre-pass; stray sensor noise otherwise biases the covariance
    let inliers = statistical_inliers(cloud.points(), params.k_neighbors, params.std_ratio);
    let filtered = inliers
        .iter()
        .map(|&i| cloud.points()[i])
        .collect::<Vec<_>>();
    if filtered.len() < MIN_POINTS {
        return Err(AlignError::InsufficientPoints(filtered.len()));
    }

    let pivot = centroid(&filtered);
    let pca = principal_axes(&filtered, &pivot)?;
    log::debug!("centroid: {:?}", pivot);
    log::debug!("variances: {:?}", pca.variances);

    let rotation = resolve_axes(&pca.axes)?;

    // aligned = R * (p - c) + c, folded into one rigid transform with t = c - R*c
    let translation = [
        pivot[0] - dot3(&rotation[0], &pivot),
        pivot[1] - dot3(&rotation[1], &pivot),
        pivot[2] - dot3(&rotation[2], &pivot),
    ];

    let output_points: &[[f64; 3]] = if params.drop_outliers_from_output {
        &filtered
    } else {
        cloud.points()
    };
    let mut aligned = vec![[0.0; 3]; output_points.len()];
    transform_points3d(output_points, &rotation, &translation, &mut aligned);

    let colors = match cloud.colors() {
        Some(colors) if params.drop_outliers_from_output => {
            Some(inliers.iter().map(|&i| colors[i]).collect())
        }
        Some(colors) => Some(colors.clone()),
        None => None,
    };

    Ok(AlignmentResult {
        rotation,
        centroid: pivot,
        cloud: PointCloud::new(aligned, colors),
        num_fitted: filtered.len(),
    })
}

fn validate_input(cloud: &PointCloud) -> Result<(), AlignError> {
    if let Some(colors) = cloud.colors() {
        if colors.len() != cloud.len() {
            return Err(AlignError::MismatchedColors {
                points: cloud.len(),
                colors: colors.len(),
            });
        }
    }
    if let Some(i) = cloud
        .points()
        .iter()
        .position(|p| p.iter().any(|v| !v.is_finite()))
    {
        return Err(AlignError::NonFiniteCoordinate(i));
    }
    Ok(())
}

/// Build a proper rotation from principal axes sorted by descending variance.
///
/// The smallest-variance axis is assumed vertical and flipped to point toward
/// positive Z. The largest-variance axis seeds the horizontal frame and is
/// re-orthogonalized against the vertical; the third axis completes a
/// right-handed basis. The row-stacked candidate is snapped to the nearest
/// orthonormal matrix via SVD, and an improper result has its Y row negated.
/// The determinant check must follow the SVD, which can itself flip the sign.
fn resolve_axes(axes: &[[f64; 3]; 3]) -> Result<[[f64; 3]; 3], AlignError> {
    let mut z_axis = axes[2];
    if z_axis[2] < 0.0 {
        z_axis = [-z_axis[0], -z_axis[1], -z_axis[2]];
    }

    let mut x_axis = axes[0];
    let proj = dot3(&x_axis, &z_axis);
    x_axis[0] -= proj * z_axis[0];
    x_axis[1] -= proj * z_axis[1];
    x_axis[2] -= proj * z_axis[2];
    let x_axis = normalized3(&x_axis).ok_or(AlignError::DegenerateInput(0.0))?;

    let y_axis =
        normalized3(&cross3(&z_axis, &x_axis)).ok_or(AlignError::DegenerateInput(0.0))?;

    Ok(nearest_rotation(&[x_axis, y_axis, z_axis]))
}

/// Nearest orthonormal matrix to `candidate` with determinant +1.
fn nearest_rotation(candidate: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let m = faer::Mat::<f64>::from_fn(3, 3, |i, j| candidate[i][j]);
    let svd = m.svd();
    let u = svd.u();
    let v = svd.v();

    // R = U * V^T
    let mut rotation = [[0.0; 3]; 3];
    for (i, row) in rotation.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = (0..3).map(|k| u.read(i, k) * v.read(j, k)).sum();
        }
    }

    if det33(&rotation) < 0.0 {
        // improper rotation, restore handedness by flipping the Y row
        for val in rotation[1].iter_mut() {
            *val = -*val;
        }
    }

    rotation
}
