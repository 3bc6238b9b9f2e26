use manhattan_3d::pointcloud::PointCloud;

/// Typical indoor wall height in meters, the default scaling target.
pub const DEFAULT_TARGET_HEIGHT: f64 = 2.5;

/// Errors produced by [`scale_to_height`].
#[derive(Debug, thiserror::Error)]
pub enum ScaleError {
    /// The input cloud has no points.
    #[error("cannot scale an empty point cloud")]
    EmptyCloud,

    /// The requested target height is not positive.
    #[error("target height must be positive, got {0}")]
    InvalidTargetHeight(f64),

    /// All points share the same Z coordinate.
    #[error("point cloud has no vertical extent")]
    ZeroHeight,
}

/// Result of rescaling a point cloud to a target height.
#[derive(Debug, Clone)]
pub struct ScaleResult {
    /// The rescaled cloud, colors carried through unchanged.
    pub cloud: PointCloud,
    /// Factor every coordinate was multiplied by.
    pub scale_factor: f64,
    /// Vertical extent of the input cloud before scaling.
    pub original_height: f64,
}

/// Uniformly scale a point cloud so its vertical extent matches
/// `target_height`.
///
/// Scaling is applied about the origin: every coordinate is multiplied by
/// `target_height / (max_z - min_z)`. For clouds already aligned so Z points
/// up, this normalizes the scene to a plausible metric room height.
///
/// # Arguments
///
/// * `cloud` - The input cloud; never mutated.
/// * `target_height` - The desired vertical extent, in meters.
///
/// # Returns
///
/// The rescaled cloud with the applied factor, or a [`ScaleError`] when the
/// input is empty, flat, or the target is not positive.
pub fn scale_to_height(cloud: &PointCloud, target_height: f64) -> Result<ScaleResult, ScaleError> {
    if target_height <= 0.0 {
        return Err(ScaleError::InvalidTargetHeight(target_height));
    }

    let (min_bound, max_bound) = match (cloud.min_bound(), cloud.max_bound()) {
        (Some(min_bound), Some(max_bound)) => (min_bound, max_bound),
        _ => return Err(ScaleError::EmptyCloud),
    };

    let original_height = max_bound[2] - min_bound[2];
    if original_height <= f64::EPSILON {
        return Err(ScaleError::ZeroHeight);
    }

    let scale_factor = target_height / original_height;
    log::debug!(
        "scaling height {:.6} -> {:.6}, factor {:.6}",
        original_height,
        target_height,
        scale_factor
    );

    let scaled = cloud
        .points()
        .iter()
        .map(|p| [p[0] * scale_factor, p[1] * scale_factor, p[2] * scale_factor])
        .collect();

    Ok(ScaleResult {
        cloud: PointCloud::new(scaled, cloud.colors().cloned()),
        scale_factor,
        original_height,
    })
}
