use thiserror::Error;

/// Errors produced by the transform helpers.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The rotation axis has numerically zero length.
    #[error("cannot compute a rotation matrix from a zero axis")]
    ZeroAxis,
}

/// Compute the rotation matrix from an axis and angle (Rodrigues formula).
///
/// # Arguments
///
/// * `axis` - The axis of rotation, not required to be unit length.
/// * `angle` - The angle of rotation in radians.
///
/// # Returns
///
/// The rotation matrix, or [`TransformError::ZeroAxis`] for a zero axis.
///
/// Example:
///
/// ```
/// use manhattan_3d::transforms::axis_angle_to_rotation_matrix;
///
/// let axis = [1.0, 0.0, 0.0];
/// let angle = std::f64::consts::PI / 2.0;
/// let rotation = axis_angle_to_rotation_matrix(&axis, angle).unwrap();
/// assert!((rotation[1][2] - (-1.0)).abs() < 1e-12);
/// ```
pub fn axis_angle_to_rotation_matrix(
    axis: &[f64; 3],
    angle: f64,
) -> Result<[[f64; 3]; 3], TransformError> {
    let magnitude = crate::linalg::dot3(axis, axis).sqrt();
    if magnitude < 1e-10 {
        return Err(TransformError::ZeroAxis);
    }
    let x = axis[0] / magnitude;
    let y = axis[1] / magnitude;
    let z = axis[2] / magnitude;

    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;

    // R = c*I + s*[n]x + t*(n n^T)
    Ok([
        [t * x * x + c, t * x * y - s * z, t * x * z + s * y],
        [t * x * y + s * z, t * y * y + c, t * y * z - s * x],
        [t * x * z - s * y, t * y * z + s * x, t * z * z + c],
    ])
}
