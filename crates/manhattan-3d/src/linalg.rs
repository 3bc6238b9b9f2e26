/// Apply a rigid transform to a set of points.
///
/// Computes `dst_i = R * src_i + t` for every point.
///
/// # Arguments
///
/// * `src_points` - A set of points to be transformed.
/// * `dst_r_src` - A rotation matrix.
/// * `dst_t_src` - A translation vector.
/// * `dst_points` - A pre-allocated slice to store the transformed points.
///
/// PRECONDITION: dst_points is pre-allocated with the same length as source.
///
/// Example:
///
/// ```
/// use manhattan_3d::linalg::transform_points3d;
///
/// let src_points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
/// let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let translation = [0.0, 0.0, 0.0];
/// let mut dst_points = vec![[0.0; 3]; src_points.len()];
/// transform_points3d(&src_points, &rotation, &translation, &mut dst_points);
/// assert_eq!(dst_points, src_points);
/// ```
pub fn transform_points3d(
    src_points: &[[f64; 3]],
    dst_r_src: &[[f64; 3]; 3],
    dst_t_src: &[f64; 3],
    dst_points: &mut [[f64; 3]],
) {
    assert_eq!(src_points.len(), dst_points.len());

    {
        // create a view of the rotation matrix
        let rotation = {
            let rotation_slice = unsafe {
                std::slice::from_raw_parts(dst_r_src.as_ptr() as *const f64, 9)
            };
            faer::mat::from_row_major_slice(rotation_slice, 3, 3)
        };

        // create a view of the source points as an Nx3 matrix, one point per row
        let points_in_src = {
            let src_slice = unsafe {
                std::slice::from_raw_parts(src_points.as_ptr() as *const f64, src_points.len() * 3)
            };
            faer::mat::from_row_major_slice(src_slice, src_points.len(), 3)
        };

        // create a mutable view of the destination points with the same layout
        let mut points_in_dst = {
            let dst_slice = unsafe {
                std::slice::from_raw_parts_mut(
                    dst_points.as_mut_ptr() as *mut f64,
                    dst_points.len() * 3,
                )
            };
            faer::mat::from_row_major_slice_mut(dst_slice, dst_points.len(), 3)
        };

        // rotate all points at once: dst = src * R^T
        faer::linalg::matmul::matmul(
            &mut points_in_dst,
            points_in_src,
            rotation.transpose(),
            None,
            1.0,
            faer::Parallelism::None,
        );
    }

    // translate in place
    for point in dst_points.iter_mut() {
        point[0] += dst_t_src[0];
        point[1] += dst_t_src[1];
        point[2] += dst_t_src[2];
    }
}

/// Multiply two 3x3 matrices.
pub fn matmul33(lhs: &[[f64; 3]; 3], rhs: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = lhs[i][0] * rhs[0][j] + lhs[i][1] * rhs[1][j] + lhs[i][2] * rhs[2][j];
        }
    }
    out
}

/// Transpose of a 3x3 matrix.
pub fn transpose33(m: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Determinant of a 3x3 matrix.
pub fn det33(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Dot product of two 3D vectors.
#[inline]
pub fn dot3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product of two 3D vectors.
#[inline]
pub fn cross3(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Unit-length copy of a 3D vector, or `None` if its norm is numerically zero.
pub fn normalized3(v: &[f64; 3]) -> Option<[f64; 3]> {
    let norm = dot3(v, v).sqrt();
    if norm < 1e-12 {
        return None;
    }
    Some([v[0] / norm, v[1] / norm, v[2] / norm])
}
