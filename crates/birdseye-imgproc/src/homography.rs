//! Homography estimation from four point correspondences and point projection.
//!
//! The estimator computes the unique 3x3 projective transform H (normalized so
//! that the bottom-right element is 1) mapping four ordered source points onto
//! four ordered destination points. Points sets where three or more points are
//! collinear, or that contain duplicates, yield a singular system and are
//! rejected.

use birdseye_image::ImageError;
use thiserror::Error;

/// Errors produced by homography estimation, point projection and warping.
#[derive(Error, Debug, PartialEq)]
pub enum HomographyError {
    /// The point correspondences yield a singular system and no transform exists.
    #[error("degenerate configuration: the point correspondences yield a singular system")]
    DegenerateConfiguration,

    /// The homogeneous divisor of a projected point is zero (maps to infinity).
    #[error("degenerate projection: the homogeneous divisor is zero")]
    DegenerateProjection,

    /// A frame dimension is zero.
    #[error("frame size must be nonzero, got {0}x{1}")]
    InvalidFrameSize(usize, usize),

    /// An image buffer failed validation.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Tolerance below which a homogeneous divisor is treated as zero.
const DIVISOR_EPS: f32 = 1e-8;

/// Tolerance below which an elimination pivot on normalized coordinates is
/// treated as zero.
const PIVOT_EPS: f64 = 1e-10;

/// Similarity transform that translates the point centroid to the origin and
/// scales the mean distance from the origin to sqrt(2). Conditions the linear
/// system before elimination.
fn normalize_points(points: &[[f32; 2]; 4]) -> ([[f64; 2]; 4], [f64; 9], [f64; 9]) {
    let (mut cx, mut cy) = (0.0f64, 0.0f64);
    for p in points {
        cx += p[0] as f64;
        cy += p[1] as f64;
    }
    cx /= 4.0;
    cy /= 4.0;

    let mut mean_dist = 0.0f64;
    for p in points {
        let dx = p[0] as f64 - cx;
        let dy = p[1] as f64 - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= 4.0;

    let s = if mean_dist > f64::EPSILON {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    let mut normalized = [[0.0f64; 2]; 4];
    for (dst, src) in normalized.iter_mut().zip(points.iter()) {
        dst[0] = s * (src[0] as f64 - cx);
        dst[1] = s * (src[1] as f64 - cy);
    }

    #[rustfmt::skip]
    let t = [
        s, 0.0, -s * cx,
        0.0, s, -s * cy,
        0.0, 0.0, 1.0,
    ];
    #[rustfmt::skip]
    let t_inv = [
        1.0 / s, 0.0, cx,
        0.0, 1.0 / s, cy,
        0.0, 0.0, 1.0,
    ];

    (normalized, t, t_inv)
}

/// Row-major 3x3 matrix product.
fn mat3_mul(a: &[f64; 9], b: &[f64; 9]) -> [f64; 9] {
    let mut out = [0.0f64; 9];
    for i in 0..3 {
        for j in 0..3 {
            out[i * 3 + j] =
                a[i * 3] * b[j] + a[i * 3 + 1] * b[3 + j] + a[i * 3 + 2] * b[6 + j];
        }
    }
    out
}

/// Solve the augmented 8x9 system in place with Gaussian elimination and
/// partial pivoting. The last column holds the right-hand side.
fn solve_linear_system(a: &mut [[f64; 9]; 8]) -> Result<[f64; 8], HomographyError> {
    let n = 8;

    for col in 0..n {
        let mut max_row = col;
        let mut max_val = a[col][col].abs();
        for row in (col + 1)..n {
            if a[row][col].abs() > max_val {
                max_val = a[row][col].abs();
                max_row = row;
            }
        }
        if max_row != col {
            a.swap(col, max_row);
        }

        let pivot = a[col][col];
        if pivot.abs() < PIVOT_EPS {
            return Err(HomographyError::DegenerateConfiguration);
        }

        for row in (col + 1)..n {
            let factor = a[row][col] / pivot;
            for j in col..=n {
                a[row][j] -= factor * a[col][j];
            }
        }
    }

    let mut x = [0.0f64; 8];
    for i in (0..n).rev() {
        let mut sum = a[i][n];
        for j in (i + 1)..n {
            sum -= a[i][j] * x[j];
        }
        x[i] = sum / a[i][i];
    }

    Ok(x)
}

/// Computes the 3x3 perspective transform mapping four ordered source points
/// onto four ordered destination points.
///
/// The transform is returned row-major, normalized so that the bottom-right
/// element is 1, and satisfies `dst[i] ~ H * src[i]` in homogeneous
/// coordinates for all four correspondences. The order of the points defines
/// the correspondence: index i in `src` maps to index i in `dst`.
///
/// # Errors
///
/// Returns [`HomographyError::DegenerateConfiguration`] when the
/// correspondence system is singular: three or more collinear points,
/// duplicate points or a zero-area quadrilateral.
///
/// # Example
///
/// ```
/// use birdseye_imgproc::homography::get_perspective_transform;
///
/// let src = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
/// let dst = [[2.0, 1.0], [3.0, 1.0], [3.0, 2.0], [2.0, 2.0]];
///
/// let m = get_perspective_transform(&src, &dst).unwrap();
///
/// // a pure translation by (2, 1)
/// assert!((m[2] - 2.0).abs() < 1e-4);
/// assert!((m[5] - 1.0).abs() < 1e-4);
/// ```
pub fn get_perspective_transform(
    src: &[[f32; 2]; 4],
    dst: &[[f32; 2]; 4],
) -> Result<[f32; 9], HomographyError> {
    let (src_n, t_src, _) = normalize_points(src);
    let (dst_n, _, t_dst_inv) = normalize_points(dst);

    // For each correspondence (x, y) -> (u, v), with h8 pinned to 1:
    //   x*h0 + y*h1 + h2 - u*x*h6 - u*y*h7 = u
    //   x*h3 + y*h4 + h5 - v*x*h6 - v*y*h7 = v
    let mut a = [[0.0f64; 9]; 8];
    for i in 0..4 {
        let [x, y] = src_n[i];
        let [u, v] = dst_n[i];

        let r = i * 2;
        a[r][0] = x;
        a[r][1] = y;
        a[r][2] = 1.0;
        a[r][6] = -u * x;
        a[r][7] = -u * y;
        a[r][8] = u;

        a[r + 1][3] = x;
        a[r + 1][4] = y;
        a[r + 1][5] = 1.0;
        a[r + 1][6] = -v * x;
        a[r + 1][7] = -v * y;
        a[r + 1][8] = v;
    }

    let h = solve_linear_system(&mut a)?;

    #[rustfmt::skip]
    let h_normalized = [
        h[0], h[1], h[2],
        h[3], h[4], h[5],
        h[6], h[7], 1.0,
    ];

    // undo the conditioning transforms: H = T_dst^-1 * Hn * T_src
    let m = mat3_mul(&t_dst_inv, &mat3_mul(&h_normalized, &t_src));

    let max_abs = m.iter().fold(0.0f64, |acc, &v| acc.max(v.abs()));
    if m[8].abs() < 1e-12 * max_abs {
        return Err(HomographyError::DegenerateConfiguration);
    }

    let mut out = [0.0f32; 9];
    for (o, v) in out.iter_mut().zip(m.iter()) {
        *o = (v / m[8]) as f32;
    }

    Ok(out)
}

/// Projects a 2D point through a homography with perspective divide.
///
/// Lifts `p` to homogeneous coordinates (x, y, 1), multiplies by `m` and
/// divides the first two components of the result by the third.
///
/// # Errors
///
/// Returns [`HomographyError::DegenerateProjection`] when the homogeneous
/// divisor is numerically indistinguishable from zero, i.e. the point maps to
/// infinity. The failure is local to this point; other projections through
/// the same matrix remain valid.
pub fn transform_point(m: &[f32; 9], p: [f32; 2]) -> Result<[f32; 2], HomographyError> {
    let [x, y] = p;
    let w = m[6] * x + m[7] * y + m[8];
    if w.abs() < DIVISOR_EPS {
        return Err(HomographyError::DegenerateProjection);
    }
    Ok([
        (m[0] * x + m[1] * y + m[2]) / w,
        (m[3] * x + m[4] * y + m[5]) / w,
    ])
}
