//! Raster primitives for overlaying shapes on images.
//!
//! Used to mark the configured quadrilateral on a camera frame and to fill
//! polygons mapped between the camera and top-down views.

use birdseye_image::Image;

/// Helper function to set a pixel's color, handling bounds checking.
#[inline]
fn set_pixel<T: Copy, const C: usize>(img: &mut Image<T, C>, x: i64, y: i64, color: [T; C]) {
    if x < 0 || x >= img.cols() as i64 || y < 0 || y >= img.rows() as i64 {
        return;
    }
    let start = (y as usize * img.cols() + x as usize) * C;
    img.as_slice_mut()[start..start + C].copy_from_slice(&color);
}

/// Draws a line on an image inplace using Bresenham's line algorithm.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `p0` - The start point of the line as a tuple of (x, y).
/// * `p1` - The end point of the line as a tuple of (x, y).
/// * `color` - The color of the line as an array of `C` elements.
/// * `thickness` - The thickness of the line (thickness > 1 is approximate).
pub fn draw_line<T: Copy, const C: usize>(
    img: &mut Image<T, C>,
    p0: (i64, i64),
    p1: (i64, i64),
    color: [T; C],
    thickness: usize,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let mut err = dx - dy;
    let half = thickness as i64 / 2;

    loop {
        if thickness <= 1 {
            set_pixel(img, x0, y0, color);
        } else {
            for i in -half..=half {
                for j in -half..=half {
                    set_pixel(img, x0 + i, y0 + j, color);
                }
            }
        }

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x0 += sx;
        }
        if e2 < dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draws a closed polygon outline through the given points inplace.
pub fn draw_polygon<T: Copy, const C: usize>(
    img: &mut Image<T, C>,
    points: &[(i64, i64)],
    color: [T; C],
    thickness: usize,
) {
    if points.len() < 2 {
        return;
    }
    for i in 0..points.len() {
        let p0 = points[i];
        let p1 = points[(i + 1) % points.len()];
        draw_line(img, p0, p1, color, thickness);
    }
}

/// Fills a simple polygon inplace using even-odd scanline filling.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `points` - The polygon vertices in order, at least three.
/// * `color` - The fill color as an array of `C` elements.
pub fn fill_polygon<T: Copy, const C: usize>(
    img: &mut Image<T, C>,
    points: &[(i64, i64)],
    color: [T; C],
) {
    if points.len() < 3 {
        return;
    }

    let y_min = points.iter().fold(i64::MAX, |acc, p| acc.min(p.1)).max(0);
    let y_max = points
        .iter()
        .fold(i64::MIN, |acc, p| acc.max(p.1))
        .min(img.rows() as i64 - 1);

    let mut crossings: Vec<f64> = Vec::with_capacity(points.len());

    for y in y_min..=y_max {
        // intersect edges with the scanline through the pixel row center
        let fy = y as f64 + 0.5;
        crossings.clear();
        for i in 0..points.len() {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % points.len()];
            let (fy0, fy1) = (y0 as f64, y1 as f64);
            if (fy0 <= fy && fy1 > fy) || (fy1 <= fy && fy0 > fy) {
                let t = (fy - fy0) / (fy1 - fy0);
                crossings.push(x0 as f64 + t * (x1 - x0) as f64);
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for pair in crossings.chunks_exact(2) {
            let xa = pair[0].round() as i64;
            let xb = pair[1].round() as i64;
            for x in xa..=xb {
                set_pixel(img, x, y, color);
            }
        }
    }
}

/// Draws a filled circle inplace, used as a point marker.
pub fn draw_filled_circle<T: Copy, const C: usize>(
    img: &mut Image<T, C>,
    center: (i64, i64),
    radius: i64,
    color: [T; C],
) {
    let (cx, cy) = center;
    for dy in -radius..=radius {
        let half_width = ((radius * radius - dy * dy) as f64).sqrt() as i64;
        for dx in -half_width..=half_width {
            set_pixel(img, cx + dx, cy + dy, color);
        }
    }
}
