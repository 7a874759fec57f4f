/// Create x and y coordinate maps of shape (rows, cols) from a function.
///
/// # Arguments
///
/// * `cols` - The number of columns indicating the width of the grid
/// * `rows` - The number of rows indicating the height of the grid
/// * `f` - Maps a grid position `(x, y)` to a coordinate pair
///
/// # Returns
///
/// A tuple of two flat row-major buffers of length `rows * cols` containing
/// the x and y coordinates.
pub fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> (f32, f32),
) -> (Vec<f32>, Vec<f32>) {
    let mut map_x = vec![0.0f32; rows * cols];
    let mut map_y = vec![0.0f32; rows * cols];

    for r in 0..rows {
        for c in 0..cols {
            let (x, y) = f(c, r);
            map_x[r * cols + c] = x;
            map_y[r * cols + c] = y;
        }
    }

    (map_x, map_y)
}

#[cfg(test)]
mod tests {
    #[test]
    fn meshgrid_from_fn_identity() {
        let (map_x, map_y) = super::meshgrid_from_fn(3, 2, |x, y| (x as f32, y as f32));
        assert_eq!(map_x, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(map_y, vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }
}
