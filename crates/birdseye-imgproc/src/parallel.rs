use rayon::prelude::*;

use birdseye_image::Image;

/// Apply a function to each destination pixel for grid sampling in parallel.
///
/// Rows of `dst` are processed as rayon chunks zipped with the matching rows
/// of the coordinate maps; `f` receives the x and y source coordinates and
/// the destination pixel slice to fill. The maps must have `rows * cols`
/// elements in row-major order.
pub fn par_iter_rows_resample<const C: usize>(
    dst: &mut Image<f32, C>,
    map_x: &[f32],
    map_y: &[f32],
    f: impl Fn(&f32, &f32, &mut [f32]) + Send + Sync,
) {
    let cols = dst.cols();

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .zip(map_x.par_chunks_exact(cols))
        .zip(map_y.par_chunks_exact(cols))
        .for_each(|((dst_chunk, map_x_chunk), map_y_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
                .for_each(|(dst_pixel, (x, y))| {
                    f(x, y, dst_pixel);
                });
        });
}
