//! Inverse perspective mapping between a camera view and a top-down view.
//!
//! The engine is configured once from two frame sizes and two ordered
//! four-point correspondences, solves the forward (camera -> top-down) and
//! inverse (top-down -> camera) homographies at construction, and reuses
//! both matrices for every subsequent frame or point. It holds no mutable
//! state, so one engine can serve concurrent warps from multiple threads.

use birdseye_image::{Image, ImageError, ImageSize};

use crate::homography::{get_perspective_transform, transform_point, HomographyError};
use crate::interpolation::InterpolationMode;
use crate::warp::warp_perspective;

/// Engine mapping a camera image plane onto a synthetic bird's-eye plane and
/// back.
///
/// # Example
///
/// ```
/// use birdseye_image::ImageSize;
/// use birdseye_imgproc::ipm::InversePerspectiveMap;
///
/// let size = ImageSize { width: 640, height: 480 };
/// let ipm = InversePerspectiveMap::new(
///     size,
///     size,
///     [[0.0, 480.0], [640.0, 480.0], [350.0, 140.0], [270.0, 140.0]],
///     [[0.0, 480.0], [640.0, 480.0], [640.0, 0.0], [0.0, 0.0]],
/// ).unwrap();
///
/// let p = ipm.map_point([350.0, 140.0]).unwrap();
/// assert!((p[0] - 640.0).abs() < 0.5);
/// assert!(p[1].abs() < 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct InversePerspectiveMap {
    src_size: ImageSize,
    dst_size: ImageSize,
    src_points: [[f32; 2]; 4],
    dst_points: [[f32; 2]; 4],
    forward: [f32; 9],
    inverse: [f32; 9],
}

impl InversePerspectiveMap {
    /// Create a new engine from the frame sizes and the two ordered
    /// four-point correspondences.
    ///
    /// Solves both homographies once: `src_points[i]` maps to
    /// `dst_points[i]` under the forward matrix and back under the inverse.
    ///
    /// # Errors
    ///
    /// Returns [`HomographyError::InvalidFrameSize`] if either size has a
    /// zero dimension, and [`HomographyError::DegenerateConfiguration`] if
    /// either correspondence direction is unsolvable. No partially usable
    /// engine exists after a failure.
    pub fn new(
        src_size: ImageSize,
        dst_size: ImageSize,
        src_points: [[f32; 2]; 4],
        dst_points: [[f32; 2]; 4],
    ) -> Result<Self, HomographyError> {
        for size in [src_size, dst_size] {
            if size.width == 0 || size.height == 0 {
                return Err(HomographyError::InvalidFrameSize(size.width, size.height));
            }
        }

        let forward = get_perspective_transform(&src_points, &dst_points)?;
        let inverse = get_perspective_transform(&dst_points, &src_points)?;

        Ok(Self {
            src_size,
            dst_size,
            src_points,
            dst_points,
            forward,
            inverse,
        })
    }

    /// Warp a full camera frame into the top-down view.
    ///
    /// `dst` is reset to the zero background before resampling; regions of
    /// the top-down plane with no source pixel stay black. Bilinear
    /// interpolation is used for non-integer source coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidImageSize`] (wrapped) if `src` is not of
    /// the configured source size or `dst` of the destination size.
    pub fn warp<const C: usize>(
        &self,
        src: &Image<f32, C>,
        dst: &mut Image<f32, C>,
    ) -> Result<(), HomographyError> {
        check_frame(src, self.src_size)?;
        check_frame(dst, self.dst_size)?;

        dst.as_slice_mut().fill(0.0);
        warp_perspective(src, dst, &self.forward, InterpolationMode::Bilinear)
    }

    /// Warp a full top-down frame back into the camera view.
    ///
    /// The mirror of [`InversePerspectiveMap::warp`]: expects a
    /// destination-sized input and produces a source-sized output, with the
    /// same background and interpolation policies.
    pub fn warp_inverse<const C: usize>(
        &self,
        src: &Image<f32, C>,
        dst: &mut Image<f32, C>,
    ) -> Result<(), HomographyError> {
        check_frame(src, self.dst_size)?;
        check_frame(dst, self.src_size)?;

        dst.as_slice_mut().fill(0.0);
        warp_perspective(src, dst, &self.inverse, InterpolationMode::Bilinear)
    }

    /// Map a single camera-view point into the top-down view.
    ///
    /// # Errors
    ///
    /// Returns [`HomographyError::DegenerateProjection`] when the point maps
    /// to infinity; the engine and other mappings stay valid.
    pub fn map_point(&self, p: [f32; 2]) -> Result<[f32; 2], HomographyError> {
        transform_point(&self.forward, p)
    }

    /// Map a single top-down point back into the camera view.
    pub fn map_point_inverse(&self, p: [f32; 2]) -> Result<[f32; 2], HomographyError> {
        transform_point(&self.inverse, p)
    }

    /// The configured camera frame size.
    pub fn src_size(&self) -> ImageSize {
        self.src_size
    }

    /// The configured top-down frame size.
    pub fn dst_size(&self) -> ImageSize {
        self.dst_size
    }

    /// The configured camera-view quadrilateral.
    pub fn src_points(&self) -> &[[f32; 2]; 4] {
        &self.src_points
    }

    /// The configured top-down quadrilateral.
    pub fn dst_points(&self) -> &[[f32; 2]; 4] {
        &self.dst_points
    }

    /// The camera -> top-down homography, row-major.
    pub fn forward_matrix(&self) -> &[f32; 9] {
        &self.forward
    }

    /// The top-down -> camera homography, row-major.
    pub fn inverse_matrix(&self) -> &[f32; 9] {
        &self.inverse
    }
}

fn check_frame<const C: usize>(
    image: &Image<f32, C>,
    expected: ImageSize,
) -> Result<(), HomographyError> {
    if image.size() != expected {
        return Err(HomographyError::Image(ImageError::InvalidImageSize(
            image.width(),
            image.height(),
            expected.width,
            expected.height,
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::fill_polygon;
    use approx::assert_relative_eq;

    const FRAME: ImageSize = ImageSize {
        width: 640,
        height: 480,
    };

    /// Road-scene configuration: frame bottom corners plus two points on the
    /// horizon side map to the full top-down frame.
    fn road_engine() -> Result<InversePerspectiveMap, HomographyError> {
        InversePerspectiveMap::new(
            FRAME,
            FRAME,
            [[0.0, 480.0], [640.0, 480.0], [350.0, 140.0], [270.0, 140.0]],
            [[0.0, 480.0], [640.0, 480.0], [640.0, 0.0], [0.0, 0.0]],
        )
    }

    #[test]
    fn road_corners_map_to_frame_corners() -> Result<(), HomographyError> {
        let ipm = road_engine()?;

        let p = ipm.map_point([0.0, 480.0])?;
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-1);
        assert_relative_eq!(p[1], 480.0, epsilon = 1e-1);

        let p = ipm.map_point([350.0, 140.0])?;
        assert_relative_eq!(p[0], 640.0, epsilon = 1e-1);
        assert_relative_eq!(p[1], 0.0, epsilon = 1e-1);

        Ok(())
    }

    #[test]
    fn point_round_trip() -> Result<(), HomographyError> {
        let ipm = road_engine()?;

        for p in [
            [320.0, 300.0],
            [100.0, 450.0],
            [500.0, 400.0],
            [300.0, 200.0],
        ] {
            let q = ipm.map_point(p)?;
            let back = ipm.map_point_inverse(q)?;
            assert_relative_eq!(back[0], p[0], epsilon = 1e-1);
            assert_relative_eq!(back[1], p[1], epsilon = 1e-1);
        }

        Ok(())
    }

    #[test]
    fn identity_configuration_reproduces_image() -> Result<(), HomographyError> {
        let size = ImageSize {
            width: 8,
            height: 6,
        };
        let points = [[0.0, 0.0], [8.0, 0.0], [8.0, 6.0], [0.0, 6.0]];
        let ipm = InversePerspectiveMap::new(size, size, points, points)?;

        let data: Vec<f32> = (0..size.width * size.height).map(|i| i as f32).collect();
        let image = Image::<f32, 1>::new(size, data)?;
        let mut warped = Image::<f32, 1>::from_size_val(size, 0.0)?;

        ipm.warp(&image, &mut warped)?;

        for (got, want) in warped.as_slice().iter().zip(image.as_slice().iter()) {
            assert_relative_eq!(*got, *want, epsilon = 1e-3);
        }

        Ok(())
    }

    #[test]
    fn collinear_points_fail_construction() {
        let res = InversePerspectiveMap::new(
            FRAME,
            FRAME,
            [[0.0, 0.0], [100.0, 100.0], [200.0, 200.0], [300.0, 300.0]],
            [[0.0, 480.0], [640.0, 480.0], [640.0, 0.0], [0.0, 0.0]],
        );
        assert!(matches!(res, Err(HomographyError::DegenerateConfiguration)));
    }

    #[test]
    fn zero_size_fails_construction() {
        let res = InversePerspectiveMap::new(
            ImageSize {
                width: 0,
                height: 480,
            },
            FRAME,
            [[0.0, 480.0], [640.0, 480.0], [350.0, 140.0], [270.0, 140.0]],
            [[0.0, 480.0], [640.0, 480.0], [640.0, 0.0], [0.0, 0.0]],
        );
        assert!(matches!(res, Err(HomographyError::InvalidFrameSize(0, 480))));
    }

    #[test]
    fn wrong_frame_size_is_rejected() -> Result<(), HomographyError> {
        let ipm = road_engine()?;

        let small = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 320,
                height: 240,
            },
            0.0,
        )?;
        let mut out = Image::<f32, 1>::from_size_val(FRAME, 0.0)?;

        let res = ipm.warp(&small, &mut out);
        assert!(matches!(
            res,
            Err(HomographyError::Image(ImageError::InvalidImageSize(
                320, 240, 640, 480
            )))
        ));

        Ok(())
    }

    #[test]
    fn warp_is_deterministic() -> Result<(), HomographyError> {
        let ipm = road_engine()?;

        let data: Vec<f32> = (0..FRAME.width * FRAME.height)
            .map(|i| (i % 251) as f32 / 251.0)
            .collect();
        let image = Image::<f32, 1>::new(FRAME, data)?;

        let mut first = Image::<f32, 1>::from_size_val(FRAME, 0.0)?;
        let mut second = Image::<f32, 1>::from_size_val(FRAME, 0.0)?;
        ipm.warp(&image, &mut first)?;
        ipm.warp(&image, &mut second)?;

        assert_eq!(first.as_slice(), second.as_slice());

        Ok(())
    }

    #[test]
    fn uniform_image_warps_to_uniform_or_background() -> Result<(), HomographyError> {
        let ipm = road_engine()?;

        // the top-down frame projects to a trapezoid in the camera view;
        // everything outside it must stay at the zero background
        let top_down = Image::<f32, 1>::from_size_val(FRAME, 0.7)?;
        let mut camera = Image::<f32, 1>::from_size_val(FRAME, 0.0)?;
        ipm.warp_inverse(&top_down, &mut camera)?;

        let mut seen_uniform = false;
        let mut seen_background = false;
        for &v in camera.as_slice() {
            if v == 0.0 {
                seen_background = true;
            } else {
                assert_relative_eq!(v, 0.7, epsilon = 1e-4);
                seen_uniform = true;
            }
        }
        assert!(seen_uniform);
        assert!(seen_background);

        // a point well inside the configured quadrilateral is filled
        assert_relative_eq!(
            camera.get([300, 310, 0]).copied().unwrap_or(f32::NAN),
            0.7,
            epsilon = 1e-4
        );
        // above the horizon line there is no top-down pixel
        assert_eq!(camera.get([2, 2, 0]), Some(&0.0));

        Ok(())
    }

    #[test]
    fn square_in_top_down_view_back_projects_as_trapezoid() -> Result<(), HomographyError> {
        let ipm = road_engine()?;

        let (w, h) = (FRAME.width as i64, FRAME.height as i64);
        let square = [
            (w / 3, 2 * h / 3),
            (2 * w / 3, 2 * h / 3),
            (2 * w / 3, h / 3),
            (w / 3, h / 3),
        ];

        let mut top_down = Image::<f32, 1>::from_size_val(FRAME, 0.0)?;
        fill_polygon(&mut top_down, &square, [1.0]);

        let mut camera = Image::<f32, 1>::from_size_val(FRAME, 0.0)?;
        ipm.warp_inverse(&top_down, &mut camera)?;

        // the square centroid maps into the middle of the trapezoid
        let centroid = ipm.map_point_inverse([319.5, 240.0])?;
        let (cx, cy) = (centroid[0].round() as usize, centroid[1].round() as usize);
        assert_relative_eq!(
            camera.get([cy, cx, 0]).copied().unwrap_or(f32::NAN),
            1.0,
            epsilon = 1e-3
        );

        // the mapped corners frame a region narrower at the top than at the
        // bottom, consistent with the inverse perspective
        let top = ipm.map_point_inverse([square[3].0 as f32, square[3].1 as f32])?;
        let bottom = ipm.map_point_inverse([square[0].0 as f32, square[0].1 as f32])?;
        let top_r = ipm.map_point_inverse([square[2].0 as f32, square[2].1 as f32])?;
        let bottom_r = ipm.map_point_inverse([square[1].0 as f32, square[1].1 as f32])?;
        assert!(top_r[0] - top[0] < bottom_r[0] - bottom[0]);
        assert!(top[1] < bottom[1]);

        // far corners of the camera frame stay at the background
        assert_eq!(camera.get([2, 2, 0]), Some(&0.0));
        assert_eq!(camera.get([2, 637, 0]), Some(&0.0));

        Ok(())
    }

    #[test]
    fn engine_is_shareable_across_threads() -> Result<(), HomographyError> {
        let ipm = road_engine()?;

        let results: Vec<[f32; 2]> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let ipm = &ipm;
                    s.spawn(move || ipm.map_point([100.0 + i as f32, 400.0]))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("thread panicked").expect("finite mapping"))
                .collect()
        });

        assert_eq!(results.len(), 4);

        Ok(())
    }
}
