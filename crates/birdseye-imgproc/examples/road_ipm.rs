use std::path::{Path, PathBuf};
use std::time::Instant;

use argh::FromArgs;

use birdseye_image::{Image, ImageSize};
use birdseye_imgproc::{
    draw::{draw_filled_circle, draw_line, fill_polygon},
    ipm::InversePerspectiveMap,
};

const ASPHALT: [f32; 3] = [0.25, 0.25, 0.27];
const SKY: [f32; 3] = [0.55, 0.65, 0.8];
const LANE: [f32; 3] = [0.9, 0.9, 0.85];
const MARKER: [f32; 3] = [1.0, 0.2, 0.2];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

#[derive(FromArgs)]
/// Warp a synthetic road scene into a bird's-eye view and back.
struct Args {
    /// directory to write the output images to
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,

    /// frame width in pixels
    #[argh(option, default = "640")]
    width: usize,

    /// frame height in pixels
    #[argh(option, default = "480")]
    height: usize,
}

/// Paint a road scene seen from a dashboard camera: sky above the horizon,
/// asphalt below, lane lines converging towards the vanishing area.
fn synth_road(size: ImageSize, horizon: f32) -> Result<Image<f32, 3>, Box<dyn std::error::Error>> {
    let (w, h) = (size.width as i64, size.height as i64);
    let mut frame = Image::from_size_val(size, 0.0)?;

    fill_polygon(&mut frame, &[(0, 0), (w - 1, 0), (w - 1, h - 1), (0, h - 1)], SKY);
    let hy = horizon as i64;
    fill_polygon(&mut frame, &[(0, hy), (w - 1, hy), (w - 1, h - 1), (0, h - 1)], ASPHALT);

    let vx = w / 2;
    draw_line(&mut frame, (w / 8, h - 1), (vx - 20, hy), LANE, 3);
    draw_line(&mut frame, (w - w / 8, h - 1), (vx + 20, hy), LANE, 3);
    draw_line(&mut frame, (w / 2, h - 1), (vx, hy), LANE, 2);

    Ok(frame)
}

fn save_rgb(img: &Image<f32, 3>, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data: Vec<u8> = img
        .as_slice()
        .iter()
        .map(|&v| (v * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();
    let buf = image::RgbImage::from_raw(img.width() as u32, img.height() as u32, data)
        .ok_or("failed to build the output image buffer")?;
    buf.save(path)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let size = ImageSize {
        width: args.width,
        height: args.height,
    };
    let (w, h) = (args.width as f32, args.height as f32);
    let horizon = 140.0 * h / 480.0;

    // frame bottom corners plus two points around the vanishing area map to
    // the full top-down frame
    let src_points = [
        [0.0, h],
        [w, h],
        [w / 2.0 + 30.0, horizon],
        [w / 2.0 - 50.0, horizon],
    ];
    let dst_points = [[0.0, h], [w, h], [w, 0.0], [0.0, 0.0]];

    let ipm = InversePerspectiveMap::new(size, size, src_points, dst_points)?;

    let mut frame = synth_road(size, horizon)?;

    let mut top_down = Image::from_size_val(size, 0.0)?;
    let start = Instant::now();
    ipm.warp(&frame, &mut top_down)?;
    log::info!(
        "warped {}x{} frame in {:.2} ms",
        size.width,
        size.height,
        start.elapsed().as_secs_f64() * 1e3
    );

    // draw a square on the bird's-eye view and project its image back
    let (wi, hi) = (size.width as i64, size.height as i64);
    let square = [
        (wi / 3, 2 * hi / 3),
        (2 * wi / 3, 2 * hi / 3),
        (2 * wi / 3, hi / 3),
        (wi / 3, hi / 3),
    ];
    fill_polygon(&mut top_down, &square, WHITE);

    let mut back_projection = Image::from_size_val(size, 0.0)?;
    ipm.warp_inverse(&top_down, &mut back_projection)?;

    // project the square corners back individually and fill the resulting
    // trapezoid on the camera frame
    let mut trapezoid = Vec::with_capacity(square.len());
    for (x, y) in square {
        let p = ipm.map_point_inverse([x as f32, y as f32])?;
        trapezoid.push((p[0].round() as i64, p[1].round() as i64));
    }
    fill_polygon(&mut frame, &trapezoid, WHITE);

    // mark the configured quadrilateral on the camera frame
    for p in src_points {
        draw_filled_circle(&mut frame, (p[0] as i64, p[1] as i64), 4, MARKER);
    }

    save_rgb(&frame, &args.output_dir.join("input.png"))?;
    save_rgb(&top_down, &args.output_dir.join("top_down.png"))?;
    save_rgb(&back_projection, &args.output_dir.join("back_projection.png"))?;

    Ok(())
}
