use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use birdseye_image::Image;
use birdseye_imgproc::{
    homography::get_perspective_transform, interpolation::InterpolationMode,
    warp::warp_perspective,
};

fn bench_warp_perspective(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpPerspective");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        // input image
        let image_size = [*width, *height].into();
        let image = Image::<f32, 3>::from_size_val(image_size, 0.5f32).unwrap();

        // output image
        let output = Image::<f32, 3>::from_size_val(image_size, 0.0).unwrap();
        let m = get_perspective_transform(
            &[
                [0.0, *height as f32],
                [*width as f32, *height as f32],
                [0.6 * *width as f32, 0.3 * *height as f32],
                [0.4 * *width as f32, 0.3 * *height as f32],
            ],
            &[
                [0.0, *height as f32],
                [*width as f32, *height as f32],
                [*width as f32, 0.0],
                [0.0, 0.0],
            ],
        )
        .unwrap();

        group.bench_with_input(
            BenchmarkId::new("par_rows", &parameter_string),
            &(&image, &output, m),
            |b, i| {
                let (src, mut dst, m) = (i.0.clone(), i.1.clone(), i.2);
                b.iter(|| {
                    warp_perspective(
                        black_box(&src),
                        black_box(&mut dst),
                        black_box(&m),
                        black_box(InterpolationMode::Bilinear),
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_solve_homography(c: &mut Criterion) {
    let src = [[0.0, 480.0], [640.0, 480.0], [350.0, 140.0], [270.0, 140.0]];
    let dst = [[0.0, 480.0], [640.0, 480.0], [640.0, 0.0], [0.0, 0.0]];

    c.bench_function("get_perspective_transform", |b| {
        b.iter(|| get_perspective_transform(black_box(&src), black_box(&dst)))
    });
}

criterion_group!(benches, bench_warp_perspective, bench_solve_homography);
criterion_main!(benches);
