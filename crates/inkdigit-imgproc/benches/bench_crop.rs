use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use inkdigit_image::{Image, ImageSize};

// white canvas with a dark blob in the middle and sparse noise
fn digit_like(size: ImageSize) -> Image<u8, 1> {
    let mut rng = rand::rng();
    let data = (0..size.area())
        .map(|i| {
            let (r, c) = (i / size.width, i % size.width);
            let inside = (size.height / 3..2 * size.height / 3).contains(&r)
                && (size.width / 3..2 * size.width / 3).contains(&c);
            match (inside, rng.random_range(0..100)) {
                (true, _) => rng.random_range(0..60u8),
                (false, 0) => rng.random_range(100..255u8),
                _ => 255,
            }
        })
        .collect();
    Image::new(size, data).unwrap()
}

fn bench_crop(c: &mut Criterion) {
    let mut group = c.benchmark_group("Crop");

    for (width, height) in [(100, 100), (256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image = digit_like([*width, *height].into());

        group.bench_with_input(
            BenchmarkId::new("ink_bounds", &parameter_string),
            &image,
            |b, i| b.iter(|| inkdigit_imgproc::crop::ink_bounds(black_box(i), black_box(0.02))),
        );

        group.bench_with_input(
            BenchmarkId::new("auto_crop", &parameter_string),
            &image,
            |b, i| {
                b.iter(|| {
                    inkdigit_imgproc::crop::auto_crop(black_box(i), black_box(0.02), black_box(1.4))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_crop);
criterion_main!(benches);
