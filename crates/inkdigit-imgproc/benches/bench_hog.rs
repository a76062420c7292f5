use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use inkdigit_image::{Image, ImageSize};
use inkdigit_imgproc::features::{hog, hog_multiscale, HogParams};

fn bench_hog(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hog");

    let size = ImageSize {
        width: 28,
        height: 28,
    };
    let mut rng = rand::rng();
    let data = (0..size.area()).map(|_| rng.random_range(0..=255u8)).collect();
    let image = Image::<u8, 1>::new(size, data).unwrap();
    let image_f64 = image.cast::<f64>().unwrap();

    for ppc in [4, 7, 14] {
        let params = HogParams {
            orientations: 9,
            pixels_per_cell: ppc,
        };
        group.bench_with_input(BenchmarkId::new("single_scale", ppc), &params, |b, p| {
            b.iter(|| hog(black_box(&image_f64), black_box(p)))
        });
    }

    group.bench_function("multiscale_4_7_14", |b| {
        b.iter(|| hog_multiscale(black_box(&image), black_box(9), black_box(&[4, 7, 14])))
    });

    group.finish();
}

criterion_group!(benches, bench_hog);
criterion_main!(benches);
