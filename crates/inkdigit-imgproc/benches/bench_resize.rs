use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use inkdigit_image::{Image, ImageSize};

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resize");

    for (width, height) in [(28, 28), (64, 48), (256, 224), (512, 448)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        // input image
        let mut rng = rand::rng();
        let data = (0..width * height).map(|_| rng.random_range(0..=255u8)).collect();
        let image = Image::<u8, 1>::new([*width, *height].into(), data).unwrap();

        // output image
        let new_size = ImageSize {
            width: 28,
            height: 28,
        };
        let out_u8 = Image::<u8, 1>::from_size_val(new_size, 0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("antialiased", &parameter_string),
            &(&image, &out_u8),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| {
                    inkdigit_imgproc::resize::resize_u8_antialiased(
                        black_box(src),
                        black_box(&mut dst),
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_resize);
criterion_main!(benches);
