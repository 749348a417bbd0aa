use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use kernelfx_image::PixelBuffer;
use kernelfx_imgproc::{
    effects::{cartoon, CartoonParams},
    filter::{gaussian_blur, median_blur, sobel_magnitude},
    parallel::ExecutionStrategy,
    FilterOptions,
};

fn test_image(width: usize, height: usize) -> PixelBuffer {
    let data = (0..width * height * 3).map(|i| (i * 31 % 251) as u8).collect();
    PixelBuffer::new([width, height].into(), width * 3, data).unwrap()
}

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filters");

    let strategies = [
        ("serial", ExecutionStrategy::Serial),
        ("parallel_rows", ExecutionStrategy::ParallelRows),
    ];

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        let src = test_image(*width, *height);

        for kernel_size in [3, 5, 7].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * *kernel_size) as u64,
            ));

            for (name, strategy) in strategies.iter() {
                let parameter_string = format!("{width}x{height}x{kernel_size}_{name}");
                let options = FilterOptions::new().with_strategy(*strategy);

                group.bench_with_input(
                    BenchmarkId::new("gaussian_blur", &parameter_string),
                    &src,
                    |b, src| b.iter(|| black_box(gaussian_blur(src, *kernel_size, &options))),
                );

                group.bench_with_input(
                    BenchmarkId::new("median_blur", &parameter_string),
                    &src,
                    |b, src| b.iter(|| black_box(median_blur(src, *kernel_size, &options))),
                );

                group.bench_with_input(
                    BenchmarkId::new("sobel_magnitude", &parameter_string),
                    &src,
                    |b, src| b.iter(|| black_box(sobel_magnitude(src, *kernel_size, &options))),
                );
            }
        }

        group.bench_with_input(
            BenchmarkId::new("cartoon", format!("{width}x{height}")),
            &src,
            |b, src| {
                b.iter(|| {
                    black_box(cartoon(
                        src,
                        CartoonParams::default(),
                        &FilterOptions::default(),
                    ))
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
