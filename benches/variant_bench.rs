use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use portfolio_images::processing::{
    decode_image, derive_variants, encode_webp, fit_within, resize_to_bound,
};
use portfolio_images::{
    Collection, ImagePipeline, MemoryStore, NoProgress, PipelineOptions, SourceImage, VariantKind,
};
use std::io::Cursor;
use std::sync::Arc;

fn create_test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    }))
}

fn encode_jpeg(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

fn bench_fit_within(c: &mut Criterion) {
    c.bench_function("fit_within", |b| {
        b.iter(|| fit_within(black_box(4000), black_box(3000), black_box(1920)))
    });
}

fn bench_image_decoding(c: &mut Criterion) {
    let data = encode_jpeg(&create_test_image(1920, 1080));

    c.bench_function("image_decoding", |b| {
        b.iter(|| decode_image(black_box(&data)))
    });
}

fn bench_resize_to_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize_to_bound");

    for size in [Small, Medium, Large].iter() {
        let (width, height) = match size {
            Small => (800, 600),
            Medium => (1920, 1080),
            Large => (3840, 2160),
        };
        let img = create_test_image(width, height);

        group.bench_with_input(
            BenchmarkId::new("thumbnail", format!("{}x{}", width, height)),
            &img,
            |b, img| b.iter(|| resize_to_bound(black_box(img), black_box(400))),
        );
    }

    group.finish();
}

fn bench_webp_encoding(c: &mut Criterion) {
    let img = create_test_image(1920, 1080);

    c.bench_function("webp_encoding", |b| {
        b.iter(|| encode_webp(black_box(&img), VariantKind::Display, black_box(80)))
    });
}

fn bench_derive_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_variants");
    group.sample_size(10);
    let options = PipelineOptions::default();

    for size in [Small, Medium, Large].iter() {
        let (width, height) = match size {
            Small => (800, 600),
            Medium => (1920, 1080),
            Large => (3840, 2160),
        };
        let data = encode_jpeg(&create_test_image(width, height));

        group.bench_with_input(
            BenchmarkId::new("jpeg", format!("{}x{}", width, height)),
            &data,
            |b, data| b.iter(|| derive_variants(black_box(data), black_box(&options))),
        );
    }

    group.finish();
}

fn bench_upload_single_image(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let source = SourceImage::new(
        "bench.jpg",
        "image/jpeg",
        encode_jpeg(&create_test_image(1920, 1080)),
    );

    let mut group = c.benchmark_group("upload_single_image");
    group.sample_size(10);
    group.bench_function("memory_store", |b| {
        b.to_async(&runtime).iter(|| async {
            // A fresh store per iteration keeps memory flat
            let pipeline = ImagePipeline::new(
                Arc::new(MemoryStore::default()),
                PipelineOptions::default(),
            );
            pipeline
                .upload_single_image(black_box(&source), Collection::Artworks, &NoProgress)
                .await
        })
    });
    group.finish();
}

enum ImageSize {
    Small,
    Medium,
    Large,
}

use ImageSize::*;

criterion_group!(
    benches,
    bench_fit_within,
    bench_image_decoding,
    bench_resize_to_bound,
    bench_webp_encoding,
    bench_derive_variants,
    bench_upload_single_image
);
criterion_main!(benches);
