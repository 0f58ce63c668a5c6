//! Criterion microbenches for synthlabel placement and compositing.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - IoU between placed boxes
//! - Position search on a crowded canvas (try_place)
//! - Masked paste of a crop (paste_object)

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use synthlabel::composite::paste_object;
use synthlabel::config::ImageSize;
use synthlabel::geom::PlacedBox;
use synthlabel::placement::PlacementEngine;
use synthlabel::GeneratorSettings;

/// A 4x4 grid of 100px boxes covering a 512x512 canvas.
fn crowded_boxes() -> Vec<PlacedBox> {
    (0..16)
        .map(|i| PlacedBox::new((i % 4) * 128, (i / 4) * 128, 100, 100))
        .collect()
}

/// Benchmark IoU against every box of a crowded canvas.
fn bench_iou(c: &mut Criterion) {
    let boxes = crowded_boxes();
    let probe = PlacedBox::new(90, 90, 120, 80);

    let mut group = c.benchmark_group("iou");
    group.throughput(Throughput::Elements(boxes.len() as u64));

    group.bench_function("iou_against_16", |b| {
        b.iter(|| {
            let total: f64 = boxes.iter().map(|other| black_box(&probe).iou(other)).sum();
            black_box(total)
        })
    });

    group.finish();
}

/// Benchmark the position search when most candidates are rejected.
fn bench_try_place(c: &mut Criterion) {
    let engine = PlacementEngine::new(&GeneratorSettings {
        image_size: ImageSize::new(512, 512),
        max_overlap: 0.05,
        ..Default::default()
    })
    .expect("valid settings");
    let boxes = crowded_boxes();

    let mut group = c.benchmark_group("placement");

    group.bench_function("try_place_crowded", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| {
            let outcome = engine.try_place(black_box(&boxes), 150, 150, &mut rng);
            black_box(outcome)
        })
    });

    group.finish();
}

/// Benchmark pasting a 200x200 crop with a masked border.
fn bench_paste(c: &mut Criterion) {
    let crop = RgbImage::from_fn(200, 200, |x, y| {
        if x < 20 || y < 20 || x >= 180 || y >= 180 {
            Rgb([0, 0, 0])
        } else {
            Rgb([200, 120, 40])
        }
    });

    let mut group = c.benchmark_group("composite");
    group.throughput(Throughput::Elements(u64::from(crop.width() * crop.height())));

    group.bench_function("paste_object", |b| {
        let mut canvas = RgbImage::new(512, 512);
        b.iter(|| {
            paste_object(&mut canvas, black_box(&crop), 100, 150).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_iou, bench_try_place, bench_paste);
criterion_main!(benches);
