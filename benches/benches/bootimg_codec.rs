//! Benchmark suite for the boot-logo codec's hot paths: deflate round-trips,
//! pixel format conversion, and dimension inference.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use bootimg_benches::{gradient_rgba, sizes};
use bootimg_types::pixel::ColorMode;
use bootimg_types::{compress, dimension, pixel};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_zlib_round_trip(c: &mut Criterion) {
	let mut group = c.benchmark_group("zlib_round_trip");

	for (name, (w, h)) in [("hd", sizes::HD), ("fhd", sizes::FHD), ("qhd", sizes::QHD)] {
		let raw = gradient_rgba(w, h);
		group.throughput(Throughput::Bytes(raw.len() as u64));

		let compressed = compress::zlib_deflate(&raw, 9).unwrap();
		group.bench_with_input(BenchmarkId::new("deflate_level9", name), &raw, |b, raw| {
			b.iter(|| black_box(compress::zlib_deflate(black_box(raw), 9).unwrap()));
		});
		group.bench_with_input(BenchmarkId::new("inflate", name), &compressed, |b, compressed| {
			b.iter(|| black_box(compress::zlib_inflate(black_box(compressed)).unwrap()));
		});
	}

	group.finish();
}

fn bench_gzip_round_trip(c: &mut Criterion) {
	let mut group = c.benchmark_group("gzip_round_trip");

	let raw = gradient_rgba(sizes::HD.0, sizes::HD.1);
	group.throughput(Throughput::Bytes(raw.len() as u64));

	let framed = compress::gzip_compress(&raw, 9).unwrap();
	group.bench_function("gzip_compress", |b| {
		b.iter(|| black_box(compress::gzip_compress(black_box(&raw), 9).unwrap()));
	});
	group.bench_function("gzip_decompress", |b| {
		b.iter(|| black_box(compress::gzip_decompress(black_box(&framed)).unwrap()));
	});

	group.finish();
}

fn bench_pixel_conversion(c: &mut Criterion) {
	let mut group = c.benchmark_group("pixel_conversion");

	let rgba = gradient_rgba(sizes::FHD.0, sizes::FHD.1);
	group.throughput(Throughput::Bytes(rgba.len() as u64));

	for mode in [ColorMode::BgraLe, ColorMode::RgbaBe, ColorMode::Rgb565Le] {
		let native = pixel::from_rgba(&rgba, mode).unwrap();
		group.bench_with_input(BenchmarkId::new("from_rgba", mode.short_name()), &rgba, |b, rgba| {
			b.iter(|| black_box(pixel::from_rgba(black_box(rgba), mode).unwrap()));
		});
		group.bench_with_input(BenchmarkId::new("to_rgba", mode.short_name()), &native, |b, native| {
			b.iter(|| black_box(pixel::to_rgba(black_box(native), mode).unwrap()));
		});
	}

	group.finish();
}

fn bench_dimension_inference(c: &mut Criterion) {
	let mut group = c.benchmark_group("dimension_inference");

	// A curated-list hit (cheap: a handful of equality checks).
	let curated_bytes = sizes::HD.0 as usize * sizes::HD.1 as usize * 4;
	group.bench_function("curated_hit", |b| {
		b.iter(|| black_box(dimension::infer_dimensions(black_box(curated_bytes), 4)));
	});

	// A miss that falls through to full factor-pair enumeration.
	let uncurated_bytes = 997 * 991 * 4;
	group.bench_function("factor_enumeration_fallback", |b| {
		b.iter(|| black_box(dimension::infer_dimensions(black_box(uncurated_bytes), 4)));
	});

	group.finish();
}

criterion_group!(
	benches,
	bench_zlib_round_trip,
	bench_gzip_round_trip,
	bench_pixel_conversion,
	bench_dimension_inference
);
criterion_main!(benches);
