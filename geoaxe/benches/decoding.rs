//! Benchmarks pour le décodage et l'assemblage

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geoaxe::crs::{geographic_to_web_mercator, Geographic};
use geoaxe::wkb::{encode_linestring_hex, encode_point_hex};
use geoaxe::{Assembler, AxisSegment, ByteOrder, Decoder, RawGeometry};

/// Points synthétiques répartis sur la zone d'exploitation
fn sample_rows(count: usize) -> Vec<RawGeometry> {
    (0..count)
        .map(|i| {
            let t = i as f64 / count as f64;
            let (x, y) = geographic_to_web_mercator(Geographic::from_degrees(
                -9.5 + 8.0 * t,
                27.5 + 9.0 * t,
            ));
            match i % 3 {
                0 => RawGeometry::from(format!("SRID=3857;POINT({} {})", x, y)),
                1 => RawGeometry::from(encode_point_hex(630868.0 + t * 1000.0, 3715370.6, ByteOrder::Little, 0)),
                _ => RawGeometry::from(encode_point_hex(315355.2, 3767286.3 + t * 1000.0, ByteOrder::Big, 0)),
            }
        })
        .collect()
}

fn bench_decode_points(c: &mut Criterion) {
    let decoder = Decoder::default();
    let mut group = c.benchmark_group("decode_points");

    for size in [100usize, 10_000] {
        let rows = sample_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| {
                let decoded = rows
                    .iter()
                    .filter_map(|raw| decoder.decode_point(black_box(raw)).ok())
                    .count();
                black_box(decoded)
            })
        });
    }

    group.finish();
}

fn bench_decode_parallel(c: &mut Criterion) {
    use rayon::prelude::*;

    let decoder = Decoder::default();
    let rows = sample_rows(100_000);

    let mut group = c.benchmark_group("decode_parallel");
    group.throughput(Throughput::Elements(rows.len() as u64));
    group.sample_size(10);

    group.bench_function("points_parallel", |b| {
        b.iter(|| {
            let decoded = rows
                .par_iter()
                .filter_map(|raw| decoder.decode_point(black_box(raw)).ok())
                .count();
            black_box(decoded)
        })
    });

    group.finish();
}

fn bench_assemble_axis(c: &mut Criterion) {
    // 200 segments de 50 sommets, dans le désordre
    let segments: Vec<AxisSegment> = (0..200)
        .rev()
        .map(|s| {
            let coords: Vec<(f64, f64)> = (0..50)
                .map(|v| (600000.0 + (s * 49 + v) as f64 * 10.0, 3715000.0 + (s * 49 + v) as f64 * 5.0))
                .collect();
            AxisSegment::new(
                "LGV",
                Some(s as f64),
                encode_linestring_hex(&coords, ByteOrder::Little, 0),
            )
        })
        .collect();

    let assembler = Assembler::new(Decoder::default());

    let mut group = c.benchmark_group("assemble_axis");
    group.throughput(Throughput::Elements(segments.len() as u64));
    group.bench_function("200_segments", |b| {
        b.iter(|| {
            let line = assembler.assemble(black_box(segments.clone())).ok();
            black_box(line.map(|l| l.len()))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_decode_points,
    bench_decode_parallel,
    bench_assemble_axis
);
criterion_main!(benches);
