//! Benchmarks for mesh-io parsing and writing.
//!
//! Run with: cargo bench -p mesh-io
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-io -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-io -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_io::{parse_obj, parse_stl, write_obj, write_stl};
use mesh_types::IndexedMesh;

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Triangulated wavy sheet with `2 * n * n` faces.
fn create_sheet(n: u32) -> IndexedMesh {
    let mut positions = Vec::new();
    for y in 0..=n {
        for x in 0..=n {
            let (fx, fy) = (f64::from(x) * 0.1, f64::from(y) * 0.1);
            positions.push([fx, fy, (fx * 3.0).sin() * (fy * 2.0).cos()]);
        }
    }
    let mut faces = Vec::new();
    for y in 0..n {
        for x in 0..n {
            let a = y * (n + 1) + x;
            let (b, c, d) = (a + 1, a + n + 2, a + n + 1);
            faces.push([a, b, c]);
            faces.push([a, c, d]);
        }
    }
    IndexedMesh::from_arrays(&positions, &faces)
}

// =============================================================================
// I/O Benchmarks
// =============================================================================

fn bench_io(c: &mut Criterion) {
    let mut group = c.benchmark_group("IO");

    for n in [32_u32, 128] {
        let sheet = create_sheet(n);
        group.throughput(Throughput::Elements(sheet.faces.len() as u64));

        let mut stl_binary = Vec::new();
        write_stl(&sheet, &mut stl_binary, true).expect("write binary STL");
        let mut stl_ascii = Vec::new();
        write_stl(&sheet, &mut stl_ascii, false).expect("write ASCII STL");
        let mut obj = Vec::new();
        write_obj(&sheet, &mut obj).expect("write OBJ");
        let obj = String::from_utf8(obj).expect("OBJ is UTF-8");

        group.bench_with_input(BenchmarkId::new("parse_stl_binary", n), &stl_binary, |b, bytes| {
            b.iter(|| parse_stl(black_box(bytes)));
        });
        group.bench_with_input(BenchmarkId::new("parse_stl_ascii", n), &stl_ascii, |b, bytes| {
            b.iter(|| parse_stl(black_box(bytes)));
        });
        group.bench_with_input(BenchmarkId::new("parse_obj", n), &obj, |b, text| {
            b.iter(|| parse_obj(black_box(text)));
        });

        group.bench_with_input(BenchmarkId::new("write_stl_binary", n), &sheet, |b, mesh| {
            b.iter(|| {
                let mut out = Vec::with_capacity(stl_binary.len());
                write_stl(black_box(mesh), &mut out, true)
            });
        });
        group.bench_with_input(BenchmarkId::new("write_obj", n), &sheet, |b, mesh| {
            b.iter(|| {
                let mut out = Vec::with_capacity(obj.len());
                write_obj(black_box(mesh), &mut out)
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_io);
criterion_main!(benches);
