use criterion::{black_box, Criterion};
use npatch::{subdivide, Mesh, SubdivisionOptions};

use crate::common::samples::{CURVES, PATCHES};

pub fn bisect(c: &mut Criterion) {
    c.bench_function("bisect", |b| {
        for curve in CURVES.iter() {
            b.iter(|| black_box(curve.bisect()))
        }
    });
}

pub fn quarter(c: &mut Criterion) {
    c.bench_function("quarter", |b| {
        for (patch, _) in PATCHES.iter() {
            b.iter(|| black_box(patch.quarter()))
        }
    });
}

pub fn subdivide_depth(c: &mut Criterion, depth: u32) {
    let options = SubdivisionOptions {
        depth,
        ..SubdivisionOptions::default()
    };
    c.bench_function(&format!("subdivide depth {}", depth), |b| {
        b.iter(|| {
            let mut mesh = Mesh::new();
            for (patch, texture) in PATCHES.iter() {
                subdivide(patch, texture, options, &mut mesh);
            }
            black_box(mesh)
        })
    });
}

pub fn all(c: &mut Criterion) {
    bisect(c);
    quarter(c);
    subdivide_depth(c, 3);
    subdivide_depth(c, 5);
}
