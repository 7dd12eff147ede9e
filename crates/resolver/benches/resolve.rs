// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for single-model and pipeline resolution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use model_locator::ModelFormat;
use resolver::{resolve, DiffusionPrefixes, PipelineProfile};
use tensor_spec::{Precision, ShapeHint, ShapeRange};

fn bench_resolve_generic(c: &mut Criterion) {
    c.bench_function("resolve_generic", |b| {
        b.iter(|| {
            resolve(
                black_box("onnx_runtime"),
                "models",
                "text_encoder",
                ModelFormat::Interchange,
                0,
                Precision::Fp32,
                None,
            )
        })
    });
}

fn bench_resolve_tensor_compiled(c: &mut Criterion) {
    let hint = ShapeHint::new()
        .with("latent_input", ShapeRange::parse("1,4,64,64:2,4,64,64").unwrap())
        .with("timestep", ShapeRange::parse("1").unwrap());
    c.bench_function("resolve_tensor_compiled", |b| {
        b.iter(|| {
            resolve(
                black_box("tensorrt"),
                "models",
                "unet",
                ModelFormat::Native,
                0,
                Precision::Fp16,
                Some(hint.clone()),
            )
        })
    });
}

fn bench_resolve_pipeline(c: &mut Criterion) {
    let profile = PipelineProfile::stable_diffusion(
        "tensorrt",
        "models",
        ModelFormat::Native,
        0,
        Precision::Fp16,
        &DiffusionPrefixes::default(),
    );
    c.bench_function("resolve_pipeline", |b| b.iter(|| black_box(&profile).resolve()));
}

criterion_group!(
    benches,
    bench_resolve_generic,
    bench_resolve_tensor_compiled,
    bench_resolve_pipeline
);
criterion_main!(benches);
