//! Benchmarks for the dynamics engine

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tmd_dynamics::prelude::*;

fn create_tall_model(stories: usize) -> StructuralModel {
    let weights = vec![1000.0; stories];
    let stiffness = (0..stories).map(|i| 1500.0 - 50.0 * i as f64).collect();
    let mut model = StructuralModel::new("Tall", weights, stiffness);
    for floor in 1..=stories {
        model = model.with_tmd(TmdSetting::new(floor, 10.0, 1.5));
    }
    model
}

fn create_record(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64 * 0.01;
            200.0 * (2.0 * std::f64::consts::PI * 1.3 * t).sin() * (-0.1 * t).exp()
        })
        .collect()
}

fn benchmark_modal(c: &mut Criterion) {
    let model = create_tall_model(9);
    c.bench_function("modal_9story", |b| {
        b.iter(|| {
            let result = analyze_modal(black_box(&model)).unwrap();
            black_box(result);
        })
    });
}

fn benchmark_response_default(c: &mut Criterion) {
    let model = StructuralModel::default();
    let excitation = Excitation::base(create_record(6000));
    c.bench_function("response_3story_tmd_6000steps", |b| {
        b.iter(|| {
            let result = analyze_response("bench", &model, &excitation, DampingSelection::Auto).unwrap();
            black_box(result);
        })
    });
}

fn benchmark_response_tall(c: &mut Criterion) {
    let model = create_tall_model(9);
    let excitation = Excitation::base(create_record(6000));
    c.bench_function("response_9story_9tmd_6000steps", |b| {
        b.iter(|| {
            let result = analyze_response("bench", &model, &excitation, DampingSelection::Explicit(0.02)).unwrap();
            black_box(result);
        })
    });
}

fn benchmark_wave(c: &mut Criterion) {
    let record = create_record(4000);
    let options = WaveOptions::default();
    c.bench_function("wave_analysis_4000samples", |b| {
        b.iter(|| {
            let result = analyze_wave(black_box(&record), &options).unwrap();
            black_box(result);
        })
    });
}

criterion_group!(
    benches,
    benchmark_modal,
    benchmark_response_default,
    benchmark_response_tall,
    benchmark_wave,
);

criterion_main!(benches);
