//! Benchmarks for the change detector hot path

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use telemetry_bridge::poller::ChangeDetector;
use telemetry_bridge::source::{SignalSpec, SignalType, SignalValue};

fn specs(count: usize) -> Vec<SignalSpec> {
    (0..count)
        .map(|i| {
            SignalSpec::new(format!("Torque{i}"), format!("D{}", 100 + i), SignalType::Float)
                .with_deadband(0.01)
        })
        .collect()
}

fn bench_unchanged_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("observe_unchanged");
    for count in [4usize, 64, 256] {
        let mut detector = ChangeDetector::new(specs(count)).unwrap();
        let names: Vec<String> = (0..count).map(|i| format!("Torque{i}")).collect();
        for name in &names {
            detector.observe(name, SignalValue::Float(10.0), Utc::now());
        }

        group.bench_with_input(BenchmarkId::from_parameter(count), &names, |b, names| {
            b.iter(|| {
                let now = Utc::now();
                for name in names {
                    black_box(detector.observe(name, SignalValue::Float(10.0), now));
                }
            });
        });
    }
    group.finish();
}

fn bench_changing_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("observe_changed");
    for count in [4usize, 64, 256] {
        let mut detector = ChangeDetector::new(specs(count)).unwrap();
        let names: Vec<String> = (0..count).map(|i| format!("Torque{i}")).collect();
        let mut value = 0.0;

        // every observation builds a full snapshot
        group.bench_with_input(BenchmarkId::from_parameter(count), &names, |b, names| {
            b.iter(|| {
                value += 1.0;
                let now = Utc::now();
                for name in names {
                    black_box(detector.observe(name, SignalValue::Float(value), now));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_unchanged_tick, bench_changing_tick);
criterion_main!(benches);
