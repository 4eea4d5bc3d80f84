//! Benchmarks for Qforge circuit operations
//!
//! Run with: cargo bench -p qforge-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qforge_ir::{Attach, Circuit};
use std::f64::consts::PI;

/// Benchmark adding gates to a circuit
fn bench_gate_addition(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_addition");

    group.bench_function("h_gate", |b| {
        let mut circuit = Circuit::new("bench");
        let q = circuit.add_qreg("q", 10).unwrap();
        let q0 = q.bit(0).unwrap();
        b.iter(|| {
            circuit.h(black_box(&q0)).unwrap();
        });
    });

    group.bench_function("rx_gate", |b| {
        let mut circuit = Circuit::new("bench");
        let q = circuit.add_qreg("q", 10).unwrap();
        let q0 = q.bit(0).unwrap();
        b.iter(|| {
            circuit.rx(black_box(PI / 4.0), black_box(&q0)).unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut circuit = Circuit::new("bench");
        let q = circuit.add_qreg("q", 10).unwrap();
        let (q0, q1) = (q.bit(0).unwrap(), q.bit(1).unwrap());
        b.iter(|| {
            circuit.cx(black_box(&q0), black_box(&q1)).unwrap();
        });
    });

    group.finish();
}

/// Benchmark register-wide broadcast
fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");

    for size in &[4u32, 16, 64] {
        group.bench_with_input(BenchmarkId::new("h_reg", size), size, |b, &n| {
            b.iter(|| {
                let mut circuit = Circuit::new("bench");
                let q = circuit.add_qreg("q", n).unwrap();
                circuit.h_reg(&q).unwrap();
                circuit
            });
        });
    }

    group.finish();
}

/// Benchmark library circuits
fn bench_library_circuits(c: &mut Criterion) {
    let mut group = c.benchmark_group("library");

    for num_qubits in &[3u32, 10, 20] {
        group.bench_with_input(BenchmarkId::new("ghz", num_qubits), num_qubits, |b, &n| {
            b.iter(|| Circuit::ghz(black_box(n)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("qft", num_qubits), num_qubits, |b, &n| {
            b.iter(|| Circuit::qft(black_box(n)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark whole-circuit inversion and rendering
fn bench_inverse_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("inverse_render");

    for num_qubits in &[5u32, 10, 20] {
        let circuit = Circuit::qft(*num_qubits).unwrap();
        group.bench_with_input(
            BenchmarkId::new("inverse", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| {
                    let mut copy = circuit.clone();
                    copy.inverse();
                    copy
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("render", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit).to_string());
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_gate_addition,
    bench_broadcast,
    bench_library_circuits,
    bench_inverse_and_render,
);
criterion_main!(benches);
