//! # Decode Benchmarks
//!
//! Measures tokenizing, straight-line decoding and label resolution.
//!
//! Run: `cargo bench --bench decode_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use emdis_core::{disassemble, BranchPolicy, DecodeConfig, MemoryListing, Program};

fn config() -> DecodeConfig {
    DecodeConfig {
        branch_policy: BranchPolicy::Enter,
        max_steps: usize::MAX,
        initial_stack: Vec::new(),
    }
}

/// Straight-line program of `n` instruction groups
fn straight_line(n: usize) -> String {
    "🚛 🥇 4 2 ✋ 📥 🥇 🤡 🍡 🔪 ".repeat(n)
}

/// Chain of forward jumps; each lookup scans from the start
fn jump_chain(n: usize) -> String {
    let mut source = String::new();
    for i in 0..n {
        source.push_str(&format!("🏀 💰l{} 🖋l{} 📤 ", i, i));
    }
    source
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for n in [10, 100, 1000] {
        let source = straight_line(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &source, |b, source| {
            b.iter(|| black_box(Program::parse(source)))
        });
    }

    group.finish();
}

fn bench_straight_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("straight_line");
    let config = config();

    for n in [10, 100, 1000] {
        let program = Program::parse(&straight_line(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &program, |b, program| {
            b.iter(|| {
                let mut listing = MemoryListing::new();
                black_box(disassemble(program, &mut listing, &config).unwrap())
            })
        });
    }

    group.finish();
}

fn bench_label_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_resolution");
    let config = config();

    for n in [10, 100, 500] {
        let program = Program::parse(&jump_chain(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &program, |b, program| {
            b.iter(|| {
                let mut listing = MemoryListing::new();
                black_box(disassemble(program, &mut listing, &config).unwrap())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_straight_line, bench_label_resolution);
criterion_main!(benches);
