//! Benchmarks for group tracking
//!
//! Measures performance of:
//! - Report reconciliation (new group, unchanged set, changed set)
//! - Liveness sweeps over a full store

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use motenet_groups::{GroupEngine, GroupsConfig, ManualClock, MembershipReport};

fn mote(i: usize) -> String {
    format!("fd00::{i:x}")
}

/// Engine with every slot holding a group of `group_size` motes.
fn full_engine(num_motes: usize, group_size: usize) -> (GroupEngine<ManualClock>, ManualClock) {
    let clock = ManualClock::new(0);
    let config = GroupsConfig::default().with_num_motes(num_motes);
    let mut engine = GroupEngine::new(config, clock.clone()).expect("valid config");

    for g in 0..engine.store().len() {
        let base = g * group_size;
        let members: Vec<_> = (base..base + group_size).map(mote).collect();
        engine
            .handle_report(&MembershipReport::new(mote(base), members))
            .expect("free slot");
    }
    (engine, clock)
}

/// Benchmark reports whose member set is unchanged
fn bench_unchanged_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_unchanged");

    for &motes in &[9usize, 90, 900] {
        let (mut engine, _) = full_engine(motes, 3);
        let report = MembershipReport::new(mote(0), [mote(0), mote(1), mote(2)]);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(motes), &report, |b, r| {
            b.iter(|| engine.handle_report(black_box(r)))
        });
    }
    group.finish();
}

/// Benchmark reports that alternate between two member sets
fn bench_changed_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_changed");

    for &motes in &[9usize, 90, 900] {
        let (mut engine, _) = full_engine(motes, 3);
        let reports = [
            MembershipReport::new(mote(0), [mote(0), mote(1), mote(2), mote(motes + 1)]),
            MembershipReport::new(mote(0), [mote(0), mote(1), mote(2)]),
        ];

        group.throughput(Throughput::Elements(1));
        group.bench_function(BenchmarkId::from_parameter(motes), |b| {
            let mut i = 0;
            b.iter(|| {
                i ^= 1;
                engine.handle_report(black_box(&reports[i]))
            })
        });
    }
    group.finish();
}

/// Benchmark a sweep where nothing expires
fn bench_quiet_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_quiet");

    for &motes in &[9usize, 90, 900] {
        let (mut engine, clock) = full_engine(motes, 3);
        clock.advance(1_000);

        group.throughput(Throughput::Elements(engine.store().len() as u64));
        group.bench_function(BenchmarkId::from_parameter(motes), |b| {
            b.iter(|| black_box(engine.tick()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_unchanged_report,
    bench_changed_report,
    bench_quiet_sweep,
);
criterion_main!(benches);
