//! Property tests for store invariants under arbitrary report/sweep sequences.

use std::collections::HashSet;

use motenet_groups::{
    GroupEngine, GroupStatistics, GroupStore, GroupsConfig, ManualClock, MembershipReport,
};
use proptest::prelude::*;

const MOTES: usize = 12;
const MIN_SIZE: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Report { sender: usize, members: Vec<usize> },
    Advance(u64),
    Tick,
}

fn mote(i: usize) -> String {
    format!("m{i}")
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..MOTES, prop::collection::vec(0..MOTES, 0..6))
            .prop_map(|(sender, members)| Op::Report { sender, members }),
        2 => (0u64..45_000).prop_map(Op::Advance),
        1 => Just(Op::Tick),
    ]
}

fn assert_store_consistent(store: &GroupStore) {
    for group in store.groups() {
        assert_eq!(group.cardinality, group.members.len(), "{}", group.id);

        let unique: HashSet<_> = group.members.iter().map(|m| &m.id).collect();
        assert_eq!(unique.len(), group.members.len(), "duplicate member in {}", group.id);

        if !group.is_baseline() {
            assert!(
                group.cardinality >= MIN_SIZE,
                "{} left undersized with {} members",
                group.id,
                group.cardinality
            );
            let stats = &group.stats;
            let min = stats.minimum.expect("observed group has a minimum");
            assert!(min <= stats.maximum);
            assert!(stats.average >= min as f64 - 1e-9);
            assert!(stats.average <= stats.maximum as f64 + 1e-9);
        } else {
            assert_eq!(group.stats, GroupStatistics::default());
        }
    }
}

proptest! {
    #[test]
    fn operations_preserve_invariants(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let clock = ManualClock::new(0);
        let config = GroupsConfig::default()
            .with_num_motes(MOTES)
            .with_minimum_viable_size(MIN_SIZE);
        let mut engine = GroupEngine::new(config, clock.clone()).unwrap();

        for op in ops {
            match op {
                Op::Report { sender, members } => {
                    let report = MembershipReport::new(mote(sender), members.into_iter().map(mote));
                    let before = engine.snapshot();
                    if engine.handle_report(&report).is_err() {
                        prop_assert_eq!(engine.snapshot(), before);
                    }
                }
                Op::Advance(ms) => clock.advance(ms),
                Op::Tick => {
                    engine.tick();
                }
            }
            assert_store_consistent(engine.store());
        }
    }

    #[test]
    fn running_statistics_match_direct_computation(observations in prop::collection::vec(0usize..50, 1..100)) {
        let mut stats = GroupStatistics::default();
        for &n in &observations {
            stats.observe(n);
        }

        let mean = observations.iter().sum::<usize>() as f64 / observations.len() as f64;
        prop_assert!((stats.average - mean).abs() < 1e-6);
        prop_assert_eq!(stats.minimum, observations.iter().copied().min());
        prop_assert_eq!(stats.maximum, observations.iter().copied().max().unwrap());
        prop_assert_eq!(stats.index, observations.len() as u64);
    }

    #[test]
    fn repeated_report_never_moves_statistics(members in prop::collection::vec(0..MOTES, 2..8)) {
        let clock = ManualClock::new(0);
        let config = GroupsConfig::default().with_num_motes(MOTES);
        let mut engine = GroupEngine::new(config, clock.clone()).unwrap();
        let report = MembershipReport::new(mote(members[0]), members.iter().copied().map(mote));

        engine.handle_report(&report).unwrap();
        let first = engine.snapshot();

        clock.advance(10);
        engine.handle_report(&report).unwrap();
        let second = engine.snapshot();

        for ((_, a), (_, b)) in first.iter().zip(second.iter()) {
            prop_assert_eq!(&a.stats, &b.stats);
            prop_assert_eq!(a.cardinality, b.cardinality);
        }
    }
}
