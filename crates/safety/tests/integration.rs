//! Integration tests for the safety checker

use banker_safety::{analyze, analyze_with, is_safe, ScanOrder};
use banker_state::SystemState;
use banker_types::{Matrix, ProcessId};
use proptest::prelude::*;

const SCENARIO_A: &str = "\
5 3
10 5 7
7 5 3
3 2 2
9 0 2
2 2 2
4 3 3
0 1 0
2 0 0
3 0 2
2 1 1
0 0 2
";

const SCENARIO_B: &str = "\
5 3
13 5 7
7 5 3
3 2 2
9 0 2
2 2 2
4 3 3
6 4 2
2 0 0
3 0 2
2 1 1
0 0 2
";

const SCENARIO_C: &str = "1 1\n5\n5\n5\n";

fn load(input: &str) -> SystemState {
    let mut state = SystemState::new();
    state.load_str(input).unwrap();
    state
}

fn ids(indices: &[usize]) -> Vec<ProcessId> {
    indices.iter().copied().map(ProcessId::new).collect()
}

#[test]
fn test_scenario_a_is_safe() {
    let state = load(SCENARIO_A);
    assert!(is_safe(&state));

    let report = analyze(&state);
    assert_eq!(report.completion_order, ids(&[1, 3, 0, 2, 4]));
    assert_eq!(report.completed_count(), 5);
}

/// Follows the sequence P1, P3, P4, P0, P2 by hand and checks each step is eligible
#[test]
fn test_scenario_a_alternative_sequence_is_valid() {
    let state = load(SCENARIO_A);
    let mut available = state.resource_available().to_vec();
    for process in ids(&[1, 3, 4, 0, 2]) {
        let need = state.need_of(process).unwrap();
        assert!(
            need.iter().zip(&available).all(|(n, a)| n <= a),
            "{process} not eligible with {available:?}"
        );
        state.release_into(process, &mut available).unwrap();
    }
    assert_eq!(available, state.resource_total());
}

#[test]
fn test_scenario_b_is_unsafe() {
    let state = load(SCENARIO_B);
    assert_eq!(state.resource_available(), &[0, 0, 0]);

    let report = analyze(&state);
    assert!(!report.safe);
    assert!(report.completion_order.is_empty());
    assert_eq!(report.blocked, ids(&[0, 1, 2, 3, 4]));
    assert_eq!(report.final_available, vec![0, 0, 0]);
}

#[test]
fn test_scenario_c_zero_need_is_met() {
    let state = load(SCENARIO_C);
    assert_eq!(state.need_of(ProcessId::new(0)).unwrap(), &[0]);
    assert_eq!(state.resource_available(), &[0]);
    assert!(is_safe(&state));
}

#[test]
fn test_empty_and_zero_resource_states_are_safe() {
    assert!(is_safe(&SystemState::new()));
    assert!(is_safe(&load("0 3\n1 2 3\n")));
    assert!(is_safe(&load("4 0\n")));
}

#[test]
fn test_negative_totals_block_and_carry_through() {
    let report = analyze(&load("1 1\n-1\n0\n0\n"));
    assert!(!report.safe);
    assert_eq!(report.blocked, ids(&[0]));
    assert_eq!(report.final_available, vec![-1]);

    // P0 holds more than exists, leaving nothing for anyone
    let report = analyze(&load("2 1\n1\n3\n1\n3\n0\n"));
    assert!(!report.safe);
    assert!(report.completion_order.is_empty());
    assert_eq!(report.blocked, ids(&[0, 1]));
    assert_eq!(report.final_available, vec![-2]);
}

#[test]
fn test_release_saturates_at_extreme_values() {
    let claim = Matrix::from_rows(&[vec![i64::MAX], vec![-i64::MAX]]).unwrap();
    let allocation = claim.clone();
    let mut state = SystemState::new();
    state.load_parts(vec![i64::MAX], claim, allocation).unwrap();
    assert_eq!(state.resource_available(), &[i64::MAX]);

    let report = analyze(&state);
    assert!(report.safe);
    assert_eq!(report.completion_order, ids(&[0, 1]));
    assert_eq!(report.final_available, vec![0]);
}

#[test]
fn test_concurrent_checks_share_a_snapshot() {
    let state = load(SCENARIO_A);
    let verdicts: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| is_safe(&state))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(verdicts.into_iter().all(|safe| safe));
}

#[test]
fn test_report_serializes() {
    let report = analyze(&load(SCENARIO_C));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["safe"], serde_json::json!(true));
    assert_eq!(json["completion_order"], serde_json::json!([0]));
}

/// Pseudo-random order driven by proptest-generated keys, reshuffled every round
struct Keyed {
    keys: Vec<u32>,
    round: usize,
}

impl ScanOrder for Keyed {
    fn arrange(&mut self, pending: &mut [ProcessId]) {
        let keys = &self.keys;
        let round = self.round;
        pending.sort_by_key(|p| keys[(p.index() * 7 + round) % keys.len()]);
        self.round += 1;
    }
}

fn arb_state() -> impl Strategy<Value = SystemState> {
    (0usize..7, 0usize..4)
        .prop_flat_map(|(p, r)| {
            (
                Just(p),
                Just(r),
                proptest::collection::vec(0i64..6, p * r),
                proptest::collection::vec(0i64..6, p * r),
                proptest::collection::vec(0i64..4, r),
            )
        })
        .prop_map(|(p, r, claim, raw, extra)| {
            let allocation: Vec<i64> = claim.iter().zip(&raw).map(|(c, a)| a % (c + 1)).collect();
            let claim = Matrix::from_flat(p, r, claim).unwrap();
            let allocation = Matrix::from_flat(p, r, allocation).unwrap();
            let totals = allocation
                .column_sums()
                .unwrap()
                .into_iter()
                .zip(extra)
                .map(|(used, spare)| used + spare)
                .collect();
            let mut state = SystemState::new();
            state.load_parts(totals, claim, allocation).unwrap();
            state
        })
}

proptest! {
    #[test]
    fn prop_verdict_is_order_independent(
        state in arb_state(),
        keys in proptest::collection::vec(any::<u32>(), 1..16),
    ) {
        let baseline = analyze(&state);
        let shuffled = analyze_with(&state, &mut Keyed { keys, round: 0 });

        prop_assert_eq!(baseline.safe, shuffled.safe);
        let mut a = baseline.completion_order.clone();
        let mut b = shuffled.completion_order.clone();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_safe_sequence_is_feasible(state in arb_state()) {
        let report = analyze(&state);
        let mut available = state.resource_available().to_vec();
        for process in &report.completion_order {
            let need = state.need_of(*process).unwrap();
            prop_assert!(need.iter().zip(&available).all(|(n, a)| n <= a));
            state.release_into(*process, &mut available).unwrap();
        }
        prop_assert_eq!(available, report.final_available);
        prop_assert_eq!(report.safe, report.blocked.is_empty());
    }
}
