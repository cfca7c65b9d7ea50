//! # Request Budget Tests
//!
//! Exactness properties of the shared request cap under concurrency:
//! exactly `max` grants, exactly one final grant, and it is the grant
//! that pushed the counter to the cap.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use vlm_loadgen::{Acquisition, RequestBudget};

/// Drain the budget from `threads` OS threads; returns every grant.
fn race_budget(max: u64, threads: usize) -> Vec<(u64, bool)> {
    let budget = Arc::new(RequestBudget::new(max));
    let mut handles = Vec::with_capacity(threads);

    for _ in 0..threads {
        let budget = Arc::clone(&budget);
        handles.push(thread::spawn(move || {
            let mut grants = Vec::new();
            loop {
                match budget.try_acquire() {
                    Acquisition::Granted { sequence, is_final } => {
                        grants.push((sequence, is_final));
                    }
                    Acquisition::Denied => break,
                }
            }
            grants
        }));
    }

    let mut all = Vec::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }
    all
}

#[test]
fn concurrent_acquires_grant_exactly_max() {
    let max = 1000;
    let grants = race_budget(max, 8);

    assert_eq!(grants.len() as u64, max);

    let sequences: HashSet<u64> = grants.iter().map(|(seq, _)| *seq).collect();
    assert_eq!(sequences.len() as u64, max, "duplicate sequence issued");
    assert!(sequences.contains(&1) && sequences.contains(&max));
}

#[test]
fn exactly_one_final_grant_and_it_is_the_last() {
    let max = 500;
    let grants = race_budget(max, 16);

    let finals: Vec<u64> = grants
        .iter()
        .filter(|(_, is_final)| *is_final)
        .map(|(seq, _)| *seq)
        .collect();

    assert_eq!(finals, vec![max]);
}

#[test]
fn denied_after_stop_and_counter_never_exceeds_max() {
    let budget = RequestBudget::new(4);
    for _ in 0..4 {
        assert!(budget.try_acquire().is_granted());
    }
    for _ in 0..10 {
        assert_eq!(budget.try_acquire(), Acquisition::Denied);
    }
    assert_eq!(budget.completed(), 4);
    assert!(budget.is_stopped());
}

// Scenario: max=1 with 10 workers racing simultaneously - one winner.
#[test]
fn single_slot_race_has_one_winner() {
    for _ in 0..50 {
        let budget = Arc::new(RequestBudget::new(1));
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let budget = Arc::clone(&budget);
                thread::spawn(move || budget.try_acquire())
            })
            .collect();

        let outcomes: Vec<Acquisition> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let granted: Vec<&Acquisition> =
            outcomes.iter().filter(|a| a.is_granted()).collect();
        assert_eq!(granted.len(), 1);
        assert_eq!(
            *granted[0],
            Acquisition::Granted {
                sequence: 1,
                is_final: true
            }
        );
        assert_eq!(outcomes.iter().filter(|a| !a.is_granted()).count(), 9);
    }
}
