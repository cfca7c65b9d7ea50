//! # Payload Rotor Tests
//!
//! The rotor must spread K calls over a pool of size S as the multiset
//! `{0, 1, ..., K-1} mod S`, with every underlying counter value issued
//! exactly once no matter the concurrency.

use std::sync::Arc;
use std::thread;
use vlm_loadgen::PayloadRotor;

#[test]
fn sequential_calls_wrap_around() {
    let rotor = PayloadRotor::new();
    let indices: Vec<usize> = (0..7).map(|_| rotor.next(3).unwrap()).collect();
    assert_eq!(indices, vec![0, 1, 2, 0, 1, 2, 0]);
}

#[test]
fn concurrent_calls_produce_the_exact_multiset() {
    let pool_size = 7;
    let threads = 4;
    let per_thread = 250;
    let total = threads * per_thread;

    let rotor = Arc::new(PayloadRotor::new());
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let rotor = Arc::clone(&rotor);
            thread::spawn(move || {
                (0..per_thread)
                    .map(|_| rotor.next(pool_size).unwrap())
                    .collect::<Vec<usize>>()
            })
        })
        .collect();

    let mut counts = vec![0usize; pool_size];
    for handle in handles {
        for index in handle.join().unwrap() {
            counts[index] += 1;
        }
    }

    // {0..total} mod pool_size: residues below total % pool_size get one
    // extra hit. The last partial cycle biasing low indices is accepted.
    let base = total / pool_size;
    let extra = total % pool_size;
    for (residue, count) in counts.iter().enumerate() {
        let expected = base + usize::from(residue < extra);
        assert_eq!(
            *count, expected,
            "residue {} hit {} times, expected {}",
            residue, count, expected
        );
    }

    assert_eq!(rotor.issued(), total, "duplicate or lost counter value");
}

#[test]
fn zero_pool_size_fails_without_consuming_counter() {
    let rotor = PayloadRotor::new();
    assert!(rotor.next(0).is_err());
    assert!(rotor.next(0).is_err());
    assert_eq!(rotor.issued(), 0);
    assert_eq!(rotor.next(5).unwrap(), 0);
}
