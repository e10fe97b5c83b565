//! Bound validation, propagation and concurrency tests.

mod common;

use clusterfreq::error::FreqError;
use clusterfreq::{
    BoostIntent, BoundKind, ClusterId, FreqConstraints, FrequencyBound, FrequencyTable, LimitKind,
    NO_LIMIT,
};
use common::*;
use std::sync::Arc;
use std::thread;

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn max_then_conflicting_min_is_rejected() {
    let (m, _) = two_cluster_manager();

    m.set_bound(LITTLE, BoundKind::Max, MID).unwrap();
    assert_eq!(m.get(LITTLE).unwrap(), bound(NO_LIMIT, MID));

    let err = m.set_bound(LITTLE, BoundKind::Min, HIGH).unwrap_err();
    assert!(matches!(err, FreqError::OrderingViolation { .. }));
    assert_eq!(m.get(LITTLE).unwrap(), bound(NO_LIMIT, MID));
}

#[test]
fn value_outside_table_is_rejected() {
    let (m, _) = two_cluster_manager();

    let err = m.set_bound(LITTLE, BoundKind::Min, 450_000).unwrap_err();
    assert_eq!(err, FreqError::invalid_frequency(LITTLE, 450_000));
    assert_eq!(m.get(LITTLE).unwrap(), bound(NO_LIMIT, NO_LIMIT));
}

#[test]
fn max_then_compatible_min_both_succeed() {
    let (m, _) = two_cluster_manager();

    m.set_bound(LITTLE, BoundKind::Max, HIGH).unwrap();
    m.set_bound(LITTLE, BoundKind::Min, LOW).unwrap();
    assert_eq!(m.get(LITTLE).unwrap(), bound(LOW, HIGH));
}

#[test]
fn zero_is_normalized_to_sentinel() {
    let (m, _) = two_cluster_manager();

    m.set_bound(LITTLE, BoundKind::Max, MID).unwrap();
    m.set_bound(LITTLE, BoundKind::Max, 0).unwrap();
    assert_eq!(m.get(LITTLE).unwrap().max, NO_LIMIT);

    // Also from an already unbounded state
    m.set_bound(LITTLE, BoundKind::Max, 0).unwrap();
    assert_eq!(m.get(LITTLE).unwrap().max, NO_LIMIT);
}

#[test]
fn negative_values_are_normalized_to_sentinel() {
    let (m, _) = two_cluster_manager();

    m.set_bound(LITTLE, BoundKind::Min, LOW).unwrap();
    m.set_bound(LITTLE, BoundKind::Min, -500).unwrap();
    assert_eq!(m.get(LITTLE).unwrap().min, NO_LIMIT);
}

#[test]
fn cluster_without_table_accepts_only_sentinel() {
    let (m, _) = two_cluster_manager();

    let err = m.set_bound(BIG, BoundKind::Min, LOW).unwrap_err();
    assert!(matches!(err, FreqError::InvalidFrequency { .. }));

    m.set_bound(BIG, BoundKind::Min, NO_LIMIT).unwrap();
    assert_eq!(m.get(BIG).unwrap(), bound(NO_LIMIT, NO_LIMIT));
}

#[test]
fn out_of_range_cluster_is_rejected() {
    let (m, recorder) = two_cluster_manager();

    let err = m.set_bound(ClusterId(2), BoundKind::Max, NO_LIMIT).unwrap_err();
    assert_eq!(
        err,
        FreqError::InvalidCluster {
            cluster: ClusterId(2),
            cluster_count: 2
        }
    );
    assert!(m.register_table(ClusterId(2), scenario_table()).is_err());
    assert!(m.get(ClusterId(2)).is_err());
    assert!(recorder.limit_calls().is_empty());
}

#[test]
fn equal_min_and_max_are_allowed() {
    let (m, _) = two_cluster_manager();

    m.set_bound(LITTLE, BoundKind::Min, MID).unwrap();
    m.set_bound(LITTLE, BoundKind::Max, MID).unwrap();
    assert_eq!(m.get(LITTLE).unwrap(), bound(MID, MID));
}

#[test]
fn max_below_min_is_rejected() {
    let (m, _) = two_cluster_manager();

    m.set_bound(LITTLE, BoundKind::Min, MID).unwrap();
    let err = m.set_bound(LITTLE, BoundKind::Max, LOW).unwrap_err();
    assert_eq!(
        err,
        FreqError::OrderingViolation {
            cluster: LITTLE,
            kind: BoundKind::Max,
            value: LOW,
            other: MID
        }
    );
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn membership_matches_table_exactly() {
    let (m, _) = two_cluster_manager();
    let table = scenario_table();

    for v in (-2..=1_000_000).step_by(50_000).chain([NO_LIMIT, 0, LOW, MID, HIGH]) {
        let expected = v == NO_LIMIT || table.contains(v);
        assert_eq!(m.is_valid(LITTLE, v), expected, "value {}", v);
    }
}

/// Every accepted sequence keeps min <= max; rejections change nothing.
#[test]
fn ordering_holds_and_rejections_are_no_ops_across_sequences() {
    let values = [NO_LIMIT, 0, LOW, 450_000, MID, HIGH];
    let kinds = [BoundKind::Min, BoundKind::Max];

    // Every ordered pair of writes, applied from a fresh manager
    for &k1 in &kinds {
        for &v1 in &values {
            for &k2 in &kinds {
                for &v2 in &values {
                    let (m, recorder) = two_cluster_manager();
                    for (kind, value) in [(k1, v1), (k2, v2)] {
                        let before = m.get(LITTLE).unwrap();
                        let calls_before = recorder.limit_calls().len();

                        match m.set_bound(LITTLE, kind, value) {
                            Ok(()) => {
                                assert_eq!(recorder.limit_calls().len(), calls_before + 1);
                            }
                            Err(_) => {
                                assert_eq!(m.get(LITTLE).unwrap(), before);
                                assert_eq!(recorder.limit_calls().len(), calls_before);
                            }
                        }

                        let after = m.get(LITTLE).unwrap();
                        assert!(after.is_ordered(), "{:?} after {:?}", after, (kind, value));
                    }
                }
            }
        }
    }
}

#[test]
fn sentinel_is_always_accepted() {
    let (m, _) = two_cluster_manager();
    let states = [
        (NO_LIMIT, NO_LIMIT),
        (LOW, NO_LIMIT),
        (NO_LIMIT, MID),
        (LOW, HIGH),
        (MID, MID),
    ];

    for (min, max) in states {
        // Build the state from unbounded; LITTLE carries every value above
        m.set_bound(LITTLE, BoundKind::Min, NO_LIMIT).unwrap();
        m.set_bound(LITTLE, BoundKind::Max, NO_LIMIT).unwrap();
        m.set_bound(LITTLE, BoundKind::Max, max).unwrap();
        m.set_bound(LITTLE, BoundKind::Min, min).unwrap();
        assert_eq!(m.get(LITTLE).unwrap(), bound(min, max));

        m.set_bound(LITTLE, BoundKind::Min, NO_LIMIT).unwrap();
        assert_eq!(m.get(LITTLE).unwrap(), bound(NO_LIMIT, max));
        m.set_bound(LITTLE, BoundKind::Min, min).unwrap();
        m.set_bound(LITTLE, BoundKind::Max, NO_LIMIT).unwrap();
        assert_eq!(m.get(LITTLE).unwrap(), bound(min, NO_LIMIT));

        // Without a table only the sentinel is representable
        m.set_bound(BIG, BoundKind::Min, NO_LIMIT).unwrap();
        m.set_bound(BIG, BoundKind::Max, NO_LIMIT).unwrap();
        assert_eq!(m.get(BIG).unwrap(), FrequencyBound::UNBOUNDED);
    }
}

#[test]
fn changes_are_isolated_per_cluster() {
    let (m, _) = two_cluster_manager();
    m.register_table(BIG, FrequencyTable::new([500_000, 1_000_000]))
        .unwrap();

    m.set_bound(BIG, BoundKind::Max, 1_000_000).unwrap();
    m.set_bound(LITTLE, BoundKind::Min, LOW).unwrap();
    m.set_bound(LITTLE, BoundKind::Max, HIGH).unwrap();
    m.set_bound(LITTLE, BoundKind::Max, 0).unwrap();

    assert_eq!(m.get(BIG).unwrap(), bound(NO_LIMIT, 1_000_000));
    assert_eq!(m.get(LITTLE).unwrap(), bound(LOW, NO_LIMIT));
}

// ============================================================================
// Propagation
// ============================================================================

#[test]
fn commit_forwards_full_vector_tagged_performance() {
    let (m, recorder) = two_cluster_manager();

    m.set_bound(LITTLE, BoundKind::Max, MID).unwrap();

    let calls = recorder.limit_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, LimitKind::Performance);
    assert_eq!(
        calls[0].1,
        vec![bound(NO_LIMIT, MID), bound(NO_LIMIT, NO_LIMIT)]
    );
}

#[test]
fn boost_intent_follows_cluster_bound() {
    let (m, recorder) = two_cluster_manager();

    m.set_bound(LITTLE, BoundKind::Min, LOW).unwrap();
    m.set_bound(LITTLE, BoundKind::Min, NO_LIMIT).unwrap();
    m.set_bound(BIG, BoundKind::Max, NO_LIMIT).unwrap();

    assert_eq!(
        recorder.intents(),
        vec![
            BoostIntent::Bounded,
            BoostIntent::Unbounded,
            BoostIntent::Unbounded
        ]
    );
}

#[test]
fn rejection_does_not_propagate() {
    let (m, recorder) = two_cluster_manager();

    let _ = m.set_bound(LITTLE, BoundKind::Min, 450_000);
    let _ = m.set_bound(BIG, BoundKind::Min, LOW);

    assert!(recorder.intents().is_empty());
    assert!(recorder.limit_calls().is_empty());
}

#[test]
fn collaborator_failure_does_not_fail_commit() {
    let recorder = RecordingCollaborator::failing();
    let m = FreqConstraints::new(2, recording(&recorder)).unwrap();
    m.register_table(LITTLE, scenario_table()).unwrap();

    m.set_bound(LITTLE, BoundKind::Max, MID).unwrap();

    assert_eq!(m.get(LITTLE).unwrap(), bound(NO_LIMIT, MID));
    assert_eq!(recorder.limit_calls().len(), 1);
    assert_eq!(m.metrics().collaborator_failures("boost"), 1);
    assert_eq!(m.metrics().collaborator_failures("limits"), 1);
}

#[test]
fn boost_hook_is_optional() {
    let recorder = RecordingCollaborator::new();
    let m = FreqConstraints::new(1, clusterfreq::Collaborators::new(recorder.clone())).unwrap();

    m.set_bound(ClusterId(0), BoundKind::Max, NO_LIMIT).unwrap();

    assert!(recorder.intents().is_empty());
    assert_eq!(recorder.limit_calls().len(), 1);
}

#[test]
fn table_reregistration_replaces_membership() {
    let (m, _) = two_cluster_manager();

    m.set_bound(LITTLE, BoundKind::Max, MID).unwrap();
    m.register_table(LITTLE, FrequencyTable::new([1_200_000]))
        .unwrap();

    assert!(m.set_bound(LITTLE, BoundKind::Max, HIGH).is_err());
    // Committed bounds survive re-registration
    assert_eq!(m.get(LITTLE).unwrap().max, MID);
    assert_eq!(m.table(LITTLE).unwrap().entries(), &[1_200_000]);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn concurrent_writers_never_break_ordering() {
    let recorder = RecordingCollaborator::new();
    let m = Arc::new(FreqConstraints::new(2, recording(&recorder)).unwrap());
    let table: Vec<i32> = (1..=16).map(|i| i * 100_000).collect();
    m.register_table(LITTLE, FrequencyTable::new(table.clone()))
        .unwrap();
    m.register_table(BIG, FrequencyTable::new(table.clone()))
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let m = m.clone();
            let table = table.clone();
            thread::spawn(move || {
                let mut accepted = 0u64;
                for i in 0..500usize {
                    let cluster = ClusterId((t + i) % 2);
                    let kind = if (t + i) % 3 == 0 {
                        BoundKind::Min
                    } else {
                        BoundKind::Max
                    };
                    let value = if i % 7 == 0 {
                        NO_LIMIT
                    } else {
                        table[(t * 31 + i * 17) % table.len()]
                    };
                    if m.set_bound(cluster, kind, value).is_ok() {
                        accepted += 1;
                    }
                    assert!(m.get(cluster).unwrap().is_ordered());
                }
                accepted
            })
        })
        .collect();

    let accepted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(m.metrics().accepted_total(), accepted);
    assert_eq!(recorder.limit_calls().len() as u64, accepted);
    assert_eq!(
        m.metrics().accepted_total() + m.metrics().rejected_total(),
        8 * 500
    );
    // Every forwarded snapshot was globally consistent
    for (_, bounds) in recorder.limit_calls() {
        assert_eq!(bounds.len(), 2);
        assert!(bounds.iter().all(|b| b.is_ordered()));
    }
    // The last forwarded vector is the final state
    assert_eq!(recorder.last_limits().unwrap(), m.snapshot());
}

#[test]
fn registration_races_with_validation_safely() {
    let (m, _) = two_cluster_manager();
    m.register_table(BIG, FrequencyTable::new([LOW, HIGH]))
        .unwrap();
    let m = Arc::new(m);

    let writer = {
        let m = m.clone();
        thread::spawn(move || {
            for i in 0..1_000 {
                let table = if i % 2 == 0 {
                    FrequencyTable::new([LOW, MID, HIGH])
                } else {
                    FrequencyTable::new([LOW, HIGH])
                };
                m.register_table(BIG, table).unwrap();
            }
        })
    };

    for _ in 0..1_000 {
        // LOW and HIGH are in both tables; MID only in one
        assert!(m.is_valid(BIG, LOW));
        assert!(m.is_valid(BIG, HIGH));
        if m.set_bound(BIG, BoundKind::Max, MID).is_ok() {
            assert_eq!(m.get(BIG).unwrap().max, MID);
        }
        m.set_bound(BIG, BoundKind::Max, NO_LIMIT).unwrap();
    }

    writer.join().unwrap();
}
