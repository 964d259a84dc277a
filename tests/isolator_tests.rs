//! Behavioural tests for the bisection core, driven through a `Session`
//! over an in-memory activator the way a real caller would drive it.

use std::collections::HashSet;

use culprit::isolator::{self, split};
use culprit::{Candidate, MemoryActivator, Model, Session, Status, Transition, Verdict};
use im::Vector;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

// ============================================================================
// HELPERS
// ============================================================================

fn ids(names: &[&str]) -> Vector<Candidate> {
    names.iter().map(|n| Candidate::from(*n)).collect()
}

fn numbered(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("unit-{i:02}")).collect()
}

fn all_on(names: &[String]) -> Session<MemoryActivator> {
    Session::new(MemoryActivator::from_pairs(
        names.iter().map(|name| (name.as_str(), true)),
    ))
}

fn as_set(ids: &Vector<Candidate>) -> HashSet<Candidate> {
    ids.iter().cloned().collect()
}

/// Checks both invariants that must hold between rounds.
fn assert_consistent(session: &Session<MemoryActivator>, model: &Model) {
    model
        .check_invariants()
        .unwrap_or_else(|v| panic!("partition broken: {v}\n{model:#?}"));
    let active: HashSet<Candidate> = session.activator().active().into_iter().collect();
    assert_eq!(active, as_set(&model.active_set()), "active set drifted from the model");
}

/// Runs a session to completion, asking `reproduces` about every active set.
/// Returns the final transition and the number of verdicts given.
fn drive(
    session: &mut Session<MemoryActivator>,
    reproduces: impl Fn(&HashSet<Candidate>) -> bool,
) -> (Transition, usize) {
    let mut current = session.start().unwrap();
    let mut verdicts = 0;
    loop {
        assert_consistent(session, &current.model);
        let active: HashSet<Candidate> = session.activator().active().into_iter().collect();
        let verdict = if reproduces(&active) {
            Verdict::Fail
        } else {
            Verdict::Pass
        };
        verdicts += 1;
        let next = session.report(&current.model, verdict).unwrap();
        if next.status.is_terminal() {
            return (next, verdicts);
        }
        current = next;
        assert!(verdicts < 10_000, "session did not converge");
    }
}

fn ceil_log2(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn halving_rule_matches_documented_examples() {
    assert_eq!(split(&ids(&["a", "b", "c"])), (ids(&["a", "b"]), ids(&["c"])));
    assert_eq!(
        split(&ids(&["a", "b", "c", "d"])),
        (ids(&["a", "b"]), ids(&["c", "d"]))
    );
    assert_eq!(split(&ids(&[])), (ids(&[]), ids(&[])));
    assert_eq!(split(&ids(&["a"])), (ids(&["a"]), ids(&[])));
}

#[test]
fn two_failures_on_four_units_isolate_the_first() {
    let mut session = Session::new(MemoryActivator::from_pairs([
        ("A", true),
        ("B", true),
        ("C", true),
        ("D", true),
    ]));

    let started = session.start().unwrap();
    assert_eq!(started.model.to_test, ids(&["A", "B"]));
    assert_eq!(started.model.untested, ids(&["C", "D"]));
    assert_eq!(session.activator().active(), ids(&["A", "B"]).into_iter().collect::<Vec<_>>());

    let failed = session.report_fail(&started.model).unwrap();
    assert_eq!(failed.model.to_test, ids(&["A"]));
    assert_eq!(failed.model.under_suspicion, ids(&["B"]));
    assert_eq!(failed.status, Status::Testing { round: 2 });

    let found = session.report_fail(&failed.model).unwrap();
    assert_eq!(found.status, Status::Isolated("A".into()));
    assert_eq!(found.model, failed.model);
}

#[test]
fn two_passes_on_four_units_clear_everything() {
    let mut session = Session::new(MemoryActivator::from_pairs([
        ("A", true),
        ("B", true),
        ("C", true),
        ("D", true),
    ]));

    let started = session.start().unwrap();
    let passed = session.report_pass(&started.model).unwrap();
    assert_eq!(passed.model.to_test, ids(&["C", "D"]));
    assert_eq!(passed.model.passed, ids(&["A", "B"]));
    assert!(passed.model.untested.is_empty());
    assert_eq!(session.activator().active().len(), 4);

    let done = session.report_pass(&passed.model).unwrap();
    assert_eq!(done.status, Status::AllClear);
    assert_eq!(done.model, passed.model);
}

#[test]
fn originally_disabled_units_are_never_touched() {
    let mut session = Session::new(MemoryActivator::from_pairs([
        ("A", true),
        ("off-1", false),
        ("B", true),
        ("off-2", false),
        ("C", true),
    ]));
    let (end, _) = drive(&mut session, |active| active.contains(&Candidate::from("C")));

    assert_eq!(end.status, Status::Isolated("C".into()));
    assert_eq!(end.model.originally_disabled, ids(&["off-1", "off-2"]));
    assert!(!session.activator().is_active(&"off-1".into()));
    assert!(!session.activator().is_active(&"off-2".into()));
}

#[test]
fn repeated_reports_on_the_same_model_are_deterministic() {
    let mut session = all_on(&numbered(7));
    let started = session.start().unwrap();
    assert_eq!(
        isolator::report_fail(&started.model),
        isolator::report_fail(&started.model)
    );
    assert_eq!(
        isolator::report_pass(&started.model),
        isolator::report_pass(&started.model)
    );
}

// ============================================================================
// CONVERGENCE
// ============================================================================

#[test]
fn single_culprit_is_always_found() {
    for n in 1..=24 {
        let names = numbered(n);
        for culprit in &names {
            let culprit = Candidate::from(culprit.as_str());
            let mut session = all_on(&names);
            let (end, verdicts) = drive(&mut session, |active| active.contains(&culprit));

            assert_eq!(end.status, Status::Isolated(culprit.clone()), "n={n}");
            // Parked halves are retested as a batch, so a deep culprit can
            // cost up to three verdicts per halving.
            let bound = 3 * ceil_log2(n) + 1;
            assert!(
                verdicts <= bound,
                "n={n} culprit={culprit}: {verdicts} verdicts exceeds {bound}"
            );
        }
    }
}

#[test]
fn all_clear_visits_every_unit_exactly_once() {
    for n in 0..=20 {
        let names = numbered(n);
        let mut session = all_on(&names);
        let mut current = session.start().unwrap();
        let mut visited: Vec<Candidate> = Vec::new();

        loop {
            assert_consistent(&session, &current.model);
            visited.extend(current.model.to_test.iter().cloned());
            let next = session.report_pass(&current.model).unwrap();
            if next.status.is_terminal() {
                assert_eq!(next.status, Status::AllClear);
                break;
            }
            current = next;
        }

        let expected: Vec<Candidate> = names.iter().map(|n| Candidate::from(n.as_str())).collect();
        assert_eq!(visited, expected, "n={n}");
        assert_eq!(session.activator().active().len(), n);
    }
}

#[test]
fn interacting_pair_is_isolated_against_its_partner() {
    for n in 2..=10 {
        let names = numbered(n);
        for (i, first) in names.iter().enumerate() {
            for second in &names[i + 1..] {
                let pair = [Candidate::from(first.as_str()), Candidate::from(second.as_str())];
                let mut session = all_on(&names);
                let (end, _) = drive(&mut session, |active| {
                    active.contains(&pair[0]) && active.contains(&pair[1])
                });

                let Status::Isolated(found) = &end.status else {
                    panic!("pair {pair:?} in n={n} ended with {:?}", end.status);
                };
                assert!(pair.contains(found), "isolated {found}, expected one of {pair:?}");
                let partner = if *found == pair[0] { &pair[1] } else { &pair[0] };
                assert!(
                    end.model.passed.contains(partner),
                    "{partner} should be among the cleared units kept active"
                );
            }
        }
    }
}

#[test]
fn nothing_enabled_means_nothing_to_blame() {
    let mut session = Session::new(MemoryActivator::from_pairs([("A", false), ("B", false)]));
    let started = session.start().unwrap();
    assert!(started.model.to_test.is_empty());

    assert_eq!(
        session.report_fail(&started.model).unwrap().status,
        Status::Inconclusive
    );
    assert_eq!(
        session.report_pass(&started.model).unwrap().status,
        Status::AllClear
    );
}

// ============================================================================
// RANDOMISED SESSIONS
// ============================================================================

#[test]
fn arbitrary_verdicts_preserve_invariants_and_defer_suspects() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(0x5eed_cafe);

    for _ in 0..300 {
        let n = rng.gen_range(0..30);
        let units: Vec<(String, bool)> = (0..n)
            .map(|i| (format!("u{i}"), rng.gen_bool(0.8)))
            .collect();
        let mut session = Session::new(MemoryActivator::from_pairs(
            units.iter().map(|(name, on)| (name.as_str(), *on)),
        ));

        let mut current = session.start().unwrap();
        for _ in 0..200 {
            assert_consistent(&session, &current.model);
            let prev = current.model.clone();

            if rng.gen_bool(0.5) {
                let next = session.report_fail(&prev).unwrap();
                if next.status.is_terminal() {
                    assert_eq!(next.model, prev);
                    break;
                }
                // Failing only ever narrows `to_test`; parked suspects stay
                // parked.
                assert!(as_set(&next.model.to_test).is_subset(&as_set(&prev.to_test)));
                assert!(as_set(&prev.under_suspicion).is_subset(&as_set(&next.model.under_suspicion)));
                current = next;
            } else {
                let next = session.report_pass(&prev).unwrap();
                if next.status.is_terminal() {
                    assert_eq!(next.status, Status::AllClear);
                    assert!(prev.untested.is_empty() && prev.under_suspicion.is_empty());
                    break;
                }
                if !prev.under_suspicion.is_empty() {
                    assert_eq!(next.model.to_test, prev.under_suspicion);
                    assert_eq!(next.model.untested, prev.untested);
                }
                assert!(next.model.under_suspicion.is_empty());
                current = next;
            }
        }
    }
}

#[test]
fn restore_after_any_session_recovers_the_starting_state() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(42);

    for _ in 0..100 {
        let n = rng.gen_range(1..16);
        let units: Vec<(String, bool)> = (0..n)
            .map(|i| (format!("u{i}"), rng.gen_bool(0.6)))
            .collect();
        let initial = MemoryActivator::from_pairs(units.iter().map(|(name, on)| (name.as_str(), *on)));
        let mut session = Session::new(initial.clone());

        let mut model = session.start().unwrap().model;
        for _ in 0..rng.gen_range(0..6) {
            let verdict = if rng.gen_bool(0.5) { Verdict::Pass } else { Verdict::Fail };
            model = session.report(&model, verdict).unwrap().model;
        }
        session.restore(&model).unwrap();

        assert_eq!(session.activator().active(), initial.active());
    }
}
