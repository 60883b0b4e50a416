//! Tick engine phases and invariants.

use glupper_core::{
    action::{Action, ActionOutcome},
    clock::TickSize,
    config::SimConfig,
    engine::{SimEngine, TickPhase, PHASE_ORDER},
    error::SimError,
    event::SimEvent,
    ledger::Ledger,
    state::{Role, SimState},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn engine_with(users: f64, money: f64, tick_size: TickSize, seed: u64) -> SimEngine {
    let mut state = SimState::new(tick_size);
    state.ledger = Ledger::new(users, money, 1.0);
    SimEngine::with_state(state, SimConfig::default(), seed)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn phases_run_in_documented_order() {
    assert_eq!(PHASE_ORDER.first(), Some(&TickPhase::AdvanceClock));
    assert_eq!(PHASE_ORDER.last(), Some(&TickPhase::Commit));
    let churn = PHASE_ORDER.iter().position(|p| *p == TickPhase::Churn);
    let growth = PHASE_ORDER.iter().position(|p| *p == TickPhase::GrowthRevenue);
    assert!(growth < churn);
}

#[test]
fn clock_advances_by_tick_size_in_hours() {
    for (tick_size, hours) in [(TickSize::Hourly, 1), (TickSize::Daily, 24), (TickSize::Weekly, 168)] {
        let mut engine = engine_with(1.0, 0.0, tick_size, 1);
        let mut previous = engine.state().tick();
        for n in 1..=5 {
            let summary = engine.step();
            assert_eq!(summary.tick, n * hours);
            assert!(summary.tick > previous, "tick must be monotonic");
            previous = summary.tick;
        }
    }
}

#[test]
fn users_never_fall_below_one() {
    let mut config = SimConfig::default();
    config.economy.churn_per_sentiment_point = 50.0;
    let mut state = SimState::new(TickSize::Weekly);
    state.ledger = Ledger::new(2_000_000.0, 0.0, 1.0);
    state.ad_level = 100;
    let mut engine = SimEngine::with_state(state, config, 7);

    for _ in 0..200 {
        let summary = engine.step();
        assert!(
            engine.state().users() >= 1.0,
            "users={} after tick {}",
            engine.state().users(),
            summary.tick
        );
    }
}

#[test]
fn summary_deltas_match_state_changes() {
    let mut engine = engine_with(5_000.0, 1_000.0, TickSize::Daily, 11);
    engine.state_mut().ad_level = 30;
    engine.state_mut().marketing_spend = 10.0;
    engine.state_mut().team.data_scientists = 1;

    for _ in 0..30 {
        let users_before = engine.state().users();
        let money_before = engine.state().money();
        let s = engine.step();

        assert!((engine.state().users() - users_before - s.user_delta).abs() < 1e-9);
        assert!((engine.state().money() - money_before - s.money_delta).abs() < 1e-9);

        let expected_money = s.ad_revenue - s.marketing_cost - s.payroll - s.loan_repayments;
        assert!((s.money_delta - expected_money).abs() < 1e-6);

        let expected_users = s.organic_growth.sample as f64 - s.churn.sample as f64
            + s.marketing_growth.sample as f64
            - s.outage_attrition;
        let floor_applied = users_before + expected_users < 1.0;
        if !floor_applied {
            assert!((s.user_delta - expected_users).abs() < 1e-6);
        }
    }
}

#[test]
fn marketing_spend_buys_users_and_costs_money() {
    let mut engine = engine_with(1.0, 0.0, TickSize::Hourly, 3);
    engine.state_mut().marketing_spend = 100.0;

    let summary = engine.step();
    assert_eq!(summary.marketing_cost, 100.0);
    assert!((summary.marketing_growth.expected - 2.0).abs() < 1e-12);
    assert_eq!(engine.state().money(), -100.0);
}

#[test]
fn payroll_is_charged_every_tick() {
    let mut engine = engine_with(1.0, 0.0, TickSize::Daily, 3);
    engine.state_mut().team.data_scientists = 2;
    engine.state_mut().team.engineers = 4;

    let summary = engine.step();
    assert_eq!(summary.payroll, 2_400.0);
    assert_eq!(summary.money_delta, -2_400.0);
}

#[test]
fn outage_is_sticky_and_blocks_growth() {
    let mut engine = engine_with(60_000.0, 0.0, TickSize::Hourly, 5);
    engine.state_mut().ad_level = 50;

    let first = engine.step();
    assert!(first.is_down);
    assert!(engine.state().is_down);
    assert!(first
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::OutageStarted { .. })));

    for _ in 0..5 {
        let s = engine.step();
        assert!(s.is_down, "outage must persist without hiring");
        assert_eq!(s.organic_growth.sample, 0);
        assert_eq!(s.organic_growth.expected, 0.0);
        assert_eq!(s.ad_revenue, 0.0);
        assert!(s.churn.expected > 0.0, "churn still applies while down");
        assert!(s.outage_attrition > 0.0);
    }

    // ~59 700 users: one engineer is not enough, two are.
    engine.apply_action(Action::Hire { role: Role::Engineer }).unwrap();
    assert!(engine.state().is_down);
    engine.apply_action(Action::Hire { role: Role::Engineer }).unwrap();
    assert!(!engine.state().is_down);
    assert!(engine
        .events()
        .iter()
        .any(|e| matches!(e, SimEvent::OutageResolved { engineers: 2, .. })));

    let after = engine.step();
    assert!(!after.is_down);
    assert!(after.organic_growth.expected > 0.0);
}

#[test]
fn outage_stays_down_even_after_users_drop() {
    let mut engine = engine_with(50_500.0, 0.0, TickSize::Weekly, 8);
    engine.step();
    assert!(engine.state().is_down);

    for _ in 0..10 {
        engine.step();
    }
    assert!(engine.state().users() < 50_000.0);
    assert!(engine.state().is_down, "only an engineer hire clears an outage");
}

#[test]
fn outage_attrition_matches_hourly_rate() {
    let mut engine = engine_with(100_000.0, 0.0, TickSize::Daily, 9);
    let s = engine.step();
    assert!(s.is_down);
    assert!((s.outage_attrition - 100_000.0 * 0.001 * 24.0).abs() < 1e-6);
}

#[test]
fn loans_are_repaid_on_their_due_tick() {
    let mut engine = engine_with(1.0, 10_000.0, TickSize::Hourly, 4);
    engine.state_mut().ledger.schedule_loan(1_150.0, 3);

    engine.step();
    engine.step();
    assert_eq!(engine.state().money(), 10_000.0);

    let s = engine.step();
    assert_eq!(s.loan_repayments, 1_150.0);
    assert_eq!(engine.state().money(), 8_850.0);
    assert!(engine.state().ledger.outstanding_loans().is_empty());
    assert!(s
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::LoanSettled { due_tick: 3, .. })));

    let s = engine.step();
    assert_eq!(s.loan_repayments, 0.0);
}

#[test]
fn fast_forward_runs_whole_ticks() {
    let mut engine = engine_with(100.0, 0.0, TickSize::Hourly, 12);
    let outcome = engine.apply_action(Action::FastForwardDay).unwrap();
    match outcome {
        ActionOutcome::FastForwarded(summaries) => {
            assert_eq!(summaries.len(), 24);
            assert_eq!(summaries.last().map(|s| s.tick), Some(24));
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let outcome = engine.apply_action(Action::FastForwardWeek).unwrap();
    assert!(matches!(outcome, ActionOutcome::FastForwarded(ref s) if s.len() == 168));
    assert_eq!(engine.state().tick(), 24 + 168);
}

#[test]
fn fast_forward_rejects_uneven_horizons() {
    let mut engine = engine_with(100.0, 0.0, TickSize::Weekly, 12);
    let err = engine.apply_action(Action::FastForwardDay).unwrap_err();
    assert!(matches!(
        err,
        SimError::InvalidAction { action: "fast_forward_day", .. }
    ));
    assert_eq!(engine.state().tick(), 0, "rejected fast-forward must not tick");

    let outcome = engine.apply_action(Action::FastForwardWeek).unwrap();
    assert!(matches!(outcome, ActionOutcome::FastForwarded(ref s) if s.len() == 1));
}
