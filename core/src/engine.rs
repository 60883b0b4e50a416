//! The simulation engine — owns the company and advances it one tick at a time.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Advance clock       tick += tick size in hours
//!   2. Outage check        may set the sticky outage flag
//!   3. Growth and revenue  organic referrals + ad revenue (skipped while down)
//!   4. Outage penalty      attrition (only while down)
//!   5. Churn               always
//!   6. Marketing           paid acquisition and its cost, always
//!   7. Payroll             hourly team cost
//!   8. Loan settlement     debits money directly
//!   9. Commit              apply pending deltas, clamp users to ≥ 1
//!
//! RULES:
//!   - Phases 3–7 only accumulate into pending deltas; the ledger is
//!     touched once, at commit. Every rate in a tick is therefore computed
//!     from the state as it stood when the tick began.
//!   - All randomness flows through the RngBank.
//!   - Player actions are applied between ticks, never during one.

use crate::{
    action::{Action, ActionOutcome},
    config::SimConfig,
    economy::EconomyModel,
    error::{SimError, SimResult},
    event::SimEvent,
    processor::ActionProcessor,
    rng::{BinomialDraw, RngBank, RngSlot},
    state::SimState,
    types::{Hours, Tick, HOURS_PER_DAY, HOURS_PER_WEEK},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    AdvanceClock,
    OutageCheck,
    GrowthRevenue,
    OutagePenalty,
    Churn,
    Marketing,
    Payroll,
    LoanSettlement,
    Commit,
}

pub const PHASE_ORDER: [TickPhase; 9] = [
    TickPhase::AdvanceClock,
    TickPhase::OutageCheck,
    TickPhase::GrowthRevenue,
    TickPhase::OutagePenalty,
    TickPhase::Churn,
    TickPhase::Marketing,
    TickPhase::Payroll,
    TickPhase::LoanSettlement,
    TickPhase::Commit,
];

/// What happened during one tick. Read-only; for display and debugging.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TickSummary {
    pub tick:             Tick,
    pub organic_growth:   BinomialDraw,
    pub churn:            BinomialDraw,
    pub marketing_growth: BinomialDraw,
    pub ad_revenue:       f64,
    pub outage_attrition: f64,
    pub marketing_cost:   f64,
    pub payroll:          f64,
    pub loan_repayments:  f64,
    /// Change in money over the whole tick, loan repayments included.
    pub money_delta:      f64,
    /// Change in users over the whole tick, after the floor is applied.
    pub user_delta:       f64,
    pub is_down:          bool,
    pub events:           Vec<SimEvent>,
}

/// Per-tick accumulator, committed to the ledger in the final phase.
#[derive(Debug, Default)]
struct PendingDeltas {
    money: f64,
    users: f64,
}

pub struct SimEngine {
    state:     SimState,
    config:    SimConfig,
    rng_bank:  RngBank,
    event_log: Vec<SimEvent>,
}

impl SimEngine {
    /// A fresh company built from the config's initial values.
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let state = SimState::from_config(&config);
        Self::with_state(state, config, seed)
    }

    /// Resume from an explicit state. Used by tests and tooling.
    pub fn with_state(state: SimState, config: SimConfig, seed: u64) -> Self {
        Self {
            state,
            config,
            rng_bank:  RngBank::new(seed),
            event_log: Vec::new(),
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Direct state access for tests and tooling.
    /// Simulation code mutates state only through step() and apply_action().
    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    pub fn economy(&self) -> EconomyModel<'_> {
        EconomyModel::new(&self.state, &self.config)
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.event_log
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Advance one tick. This is the core simulation step.
    pub fn step(&mut self) -> TickSummary {
        let money_before = self.state.money();
        let users_before = self.state.users();

        let mut pending = PendingDeltas::default();
        let mut summary = TickSummary::default();
        for phase in PHASE_ORDER {
            self.run_phase(phase, &mut pending, &mut summary);
        }

        summary.money_delta = self.state.money() - money_before;
        summary.user_delta = self.state.users() - users_before;
        self.event_log.extend(summary.events.iter().cloned());

        log::debug!(
            "tick={} users={:.0} ({:+.1}) money={:.2} ({:+.2}) down={}",
            summary.tick,
            self.state.users(),
            summary.user_delta,
            self.state.money(),
            summary.money_delta,
            summary.is_down
        );
        summary
    }

    /// Run n ticks in a loop.
    pub fn run_ticks(&mut self, n: u64) -> Vec<TickSummary> {
        (0..n).map(|_| self.step()).collect()
    }

    /// Tick repeatedly until `horizon` in-game hours have elapsed.
    /// Each tick is a full step(); there is no shortcut formula.
    pub fn fast_forward(&mut self, horizon: Hours) -> SimResult<Vec<TickSummary>> {
        let tick_hours = self.state.tick_size().hours();
        if !self.state.can_fast_forward(horizon) {
            return Err(SimError::invalid(
                "fast_forward",
                format!("{horizon} hours is not a whole number of {tick_hours}-hour ticks"),
            ));
        }
        Ok(self.run_ticks(horizon / tick_hours))
    }

    /// Validate and apply one player action between ticks.
    pub fn apply_action(&mut self, action: Action) -> SimResult<ActionOutcome> {
        let horizon = match action {
            Action::FastForwardDay  => HOURS_PER_DAY,
            Action::FastForwardWeek => HOURS_PER_WEEK,
            _ => {
                let rng = self.rng_bank.stream(RngSlot::Financing);
                return ActionProcessor::new(&mut self.state, &self.config, rng, &mut self.event_log)
                    .apply(action);
            }
        };
        self.fast_forward(horizon)
            .map(ActionOutcome::FastForwarded)
            .map_err(|e| match e {
                SimError::InvalidAction { reason, .. } => SimError::InvalidAction {
                    action: action.name(),
                    reason,
                },
                other => other,
            })
    }

    /// Apply an action by its command name, e.g. `hire_engineer`.
    pub fn apply_named(&mut self, name: &str) -> SimResult<ActionOutcome> {
        let action = Action::from_name(name)?;
        self.apply_action(action)
    }

    fn run_phase(&mut self, phase: TickPhase, pending: &mut PendingDeltas, summary: &mut TickSummary) {
        match phase {
            TickPhase::AdvanceClock => {
                summary.tick = self.state.clock.advance();
            }

            TickPhase::OutageCheck => {
                if !self.state.is_down && self.economy().outage_triggered() {
                    self.state.is_down = true;
                    log::info!(
                        "tick={} outage: {:.0} users on {} engineers",
                        summary.tick,
                        self.state.users(),
                        self.state.team.engineers
                    );
                    summary.events.push(SimEvent::OutageStarted {
                        tick:      summary.tick,
                        users:     self.state.users(),
                        engineers: self.state.team.engineers,
                    });
                }
                summary.is_down = self.state.is_down;
            }

            TickPhase::GrowthRevenue => {
                if self.state.is_down {
                    return;
                }
                let (trials, probability, revenue) = {
                    let economy = self.economy();
                    (
                        trials(self.state.users()),
                        economy.organic_growth_probability_per_tick(),
                        economy.ad_revenue_per_tick(),
                    )
                };
                let draw = self.rng_bank.stream(RngSlot::Growth).binomial(trials, probability);
                pending.users += draw.sample as f64;
                pending.money += revenue;
                summary.organic_growth = draw;
                summary.ad_revenue = revenue;
            }

            TickPhase::OutagePenalty => {
                if !self.state.is_down {
                    return;
                }
                let attrition = self.economy().outage_attrition_per_tick();
                pending.users -= attrition;
                summary.outage_attrition = attrition;
            }

            TickPhase::Churn => {
                let probability = self.economy().churn_probability_per_tick();
                let trials = trials(self.state.users());
                let draw = self.rng_bank.stream(RngSlot::Churn).binomial(trials, probability);
                pending.users -= draw.sample as f64;
                summary.churn = draw;
            }

            TickPhase::Marketing => {
                let (budget, probability) = {
                    let economy = self.economy();
                    (
                        economy.marketing_spend_per_tick(),
                        economy.marketing_acquisition_probability_per_dollar(),
                    )
                };
                let draw = self
                    .rng_bank
                    .stream(RngSlot::Marketing)
                    .binomial(trials(budget), probability);
                pending.users += draw.sample as f64;
                pending.money -= budget;
                summary.marketing_growth = draw;
                summary.marketing_cost = budget;
            }

            TickPhase::Payroll => {
                let payroll = self.economy().team_spend_per_tick();
                pending.money -= payroll;
                summary.payroll = payroll;
            }

            TickPhase::LoanSettlement => {
                for (due_tick, amount) in self.state.ledger.settle_due_loans(summary.tick) {
                    log::info!("tick={} loan due at {due_tick} repaid: ${amount:.0}", summary.tick);
                    summary.loan_repayments += amount;
                    summary.events.push(SimEvent::LoanSettled {
                        tick: summary.tick,
                        due_tick,
                        amount,
                    });
                }
            }

            TickPhase::Commit => {
                let ledger = &mut self.state.ledger;
                ledger.credit(pending.money);
                ledger.add_users(pending.users);
                ledger.close_tick();
                *pending = PendingDeltas::default();
            }
        }
    }
}

/// Whole-number trial count for a real-valued population.
fn trials(count: f64) -> u64 {
    count.round().max(0.0) as u64
}
