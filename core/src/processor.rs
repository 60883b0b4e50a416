//! Action processor — validates and applies one-shot player actions.
//!
//! RULES:
//!   - Every handler checks its preconditions before touching state.
//!     A rejected action leaves the state exactly as it was.
//!   - Actions never advance the clock. Fast-forward is driven by the
//!     engine, which owns the tick loop.

use crate::{
    action::{Action, ActionOutcome},
    clock::TickSize,
    config::SimConfig,
    economy::EconomyModel,
    error::{SimError, SimResult},
    event::SimEvent,
    rng::SubsystemRng,
    state::{FinancingOffer, LoanOffer, Role, SimState, AD_LEVEL_STEP},
};

/// Users gained per manual invite, by cumulative invites so far.
const INVITE_SCHEDULE: [(f64, f64); 6] = [
    (50.0, 1.0),
    (100.0, 0.5),
    (200.0, 0.25),
    (400.0, 0.125),
    (500.0, 0.06),
    (1000.0, 0.03),
];
const INVITE_FLOOR: f64 = 0.01;

/// Marketing spend below this snaps to zero.
const MIN_MARKETING_SPEND: f64 = 1.0;

pub fn invite_gain(friends_invited: f64) -> f64 {
    INVITE_SCHEDULE
        .iter()
        .find(|(below, _)| friends_invited < *below)
        .map(|(_, gain)| *gain)
        .unwrap_or(INVITE_FLOOR)
}

pub struct ActionProcessor<'a> {
    state:  &'a mut SimState,
    config: &'a SimConfig,
    rng:    &'a mut SubsystemRng,
    events: &'a mut Vec<SimEvent>,
}

impl<'a> ActionProcessor<'a> {
    pub fn new(
        state:  &'a mut SimState,
        config: &'a SimConfig,
        rng:    &'a mut SubsystemRng,
        events: &'a mut Vec<SimEvent>,
    ) -> Self {
        Self { state, config, rng, events }
    }

    pub fn apply(&mut self, action: Action) -> SimResult<ActionOutcome> {
        let result = match action {
            Action::InviteFriends          => self.invite_friends(),
            Action::RequestFinancing       => self.request_financing(),
            Action::AcceptFinancing        => self.accept_financing(),
            Action::DeclineFinancing       => self.decline_financing(),
            Action::RequestLoan            => self.request_loan(),
            Action::AcceptLoan             => self.accept_loan(),
            Action::DeclineLoan            => self.decline_loan(),
            Action::IncreaseAdLevel        => self.increase_ad_level(),
            Action::DecreaseAdLevel        => self.decrease_ad_level(),
            Action::IncreaseMarketingSpend => self.increase_marketing_spend(),
            Action::DecreaseMarketingSpend => self.decrease_marketing_spend(),
            Action::Hire { role }          => self.hire(role),
            Action::Fire { role }          => self.fire(role, action.name()),
            Action::SetTickSize { hours }  => self.set_tick_size(hours),
            Action::FastForwardDay | Action::FastForwardWeek => Err(SimError::invalid(
                action.name(),
                "fast-forward runs through the engine",
            )),
        };

        if let Err(e) = &result {
            log::debug!("tick={} rejected {}: {e}", self.state.tick(), action.name());
        }
        result
    }

    fn economy(&self) -> EconomyModel<'_> {
        EconomyModel::new(&*self.state, self.config)
    }

    fn invite_friends(&mut self) -> SimResult<ActionOutcome> {
        let to_add = invite_gain(self.state.friends_invited);
        self.state.ledger.add_users(to_add);
        self.state.friends_invited += to_add;
        Ok(ActionOutcome::Applied)
    }

    // ── Equity financing ──────────────────────────────────────────

    fn request_financing(&mut self) -> SimResult<ActionOutcome> {
        const NAME: &str = "request_financing";
        if self.state.pending_financing.is_some() {
            return Err(SimError::invalid(NAME, "a financing offer is already pending"));
        }
        let tick = self.state.tick();
        if tick < self.state.next_financing_tick {
            return Err(SimError::invalid(
                NAME,
                format!("investors are unavailable until tick {}", self.state.next_financing_tick),
            ));
        }

        let config = self.config;
        let finance = &config.finance;
        let base_multiple = self.economy().base_valuation_multiple();
        let jitter = self.rng.uniform(finance.valuation_jitter_min, finance.valuation_jitter_max);
        let cash_bonus = self.rng.uniform(0.0, finance.max_cash_bonus);
        let dilution = self.rng.uniform(finance.dilution_min, finance.dilution_max);

        let offer = FinancingOffer {
            amount: base_multiple * jitter * self.state.users() + cash_bonus,
            dilution,
        };
        self.state.pending_financing = Some(offer);
        self.state.next_financing_tick = tick + finance.financing_cooldown_hours;

        self.events.push(SimEvent::FinancingOffered {
            tick,
            amount: offer.amount,
            dilution: offer.dilution,
        });
        Ok(ActionOutcome::FinancingOffered(offer))
    }

    fn accept_financing(&mut self) -> SimResult<ActionOutcome> {
        let offer = self
            .state
            .pending_financing
            .take()
            .ok_or_else(|| SimError::invalid("accept_financing", "no financing offer is pending"))?;

        self.state.ledger.credit(offer.amount);
        self.state.ledger.dilute(offer.dilution);

        let tick = self.state.tick();
        log::info!(
            "tick={tick} financing accepted: ${:.0} for {:.1}% (ownership now {:.1}%)",
            offer.amount,
            offer.dilution * 100.0,
            self.state.ownership() * 100.0
        );
        self.events.push(SimEvent::FinancingAccepted {
            tick,
            amount: offer.amount,
            dilution: offer.dilution,
            ownership_after: self.state.ownership(),
        });
        Ok(ActionOutcome::Applied)
    }

    fn decline_financing(&mut self) -> SimResult<ActionOutcome> {
        self.state
            .pending_financing
            .take()
            .ok_or_else(|| SimError::invalid("decline_financing", "no financing offer is pending"))?;
        self.events.push(SimEvent::FinancingDeclined { tick: self.state.tick() });
        Ok(ActionOutcome::Applied)
    }

    // ── Debt financing ────────────────────────────────────────────

    fn request_loan(&mut self) -> SimResult<ActionOutcome> {
        const NAME: &str = "request_loan";
        if self.state.pending_loan.is_some() {
            return Err(SimError::invalid(NAME, "a loan offer is already pending"));
        }

        let config = self.config;
        let finance = &config.finance;
        // With ads off the offer is for nothing, but it is still an offer.
        let amount = self.economy().projected_annual_ad_revenue() * finance.loan_fraction_of_revenue;

        // Each loan already outstanding doubles the interest rate.
        let outstanding = self.state.ledger.outstanding_loan_count() as i32;
        let interest = finance.loan_base_interest * 2f64.powi(outstanding);
        let tick = self.state.tick();
        let offer = LoanOffer {
            amount,
            amount_due: amount * (1.0 + interest),
            due_tick: tick + finance.loan_term_hours,
        };
        self.state.pending_loan = Some(offer);

        self.events.push(SimEvent::LoanOffered {
            tick,
            amount: offer.amount,
            amount_due: offer.amount_due,
            due_tick: offer.due_tick,
        });
        Ok(ActionOutcome::LoanOffered(offer))
    }

    fn accept_loan(&mut self) -> SimResult<ActionOutcome> {
        let offer = self
            .state
            .pending_loan
            .take()
            .ok_or_else(|| SimError::invalid("accept_loan", "no loan offer is pending"))?;

        self.state.ledger.credit(offer.amount);
        self.state.ledger.schedule_loan(offer.amount_due, offer.due_tick);

        let tick = self.state.tick();
        log::info!(
            "tick={tick} loan accepted: ${:.0}, ${:.0} due at tick {}",
            offer.amount,
            offer.amount_due,
            offer.due_tick
        );
        self.events.push(SimEvent::LoanAccepted {
            tick,
            amount: offer.amount,
            amount_due: offer.amount_due,
            due_tick: offer.due_tick,
        });
        Ok(ActionOutcome::Applied)
    }

    fn decline_loan(&mut self) -> SimResult<ActionOutcome> {
        self.state
            .pending_loan
            .take()
            .ok_or_else(|| SimError::invalid("decline_loan", "no loan offer is pending"))?;
        self.events.push(SimEvent::LoanDeclined { tick: self.state.tick() });
        Ok(ActionOutcome::Applied)
    }

    // ── Levers ────────────────────────────────────────────────────

    fn increase_ad_level(&mut self) -> SimResult<ActionOutcome> {
        if !self.state.can_increase_ad_level() {
            return Err(SimError::invalid("increase_ad_level", "ad level is already at maximum"));
        }
        self.state.ad_level += AD_LEVEL_STEP;
        Ok(ActionOutcome::Applied)
    }

    fn decrease_ad_level(&mut self) -> SimResult<ActionOutcome> {
        if !self.state.can_decrease_ad_level() {
            return Err(SimError::invalid("decrease_ad_level", "ads are already off"));
        }
        self.state.ad_level -= AD_LEVEL_STEP;
        Ok(ActionOutcome::Applied)
    }

    fn increase_marketing_spend(&mut self) -> SimResult<ActionOutcome> {
        self.state.marketing_spend = if self.state.marketing_spend == 0.0 {
            MIN_MARKETING_SPEND
        } else {
            self.state.marketing_spend * 1.5
        };
        Ok(ActionOutcome::Applied)
    }

    fn decrease_marketing_spend(&mut self) -> SimResult<ActionOutcome> {
        let reduced = self.state.marketing_spend * 2.0 / 3.0;
        self.state.marketing_spend = if reduced < MIN_MARKETING_SPEND { 0.0 } else { reduced };
        Ok(ActionOutcome::Applied)
    }

    // ── Team ──────────────────────────────────────────────────────

    fn hire(&mut self, role: Role) -> SimResult<ActionOutcome> {
        *self.state.team.headcount_mut(role) += 1;
        let headcount = self.state.team.headcount(role);
        let tick = self.state.tick();

        if role == Role::Engineer && self.state.is_down {
            let per_engineer = self.state.users() / headcount as f64;
            if per_engineer <= self.config.outage.max_users_per_engineer {
                self.state.is_down = false;
                log::info!("tick={tick} outage resolved with {headcount} engineers");
                self.events.push(SimEvent::OutageResolved { tick, engineers: headcount });
            }
        }

        self.events.push(SimEvent::TeamChanged { tick, role, headcount, severance: 0.0 });
        Ok(ActionOutcome::Applied)
    }

    fn fire(&mut self, role: Role, name: &'static str) -> SimResult<ActionOutcome> {
        if !self.state.can_fire(role) {
            return Err(SimError::invalid(name, format!("no {} to fire", role.name())));
        }

        let config = self.config;
        let payroll = &config.payroll;
        let hourly = match role {
            Role::DataScientist => payroll.data_scientist_hourly,
            Role::Moderator     => payroll.moderator_hourly,
            Role::Engineer      => payroll.engineer_hourly,
        };
        let severance = hourly * payroll.severance_hours;

        *self.state.team.headcount_mut(role) -= 1;
        self.state.ledger.debit(severance);

        self.events.push(SimEvent::TeamChanged {
            tick: self.state.tick(),
            role,
            headcount: self.state.team.headcount(role),
            severance,
        });
        Ok(ActionOutcome::Applied)
    }

    // ── Clock ─────────────────────────────────────────────────────

    fn set_tick_size(&mut self, hours: u64) -> SimResult<ActionOutcome> {
        let tick_size = TickSize::from_hours(hours)?;
        self.state.clock.set_tick_size(tick_size);
        self.events.push(SimEvent::TickSizeChanged { tick: self.state.tick(), hours });
        Ok(ActionOutcome::Applied)
    }
}
