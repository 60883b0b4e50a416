//! Read-only view of the whole simulation for a presentation layer.
//!
//! A snapshot is captured on demand after a step or action. It carries
//! every state field, the derived economy figures, and the affordance
//! predicates a UI needs to enable or disable its controls.

use crate::{
    engine::SimEngine,
    state::{FinancingOffer, LoanOffer, Role, Team},
    types::{Tick, HOURS_PER_DAY, HOURS_PER_WEEK},
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimSnapshot {
    pub tick:            Tick,
    pub day:             u64,
    pub hour:            u64,
    pub tick_size_hours: u64,

    pub users:           f64,
    pub money:           f64,
    pub ownership:       f64,
    pub ad_level:        u8,
    pub marketing_spend: f64,
    pub team:            Team,
    pub is_down:         bool,
    pub friends_invited: f64,

    pub outstanding_loans:   BTreeMap<Tick, f64>,
    pub pending_financing:   Option<FinancingOffer>,
    pub pending_loan:        Option<LoanOffer>,
    pub next_financing_tick: Tick,

    pub sentiment:                 f64,
    pub moderation_level:          f64,
    pub ad_revenue_per_tick:       f64,
    pub team_spend_per_tick:       f64,
    pub churn_probability_per_tick: f64,
    pub organic_growth_probability_per_tick: f64,

    pub affordances: Affordances,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Affordances {
    pub can_raise_financing_now:      bool,
    pub has_pending_financing:        bool,
    pub can_request_loan:             bool,
    pub has_pending_loan:             bool,
    pub can_increase_ad_level:        bool,
    pub can_decrease_ad_level:        bool,
    pub can_decrease_marketing_spend: bool,
    pub can_fire_data_scientist:      bool,
    pub can_fire_moderator:           bool,
    pub can_fire_engineer:            bool,
    pub can_fast_forward_day:         bool,
    pub can_fast_forward_week:        bool,
}

impl SimSnapshot {
    pub fn capture(engine: &SimEngine) -> Self {
        let state = engine.state();
        let economy = engine.economy();

        Self {
            tick:            state.tick(),
            day:             state.clock.day(),
            hour:            state.clock.hour_of_day(),
            tick_size_hours: state.tick_size().hours(),

            users:           state.users(),
            money:           state.money(),
            ownership:       state.ownership(),
            ad_level:        state.ad_level,
            marketing_spend: state.marketing_spend,
            team:            state.team,
            is_down:         state.is_down,
            friends_invited: state.friends_invited,

            outstanding_loans:   state.ledger.outstanding_loans().clone(),
            pending_financing:   state.pending_financing,
            pending_loan:        state.pending_loan,
            next_financing_tick: state.next_financing_tick,

            sentiment:                 economy.sentiment(),
            moderation_level:          economy.moderation_level(),
            ad_revenue_per_tick:       economy.ad_revenue_per_tick(),
            team_spend_per_tick:       economy.team_spend_per_tick(),
            churn_probability_per_tick: economy.churn_probability_per_tick(),
            organic_growth_probability_per_tick: economy.organic_growth_probability_per_tick(),

            affordances: Affordances {
                can_raise_financing_now:      state.can_raise_financing_now(),
                has_pending_financing:        state.has_pending_financing(),
                can_request_loan:             state.can_request_loan(),
                has_pending_loan:             state.has_pending_loan(),
                can_increase_ad_level:        state.can_increase_ad_level(),
                can_decrease_ad_level:        state.can_decrease_ad_level(),
                can_decrease_marketing_spend: state.can_decrease_marketing_spend(),
                can_fire_data_scientist:      state.can_fire(Role::DataScientist),
                can_fire_moderator:           state.can_fire(Role::Moderator),
                can_fire_engineer:            state.can_fire(Role::Engineer),
                can_fast_forward_day:         state.can_fast_forward(HOURS_PER_DAY),
                can_fast_forward_week:        state.can_fast_forward(HOURS_PER_WEEK),
            },
        }
    }
}
