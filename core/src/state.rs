//! The single company being simulated.
//!
//! One `SimState` is owned by the engine for the whole session. The tick
//! engine and the action processor are the only writers.

use crate::{
    clock::{SimClock, TickSize},
    config::SimConfig,
    ledger::Ledger,
    types::{Hours, Tick},
};
use serde::{Deserialize, Serialize};

pub const AD_LEVEL_STEP: u8 = 10;
pub const AD_LEVEL_MAX: u8 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimState {
    pub clock:  SimClock,
    pub ledger: Ledger,
    /// 0..=100 in steps of 10.
    pub ad_level: u8,
    /// Marketing budget per in-game hour.
    pub marketing_spend: f64,
    pub team: Team,
    /// Sticky; only an engineer hire clears it.
    pub is_down: bool,
    pub pending_financing: Option<FinancingOffer>,
    pub pending_loan:      Option<LoanOffer>,
    pub next_financing_tick: Tick,
    /// Cumulative manual invites; drives diminishing returns.
    pub friends_invited: f64,
}

impl SimState {
    pub fn new(tick_size: TickSize) -> Self {
        Self {
            clock: SimClock::new(tick_size),
            ledger: Ledger::new(1.0, 0.0, 1.0),
            ad_level: 0,
            marketing_spend: 0.0,
            team: Team::default(),
            is_down: false,
            pending_financing: None,
            pending_loan: None,
            next_financing_tick: 0,
            friends_invited: 0.0,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        let initial = &config.initial;
        Self {
            ledger: Ledger::new(initial.users, initial.money, initial.ownership),
            ..Self::new(initial.tick_size)
        }
    }

    pub fn tick(&self) -> Tick { self.clock.current_tick }
    pub fn tick_size(&self) -> TickSize { self.clock.tick_size }
    pub fn users(&self) -> f64 { self.ledger.users() }
    pub fn money(&self) -> f64 { self.ledger.money() }
    pub fn ownership(&self) -> f64 { self.ledger.ownership() }

    // ── Affordances ───────────────────────────────

    pub fn can_raise_financing_now(&self) -> bool {
        self.pending_financing.is_none() && self.tick() >= self.next_financing_tick
    }

    pub fn has_pending_financing(&self) -> bool {
        self.pending_financing.is_some()
    }

    pub fn can_request_loan(&self) -> bool {
        self.pending_loan.is_none()
    }

    pub fn has_pending_loan(&self) -> bool {
        self.pending_loan.is_some()
    }

    pub fn can_increase_ad_level(&self) -> bool {
        self.ad_level < AD_LEVEL_MAX
    }

    pub fn can_decrease_ad_level(&self) -> bool {
        self.ad_level > 0
    }

    pub fn can_decrease_marketing_spend(&self) -> bool {
        self.marketing_spend > 0.0
    }

    pub fn can_fire(&self, role: Role) -> bool {
        self.team.headcount(role) > 0
    }

    pub fn can_fast_forward(&self, horizon: Hours) -> bool {
        self.tick_size().divides(horizon)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    pub data_scientists: u32,
    pub moderators:      u32,
    pub engineers:       u32,
}

impl Team {
    pub fn headcount(&self, role: Role) -> u32 {
        match role {
            Role::DataScientist => self.data_scientists,
            Role::Moderator     => self.moderators,
            Role::Engineer      => self.engineers,
        }
    }

    pub fn headcount_mut(&mut self, role: Role) -> &mut u32 {
        match role {
            Role::DataScientist => &mut self.data_scientists,
            Role::Moderator     => &mut self.moderators,
            Role::Engineer      => &mut self.engineers,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    DataScientist,
    Moderator,
    Engineer,
}

impl Role {
    pub const ALL: [Role; 3] = [Self::DataScientist, Self::Moderator, Self::Engineer];

    pub fn name(&self) -> &'static str {
        match self {
            Self::DataScientist => "data_scientist",
            Self::Moderator     => "moderator",
            Self::Engineer      => "engineer",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FinancingOffer {
    pub amount:   f64,
    /// Fraction of current ownership given up, in [0.1, 0.3].
    pub dilution: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LoanOffer {
    pub amount:     f64,
    pub amount_due: f64,
    pub due_tick:   Tick,
}
