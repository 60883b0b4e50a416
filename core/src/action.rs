use crate::{
    error::{SimError, SimResult},
    state::{FinancingOffer, LoanOffer, Role},
    types::Hours,
};
use serde::{Deserialize, Serialize};

/// All player-issued actions.
/// Variants are only ever appended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    // ── Growth ────────────────────────────────────
    InviteFriends,

    // ── Financing ─────────────────────────────────
    RequestFinancing,
    AcceptFinancing,
    DeclineFinancing,
    RequestLoan,
    AcceptLoan,
    DeclineLoan,

    // ── Levers ────────────────────────────────────
    IncreaseAdLevel,
    DecreaseAdLevel,
    IncreaseMarketingSpend,
    DecreaseMarketingSpend,

    // ── Team ──────────────────────────────────────
    Hire { role: Role },
    Fire { role: Role },

    // ── Clock ─────────────────────────────────────
    FastForwardDay,
    FastForwardWeek,
    SetTickSize { hours: Hours },
}

impl Action {
    /// Parse a command name such as `hire_engineer` or `request_loan`.
    pub fn from_name(name: &str) -> SimResult<Self> {
        let action = match name {
            "invite_friends"           => Self::InviteFriends,
            "request_financing"        => Self::RequestFinancing,
            "accept_financing"         => Self::AcceptFinancing,
            "decline_financing"        => Self::DeclineFinancing,
            "request_loan"             => Self::RequestLoan,
            "accept_loan"              => Self::AcceptLoan,
            "decline_loan"             => Self::DeclineLoan,
            "increase_ad_level"        => Self::IncreaseAdLevel,
            "decrease_ad_level"        => Self::DecreaseAdLevel,
            "increase_marketing_spend" => Self::IncreaseMarketingSpend,
            "decrease_marketing_spend" => Self::DecreaseMarketingSpend,
            "hire_data_scientist"      => Self::Hire { role: Role::DataScientist },
            "hire_moderator"           => Self::Hire { role: Role::Moderator },
            "hire_engineer"            => Self::Hire { role: Role::Engineer },
            "fire_data_scientist"      => Self::Fire { role: Role::DataScientist },
            "fire_moderator"           => Self::Fire { role: Role::Moderator },
            "fire_engineer"            => Self::Fire { role: Role::Engineer },
            "fast_forward_day"         => Self::FastForwardDay,
            "fast_forward_week"        => Self::FastForwardWeek,
            _ => {
                return Err(SimError::UnknownAction { name: name.to_string() });
            }
        };
        Ok(action)
    }

    /// Stable name for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InviteFriends          => "invite_friends",
            Self::RequestFinancing       => "request_financing",
            Self::AcceptFinancing        => "accept_financing",
            Self::DeclineFinancing       => "decline_financing",
            Self::RequestLoan            => "request_loan",
            Self::AcceptLoan             => "accept_loan",
            Self::DeclineLoan            => "decline_loan",
            Self::IncreaseAdLevel        => "increase_ad_level",
            Self::DecreaseAdLevel        => "decrease_ad_level",
            Self::IncreaseMarketingSpend => "increase_marketing_spend",
            Self::DecreaseMarketingSpend => "decrease_marketing_spend",
            Self::Hire { role: Role::DataScientist } => "hire_data_scientist",
            Self::Hire { role: Role::Moderator }     => "hire_moderator",
            Self::Hire { role: Role::Engineer }      => "hire_engineer",
            Self::Fire { role: Role::DataScientist } => "fire_data_scientist",
            Self::Fire { role: Role::Moderator }     => "fire_moderator",
            Self::Fire { role: Role::Engineer }      => "fire_engineer",
            Self::FastForwardDay         => "fast_forward_day",
            Self::FastForwardWeek        => "fast_forward_week",
            Self::SetTickSize { .. }     => "set_tick_size",
        }
    }
}

/// What an accepted action produced, for the caller to render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ActionOutcome {
    Applied,
    FinancingOffered(FinancingOffer),
    LoanOffered(LoanOffer),
    FastForwarded(Vec<crate::engine::TickSummary>),
}
