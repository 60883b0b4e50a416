//! Notable state changes, recorded for observability.
//!
//! Events are informational only: nothing in the engine reads them back.
//! Variants are only ever appended.

use crate::{state::Role, types::Tick};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Tick engine ───────────────────────────────
    OutageStarted {
        tick: Tick,
        users: f64,
        engineers: u32,
    },
    LoanSettled {
        tick: Tick,
        due_tick: Tick,
        amount: f64,
    },

    // ── Player actions ────────────────────────────
    OutageResolved {
        tick: Tick,
        engineers: u32,
    },
    FinancingOffered {
        tick: Tick,
        amount: f64,
        dilution: f64,
    },
    FinancingAccepted {
        tick: Tick,
        amount: f64,
        dilution: f64,
        ownership_after: f64,
    },
    FinancingDeclined {
        tick: Tick,
    },
    LoanOffered {
        tick: Tick,
        amount: f64,
        amount_due: f64,
        due_tick: Tick,
    },
    LoanAccepted {
        tick: Tick,
        amount: f64,
        amount_due: f64,
        due_tick: Tick,
    },
    LoanDeclined {
        tick: Tick,
    },
    TeamChanged {
        tick: Tick,
        role: Role,
        headcount: u32,
        severance: f64,
    },
    TickSizeChanged {
        tick: Tick,
        hours: u64,
    },
}
