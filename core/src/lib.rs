//! Glupper — a tick-driven startup simulation.
//!
//! One company accrues users, revenue and sentiment under player levers
//! (ads, marketing, hiring, fundraising, loans) and random churn, growth
//! and outages. Drive it with `SimEngine::step()` and
//! `SimEngine::apply_action()`, then read the state or a `SimSnapshot`.

pub mod action;
pub mod clock;
pub mod config;
pub mod economy;
pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod processor;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod types;
