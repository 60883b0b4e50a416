//! The company's books: cash, users, founder equity and the loan schedule.
//!
//! Every numeric field of the company is mutated through this type.
//! The user floor of 1 is enforced once, by `close_tick()`; adjustments
//! in between may leave the user count temporarily below it.

use crate::types::Tick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MIN_USERS: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    users:     f64,
    money:     f64,
    ownership: f64,
    /// Due tick → amount owed. One entry per due date.
    outstanding_loans: BTreeMap<Tick, f64>,
}

impl Ledger {
    pub fn new(users: f64, money: f64, ownership: f64) -> Self {
        Self {
            users: users.max(MIN_USERS),
            money,
            ownership: ownership.clamp(0.0, 1.0),
            outstanding_loans: BTreeMap::new(),
        }
    }

    pub fn users(&self) -> f64 { self.users }
    pub fn money(&self) -> f64 { self.money }
    pub fn ownership(&self) -> f64 { self.ownership }

    pub fn outstanding_loans(&self) -> &BTreeMap<Tick, f64> {
        &self.outstanding_loans
    }

    pub fn outstanding_loan_count(&self) -> usize {
        self.outstanding_loans.len()
    }

    pub fn total_debt(&self) -> f64 {
        self.outstanding_loans.values().sum()
    }

    pub fn credit(&mut self, amount: f64) {
        self.money += amount;
    }

    pub fn debit(&mut self, amount: f64) {
        self.money -= amount;
    }

    pub fn add_users(&mut self, delta: f64) {
        self.users += delta;
    }

    pub fn remove_users(&mut self, delta: f64) {
        self.users -= delta;
    }

    /// Give up `fraction` of the remaining equity. Dilution is permanent.
    pub fn dilute(&mut self, fraction: f64) {
        self.ownership = (self.ownership * (1.0 - fraction.clamp(0.0, 1.0))).clamp(0.0, 1.0);
    }

    /// Add `amount` to whatever is already owed at `due_tick`.
    pub fn schedule_loan(&mut self, amount: f64, due_tick: Tick) {
        *self.outstanding_loans.entry(due_tick).or_insert(0.0) += amount;
    }

    /// Pay every loan due at or before `current_tick`.
    /// Returns the settled (due_tick, amount) pairs in due order.
    pub fn settle_due_loans(&mut self, current_tick: Tick) -> Vec<(Tick, f64)> {
        let not_yet_due = self.outstanding_loans.split_off(&(current_tick + 1));
        let due = std::mem::replace(&mut self.outstanding_loans, not_yet_due);
        for amount in due.values() {
            self.money -= amount;
        }
        due.into_iter().collect()
    }

    /// End-of-tick invariant: never fewer than one user.
    pub fn close_tick(&mut self) {
        if self.users < MIN_USERS {
            self.users = MIN_USERS;
        }
    }
}
