//! Tuning constants for the simulation, grouped by concern.
//!
//! `SimConfig::default()` is the canonical game balance. A JSON file may
//! override any subset of fields; everything omitted keeps its default.

use crate::{clock::TickSize, types::Hours};
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub initial: InitialConfig,
    pub economy: EconomyConfig,
    pub outage:  OutageConfig,
    pub finance: FinanceConfig,
    pub payroll: PayrollConfig,
}

impl SimConfig {
    /// Load overrides from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {path}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .with_context(|| format!("Cannot parse {path}"))?;
        log::debug!("Loaded config from {path}");
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InitialConfig {
    pub tick_size: TickSize,
    pub users:     f64,
    pub money:     f64,
    pub ownership: f64,
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            tick_size: TickSize::Hourly,
            users:     1.0,
            money:     0.0,
            ownership: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EconomyConfig {
    pub base_sentiment: f64,
    /// Sentiment penalty per ad-level bucket, indexed by ad_level / 10.
    pub ad_penalty_table: [f64; 11],
    /// Annual churn probability at full sentiment.
    pub base_annual_churn: f64,
    /// Extra annual churn per sentiment point below full.
    pub churn_per_sentiment_point: f64,
    /// Minimum annual referrals per user.
    pub min_annual_referrals: f64,
    pub referral_sentiment_divisor: f64,
    /// User count at which organic growth is halved.
    pub growth_saturation_users: f64,
    /// Moderation effectiveness ceiling.
    pub max_moderation_level: f64,
    pub moderation_scale: f64,
    pub moderation_min_users: f64,
    /// Moderation points per sentiment point.
    pub moderation_sentiment_divisor: f64,
    /// Ad revenue per user per year at the reference ad level.
    pub ad_revenue_per_user_year: f64,
    pub ad_log_offset: f64,
    /// Customer acquisition cost in dollars.
    pub marketing_cost_per_user: f64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            base_sentiment: 100.0,
            ad_penalty_table: [0.0, 1.0, 2.0, 3.0, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0, 20.0],
            base_annual_churn: 0.5,
            churn_per_sentiment_point: 0.5,
            min_annual_referrals: 1.0,
            referral_sentiment_divisor: 3333.0,
            growth_saturation_users: 100_000_000.0,
            max_moderation_level: 100.0,
            moderation_scale: 1_000_000.0,
            moderation_min_users: 100.0,
            moderation_sentiment_divisor: 5.0,
            ad_revenue_per_user_year: 25.0,
            ad_log_offset: 1.72,
            marketing_cost_per_user: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutageConfig {
    /// Outages are impossible at or below this many users.
    pub user_threshold: f64,
    pub max_users_per_engineer: f64,
    /// Fraction of users lost per hour while down (~10% a week).
    pub attrition_per_hour: f64,
}

impl Default for OutageConfig {
    fn default() -> Self {
        Self {
            user_threshold: 50_000.0,
            max_users_per_engineer: 50_000.0,
            attrition_per_hour: 0.001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FinanceConfig {
    /// Hours between financing requests (~9 months).
    pub financing_cooldown_hours: Hours,
    pub dilution_min: f64,
    pub dilution_max: f64,
    pub valuation_jitter_min: f64,
    pub valuation_jitter_max: f64,
    pub max_cash_bonus: f64,
    pub valuation_user_base: f64,
    pub valuation_sentiment_pivot: f64,
    pub loan_term_hours: Hours,
    pub loan_base_interest: f64,
    /// Share of projected annual ad revenue offered as a loan.
    pub loan_fraction_of_revenue: f64,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            financing_cooldown_hours: 24 * 30 * 9,
            dilution_min: 0.1,
            dilution_max: 0.3,
            valuation_jitter_min: 0.75,
            valuation_jitter_max: 1.25,
            max_cash_bonus: 10_000.0,
            valuation_user_base: 30.0,
            valuation_sentiment_pivot: 50.0,
            loan_term_hours: 8760,
            loan_base_interest: 0.15,
            loan_fraction_of_revenue: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PayrollConfig {
    pub data_scientist_hourly: f64,
    pub moderator_hourly:      f64,
    /// Engineers only cost severance; they are not on hourly payroll.
    pub engineer_hourly:       f64,
    /// Severance is this many hours of the role's rate.
    pub severance_hours:       f64,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            data_scientist_hourly: 50.0,
            moderator_hourly:      10.0,
            engineer_hourly:       100.0,
            severance_hours:       50.0,
        }
    }
}
