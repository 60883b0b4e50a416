//! Economy model — stateless formulas turning the current state into rates.
//!
//! Annual rates are converted to per-tick rates by dividing by the number
//! of ticks in a year. For two binomials with the same cumulative
//! probability over different trial counts n₁p₁ = n₂p₂, so a yearly
//! probability p spread over N ticks becomes p / N per tick.

use crate::{config::SimConfig, state::{SimState, AD_LEVEL_MAX, AD_LEVEL_STEP}};

pub struct EconomyModel<'a> {
    state:  &'a SimState,
    config: &'a SimConfig,
}

impl<'a> EconomyModel<'a> {
    pub fn new(state: &'a SimState, config: &'a SimConfig) -> Self {
        Self { state, config }
    }

    pub fn ticks_per_year(&self) -> f64 {
        self.state.clock.ticks_per_year()
    }

    fn hours_per_tick(&self) -> f64 {
        self.state.tick_size().hours() as f64
    }

    /// Sentiment penalty for the current ad level.
    pub fn ad_penalty(&self) -> f64 {
        let bucket = (self.state.ad_level.min(AD_LEVEL_MAX) / AD_LEVEL_STEP) as usize;
        self.config.economy.ad_penalty_table[bucket]
    }

    /// 0 without moderators, otherwise grows with moderators per user and
    /// saturates at 100.
    pub fn moderation_level(&self) -> f64 {
        let economy = &self.config.economy;
        let moderators = self.state.team.moderators;
        if moderators == 0 {
            return 0.0;
        }
        let users = self.state.users().max(economy.moderation_min_users);
        (moderators as f64 * economy.moderation_scale / users)
            .sqrt()
            .min(economy.max_moderation_level)
    }

    /// User goodwill, floored at 0.
    pub fn sentiment(&self) -> f64 {
        let economy = &self.config.economy;
        let moderation = (self.moderation_level() / economy.moderation_sentiment_divisor).round();
        (economy.base_sentiment - self.ad_penalty() - moderation).max(0.0)
    }

    /// Annual churn probability. Not clamped; can exceed 1 at low sentiment.
    pub fn annual_churn_probability(&self) -> f64 {
        let economy = &self.config.economy;
        economy.base_annual_churn
            + economy.churn_per_sentiment_point * (economy.base_sentiment - self.sentiment())
    }

    pub fn churn_probability_per_tick(&self) -> f64 {
        self.annual_churn_probability() / self.ticks_per_year()
    }

    /// Expected referrals per user per year, dampened as the user base
    /// approaches the saturation point.
    pub fn annual_referrals_per_user(&self) -> f64 {
        let economy = &self.config.economy;
        let sentiment = self.sentiment();
        let virality = (sentiment * sentiment / economy.referral_sentiment_divisor)
            .max(economy.min_annual_referrals);
        let saturation = economy.growth_saturation_users;
        virality / (1.0 + self.state.users().min(saturation) / saturation)
    }

    pub fn organic_growth_probability_per_tick(&self) -> f64 {
        self.annual_referrals_per_user() / self.ticks_per_year()
    }

    /// Concave in ad intensity; zero with ads off.
    pub fn ad_revenue_per_tick(&self) -> f64 {
        if self.state.ad_level == 0 {
            return 0.0;
        }
        let economy = &self.config.economy;
        let intensity = (economy.ad_log_offset + self.state.ad_level as f64 / 10.0).ln();
        intensity.powi(2)
            * (economy.ad_revenue_per_user_year / self.ticks_per_year())
            * self.state.users()
    }

    pub fn projected_annual_ad_revenue(&self) -> f64 {
        self.ad_revenue_per_tick() * self.ticks_per_year()
    }

    /// Chance that one marketing dollar buys one user.
    pub fn marketing_acquisition_probability_per_dollar(&self) -> f64 {
        1.0 / self.config.economy.marketing_cost_per_user
    }

    pub fn marketing_spend_per_tick(&self) -> f64 {
        self.state.marketing_spend * self.hours_per_tick()
    }

    /// Hourly payroll for data scientists and moderators over one tick.
    pub fn team_spend_per_tick(&self) -> f64 {
        let payroll = &self.config.payroll;
        let team = &self.state.team;
        self.hours_per_tick()
            * (team.data_scientists as f64 * payroll.data_scientist_hourly
                + team.moderators as f64 * payroll.moderator_hourly)
    }

    /// Users lost to an outage over one tick.
    pub fn outage_attrition_per_tick(&self) -> f64 {
        self.state.users() * self.config.outage.attrition_per_hour * self.hours_per_tick()
    }

    /// Whether the current user load would knock the service over.
    pub fn outage_triggered(&self) -> bool {
        let outage = &self.config.outage;
        let users = self.state.users();
        let engineers = self.state.team.engineers;
        users > outage.user_threshold
            && (engineers == 0 || users / engineers as f64 > outage.max_users_per_engineer)
    }

    /// Revenue multiple shrinks with scale and grows with sentiment.
    pub fn base_valuation_multiple(&self) -> f64 {
        let finance = &self.config.finance;
        let user_multiple = finance.valuation_user_base - self.state.users().ln();
        let sentiment_multiple =
            ((self.sentiment() - finance.valuation_sentiment_pivot) / 5.0).powi(2) / 10.0;
        user_multiple.max(1.0) * sentiment_multiple.max(1.0)
    }
}
