//! Economy model formulas.

use glupper_core::{
    clock::TickSize,
    config::SimConfig,
    economy::EconomyModel,
    ledger::Ledger,
    state::SimState,
};

fn state_with(users: f64, ad_level: u8, tick_size: TickSize) -> SimState {
    let mut state = SimState::new(tick_size);
    state.ledger = Ledger::new(users, 0.0, 1.0);
    state.ad_level = ad_level;
    state
}

#[test]
fn ad_revenue_is_zero_with_ads_off() {
    let config = SimConfig::default();
    let state = state_with(1_000.0, 0, TickSize::Hourly);
    assert_eq!(EconomyModel::new(&state, &config).ad_revenue_per_tick(), 0.0);
}

#[test]
fn ad_revenue_is_concave_in_ad_level() {
    let config = SimConfig::default();
    let revenue = |level| {
        let state = state_with(1_000.0, level, TickSize::Daily);
        EconomyModel::new(&state, &config).ad_revenue_per_tick()
    };
    let r10 = revenue(10);
    let r50 = revenue(50);
    let r100 = revenue(100);
    assert!(r10 > 0.0 && r50 > r10 && r100 > r50);
    assert!(r50 - r10 > r100 - r50, "marginal revenue must shrink");

    // ln(2.72)² × 25/365 × 1000 per daily tick at the reference level.
    let expected = 2.72f64.ln().powi(2) * 25.0 / 365.0 * 1_000.0;
    assert!((r10 - expected).abs() < 1e-9, "got {r10}, expected {expected}");
}

#[test]
fn sentiment_without_moderators_is_base_minus_ad_penalty() {
    let config = SimConfig::default();
    let penalties = [0.0, 1.0, 2.0, 3.0, 5.0, 7.0, 9.0, 11.0, 13.0, 15.0, 20.0];
    for (bucket, penalty) in penalties.iter().enumerate() {
        let state = state_with(10_000.0, bucket as u8 * 10, TickSize::Hourly);
        let economy = EconomyModel::new(&state, &config);
        assert_eq!(economy.moderation_level(), 0.0);
        assert_eq!(economy.sentiment(), 100.0 - penalty, "ad level {}", bucket * 10);
    }
}

#[test]
fn sentiment_subtracts_rounded_moderation() {
    let config = SimConfig::default();
    let mut state = state_with(10_000.0, 0, TickSize::Hourly);
    state.team.moderators = 1;
    let economy = EconomyModel::new(&state, &config);
    // sqrt(1e6 / 1e4) = 10 → round(10 / 5) = 2
    assert!((economy.moderation_level() - 10.0).abs() < 1e-9);
    assert_eq!(economy.sentiment(), 98.0);
}

#[test]
fn moderation_is_monotonic_and_saturates() {
    let config = SimConfig::default();
    let level = |moderators: u32, users: f64| {
        let mut state = state_with(users, 0, TickSize::Hourly);
        state.team.moderators = moderators;
        EconomyModel::new(&state, &config).moderation_level()
    };

    let mut previous = 0.0;
    for moderators in [1, 2, 5, 10, 100] {
        let current = level(moderators, 1_000_000.0);
        assert!(current >= previous, "not monotonic in moderators at {moderators}");
        previous = current;
    }

    let mut previous = f64::MAX;
    for users in [1_000.0, 10_000.0, 100_000.0, 1_000_000.0] {
        let current = level(3, users);
        assert!(current <= previous, "not decreasing in users at {users}");
        previous = current;
    }

    assert_eq!(level(1_000, 1_000.0), 100.0, "must saturate at 100");
    // Fewer than 100 users are treated as 100.
    assert_eq!(level(1, 5.0), level(1, 100.0));
}

#[test]
fn churn_probability_scales_with_tick_size() {
    let config = SimConfig::default();
    for (tick_size, ticks_per_year) in [
        (TickSize::Hourly, 8760.0),
        (TickSize::Daily, 365.0),
        (TickSize::Weekly, 8760.0 / 168.0),
    ] {
        let state = state_with(1_000.0, 0, tick_size);
        let economy = EconomyModel::new(&state, &config);
        assert_eq!(economy.annual_churn_probability(), 0.5);
        let per_tick = economy.churn_probability_per_tick();
        assert!((per_tick - 0.5 / ticks_per_year).abs() < 1e-12);
    }
}

#[test]
fn churn_rises_as_sentiment_falls() {
    let config = SimConfig::default();
    let state = state_with(1_000.0, 40, TickSize::Daily);
    let economy = EconomyModel::new(&state, &config);
    // Sentiment 95 → 0.5 + 0.5 × 5
    assert_eq!(economy.annual_churn_probability(), 3.0);
}

#[test]
fn organic_growth_floors_at_one_referral_and_saturates() {
    let config = SimConfig::default();

    let small = state_with(1.0, 0, TickSize::Hourly);
    let referrals = EconomyModel::new(&small, &config).annual_referrals_per_user();
    let expected = (100.0f64 * 100.0 / 3333.0) / (1.0 + 1e-8);
    assert!((referrals - expected).abs() < 1e-9);

    // Max ads and heavy moderation drag sentiment down to 60.
    let mut gloomy = state_with(1.0, 100, TickSize::Hourly);
    gloomy.team.moderators = 1_000;
    let gloomy_referrals = EconomyModel::new(&gloomy, &config).annual_referrals_per_user();
    let expected_gloomy = (60.0f64 * 60.0 / 3333.0) / (1.0 + 1e-8);
    assert!((gloomy_referrals - expected_gloomy).abs() < 1e-9, "got {gloomy_referrals}");

    let huge = state_with(5e8, 0, TickSize::Hourly);
    let huge_referrals = EconomyModel::new(&huge, &config).annual_referrals_per_user();
    assert!((huge_referrals - 3.0003 / 2.0).abs() < 1e-3, "got {huge_referrals}");
}

#[test]
fn team_spend_excludes_engineers() {
    let config = SimConfig::default();
    let mut state = state_with(1.0, 0, TickSize::Daily);
    state.team.data_scientists = 2;
    state.team.moderators = 3;
    state.team.engineers = 10;
    let spend = EconomyModel::new(&state, &config).team_spend_per_tick();
    assert_eq!(spend, 24.0 * (2.0 * 50.0 + 3.0 * 10.0));
}

#[test]
fn outage_requires_scale_and_understaffing() {
    let config = SimConfig::default();
    let triggered = |users: f64, engineers: u32| {
        let mut state = state_with(users, 0, TickSize::Hourly);
        state.team.engineers = engineers;
        EconomyModel::new(&state, &config).outage_triggered()
    };
    assert!(!triggered(50_000.0, 0), "at the threshold there is no outage");
    assert!(triggered(50_001.0, 0));
    assert!(triggered(120_000.0, 2));
    assert!(!triggered(100_000.0, 2));
}

#[test]
fn referrals_never_drop_below_one_per_year() {
    let mut config = SimConfig::default();
    config.economy.base_sentiment = 40.0;
    let state = state_with(1.0, 0, TickSize::Hourly);
    let referrals = EconomyModel::new(&state, &config).annual_referrals_per_user();
    assert!((referrals - 1.0 / (1.0 + 1e-8)).abs() < 1e-9, "got {referrals}");
}
