//! Transaction handlers: hiring, assets, growth and recurring actions.

use startup_sim_core::{
    config::SimConfig,
    economics::calculate_valuation,
    engine::SimEngine,
    event::LogKind,
    rng::{SubsystemRng, SubsystemSlot},
    state::{Assets, Attributes, GameState, MemberRole, Team, TeamMember},
    team::generate_candidate,
    transactions::{
        buy_asset, execute_growth_action, hire_role, hire_team_member, toggle_recurring_action,
        AssetKind,
    },
};

// ── Test helpers ────────────────────────────────────────────────────────────

fn member(id: &str, role: MemberRole) -> TeamMember {
    TeamMember {
        id: id.into(),
        role,
        attributes: Attributes { coding: 7, design: 2, marketing: 2 },
    }
}

fn state_with_cash(cash: f64) -> GameState {
    let config = SimConfig::default_test();
    let mut state = GameState {
        month: 3,
        cash,
        valuation: 0.0,
        users: 100,
        mrr_per_user: 5.0,
        team: Team {
            founder: Some(member("founder-1", MemberRole::Founder)),
            ..Team::default()
        },
        assets: Assets::default(),
        active_recurring_actions: Vec::new(),
        recurring_action_monthly_cost: 0.0,
        events: Vec::new(),
        game_over: false,
        is_advancing_month: false,
    };
    state.valuation = calculate_valuation(&state, &config.valuation);
    state
}

fn rng(seed: u64) -> SubsystemRng {
    SubsystemRng::new(seed, SubsystemSlot::Growth as u64)
}

fn assert_only_log_changed(before: &GameState, after: &GameState, kind: LogKind) {
    assert_eq!(after.events.len(), before.events.len() + 1);
    assert_eq!(after.events.last().map(|e| e.kind), Some(kind));
    let mut stripped = after.clone();
    stripped.events.pop();
    assert_eq!(&stripped, before, "rejection must not change anything but the log");
}

fn valuation_is_consistent(state: &GameState) -> bool {
    let config = SimConfig::default_test();
    state.valuation == calculate_valuation(state, &config.valuation)
}

// ── Hiring ──────────────────────────────────────────────────────────────────

#[test]
fn hiring_deducts_fee_and_adds_member() {
    let config = SimConfig::default_test();
    let state = state_with_cash(50_000.0);

    let next = hire_team_member(&state, member("eng-1", MemberRole::Engineer), &config);

    assert_eq!(next.cash, 40_000.0);
    assert_eq!(next.team.engineers.len(), 1);
    assert_eq!(next.team.engineers[0].id, "eng-1");
    assert_eq!(next.events.last().map(|e| e.message.as_str()), Some("Hired Engineer for $10,000"));
    assert!(valuation_is_consistent(&next));
    assert_eq!(state.team.engineers.len(), 0, "input snapshot must be untouched");
}

#[test]
fn hiring_without_cash_only_logs() {
    let config = SimConfig::default_test();
    let state = state_with_cash(6_999.0);

    let next = hire_team_member(&state, member("mkt-1", MemberRole::Marketer), &config);

    assert_only_log_changed(&state, &next, LogKind::Negative);
    assert_eq!(next.events.last().map(|e| e.message.as_str()), Some("Not enough cash to hire Marketer!"));
}

#[test]
fn founders_cannot_be_hired() {
    let config = SimConfig::default_test();
    let state = state_with_cash(50_000.0);

    let next = hire_team_member(&state, member("f-2", MemberRole::Founder), &config);
    assert_only_log_changed(&state, &next, LogKind::Negative);

    let next = hire_role(&state, MemberRole::Founder, &config, &mut rng(1));
    assert_only_log_changed(&state, &next, LogKind::Negative);
}

#[test]
fn hire_role_generates_a_candidate_in_range() {
    let config = SimConfig::default_test();
    let state = state_with_cash(50_000.0);

    let next = hire_role(&state, MemberRole::Designer, &config, &mut rng(7));

    assert_eq!(next.team.designers.len(), 1);
    let attrs = next.team.designers[0].attributes;
    assert!((6..=9).contains(&attrs.design));
    assert!((2..=5).contains(&attrs.coding));
    assert_eq!(next.cash, 42_000.0);
}

#[test]
fn engine_hires_a_pregenerated_candidate() {
    let mut engine = SimEngine::build_test(7).expect("engine");
    let cash = engine.state().cash;
    let candidate = generate_candidate(MemberRole::Engineer, &mut rng(1)).expect("engineer candidate");

    let next = engine.hire_member(candidate.clone());

    assert_eq!(next.cash, cash - 10_000.0);
    assert_eq!(next.team.engineers, vec![candidate]);
    assert!(valuation_is_consistent(next));
}

// ── Assets ──────────────────────────────────────────────────────────────────

#[test]
fn patent_purchase_raises_valuation_by_bonus() {
    let config = SimConfig::default_test();
    let state = state_with_cash(30_000.0);

    let next = buy_asset(&state, AssetKind::Patent, &config);

    assert_eq!(next.cash, 5_000.0);
    assert_eq!(next.assets.patents, 1);
    assert_eq!(next.valuation - state.valuation, 25_000.0);
    assert!(valuation_is_consistent(&next));
}

#[test]
fn infra_upgrades_follow_price_ladder() {
    let config = SimConfig::default_test();
    let mut state = state_with_cash(100_000.0);

    for (expected_level, expected_cash) in [(1, 90_000.0), (2, 65_000.0), (3, 15_000.0)] {
        state = buy_asset(&state, AssetKind::Infra, &config);
        assert_eq!(state.assets.infra_level, expected_level);
        assert_eq!(state.cash, expected_cash);
    }
    assert_eq!(
        state.events.last().map(|e| e.message.as_str()),
        Some("Upgraded Infrastructure to level 3 for $50,000")
    );
}

#[test]
fn infra_at_max_level_is_a_no_op() {
    let config = SimConfig::default_test();
    let mut state = state_with_cash(100_000.0);
    state.assets.infra_level = 3;

    let next = buy_asset(&state, AssetKind::Infra, &config);

    assert_only_log_changed(&state, &next, LogKind::Info);
    assert_eq!(next.assets.infra_level, 3);
}

#[test]
fn infra_upgrade_without_cash_only_logs() {
    let config = SimConfig::default_test();
    let mut state = state_with_cash(24_999.0);
    state.assets.infra_level = 1;

    let next = buy_asset(&state, AssetKind::Infra, &config);
    assert_only_log_changed(&state, &next, LogKind::Negative);
}

// ── Growth actions ──────────────────────────────────────────────────────────

#[test]
fn growth_action_logs_cost_before_effect() {
    let config = SimConfig::default_test();
    let state = state_with_cash(20_000.0);

    let next = execute_growth_action(&state, "product_hunt", &config, &mut rng(3));

    assert_eq!(next.cash, 15_000.0);
    assert!(next.users > state.users, "product hunt always adds users");
    let new_entries = &next.events[state.events.len()..];
    assert_eq!(new_entries.len(), 2);
    assert_eq!(new_entries[0].message, "Spent $5,000 on Product Hunt Launch.");
    assert!(valuation_is_consistent(&next));
}

/// A boost on an enormous user base clamps at `u64::MAX`.
#[test]
fn growth_action_saturates_user_count() {
    let config = SimConfig::default_test();
    let mut state = state_with_cash(20_000.0);
    state.users = 15_000_000_000_000_000_000;

    let next = execute_growth_action(&state, "product_hunt", &config, &mut rng(3));

    assert_eq!(next.cash, 15_000.0);
    assert_eq!(next.users, u64::MAX);
}

#[test]
fn gamble_either_pays_off_or_flops() {
    let config = SimConfig::default_test();
    let state = state_with_cash(20_000.0);

    for seed in 0..20 {
        let next = execute_growth_action(&state, "influencer_shoutout", &config, &mut rng(seed));
        assert_eq!(next.cash, 5_000.0);
        let last = next.events.last().map(|e| e.message.clone()).unwrap_or_default();
        if next.users == state.users {
            assert!(last.contains("flopped"), "seed {seed}: {last}");
        } else {
            assert!(last.contains("success"), "seed {seed}: {last}");
            assert!(next.users >= state.users + 100, "at least 1× current users");
        }
    }
}

#[test]
fn unaffordable_or_unknown_growth_actions_only_log() {
    let config = SimConfig::default_test();
    let state = state_with_cash(4_999.0);

    let next = execute_growth_action(&state, "product_hunt", &config, &mut rng(1));
    assert_only_log_changed(&state, &next, LogKind::Negative);

    let next = execute_growth_action(&state, "skywriting", &config, &mut rng(1));
    assert_only_log_changed(&state, &next, LogKind::Negative);
}

// ── Recurring actions ───────────────────────────────────────────────────────

/// Turning on paid ads from $1,500 pays the $1,000 setup and logs twice.
#[test]
fn toggling_on_pays_setup_and_tracks_cost() {
    let config = SimConfig::default_test();
    let state = state_with_cash(1_500.0);

    let next = toggle_recurring_action(&state, "paid_ads", &config);

    assert_eq!(next.cash, 500.0);
    assert!(next.is_recurring_active("paid_ads"));
    assert_eq!(next.recurring_action_monthly_cost, 250.0);
    let new_entries: Vec<&str> = next.events[state.events.len()..]
        .iter()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(new_entries, vec!["Paid $1,000 setup cost for Run Paid Ads.", "Started Run Paid Ads."]);
}

#[test]
fn toggling_off_never_refunds() {
    let config = SimConfig::default_test();
    let state = state_with_cash(10_000.0);

    let on = toggle_recurring_action(&state, "seo_campaign", &config);
    let off = toggle_recurring_action(&on, "seo_campaign", &config);

    assert_eq!(off.cash, 7_000.0);
    assert!(!off.is_recurring_active("seo_campaign"));
    assert_eq!(off.recurring_action_monthly_cost, 0.0);
    assert_eq!(off.events.last().map(|e| e.message.as_str()), Some("Stopped SEO Campaign."));
}

#[test]
fn two_active_actions_sum_their_costs() {
    let config = SimConfig::default_test();
    let state = state_with_cash(10_000.0);

    let next = toggle_recurring_action(&state, "paid_ads", &config);
    let next = toggle_recurring_action(&next, "seo_campaign", &config);

    assert_eq!(next.recurring_action_monthly_cost, 450.0);
    assert_eq!(next.active_recurring_actions, vec!["paid_ads", "seo_campaign"]);
}

#[test]
fn setup_cost_shortfall_only_logs() {
    let config = SimConfig::default_test();
    let state = state_with_cash(2_999.0);

    let next = toggle_recurring_action(&state, "seo_campaign", &config);
    assert_only_log_changed(&state, &next, LogKind::Negative);
}

// ── Game over ───────────────────────────────────────────────────────────────

#[test]
fn every_handler_is_inert_after_game_over() {
    let config = SimConfig::default_test();
    let mut state = state_with_cash(100_000.0);
    state.game_over = true;

    let results = [
        hire_team_member(&state, member("e", MemberRole::Engineer), &config),
        buy_asset(&state, AssetKind::Patent, &config),
        buy_asset(&state, AssetKind::Infra, &config),
        execute_growth_action(&state, "product_hunt", &config, &mut rng(1)),
        toggle_recurring_action(&state, "paid_ads", &config),
    ];
    for next in &results {
        assert_only_log_changed(&state, next, LogKind::Info);
    }
}
