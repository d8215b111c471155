use std::path::PathBuf;
use std::sync::Arc;

use ct_terminal::config::DatasetConfig;
use ct_terminal::dataset::{Table, load};
use ct_terminal::persist::FilterPrefs;
use ct_terminal::state::AppState;

fn fixture_state() -> AppState {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("champions_trophy.csv");
    let cfg = DatasetConfig {
        fallbacks: Vec::new(),
        ..DatasetConfig::default()
    }
    .with_primary(path);
    let table: Table = load(&cfg).expect("fixture should load");
    AppState::new(Arc::new(table))
}

#[test]
fn starts_unfiltered() {
    let state = fixture_state();
    assert_eq!(state.view().len(), 10);
    assert_eq!(state.filter_label(), "All years | All teams");
    assert_eq!(state.years(), &[2013, 2017, 2025]);
    assert_eq!(state.roster().len(), 8);
}

#[test]
fn year_cycle_wraps_through_all() {
    let mut state = fixture_state();
    state.cycle_year(true);
    assert_eq!(state.year_filter(), Some(2013));
    state.cycle_year(true);
    state.cycle_year(true);
    assert_eq!(state.year_filter(), Some(2025));
    assert_eq!(state.view().len(), 3);
    state.cycle_year(true);
    assert_eq!(state.year_filter(), None);
    assert_eq!(state.view().len(), 10);

    state.cycle_year(false);
    assert_eq!(state.year_filter(), Some(2025));
}

#[test]
fn combined_filters_match_filter_by() {
    let mut state = fixture_state();
    state.set_year_filter(Some(2017));
    state.set_team_filter(Some("Pakistan"));
    assert_eq!(state.view().len(), 2);
    assert_eq!(state.filter_label(), "2017 | Pakistan");

    state.set_year_filter(Some(2013));
    assert_eq!(state.view().len(), 1);
}

#[test]
fn unknown_filter_values_are_dropped() {
    let mut state = fixture_state();
    state.set_team_filter(Some("Zimbabwe"));
    assert_eq!(state.team_filter(), None);
    state.set_year_filter(Some(1998));
    assert_eq!(state.year_filter(), None);
    assert_eq!(state.view().len(), 10);
}

#[test]
fn selection_is_clamped_when_view_shrinks() {
    let mut state = fixture_state();
    for _ in 0..9 {
        state.select_next();
    }
    assert_eq!(state.selected, 9);
    state.set_year_filter(Some(2013));
    assert_eq!(state.selected, 1);
    state.select_next();
    assert_eq!(state.selected, 0);
    state.select_prev();
    assert_eq!(state.selected, 1);
    assert!(state.selected_match().is_some());

    state.clear_filters();
    assert_eq!(state.view().len(), 10);
}

#[test]
fn predict_slots_never_pick_the_same_team() {
    let mut state = fixture_state();
    assert_eq!(state.predict_teams(), Some(("Australia", "Bangladesh")));
    state.cycle_predict_a();
    assert_eq!(state.predict_teams(), Some(("England", "Bangladesh")));
    for _ in 0..20 {
        state.cycle_predict_b();
        let (a, b) = state.predict_teams().expect("roster has teams");
        assert_ne!(a, b);
    }
}

#[test]
fn prediction_ignores_active_filters() {
    let mut state = fixture_state();
    state.apply_prefs(&FilterPrefs {
        predict_a: Some("India".to_string()),
        predict_b: Some("Pakistan".to_string()),
        ..FilterPrefs::default()
    });
    let unfiltered = state.prediction().expect("two teams picked");
    state.set_year_filter(Some(2013));
    let filtered = state.prediction().expect("two teams picked");
    assert_eq!(unfiltered, filtered);
    assert_eq!(filtered.h2h.played, 4);
}

#[test]
fn prefs_round_trip_through_state() {
    let mut state = fixture_state();
    let prefs = FilterPrefs {
        year: Some(2017),
        team: Some("India".to_string()),
        predict_a: Some("India".to_string()),
        predict_b: Some("Pakistan".to_string()),
    };
    state.apply_prefs(&prefs);
    assert_eq!(state.view().len(), 2);
    assert_eq!(state.prefs(), prefs);
}

#[test]
fn stale_prefs_are_ignored() {
    let mut state = fixture_state();
    state.apply_prefs(&FilterPrefs {
        year: Some(1998),
        team: Some("Kenya".to_string()),
        predict_a: Some("Bangladesh".to_string()),
        predict_b: Some("Bangladesh".to_string()),
    });
    assert_eq!(state.year_filter(), None);
    assert_eq!(state.team_filter(), None);
    let (a, b) = state.predict_teams().expect("roster has teams");
    assert_eq!(a, "Bangladesh");
    assert_ne!(a, b);
}

#[test]
fn console_keeps_recent_lines() {
    let mut state = fixture_state();
    for idx in 0..250 {
        state.push_log(format!("[INFO] line {idx}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}
