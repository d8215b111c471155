use std::path::PathBuf;

use ct_terminal::config::DatasetConfig;
use ct_terminal::dataset::{Table, filter_by, load, narrow};
use ct_terminal::predict::{TeamEncoder, predict_match};
use ct_terminal::record::MarginUnit;
use ct_terminal::stats;

fn fixture_table() -> Table {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("champions_trophy.csv");
    let cfg = DatasetConfig {
        fallbacks: Vec::new(),
        ..DatasetConfig::default()
    }
    .with_primary(path);
    load(&cfg).expect("fixture should load")
}

#[test]
fn filter_by_year_and_team() {
    let table = fixture_table();
    let view = filter_by(&table, 2017, "Pakistan");
    assert_eq!(view.len(), 2);
    assert!(view.iter().all(|r| r.year == 2017 && r.involves("Pakistan")));
    assert_eq!(view.rows()[0].date_text, "2017-06-04");

    assert_eq!(filter_by(&table, 2013, "Pakistan").len(), 1);
}

#[test]
fn empty_filter_result_is_not_an_error() {
    let table = fixture_table();
    assert!(filter_by(&table, 2009, "India").is_empty());
    assert!(filter_by(&table, 2017, "Zimbabwe").is_empty());
    assert_eq!(table.len(), 10);
}

#[test]
fn narrow_applies_only_the_set_filters() {
    let table = fixture_table();
    assert_eq!(narrow(&table, None, None), table);
    assert_eq!(narrow(&table, Some(2025), None).len(), 3);
    assert_eq!(narrow(&table, None, Some("India")).len(), 6);
    assert_eq!(
        narrow(&table, Some(2017), Some("Pakistan")),
        filter_by(&table, 2017, "Pakistan")
    );
}

#[test]
fn team_records_count_wins_losses_and_washouts() {
    let table = fixture_table();
    let summaries = stats::team_summaries(&table);
    let india = summaries
        .iter()
        .find(|s| s.team == "India")
        .expect("India played");
    assert_eq!((india.played, india.won, india.lost, india.no_result), (6, 5, 1, 0));
    assert_eq!(summaries[0].team, "India");

    let australia = summaries
        .iter()
        .find(|s| s.team == "Australia")
        .expect("Australia played");
    assert_eq!(australia.no_result, 1);
    assert_eq!(australia.win_pct(), 0.0);

    let wins = stats::wins_by_team(&table);
    assert_eq!(wins[0], ("India".to_string(), 5));
    assert!(wins.iter().all(|(_, n)| *n > 0));
}

#[test]
fn matches_grouped_by_year() {
    let table = fixture_table();
    let per_year = stats::matches_per_year(&table);
    assert_eq!(per_year.get(&2013), Some(&2));
    assert_eq!(per_year.get(&2017), Some(&5));
    assert_eq!(per_year.get(&2025), Some(&3));
    assert_eq!(stats::years(&table), vec![2013, 2017, 2025]);
}

#[test]
fn toss_breakdown_and_impact() {
    let table = fixture_table();
    let toss = stats::toss_decisions(&table);
    assert_eq!((toss.bat, toss.field, toss.unknown), (3, 6, 1));

    let impact = stats::toss_impact(&table);
    assert_eq!(impact.decided, 8);
    assert_eq!(impact.toss_winner_won, 2);
    assert!((impact.win_pct() - 25.0).abs() < 1e-9);
}

#[test]
fn head_to_head_counts_both_home_and_away_listings() {
    let table = fixture_table();
    let h2h = stats::head_to_head(&table, "India", "Pakistan");
    assert_eq!(h2h.played, 4);
    assert_eq!(h2h.a_wins, 3);
    assert_eq!(h2h.b_wins, 1);
    assert_eq!(stats::head_to_head(&table, "India", "India").played, 0);
}

#[test]
fn largest_win_never_mixes_units() {
    let table = fixture_table();
    let by_runs = stats::largest_win(&table, MarginUnit::Runs).expect("run margins exist");
    assert_eq!(by_runs.margin.value, Some(180));
    assert_eq!(by_runs.winner_name(), Some("Pakistan"));

    let by_wickets = stats::largest_win(&table, MarginUnit::Wickets).expect("wicket margins exist");
    assert_eq!(by_wickets.margin.value, Some(8));
    assert!(stats::largest_win(&table, MarginUnit::Unknown).is_none());
}

#[test]
fn busiest_grounds_first() {
    let table = fixture_table();
    let grounds = stats::grounds(&table);
    assert_eq!(grounds[0].1, 3);
    assert!(grounds.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[test]
fn encoder_codes_follow_roster_order() {
    let table = fixture_table();
    let encoder = TeamEncoder::from_table(&table);
    assert_eq!(encoder.len(), 8);
    assert_eq!(encoder.code("Australia"), Some(0));
    assert_eq!(encoder.team(3), Some("India"));
    assert_eq!(encoder.encode("India", "Pakistan"), Some((3, 5)));
    assert_eq!(encoder.encode("India", "Kenya"), None);
}

#[test]
fn prediction_favours_the_stronger_record() {
    let table = fixture_table();
    let pred = predict_match(&table, "India", "Pakistan");
    assert!(pred.p_team_a > 50.0, "got {pred:?}");
    assert!((pred.p_team_a + pred.p_team_b - 100.0).abs() < 1e-9);
    assert_eq!(pred.favourite(), Some("India"));
    assert_eq!(pred.h2h.played, 4);
    assert_eq!(pred.features, Some((3, 5)));
    assert!(pred.confidence > 0 && pred.confidence <= 95);
}

#[test]
fn team_with_only_washouts_still_gets_a_prediction() {
    let table = fixture_table();
    let pred = predict_match(&table, "Australia", "India");
    assert_eq!(pred.features, Some((0, 3)));
    assert!(pred.p_team_a < 50.0, "got {pred:?}");
    assert!(pred.confidence > 0);
}

#[test]
fn prediction_for_unknown_team_is_even() {
    let table = fixture_table();
    let pred = predict_match(&table, "India", "Kenya");
    assert_eq!(pred.p_team_a, 50.0);
    assert_eq!(pred.p_team_b, 50.0);
    assert_eq!(pred.confidence, 0);
    assert_eq!(pred.features, None);
    assert_eq!(pred.favourite(), None);

    let same = predict_match(&table, "India", "India");
    assert_eq!(same.confidence, 0);
}
