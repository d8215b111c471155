use anyhow::{Context, Result, anyhow};

use ct_terminal::config::{DatasetConfig, parse_flag, parse_path_flag};
use ct_terminal::dataset::{TableCache, narrow, team_roster};
use ct_terminal::export::export_view;
use ct_terminal::logging::{self, Sink};
use ct_terminal::predict::predict_match;
use ct_terminal::stats;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    logging::init(Sink::Stderr);

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut config = DatasetConfig::from_env();
    if let Some(path) = parse_path_flag(&args, "--data") {
        config = config.with_primary(path);
    }

    let cache = TableCache::new(config);
    let table = cache.get().context("unable to load match data")?;

    let year = parse_flag(&args, "--year")
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|_| anyhow!("--year expects a number, got {raw:?}"))
        })
        .transpose()?;
    let team = parse_flag(&args, "--team");

    let view = narrow(&table, year, team.as_deref());

    println!("Source: {}", table.source().display());
    println!("Matches loaded: {}", table.len());
    println!("Teams: {}", team_roster(&table).join(", "));
    println!();

    let label = match (year, team.as_deref()) {
        (Some(y), Some(t)) => format!("{t} in {y}"),
        (Some(y), None) => y.to_string(),
        (None, Some(t)) => t.to_string(),
        (None, None) => "all matches".to_string(),
    };
    println!("{label}: {} match(es)", view.len());
    for m in &view {
        println!(
            "  {}  {} v {}  -> {} {}  [{}; toss {} chose {}]",
            m.date.format("%Y-%m-%d"),
            m.team_a,
            m.team_b,
            m.winner.label(),
            m.margin.text,
            m.ground,
            m.toss_winner,
            m.toss_decision.label()
        );
    }

    let per_year = stats::matches_per_year(&view)
        .into_iter()
        .map(|(year, n)| format!("{year}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Per year: {per_year}");

    println!();
    println!("Wins:");
    for (team, wins) in stats::wins_by_team(&view) {
        println!("  {team:<16} {wins}");
    }

    let toss = stats::toss_decisions(&view);
    let impact = stats::toss_impact(&view);
    println!();
    println!(
        "Toss: bat {} / field {} / unknown {}; toss winner won {:.1}% of {} decided",
        toss.bat,
        toss.field,
        toss.unknown,
        impact.win_pct(),
        impact.decided
    );

    if let Some(pair) = parse_flag(&args, "--predict") {
        let Some((a, b)) = pair.split_once(':') else {
            return Err(anyhow!("--predict expects TEAM_A:TEAM_B, got {pair:?}"));
        };
        let pred = predict_match(&table, a.trim(), b.trim());
        println!();
        println!(
            "Prediction: {} {:.1}% v {} {:.1}% (confidence {}%, h2h {}-{} in {})",
            pred.team_a,
            pred.p_team_a,
            pred.team_b,
            pred.p_team_b,
            pred.confidence,
            pred.h2h.a_wins,
            pred.h2h.b_wins,
            pred.h2h.played
        );
        if let Some((code_a, code_b)) = pred.features {
            println!("Team codes: {code_a} v {code_b}");
        }
    }

    if let Some(path) = parse_path_flag(&args, "--export") {
        let report = export_view(&path, &view)?;
        println!();
        println!(
            "Exported {} matches, {} teams to {}",
            report.matches,
            report.teams,
            path.display()
        );
    }

    Ok(())
}
