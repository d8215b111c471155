use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::dataset::Table;
use crate::stats::team_summaries;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub matches: usize,
    pub teams: usize,
}

/// Writes `view` (rows as normalized) plus per-team summaries to an xlsx
/// workbook at `path`.
pub fn export_view(path: &Path, view: &Table) -> Result<ExportReport> {
    let match_rows = match_rows(view);
    let team_rows = team_rows(view);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matches")?;
        write_rows(sheet, &match_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Teams")?;
        write_rows(sheet, &team_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    let report = ExportReport {
        matches: match_rows.len().saturating_sub(1),
        teams: team_rows.len().saturating_sub(1),
    };
    info!(
        "exported {} matches, {} teams to {}",
        report.matches,
        report.teams,
        path.display()
    );
    Ok(report)
}

fn match_rows(view: &Table) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Date".to_string(),
        "Year".to_string(),
        "Team 1".to_string(),
        "Team 2".to_string(),
        "Winner".to_string(),
        "Margin".to_string(),
        "Ground".to_string(),
        "Toss Winner".to_string(),
        "Toss Decision".to_string(),
    ]];
    for m in view {
        rows.push(vec![
            m.date.format("%Y-%m-%d").to_string(),
            m.year.to_string(),
            m.team_a.clone(),
            m.team_b.clone(),
            m.winner.label().to_string(),
            m.margin.text.clone(),
            m.ground.clone(),
            m.toss_winner.clone(),
            m.toss_decision.label().to_string(),
        ]);
    }
    rows
}

fn team_rows(view: &Table) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Team".to_string(),
        "Played".to_string(),
        "Won".to_string(),
        "Lost".to_string(),
        "No Result".to_string(),
        "Win %".to_string(),
    ]];
    for s in team_summaries(view) {
        rows.push(vec![
            s.team.clone(),
            s.played.to_string(),
            s.won.to_string(),
            s.lost.to_string(),
            s.no_result.to_string(),
            format!("{:.1}", s.win_pct()),
        ]);
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
