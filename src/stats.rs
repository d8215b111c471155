use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::dataset::Table;
use crate::record::{MarginUnit, MatchRecord, TossDecision, Winner};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamSummary {
    pub team: String,
    pub played: usize,
    pub won: usize,
    pub lost: usize,
    pub no_result: usize,
}

impl TeamSummary {
    /// Win share of decided matches, in percent.
    pub fn win_pct(&self) -> f64 {
        let decided = self.won + self.lost;
        if decided == 0 {
            return 0.0;
        }
        self.won as f64 * 100.0 / decided as f64
    }
}

/// Per-team record, most wins first, ties broken by name.
pub fn team_summaries(table: &Table) -> Vec<TeamSummary> {
    let mut by_team: HashMap<&str, TeamSummary> = HashMap::new();
    for m in table {
        for team in [m.team_a.as_str(), m.team_b.as_str()] {
            let entry = by_team.entry(team).or_insert_with(|| TeamSummary {
                team: team.to_string(),
                ..TeamSummary::default()
            });
            entry.played += 1;
            match &m.winner {
                Winner::NoResult => entry.no_result += 1,
                Winner::Team(w) if w == team => entry.won += 1,
                Winner::Team(_) => entry.lost += 1,
            }
        }
    }
    let mut out: Vec<TeamSummary> = by_team.into_values().collect();
    out.sort_by(|a, b| b.won.cmp(&a.won).then_with(|| a.team.cmp(&b.team)));
    out
}

pub fn wins_by_team(table: &Table) -> Vec<(String, usize)> {
    team_summaries(table)
        .into_iter()
        .filter(|s| s.won > 0)
        .map(|s| (s.team, s.won))
        .collect()
}

pub fn matches_per_year(table: &Table) -> BTreeMap<i32, usize> {
    let mut out = BTreeMap::new();
    for m in table {
        *out.entry(m.year).or_insert(0) += 1;
    }
    out
}

/// Distinct years in ascending order.
pub fn years(table: &Table) -> Vec<i32> {
    table
        .iter()
        .map(|m| m.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Matches per venue, busiest first.
pub fn grounds(table: &Table) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for m in table.iter().filter(|m| !m.ground.is_empty()) {
        *counts.entry(m.ground.as_str()).or_insert(0) += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(ground, n)| (ground.to_string(), n))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TossBreakdown {
    pub bat: usize,
    pub field: usize,
    pub unknown: usize,
}

pub fn toss_decisions(table: &Table) -> TossBreakdown {
    let mut out = TossBreakdown::default();
    for m in table {
        match m.toss_decision {
            TossDecision::Bat => out.bat += 1,
            TossDecision::Field => out.field += 1,
            TossDecision::Unknown => out.unknown += 1,
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TossImpact {
    /// Decided matches where the toss winner is known.
    pub decided: usize,
    pub toss_winner_won: usize,
}

impl TossImpact {
    pub fn win_pct(&self) -> f64 {
        if self.decided == 0 {
            return 0.0;
        }
        self.toss_winner_won as f64 * 100.0 / self.decided as f64
    }
}

pub fn toss_impact(table: &Table) -> TossImpact {
    let mut out = TossImpact::default();
    for won in table.iter().filter_map(MatchRecord::toss_winner_won) {
        out.decided += 1;
        if won {
            out.toss_winner_won += 1;
        }
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadToHead {
    pub team_a: String,
    pub team_b: String,
    pub played: usize,
    pub a_wins: usize,
    pub b_wins: usize,
    pub no_result: usize,
}

pub fn head_to_head(table: &Table, a: &str, b: &str) -> HeadToHead {
    let mut out = HeadToHead {
        team_a: a.to_string(),
        team_b: b.to_string(),
        ..HeadToHead::default()
    };
    if a == b {
        return out;
    }
    for m in table
        .iter()
        .filter(|m| m.involves(a) && m.opponent_of(a) == Some(b))
    {
        out.played += 1;
        match m.winner_name() {
            Some(w) if w == a => out.a_wins += 1,
            Some(w) if w == b => out.b_wins += 1,
            _ => out.no_result += 1,
        }
    }
    out
}

/// Biggest win measured in `unit`; margins in other units are never compared.
pub fn largest_win(table: &Table, unit: MarginUnit) -> Option<&MatchRecord> {
    if unit == MarginUnit::Unknown {
        return None;
    }
    table
        .iter()
        .filter(|m| m.margin.unit == unit && m.winner_name().is_some())
        .filter_map(|m| m.margin.value.map(|v| (v, m)))
        .max_by(|(va, ma), (vb, mb)| va.cmp(vb).then_with(|| mb.line.cmp(&ma.line)))
        .map(|(_, m)| m)
}
