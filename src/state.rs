use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::dataset::{Table, narrow, team_roster};
use crate::elo::{self, EloConfig};
use crate::persist::FilterPrefs;
use crate::predict::{Prediction, predict_with_ratings};
use crate::record::MatchRecord;
use crate::stats;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Matches,
    Teams,
    Toss,
    Predict,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub selected: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    table: Arc<Table>,
    years: Vec<i32>,
    roster: Vec<String>,
    ratings: HashMap<String, f64>,
    year_filter: Option<i32>,
    team_filter: Option<String>,
    view: Table,
    predict_a: usize,
    predict_b: usize,
}

impl AppState {
    pub fn new(table: Arc<Table>) -> Self {
        let years = stats::years(&table);
        let roster = team_roster(&table);
        let ratings = elo::compute_ratings(&table, EloConfig::default());
        let view = Table::clone(&table);
        Self {
            screen: Screen::Matches,
            selected: 0,
            help_overlay: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
            table,
            years,
            roster,
            ratings,
            year_filter: None,
            team_filter: None,
            view,
            predict_a: 0,
            predict_b: 1,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Rows matching the active year/team filters.
    pub fn view(&self) -> &Table {
        &self.view
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn year_filter(&self) -> Option<i32> {
        self.year_filter
    }

    pub fn team_filter(&self) -> Option<&str> {
        self.team_filter.as_deref()
    }

    pub fn set_year_filter(&mut self, year: Option<i32>) {
        self.year_filter = year.filter(|y| self.years.contains(y));
        self.refresh_view();
    }

    pub fn set_team_filter(&mut self, team: Option<&str>) {
        self.team_filter = team
            .filter(|t| self.roster.iter().any(|r| r == t))
            .map(str::to_string);
        self.refresh_view();
    }

    /// Steps through All -> each year -> All.
    pub fn cycle_year(&mut self, forward: bool) {
        let next = cycle_option(&self.years, self.year_filter.as_ref(), forward).copied();
        self.set_year_filter(next);
    }

    pub fn cycle_team(&mut self, forward: bool) {
        let next = cycle_option(&self.roster, self.team_filter.as_ref(), forward).cloned();
        self.set_team_filter(next.as_deref());
    }

    pub fn clear_filters(&mut self) {
        self.year_filter = None;
        self.team_filter = None;
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.view = narrow(&self.table, self.year_filter, self.team_filter.as_deref());
        self.clamp_selection();
    }

    pub fn filter_label(&self) -> String {
        let year = self
            .year_filter
            .map(|y| y.to_string())
            .unwrap_or_else(|| "All years".to_string());
        let team = self.team_filter.as_deref().unwrap_or("All teams");
        format!("{year} | {team}")
    }

    pub fn select_next(&mut self) {
        let total = self.view.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.view.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.view.len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn selected_match(&self) -> Option<&MatchRecord> {
        self.view.rows().get(self.selected)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn predict_teams(&self) -> Option<(&str, &str)> {
        let a = self.roster.get(self.predict_a)?;
        let b = self.roster.get(self.predict_b)?;
        Some((a.as_str(), b.as_str()))
    }

    pub fn cycle_predict_a(&mut self) {
        self.predict_a = self.next_predict_slot(self.predict_a, self.predict_b);
    }

    pub fn cycle_predict_b(&mut self) {
        self.predict_b = self.next_predict_slot(self.predict_b, self.predict_a);
    }

    // Advances `current`, skipping the team already picked on the other side.
    fn next_predict_slot(&self, current: usize, other: usize) -> usize {
        let total = self.roster.len();
        if total < 2 {
            return current;
        }
        let mut next = (current + 1) % total;
        if next == other {
            next = (next + 1) % total;
        }
        next
    }

    /// Uses the full table: filters narrow what is shown, not what is known.
    pub fn prediction(&self) -> Option<Prediction> {
        let (a, b) = self.predict_teams()?;
        Some(predict_with_ratings(&self.table, &self.ratings, a, b))
    }

    /// Restores a saved selection, ignoring values the current data lacks.
    pub fn apply_prefs(&mut self, prefs: &FilterPrefs) {
        self.year_filter = prefs.year.filter(|y| self.years.contains(y));
        self.team_filter = prefs
            .team
            .as_ref()
            .filter(|t| self.roster.contains(t))
            .cloned();
        if let Some(idx) = prefs.predict_a.as_ref().and_then(|t| self.roster_index(t)) {
            self.predict_a = idx;
        }
        if let Some(idx) = prefs.predict_b.as_ref().and_then(|t| self.roster_index(t)) {
            if idx != self.predict_a {
                self.predict_b = idx;
            }
        }
        if self.predict_a == self.predict_b {
            self.predict_b = self.next_predict_slot(self.predict_b, self.predict_a);
        }
        self.refresh_view();
    }

    pub fn prefs(&self) -> FilterPrefs {
        let (predict_a, predict_b) = match self.predict_teams() {
            Some((a, b)) => (Some(a.to_string()), Some(b.to_string())),
            None => (None, None),
        };
        FilterPrefs {
            year: self.year_filter,
            team: self.team_filter.clone(),
            predict_a,
            predict_b,
        }
    }

    fn roster_index(&self, team: &str) -> Option<usize> {
        self.roster.iter().position(|r| r == team)
    }
}

/// None -> first -> ... -> last -> None (reversed when `forward` is false).
fn cycle_option<'a, T: PartialEq>(
    items: &'a [T],
    current: Option<&T>,
    forward: bool,
) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let pos = current.and_then(|cur| items.iter().position(|item| item == cur));
    match (pos, forward) {
        (None, true) => items.first(),
        (None, false) => items.last(),
        (Some(idx), true) => items.get(idx + 1),
        (Some(0), false) => None,
        (Some(idx), false) => items.get(idx - 1),
    }
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Matches => "Matches",
        Screen::Teams => "Teams",
        Screen::Toss => "Toss",
        Screen::Predict => "Predict",
    }
}
