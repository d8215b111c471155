use std::collections::HashMap;

use crate::dataset::{Table, team_roster};
use crate::elo::{self, BASE_RATING, EloConfig};
use crate::stats::{HeadToHead, head_to_head};

/// Meetings at which head-to-head history reaches its full weight.
const H2H_FULL_WEIGHT_MEETINGS: f64 = 6.0;
const H2H_MAX_WEIGHT: f64 = 0.5;

/// Categorical encoding of team names: index into the sorted roster.
#[derive(Debug, Clone, Default)]
pub struct TeamEncoder {
    teams: Vec<String>,
    index: HashMap<String, usize>,
}

impl TeamEncoder {
    pub fn from_table(table: &Table) -> Self {
        let teams = team_roster(table);
        let index = teams
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self { teams, index }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn code(&self, team: &str) -> Option<usize> {
        self.index.get(team).copied()
    }

    pub fn team(&self, code: usize) -> Option<&str> {
        self.teams.get(code).map(String::as_str)
    }

    pub fn encode(&self, a: &str, b: &str) -> Option<(usize, usize)> {
        Some((self.code(a)?, self.code(b)?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub team_a: String,
    pub team_b: String,
    /// Percent, sums to 100 with `p_team_b`.
    pub p_team_a: f64,
    pub p_team_b: f64,
    pub h2h: HeadToHead,
    /// Roster codes of the two teams; `None` when either is not in the table.
    pub features: Option<(usize, usize)>,
    /// 0..=100, grows with the amount of history behind the estimate.
    pub confidence: u8,
}

impl Prediction {
    pub fn favourite(&self) -> Option<&str> {
        if (self.p_team_a - self.p_team_b).abs() < f64::EPSILON {
            None
        } else if self.p_team_a > self.p_team_b {
            Some(self.team_a.as_str())
        } else {
            Some(self.team_b.as_str())
        }
    }
}

/// Win chances for `a` against `b`: Elo expectation blended with their
/// (Laplace-smoothed) head-to-head record.
pub fn predict_match(table: &Table, a: &str, b: &str) -> Prediction {
    let ratings = elo::compute_ratings(table, EloConfig::default());
    predict_with_ratings(table, &ratings, a, b)
}

pub fn predict_with_ratings(
    table: &Table,
    ratings: &HashMap<String, f64>,
    a: &str,
    b: &str,
) -> Prediction {
    let h2h = head_to_head(table, a, b);
    let features = TeamEncoder::from_table(table).encode(a, b);
    if features.is_none() || a == b {
        return Prediction {
            team_a: a.to_string(),
            team_b: b.to_string(),
            p_team_a: 50.0,
            p_team_b: 50.0,
            h2h,
            features,
            confidence: 0,
        };
    }

    // Teams with only washed-out games never got a rating update.
    let ra = ratings.get(a).copied().unwrap_or(BASE_RATING);
    let rb = ratings.get(b).copied().unwrap_or(BASE_RATING);
    let p_elo = elo::expected_score(ra, rb);

    let decided = (h2h.a_wins + h2h.b_wins) as f64;
    let p_h2h = (h2h.a_wins as f64 + 1.0) / (decided + 2.0);
    let w = (decided / H2H_FULL_WEIGHT_MEETINGS).min(1.0) * H2H_MAX_WEIGHT;
    let p_a = (1.0 - w) * p_elo + w * p_h2h;

    let played = table.iter().filter(|m| m.involves(a) || m.involves(b)).count() as f64;
    let confidence = (played * 4.0 + decided * 6.0).min(95.0).round() as u8;

    Prediction {
        team_a: a.to_string(),
        team_b: b.to_string(),
        p_team_a: p_a * 100.0,
        p_team_b: (1.0 - p_a) * 100.0,
        h2h,
        features,
        confidence,
    }
}
