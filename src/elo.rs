use std::collections::HashMap;

use crate::dataset::Table;
use crate::record::Winner;

pub const BASE_RATING: f64 = 1500.0;

#[derive(Debug, Clone, Copy)]
pub struct EloConfig {
    pub k: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self { k: 24.0 }
    }
}

/// Chronological Elo over decided matches. Tournament venues are treated as
/// neutral, so there is no home bonus.
pub fn compute_ratings(table: &Table, cfg: EloConfig) -> HashMap<String, f64> {
    let mut matches: Vec<_> = table
        .iter()
        .filter(|m| matches!(m.winner, Winner::Team(_)))
        .collect();
    matches.sort_by(|a, b| a.date.cmp(&b.date).then(a.line.cmp(&b.line)));

    let mut elo: HashMap<String, f64> = HashMap::new();
    for m in matches {
        let ea = *elo.entry(m.team_a.clone()).or_insert(BASE_RATING);
        let eb = *elo.entry(m.team_b.clone()).or_insert(BASE_RATING);

        let expected_a = expected_score(ea, eb);
        let s_a = if m.winner_name() == Some(m.team_a.as_str()) {
            1.0
        } else {
            0.0
        };

        let delta = cfg.k * (s_a - expected_a);
        elo.insert(m.team_a.clone(), ea + delta);
        elo.insert(m.team_b.clone(), eb - delta);
    }

    elo
}

pub fn expected_score(r_a: f64, r_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf(-(r_a - r_b) / 400.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ratings_are_even() {
        assert!((expected_score(1500.0, 1500.0) - 0.5).abs() < 1e-12);
        assert!(expected_score(1700.0, 1500.0) > 0.75);
    }
}
