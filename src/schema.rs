use std::fmt;

use csv::StringRecord;

/// Logical columns of the match results file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    MatchDate,
    TeamA,
    TeamB,
    Winner,
    Margin,
    Ground,
    Toss,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::MatchDate,
        Column::TeamA,
        Column::TeamB,
        Column::Winner,
        Column::Margin,
        Column::Ground,
        Column::Toss,
    ];

    /// Columns the normalizer cannot work without, whatever the config says.
    pub const CORE: [Column; 4] = [
        Column::MatchDate,
        Column::TeamA,
        Column::TeamB,
        Column::Winner,
    ];

    /// Short config key, as used in `CT_REQUIRED_COLUMNS`.
    pub fn key(self) -> &'static str {
        match self {
            Column::MatchDate => "date",
            Column::TeamA => "team_a",
            Column::TeamB => "team_b",
            Column::Winner => "winner",
            Column::Margin => "margin",
            Column::Ground => "ground",
            Column::Toss => "toss",
        }
    }

    pub fn from_key(raw: &str) -> Option<Column> {
        let key = normalize_header(raw);
        Column::ALL.into_iter().find(|col| {
            normalize_header(col.key()) == key || col.aliases().iter().any(|a| normalize_header(a) == key)
        })
    }

    /// Header spellings seen across revisions of the dataset.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::MatchDate => &["Match Date", "MatchDate", "Date"],
            Column::TeamA => &["Team 1", "Team1", "Team A", "Home Team"],
            Column::TeamB => &["Team 2", "Team2", "Team B", "Away Team"],
            Column::Winner => &["Winner", "Winning Team", "Result"],
            Column::Margin => &["Margin", "Win Margin", "Result Margin"],
            Column::Ground => &["Ground", "Venue", "Stadium"],
            Column::Toss => &["Toss", "Toss Decision", "Toss Result", "Toss Details"],
        }
    }

    fn display_name(self) -> &'static str {
        self.aliases()[0]
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Case-folds a header and drops everything that is not alphanumeric, so
/// `"Team 1"`, `"team_1"` and `"TEAM1"` compare equal.
pub fn normalize_header(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Position of each logical column within a concrete header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    positions: [Option<usize>; 7],
}

impl ColumnMap {
    /// Resolves headers against the alias table. Returns the map together with
    /// the required columns that could not be found.
    pub fn resolve(headers: &StringRecord, required: &[Column]) -> (ColumnMap, Vec<Column>) {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut map = ColumnMap::default();
        for col in Column::ALL {
            let pos = col.aliases().iter().find_map(|alias| {
                let alias = normalize_header(alias);
                normalized.iter().position(|h| *h == alias)
            });
            map.positions[col as usize] = pos;
        }

        let mut missing: Vec<Column> = Column::CORE
            .iter()
            .chain(required.iter())
            .copied()
            .filter(|col| map.position(*col).is_none())
            .collect();
        missing.sort();
        missing.dedup();
        (map, missing)
    }

    pub fn position(&self, col: Column) -> Option<usize> {
        self.positions[col as usize]
    }

    /// Trimmed cell value, or an empty string when the column is absent.
    pub fn get<'r>(&self, record: &'r StringRecord, col: Column) -> &'r str {
        self.position(col)
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_team_spellings_resolve() {
        for headers in [
            vec!["Team 1", "Team 2", "Winner", "Match Date"],
            vec!["Team1", "Team2", "Winner", "Match Date"],
            vec!["team_1", "TEAM_2", "winner", "match_date"],
        ] {
            let (map, missing) = ColumnMap::resolve(&StringRecord::from(headers), &[]);
            assert!(missing.is_empty(), "unexpected missing: {missing:?}");
            assert_eq!(map.position(Column::TeamA), Some(0));
            assert_eq!(map.position(Column::TeamB), Some(1));
        }
    }

    #[test]
    fn missing_required_columns_are_reported_once() {
        let headers = StringRecord::from(vec!["Team1", "Team2", "Match Date"]);
        let (_, missing) = ColumnMap::resolve(&headers, &[Column::Winner, Column::Ground]);
        assert_eq!(missing, vec![Column::Winner, Column::Ground]);
    }

    #[test]
    fn config_keys_and_aliases_parse() {
        assert_eq!(Column::from_key("team_a"), Some(Column::TeamA));
        assert_eq!(Column::from_key("Venue"), Some(Column::Ground));
        assert_eq!(Column::from_key("nonsense"), None);
    }
}
