use std::env;
use std::path::PathBuf;

use crate::schema::Column;

pub const DEFAULT_DATA_PATH: &str = "data/all_champions_trophy_matches_results.csv";
pub const DEFAULT_FALLBACK_PATH: &str = "all_champions_trophy_matches_results.csv";

/// Where the match file lives and what it has to look like.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetConfig {
    pub primary: PathBuf,
    pub fallbacks: Vec<PathBuf>,
    pub required_columns: Vec<Column>,
    pub delimiter: u8,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            primary: PathBuf::from(DEFAULT_DATA_PATH),
            fallbacks: vec![PathBuf::from(DEFAULT_FALLBACK_PATH)],
            required_columns: Column::ALL.to_vec(),
            delimiter: b',',
        }
    }
}

impl DatasetConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset or blank keys keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        if let Some(path) = get("CT_DATA_PATH") {
            cfg.primary = PathBuf::from(path.trim());
        }
        if let Some(raw) = get("CT_DATA_FALLBACKS") {
            cfg.fallbacks = split_list(&raw).map(PathBuf::from).collect();
        }
        if let Some(raw) = get("CT_REQUIRED_COLUMNS") {
            let cols: Vec<Column> = split_list(&raw).filter_map(Column::from_key).collect();
            if !cols.is_empty() {
                cfg.required_columns = cols;
            }
        }
        if let Some(raw) = get("CT_DELIMITER") {
            if let Some(delim) = parse_delimiter(&raw) {
                cfg.delimiter = delim;
            }
        }
        cfg
    }

    pub fn with_primary(mut self, path: impl Into<PathBuf>) -> Self {
        self.primary = path.into();
        self
    }

    /// Primary path first, then fallbacks, without repeats.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut out = vec![self.primary.clone()];
        for path in &self.fallbacks {
            if !out.contains(path) {
                out.push(path.clone());
            }
        }
        out
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split([',', ';', ' ', '\t', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

fn parse_delimiter(raw: &str) -> Option<u8> {
    match raw.trim() {
        "tab" | "\\t" => Some(b'\t'),
        other if other.len() == 1 && other.is_ascii() => other.bytes().next(),
        _ => None,
    }
}

/// Reads `--data <path>` or `--data=<path>` from the process arguments.
pub fn parse_data_path_arg() -> Option<PathBuf> {
    parse_path_flag(&env::args().skip(1).collect::<Vec<_>>(), "--data")
}

pub fn parse_path_flag(args: &[String], flag: &str) -> Option<PathBuf> {
    parse_flag(args, flag).map(PathBuf::from)
}

/// Value of `flag` given as `flag value` or `flag=value`; blank values are
/// skipped.
pub fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let cfg = DatasetConfig::from_lookup(|_| None);
        assert_eq!(cfg, DatasetConfig::default());
        assert_eq!(cfg.required_columns.len(), 7);
    }

    #[test]
    fn env_overrides_apply() {
        let cfg = DatasetConfig::from_lookup(lookup_from(&[
            ("CT_DATA_PATH", " /srv/ct.csv "),
            ("CT_DATA_FALLBACKS", "a.csv; b.csv"),
            ("CT_REQUIRED_COLUMNS", "date,team_a,bogus,Venue"),
            ("CT_DELIMITER", "tab"),
        ]));
        assert_eq!(cfg.primary, PathBuf::from("/srv/ct.csv"));
        assert_eq!(cfg.fallbacks, vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")]);
        assert_eq!(
            cfg.required_columns,
            vec![Column::MatchDate, Column::TeamA, Column::Ground]
        );
        assert_eq!(cfg.delimiter, b'\t');
    }

    #[test]
    fn candidates_skip_duplicates() {
        let cfg = DatasetConfig {
            fallbacks: vec![PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from("x.csv")],
            ..DatasetConfig::default()
        };
        assert_eq!(
            cfg.candidates(),
            vec![PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from("x.csv")]
        );
    }

    #[test]
    fn data_flag_forms() {
        let args = vec!["--data".to_string(), "m.csv".to_string()];
        assert_eq!(parse_path_flag(&args, "--data"), Some(PathBuf::from("m.csv")));
        let args = vec!["--data=n.csv".to_string()];
        assert_eq!(parse_path_flag(&args, "--data"), Some(PathBuf::from("n.csv")));
        assert_eq!(parse_path_flag(&[], "--data"), None);
    }
}
