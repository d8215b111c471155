use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ReaderBuilder, StringRecord};
use log::{info, warn};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::config::DatasetConfig;
use crate::record::{MatchRecord, Margin, Toss, TossDecision, Winner, parse_match_date, year_of};
use crate::schema::{Column, ColumnMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttempt {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for SourceAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.reason)
    }
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("match data unavailable; tried {}", join_attempts(.attempts))]
    DataUnavailable { attempts: Vec<SourceAttempt> },

    #[error("{}: missing required column(s): {}", .path.display(), join_columns(.missing))]
    SchemaViolation { path: PathBuf, missing: Vec<Column> },

    #[error("{}:{line}: cannot parse match date {value:?}", .path.display())]
    MalformedDate {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("{}:{line}: winner {winner:?} is neither {team_a:?} nor {team_b:?}", .path.display())]
    InconsistentWinner {
        path: PathBuf,
        line: usize,
        winner: String,
        team_a: String,
        team_b: String,
    },

    #[error("{}: unreadable delimited data: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

fn join_attempts(attempts: &[SourceAttempt]) -> String {
    if attempts.is_empty() {
        return "no locations".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_columns(cols: &[Column]) -> String {
    cols.iter()
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Normalized match table. Cheap to clone; rows are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    source: PathBuf,
    rows: Arc<[MatchRecord]>,
}

impl Table {
    pub fn new(source: impl Into<PathBuf>, rows: Vec<MatchRecord>) -> Self {
        Self {
            source: source.into(),
            rows: rows.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn rows(&self) -> &[MatchRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.rows.iter()
    }

    /// New table holding the rows that satisfy `keep`.
    pub fn retain_view(&self, keep: impl Fn(&MatchRecord) -> bool) -> Table {
        Table::new(
            self.source.clone(),
            self.rows.iter().filter(|r| keep(*r)).cloned().collect(),
        )
    }

    fn map_rows<E>(
        &self,
        f: impl Fn(&MatchRecord) -> Result<MatchRecord, E>,
    ) -> Result<Table, E> {
        let rows = self.rows.iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Table::new(self.source.clone(), rows))
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a MatchRecord;
    type IntoIter = std::slice::Iter<'a, MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Reads the first readable candidate location and normalizes it.
pub fn load(config: &DatasetConfig) -> Result<Table, DatasetError> {
    let mut attempts = Vec::new();
    for path in config.candidates() {
        match File::open(&path) {
            Ok(file) => {
                if !attempts.is_empty() {
                    info!("falling back to {}", path.display());
                }
                // Unreadable bytes count as a failed location; a file that
                // reads but breaks the schema or row rules does not.
                let table = match read_table(&path, file, config) {
                    Ok(table) => table,
                    Err(DatasetError::Read { path, source }) => {
                        warn!("match data unreadable at {}: {source}", path.display());
                        attempts.push(SourceAttempt {
                            path,
                            reason: source.to_string(),
                        });
                        continue;
                    }
                    Err(err) => return Err(err),
                };
                if table.is_empty() {
                    warn!("{} has a header but no match rows", path.display());
                } else {
                    info!("loaded {} matches from {}", table.len(), path.display());
                }
                return Ok(table);
            }
            Err(err) => {
                warn!("match data not readable at {}: {err}", path.display());
                attempts.push(SourceAttempt {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }
    Err(DatasetError::DataUnavailable { attempts })
}

/// Parses delimited match data from any reader. `path` only labels errors.
pub fn read_table(
    path: &Path,
    input: impl Read,
    config: &DatasetConfig,
) -> Result<Table, DatasetError> {
    let read_err = |source: csv::Error| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers().map_err(read_err)?.clone();
    let (columns, missing) = ColumnMap::resolve(&headers, &config.required_columns);
    if !missing.is_empty() {
        return Err(DatasetError::SchemaViolation {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(read_err)?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        // Header is line 1.
        let line = record.position().map_or(idx + 2, |p| p.line() as usize);
        rows.push(build_record(path, line, &columns, &record)?);
    }

    let table = Table::new(path, rows);
    let degraded = table
        .iter()
        .filter(|r| r.toss_decision == TossDecision::Unknown)
        .count();
    if degraded > 0 {
        warn!(
            "{}: {degraded} row(s) with unrecognised toss text, decision set to unknown",
            path.display()
        );
    }
    Ok(table)
}

fn build_record(
    path: &Path,
    line: usize,
    columns: &ColumnMap,
    record: &StringRecord,
) -> Result<MatchRecord, DatasetError> {
    let date_text = columns.get(record, Column::MatchDate);
    let team_a = columns.get(record, Column::TeamA);
    let team_b = columns.get(record, Column::TeamB);
    let winner_raw = columns.get(record, Column::Winner);

    let date = parse_match_date(date_text).ok_or_else(|| DatasetError::MalformedDate {
        path: path.to_path_buf(),
        line,
        value: date_text.to_string(),
    })?;
    let winner = Winner::resolve(winner_raw, team_a, team_b).ok_or_else(|| {
        DatasetError::InconsistentWinner {
            path: path.to_path_buf(),
            line,
            winner: winner_raw.to_string(),
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
        }
    })?;
    let toss_raw = columns.get(record, Column::Toss);
    let toss = Toss::parse(toss_raw);

    Ok(MatchRecord {
        line,
        date_text: date_text.to_string(),
        date,
        year: year_of(date),
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        winner,
        margin: Margin::parse(columns.get(record, Column::Margin)),
        ground: columns.get(record, Column::Ground).to_string(),
        toss_raw: toss_raw.to_string(),
        toss_winner: toss.winner,
        toss_decision: toss.decision,
    })
}

/// Re-derives `date` and `year` from each row's source date text.
pub fn derive_year(table: &Table) -> Result<Table, DatasetError> {
    table.map_rows(|row| {
        let date = parse_match_date(&row.date_text).ok_or_else(|| DatasetError::MalformedDate {
            path: table.source.clone(),
            line: row.line,
            value: row.date_text.clone(),
        })?;
        Ok(MatchRecord {
            date,
            year: year_of(date),
            ..row.clone()
        })
    })
}

/// Re-splits `toss_raw` into winner and decision for every row.
pub fn split_toss(table: &Table) -> Table {
    let rows = table
        .iter()
        .map(|row| {
            let toss = Toss::parse(&row.toss_raw);
            MatchRecord {
                toss_winner: toss.winner,
                toss_decision: toss.decision,
                ..row.clone()
            }
        })
        .collect();
    Table::new(table.source.clone(), rows)
}

/// Every team listed in either column, deduplicated and sorted.
pub fn team_roster(table: &Table) -> Vec<String> {
    table
        .iter()
        .flat_map(|r| [r.team_a.as_str(), r.team_b.as_str()])
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Rows from `year` in which `team` played on either side.
pub fn filter_by(table: &Table, year: i32, team: &str) -> Table {
    table.retain_view(|r| r.year == year && r.involves(team))
}

/// Applies whichever of the two filters is set; with both set this is
/// exactly [`filter_by`].
pub fn narrow(table: &Table, year: Option<i32>, team: Option<&str>) -> Table {
    match (year, team) {
        (Some(year), Some(team)) => filter_by(table, year, team),
        (Some(year), None) => table.retain_view(|r| r.year == year),
        (None, Some(team)) => table.retain_view(|r| r.involves(team)),
        (None, None) => table.clone(),
    }
}

/// Loads the table on first use and hands out the same instance afterwards.
#[derive(Debug)]
pub struct TableCache {
    config: DatasetConfig,
    table: OnceCell<Arc<Table>>,
}

impl TableCache {
    pub fn new(config: DatasetConfig) -> Self {
        Self {
            config,
            table: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn get(&self) -> Result<Arc<Table>, DatasetError> {
        self.table
            .get_or_try_init(|| load(&self.config).map(Arc::new))
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}
