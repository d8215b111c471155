pub mod assets;
pub mod config;
pub mod dataset;
pub mod elo;
pub mod export;
pub mod logging;
pub mod persist;
pub mod predict;
pub mod record;
pub mod schema;
pub mod state;
pub mod stats;

pub use config::DatasetConfig;
pub use dataset::{
    DatasetError, Table, TableCache, derive_year, filter_by, load, narrow, split_toss, team_roster,
};
pub use record::{Margin, MarginUnit, MatchRecord, TossDecision, Winner};
