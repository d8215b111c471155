use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CACHE_DIR: &str = "ct_terminal";
const PREFS_FILE: &str = "prefs.json";
const PREFS_VERSION: u32 = 1;

/// Filter selection remembered between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPrefs {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub predict_a: Option<String>,
    #[serde(default)]
    pub predict_b: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PrefsFile {
    version: u32,
    prefs: FilterPrefs,
}

pub fn load_prefs() -> FilterPrefs {
    prefs_path()
        .and_then(|path| load_prefs_from(&path))
        .unwrap_or_default()
}

pub fn save_prefs(prefs: &FilterPrefs) {
    if let Some(path) = prefs_path() {
        save_prefs_to(&path, prefs);
    }
}

pub fn load_prefs_from(path: &Path) -> Option<FilterPrefs> {
    let raw = fs::read_to_string(path).ok()?;
    let file = serde_json::from_str::<PrefsFile>(&raw).ok()?;
    if file.version != PREFS_VERSION {
        return None;
    }
    Some(file.prefs)
}

pub fn save_prefs_to(path: &Path, prefs: &FilterPrefs) {
    let Some(dir) = path.parent() else {
        return;
    };
    let _ = fs::create_dir_all(dir);

    let file = PrefsFile {
        version: PREFS_VERSION,
        prefs: prefs.clone(),
    };
    if let Ok(json) = serde_json::to_string(&file) {
        let tmp = path.with_extension("json.tmp");
        if fs::write(&tmp, json).is_ok() {
            let _ = fs::rename(&tmp, path);
        }
    }
}

fn prefs_path() -> Option<PathBuf> {
    // Prefer XDG cache.
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(PREFS_FILE));
        }
    }
    // Fallback to ~/.cache on linux-like systems.
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(PREFS_FILE),
    )
}
