use crate::session::{HistoryEntry, Session};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const HISTORY_KEY: &str = "eazi-calculator-history";
pub const LAST_RESULT_KEY: &str = "eazi-calculator-last-result";

/// Keeps history and the last result as two files in one directory.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        HistoryStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn history_path(&self) -> PathBuf {
        self.dir.join(format!("{HISTORY_KEY}.json"))
    }

    fn last_result_path(&self) -> PathBuf {
        self.dir.join(LAST_RESULT_KEY)
    }

    /// Saved history, or nothing if it is missing or unreadable.
    pub fn load_history(&self) -> Vec<HistoryEntry> {
        match self.try_load_history() {
            Ok(history) => history,
            Err(e) => {
                warn!("error loading history: {e:#}");
                Vec::new()
            }
        }
    }

    fn try_load_history(&self) -> Result<Vec<HistoryEntry>> {
        let path = self.history_path();
        let Some(text) = read_optional(&path)? else {
            return Ok(Vec::new());
        };
        let history: Vec<HistoryEntry> = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        debug!("loaded {} history entries", history.len());
        Ok(history)
    }

    pub fn load_last_result(&self) -> Option<f64> {
        let path = self.last_result_path();
        let text = match read_optional(&path) {
            Ok(text) => text?,
            Err(e) => {
                warn!("error loading last result: {e:#}");
                return None;
            }
        };
        match text.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                warn!("ignoring stored last result {:?}", text.trim());
                None
            }
        }
    }

    pub fn save(&self, history: &[HistoryEntry], last_result: Option<f64>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;

        let path = self.history_path();
        let json = serde_json::to_string(history)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;

        let path = self.last_result_path();
        match last_result {
            Some(value) => fs::write(&path, value.to_string())
                .with_context(|| format!("writing {}", path.display()))?,
            None => remove_optional(&path)?,
        }
        Ok(())
    }

    /// Writes the session out, or drops the saved copy once it was reset.
    pub fn sync(&self, session: &Session) {
        let result = if session.history().is_empty() && session.last_result().is_none() {
            self.clear()
        } else {
            self.save(session.history(), session.last_result())
        };
        if let Err(e) = result {
            warn!("error saving history: {e:#}");
        }
    }

    pub fn clear(&self) -> Result<()> {
        remove_optional(&self.history_path())?;
        remove_optional(&self.last_result_path())
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

fn remove_optional(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
    }
}
