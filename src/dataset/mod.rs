//! Persisted team dataset
//!
//! The dataset is a single JSON document of assembled team records. It is
//! loaded at startup so interrupted runs resume where they left off: a team
//! already present is skipped by the orchestrator without refetching its
//! sub-pages. Records are appended in discovery order and flushed every ten
//! additions plus once at run end.
//!
//! Only the orchestrator's single control flow touches the dataset, so it
//! needs no internal synchronization.

use crate::extract::{MapStats, MatchResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How many added teams between automatic flushes
const AUTOSAVE_EVERY: usize = 10;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize dataset: {0}")]
    Json(#[from] serde_json::Error),
}

/// One fully assembled team record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: String,
    pub name: String,
    pub players: Vec<String>,
    pub coach: Option<String>,
    pub region: String,
    /// 1-based position in the regional ranking listing
    pub rank: u32,
    pub recent_results: Vec<MatchResult>,
    pub map_stats: Vec<MapStats>,
    /// Absolute URLs the record was assembled from
    pub urls: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DatasetFile {
    teams: Vec<TeamRecord>,
    count: usize,
}

/// JSON-file-backed team dataset with resume support
#[derive(Debug)]
pub struct Dataset {
    path: PathBuf,
    data: DatasetFile,
    since_save: usize,
}

impl Dataset {
    /// Opens the dataset at `path`, loading existing records if the file is
    /// already there.
    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        let data = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            DatasetFile::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            data,
            since_save: 0,
        })
    }

    /// Whether a team id is already present
    pub fn has_team(&self, id: &str) -> bool {
        self.data.teams.iter().any(|t| t.id == id)
    }

    /// Appends a record, flushing to disk every [`AUTOSAVE_EVERY`] additions.
    pub fn add_team(&mut self, record: TeamRecord) -> Result<(), DatasetError> {
        self.data.teams.push(record);
        self.data.count += 1;
        self.since_save += 1;

        if self.since_save >= AUTOSAVE_EVERY {
            self.save()?;
        }
        Ok(())
    }

    /// Writes the dataset to disk.
    pub fn save(&mut self) -> Result<(), DatasetError> {
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, json)?;
        self.since_save = 0;
        tracing::debug!("Saved {} teams to {:?}", self.data.count, self.path);
        Ok(())
    }

    /// Number of persisted records
    pub fn len(&self) -> usize {
        self.data.count
    }

    pub fn is_empty(&self) -> bool {
        self.data.count == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
