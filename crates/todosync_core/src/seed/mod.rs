//! Seed list loading for the in-memory list variant.
//!
//! # Responsibility
//! - Decode the public REST payload shape (`userId`, `id`, `title`,
//!   `completed`) into items.
//! - Abstract where the payload comes from behind `SeedSource`.
//!
//! # Invariants
//! - At most `limit` entries are returned, in payload order.
//! - Entries with blank titles are dropped.

use crate::model::todo::{is_blank_title, CreatedAt, TodoItem};
use log::warn;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type SeedResult<T> = Result<T, SeedError>;

/// One entry of the seed payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTodo {
    #[serde(default)]
    pub user_id: Option<u64>,
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl SeedTodo {
    /// Converts to an item; seed ids become decimal strings.
    pub fn into_item(self) -> TodoItem {
        TodoItem {
            id: self.id.to_string(),
            title: self.title,
            completed: self.completed,
            created_at: CreatedAt::Absent,
        }
    }
}

/// Seed loading failures.
#[derive(Debug)]
pub enum SeedError {
    Io { path: PathBuf, source: std::io::Error },
    Decode(serde_json::Error),
    Transport(String),
}

impl Display for SeedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read seed file `{}`: {source}", path.display())
            }
            Self::Decode(err) => write!(f, "invalid seed payload: {err}"),
            Self::Transport(message) => write!(f, "seed request failed: {message}"),
        }
    }
}

impl Error for SeedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode(err) => Some(err),
            Self::Transport(_) => None,
        }
    }
}

impl From<serde_json::Error> for SeedError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Anything that can produce the initial list.
pub trait SeedSource {
    fn fetch(&self) -> SeedResult<Vec<SeedTodo>>;
}

/// Decodes a JSON array payload and keeps the first `limit` usable entries.
pub fn parse_seed_json(body: &str, limit: usize) -> SeedResult<Vec<SeedTodo>> {
    let entries: Vec<SeedTodo> = serde_json::from_str(body)?;
    Ok(entries
        .into_iter()
        .filter(|entry| {
            let keep = !is_blank_title(&entry.title);
            if !keep {
                warn!(
                    "event=seed_entry_skipped module=seed status=error id={} reason=blank_title",
                    entry.id
                );
            }
            keep
        })
        .take(limit)
        .collect())
}

/// Seed source reading a JSON file from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSeedSource {
    path: PathBuf,
    limit: usize,
}

impl JsonFileSeedSource {
    pub fn new(path: impl AsRef<Path>, limit: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            limit,
        }
    }
}

impl SeedSource for JsonFileSeedSource {
    fn fetch(&self) -> SeedResult<Vec<SeedTodo>> {
        let body = std::fs::read_to_string(&self.path).map_err(|source| SeedError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_seed_json(&body, self.limit)
    }
}

/// Fixed in-process seed list.
#[derive(Debug, Clone, Default)]
pub struct StaticSeedSource {
    entries: Vec<SeedTodo>,
}

impl StaticSeedSource {
    pub fn new(entries: Vec<SeedTodo>) -> Self {
        Self { entries }
    }
}

impl SeedSource for StaticSeedSource {
    fn fetch(&self) -> SeedResult<Vec<SeedTodo>> {
        Ok(self.entries.clone())
    }
}
