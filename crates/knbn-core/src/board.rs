use crate::column::Column;
use crate::error::{KnbnError, Result};
use crate::label::Label;
use crate::migrations;
use crate::sprint::Sprint;
use crate::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_BOARD_NAME: &str = "My Board";
pub const DEFAULT_BOARD_DESCRIPTION: &str = "My local kanban board";
pub const DEFAULT_COLUMNS: &[&str] = &["backlog", "todo", "working", "done"];

// ---------------------------------------------------------------------------
// Metadata / dates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub next_id: u64,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDates {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub saved: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub tasks: BTreeMap<u64, Task>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub sprints: Vec<Sprint>,
    pub metadata: Metadata,
    pub dates: BoardDates,
}

impl Board {
    /// A fresh board at the current schema version with the default columns.
    pub fn new(name: Option<&str>) -> Self {
        let now = Utc::now();
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_BOARD_NAME);
        Self {
            name: name.to_string(),
            description: Some(DEFAULT_BOARD_DESCRIPTION.to_string()),
            columns: DEFAULT_COLUMNS.iter().map(|c| Column::new(*c)).collect(),
            tasks: BTreeMap::new(),
            labels: Vec::new(),
            sprints: Vec::new(),
            metadata: Metadata {
                next_id: 1,
                version: migrations::CURRENT_VERSION.to_string(),
            },
            dates: BoardDates {
                created: now,
                updated: now,
                saved: now,
            },
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Create a new board file at `path`. Fails if anything already lives there.
    pub fn create(path: &Path, name: Option<&str>) -> Result<Self> {
        if path.exists() {
            return Err(KnbnError::BoardExists(path.to_path_buf()));
        }
        let mut board = Self::new(name);
        board.save(path)?;
        tracing::debug!(path = %path.display(), name = %board.name, "created board");
        Ok(board)
    }

    /// Load a board file, upgrading older schema versions in memory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(KnbnError::BoardNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let document = migrations::parse_document(&data)?;
        migrations::migrate_board(document)
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.dates.saved = Utc::now();
        let data = self.to_yaml()?;
        crate::io::atomic_write(path, data.as_bytes())?;
        tracing::debug!(path = %path.display(), "saved board");
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Record a mutation.
    pub fn touch(&mut self) {
        self.dates.updated = Utc::now();
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
