//! Multi-file board migration.
//!
//! [`Orchestrator::run`] walks a list of candidate board files, upgrades each
//! one independently and returns a [`MigrationReport`]. Per-file failures are
//! recorded as outcomes and never abort the rest of the run; only a run with
//! nothing to do fails outright.

use chrono::Utc;
use knbn_core::migrations::{self, Document};
use knbn_core::{io, paths, Board, KnbnError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// File-system access used by the orchestrator.
pub trait BoardFs {
    fn exists(&self, path: &Path) -> bool;
    fn read_to_string(&self, path: &Path) -> knbn_core::Result<String>;
    fn copy(&self, from: &Path, to: &Path) -> knbn_core::Result<()>;
    fn write(&self, path: &Path, data: &str) -> knbn_core::Result<()>;
    /// Regular files directly inside `dir`, in listing order.
    fn list_dir(&self, dir: &Path) -> knbn_core::Result<Vec<PathBuf>>;
}

/// [`BoardFs`] over the real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl BoardFs for OsFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> knbn_core::Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn copy(&self, from: &Path, to: &Path) -> knbn_core::Result<()> {
        io::copy_file(from, to)
    }

    fn write(&self, path: &Path, data: &str) -> knbn_core::Result<()> {
        io::atomic_write(path, data.as_bytes())
    }

    fn list_dir(&self, dir: &Path) -> knbn_core::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}

/// A migrated board together with the schema version it now carries.
#[derive(Debug, Clone)]
pub struct Migrated<B> {
    pub board: B,
    pub to_version: Option<String>,
}

/// Parses, upgrades and renders board documents. Failures are opaque
/// messages passed through to the outcome unchanged.
pub trait BoardMigrator {
    type Document;
    type Board;

    fn parse(&self, raw: &str) -> Result<Self::Document, String>;
    fn version_of(&self, doc: &Self::Document) -> Option<String>;
    fn migrate(&self, doc: Self::Document) -> Result<Migrated<Self::Board>, String>;
    fn render(&self, board: &Self::Board) -> Result<String, String>;
}

/// [`BoardMigrator`] backed by `knbn_core::migrations`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KnbnMigrator;

impl BoardMigrator for KnbnMigrator {
    type Document = Document;
    type Board = Board;

    fn parse(&self, raw: &str) -> Result<Document, String> {
        migrations::parse_document(raw).map_err(|e| e.to_string())
    }

    fn version_of(&self, doc: &Document) -> Option<String> {
        migrations::document_version(doc)
    }

    fn migrate(&self, doc: Document) -> Result<Migrated<Board>, String> {
        let board = migrations::migrate_board(doc).map_err(|e| e.to_string())?;
        Ok(Migrated {
            to_version: Some(board.version().to_string()),
            board,
        })
    }

    fn render(&self, board: &Board) -> Result<String, String> {
        let mut board = board.clone();
        board.dates.saved = Utc::now();
        board.to_yaml().map_err(|e| e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Options, outcomes, report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationOptions {
    pub dry_run: bool,
    pub backup: bool,
    pub scan_all: bool,
    /// Directory scanned by `scan_all` and against which explicit candidates
    /// are resolved.
    #[serde(skip)]
    pub scan_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum MigrationError {
    #[error("file not found")]
    NotFound,

    #[error("invalid board file format")]
    InvalidFormat,

    #[error("{0}")]
    Transform(String),

    #[error("backup failed: {0}")]
    Backup(String),

    #[error("write failed: {0}")]
    Write(String),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Please specify files to migrate or use --all flag")]
    NoCandidates,

    #[error("failed to scan {}: {source}", dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: KnbnError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MigrationStatus {
    Migrated,
    AlreadyCurrent,
    WouldMigrate,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationOutcome {
    /// The candidate as the user named it (file name for a directory scan).
    pub path: String,
    pub status: MigrationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MigrationError>,
    pub backup_created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

impl MigrationOutcome {
    fn pending(path: String) -> Self {
        Self {
            path,
            status: MigrationStatus::Error,
            from_version: None,
            to_version: None,
            error: None,
            backup_created: false,
            backup_path: None,
        }
    }

    fn fail(&mut self, error: MigrationError) {
        self.status = MigrationStatus::Error;
        self.from_version = None;
        self.to_version = None;
        self.error = Some(error);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationCounts {
    /// Files migrated, or that would be migrated in a dry run.
    pub migrated: usize,
    pub already_current: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub options: MigrationOptions,
    pub counts: MigrationCounts,
    pub success: bool,
    pub outcomes: Vec<MigrationOutcome>,
}

impl MigrationReport {
    fn new(options: MigrationOptions, outcomes: Vec<MigrationOutcome>) -> Self {
        let mut counts = MigrationCounts::default();
        for outcome in &outcomes {
            match outcome.status {
                MigrationStatus::Migrated | MigrationStatus::WouldMigrate => counts.migrated += 1,
                MigrationStatus::AlreadyCurrent => counts.already_current += 1,
                MigrationStatus::Error => counts.errors += 1,
            }
        }
        Self {
            options,
            success: counts.errors == 0,
            counts,
            outcomes,
        }
    }

    pub fn counts(&self) -> MigrationCounts {
        self.counts
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct Orchestrator<'a, F, M> {
    fs: &'a F,
    migrator: &'a M,
}

impl<'a, F: BoardFs, M: BoardMigrator> Orchestrator<'a, F, M> {
    pub fn new(fs: &'a F, migrator: &'a M) -> Self {
        Self { fs, migrator }
    }

    /// Migrate every candidate in order. `scan_all` replaces the explicit
    /// list with the board files found in `scan_dir`.
    pub fn run(
        &self,
        candidates: &[String],
        options: &MigrationOptions,
    ) -> Result<MigrationReport, OrchestratorError> {
        let targets = self.resolve_candidates(candidates, options)?;
        debug!(count = targets.len(), dry_run = options.dry_run, "migrating board files");

        let outcomes = targets
            .into_iter()
            .map(|(name, path)| {
                let mut outcome = MigrationOutcome::pending(name);
                match self.migrate_one(&path, options, &mut outcome) {
                    Ok(status) => outcome.status = status,
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "migration failed");
                        outcome.fail(e);
                    }
                }
                outcome
            })
            .collect();

        Ok(MigrationReport::new(options.clone(), outcomes))
    }

    fn resolve_candidates(
        &self,
        candidates: &[String],
        options: &MigrationOptions,
    ) -> Result<Vec<(String, PathBuf)>, OrchestratorError> {
        if options.scan_all {
            let files = self
                .fs
                .list_dir(&options.scan_dir)
                .map_err(|source| OrchestratorError::Scan {
                    dir: options.scan_dir.clone(),
                    source,
                })?;
            return Ok(files
                .into_iter()
                .filter_map(|path| {
                    let name = path.file_name()?.to_string_lossy().into_owned();
                    paths::is_board_file_name(&name).then_some((name, path))
                })
                .collect());
        }

        if candidates.is_empty() {
            return Err(OrchestratorError::NoCandidates);
        }
        Ok(candidates
            .iter()
            .map(|c| (c.clone(), options.scan_dir.join(c)))
            .collect())
    }

    fn migrate_one(
        &self,
        path: &Path,
        options: &MigrationOptions,
        outcome: &mut MigrationOutcome,
    ) -> Result<MigrationStatus, MigrationError> {
        if !self.fs.exists(path) {
            return Err(MigrationError::NotFound);
        }

        let raw = self.fs.read_to_string(path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "unreadable board file");
            MigrationError::InvalidFormat
        })?;
        let doc = self.migrator.parse(&raw).map_err(|e| {
            debug!(path = %path.display(), error = %e, "unparseable board file");
            MigrationError::InvalidFormat
        })?;
        let from = self
            .migrator
            .version_of(&doc)
            .ok_or(MigrationError::InvalidFormat)?;

        let migrated = self.migrator.migrate(doc).map_err(MigrationError::Transform)?;
        let to = migrated
            .to_version
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                MigrationError::Transform("migration did not produce a version".to_string())
            })?;

        outcome.from_version = Some(from.clone());
        outcome.to_version = Some(to.clone());

        if from == to {
            return Ok(MigrationStatus::AlreadyCurrent);
        }
        if options.dry_run {
            return Ok(MigrationStatus::WouldMigrate);
        }

        let data = self
            .migrator
            .render(&migrated.board)
            .map_err(MigrationError::Write)?;

        if options.backup {
            let backup = paths::backup_path(path);
            self.fs
                .copy(path, &backup)
                .map_err(|e| MigrationError::Backup(e.to_string()))?;
            outcome.backup_created = true;
            outcome.backup_path = Some(backup);
        }

        self.fs
            .write(path, &data)
            .map_err(|e| MigrationError::Write(e.to_string()))?;
        info!(path = %path.display(), from = %from, to = %to, "migrated board file");
        Ok(MigrationStatus::Migrated)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
