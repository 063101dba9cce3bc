use crate::output::print_json;
use anyhow::{bail, Context};
use clap::Args;
use knbn_cli::migrate::{
    KnbnMigrator, MigrationError, MigrationOptions, MigrationOutcome, MigrationReport,
    MigrationStatus, Orchestrator, OrchestratorError, OsFs,
};
use std::path::Path;

#[derive(Args)]
pub struct MigrateArgs {
    /// Board files to migrate (e.g., board1.knbn board2.knbn)
    pub files: Vec<String>,
    /// Migrate all .knbn files in the directory
    #[arg(long)]
    pub all: bool,
    /// Show what would be migrated without making changes
    #[arg(short = 'd', long)]
    pub dry_run: bool,
    /// Create backup files before migration (adds .bak extension)
    #[arg(long)]
    pub backup: bool,
}

pub fn run(dir: &Path, args: MigrateArgs, json: bool) -> anyhow::Result<()> {
    let options = MigrationOptions {
        dry_run: args.dry_run,
        backup: args.backup,
        scan_all: args.all,
        scan_dir: dir.to_path_buf(),
    };

    let report = match Orchestrator::new(&OsFs, &KnbnMigrator).run(&args.files, &options) {
        Ok(report) => report,
        Err(e @ OrchestratorError::NoCandidates) => {
            eprintln!("Examples:");
            eprintln!("  knbn migrate board.knbn");
            eprintln!("  knbn migrate board1.knbn board2.knbn");
            eprintln!("  knbn migrate --all");
            return Err(e.into());
        }
        Err(e) => return Err(e).context("Migration failed"),
    };

    if json {
        print_json(&report)?;
    } else {
        render(&report);
    }

    let errors = report.counts().errors;
    if errors > 0 {
        bail!("{errors} file(s) could not be migrated");
    }
    Ok(())
}

fn render(report: &MigrationReport) {
    if report.options.scan_all && report.is_empty() {
        println!("No .knbn files found in {}", scanned(&report.options.scan_dir));
        return;
    }

    for outcome in &report.outcomes {
        render_outcome(outcome);
    }

    let dry_run = report.options.dry_run;
    let counts = report.counts();
    println!("\n📊 Migration Summary:");
    if dry_run {
        println!("  Would migrate: {} files", counts.migrated);
    } else {
        println!("  Migrated: {} files", counts.migrated);
    }
    println!("  Already current: {} files", counts.already_current);
    if counts.errors > 0 {
        println!("  Errors: {} files", counts.errors);
    }

    if dry_run && counts.migrated > 0 {
        println!("\nRun without --dry-run to perform the migration.");
    }
}

/// "current directory" for the working directory, otherwise the path.
fn scanned(dir: &Path) -> String {
    let same = std::env::current_dir()
        .and_then(|cwd| Ok(cwd.canonicalize()? == dir.canonicalize()?))
        .unwrap_or(false);
    if same {
        "current directory".to_string()
    } else {
        dir.display().to_string()
    }
}

fn render_outcome(outcome: &MigrationOutcome) {
    let name = &outcome.path;
    let from = outcome.from_version.as_deref().unwrap_or("?");
    let to = outcome.to_version.as_deref().unwrap_or("?");

    if let Some(backup) = &outcome.backup_path {
        let backup = backup
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| backup.display().to_string());
        println!("📋 Created backup: {backup}");
    }

    match (outcome.status, &outcome.error) {
        (MigrationStatus::AlreadyCurrent, _) => {
            println!("⏭️  {name}: Already at latest version ({from})")
        }
        (MigrationStatus::WouldMigrate, _) => {
            println!("🔄 {name}: Would migrate from {from} to {to}")
        }
        (MigrationStatus::Migrated, _) => println!("✅ {name}: Migrated from {from} to {to}"),
        (MigrationStatus::Error, Some(MigrationError::NotFound)) => {
            eprintln!("File not found: {name}")
        }
        (MigrationStatus::Error, Some(MigrationError::InvalidFormat)) => {
            eprintln!("Invalid board file format: {name}")
        }
        (MigrationStatus::Error, error) => {
            let message = error.as_ref().map(ToString::to_string).unwrap_or_default();
            eprintln!("❌ {name}: Migration failed - {message}")
        }
    }
}
