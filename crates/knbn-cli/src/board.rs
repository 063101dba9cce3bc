use anyhow::{bail, Context};
use knbn_core::{paths, Board};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Resolve the working directory for board discovery.
///
/// Priority:
/// 1. `--dir` flag / `KNBN_DIR` env var (passed in as `explicit`)
/// 2. The process working directory
pub fn resolve_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Which board file a command operates on.
pub struct Target {
    pub dir: PathBuf,
    /// `--file`, resolved against `dir` when relative.
    pub file: Option<PathBuf>,
    pub skip_prompt: bool,
}

impl Target {
    /// The explicit file, else the first board file in `dir`, else one the
    /// user creates at the prompt.
    pub fn board_file(&self) -> anyhow::Result<PathBuf> {
        self.board_file_with(self.skip_prompt)
    }

    pub fn board_file_with(&self, skip_prompt: bool) -> anyhow::Result<PathBuf> {
        if let Some(file) = &self.file {
            return Ok(self.dir.join(file));
        }

        let found = paths::find_board_files(&self.dir).context("Failed to list board files")?;
        if let Some(first) = found.into_iter().next() {
            return Ok(first);
        }

        println!("No .knbn board file found in current directory");
        match prompt_for_board(&self.dir, skip_prompt)? {
            Some(path) => Ok(path),
            None => bail!("Cannot continue without a .knbn file"),
        }
    }

    pub fn load(&self) -> anyhow::Result<(PathBuf, Board)> {
        open(self.board_file()?)
    }

    pub fn load_with(&self, skip_prompt: bool) -> anyhow::Result<(PathBuf, Board)> {
        open(self.board_file_with(skip_prompt)?)
    }
}

fn open(path: PathBuf) -> anyhow::Result<(PathBuf, Board)> {
    let board =
        Board::load(&path).with_context(|| format!("Failed to load board {}", path.display()))?;
    Ok((path, board))
}

/// Offer to create a board in `dir`. Returns the new file, or `None` when the
/// user declines or prompting is disabled.
pub fn prompt_for_board(dir: &Path, skip_prompt: bool) -> anyhow::Result<Option<PathBuf>> {
    if skip_prompt {
        println!("Skipping prompt for board creation, as per --skip-prompt flag");
        return Ok(None);
    }

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let answer = ask(&mut input, "Would you like to create a new board? (y/n): ")?;
    if matches!(answer.to_lowercase().as_str(), "y" | "yes") {
        let name = ask(
            &mut input,
            "Enter board name (optional, press Enter for default): ",
        )?;
        return create_board_file(dir, &name).map(Some);
    }

    println!("Create a new board anytime with: knbn create-board [name]");
    Ok(None)
}

fn ask(input: &mut impl BufRead, question: &str) -> anyhow::Result<String> {
    print!("{question}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read answer")?;
    Ok(line.trim().to_string())
}

/// Create `<slug>.knbn` (or `.knbn` for an empty name) in `dir`.
pub fn create_board_file(dir: &Path, name: &str) -> anyhow::Result<PathBuf> {
    let path = paths::board_path(dir, name);
    Board::create(&path, Some(name)).context("Failed to create board")?;
    println!("Created board file: {}", paths::board_filename(name));
    Ok(path)
}
