use crate::error::Result;
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// File naming constants
// ---------------------------------------------------------------------------

/// Suffix identifying a board file. A file named exactly `.knbn` is the
/// default board of a directory.
pub const BOARD_SUFFIX: &str = ".knbn";
pub const DEFAULT_BOARD_FILE: &str = ".knbn";
pub const BACKUP_SUFFIX: &str = ".bak";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

static SLUG_STRIP_RE: OnceLock<Regex> = OnceLock::new();
static SLUG_DASH_RE: OnceLock<Regex> = OnceLock::new();

fn slug_strip_re() -> &'static Regex {
    SLUG_STRIP_RE.get_or_init(|| Regex::new(r"[^a-z0-9\s_-]").unwrap())
}

fn slug_dash_re() -> &'static Regex {
    SLUG_DASH_RE.get_or_init(|| Regex::new(r"[\s_-]+").unwrap())
}

/// File name for a board called `name`: `My Project` becomes
/// `my-project.knbn`, an empty name becomes the default `.knbn`.
pub fn board_filename(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let stripped = slug_strip_re().replace_all(&lower, "");
    let slug = slug_dash_re().replace_all(&stripped, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        DEFAULT_BOARD_FILE.to_string()
    } else {
        format!("{slug}{BOARD_SUFFIX}")
    }
}

pub fn board_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(board_filename(name))
}

/// `<path>.bak`, keeping the original extension intact.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(BACKUP_SUFFIX);
    PathBuf::from(s)
}

pub fn is_board_file_name(name: &str) -> bool {
    name.ends_with(BOARD_SUFFIX)
}

/// Display name of a board file: the file name without the suffix, or the
/// bare `.knbn` for a directory's default board.
pub fn display_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.strip_suffix(BOARD_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}

/// Board files directly inside `dir`, default board first, then by name.
pub fn find_board_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_board_file_name(&name) {
            files.push(entry.path());
        }
    }
    files.sort_by_key(|p| {
        let name = p.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        (name != DEFAULT_BOARD_FILE, name)
    });
    Ok(files)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
