use crate::board::{create_board_file, prompt_for_board, Target};
use crate::output::{print_json, timestamp};
use anyhow::Context;
use knbn_core::{paths, Board};
use std::path::Path;

/// List the board files in the target directory, offering to create one when
/// there are none.
pub fn list(target: &Target, skip_prompt: bool, json: bool) -> anyhow::Result<()> {
    let files = paths::find_board_files(&target.dir).context("Failed to list board files")?;

    let boards: Vec<(String, Option<String>)> = files
        .iter()
        .map(|path| {
            let name = match Board::load(path) {
                Ok(board) => Some(board.name),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable board");
                    None
                }
            };
            (paths::display_name(path), name)
        })
        .collect();

    if json {
        let items: Vec<serde_json::Value> = files
            .iter()
            .zip(&boards)
            .map(|(path, (file, name))| {
                serde_json::json!({
                    "file": file,
                    "path": path,
                    "name": name,
                })
            })
            .collect();
        return print_json(&items);
    }

    if boards.is_empty() {
        println!("No .knbn board files found in current directory.");
        prompt_for_board(&target.dir, skip_prompt)?;
    } else {
        println!("Found {} .knbn board files:", boards.len());
        for (file, name) in &boards {
            println!("  {file}: {}", name.as_deref().unwrap_or("(unreadable)"));
        }
    }

    println!("\nUse -h for help and available commands.");
    Ok(())
}

pub fn create(dir: &Path, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let name = name.unwrap_or("");
    if !json {
        create_board_file(dir, name)?;
        return Ok(());
    }

    let path = paths::board_path(dir, name);
    let board = Board::create(&path, Some(name)).context("Failed to create board")?;
    print_json(&serde_json::json!({
        "file": paths::board_filename(name),
        "path": path,
        "name": board.name,
    }))
}

pub fn get(dir: &Path, filename: Option<&str>, json: bool) -> anyhow::Result<()> {
    let filename = filename.unwrap_or(paths::DEFAULT_BOARD_FILE);
    let board = Board::load(&dir.join(filename))
        .with_context(|| format!("Failed to load board {filename}"))?;

    if json {
        return print_json(&board);
    }

    let names_or_none = |names: Vec<&str>| {
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    };

    println!("{filename}:");
    println!("Name: {}", board.name);
    if let Some(description) = &board.description {
        println!("Description: {description}");
    }
    println!(
        "Columns: {}",
        names_or_none(board.columns.iter().map(|c| c.name.as_str()).collect())
    );
    println!("Tasks: {}", board.tasks.len());
    println!(
        "Labels: {}",
        names_or_none(board.labels.iter().map(|l| l.name.as_str()).collect())
    );
    println!(
        "Sprints: {}",
        names_or_none(board.sprints.iter().map(|s| s.name.as_str()).collect())
    );
    println!("Board version: {}", board.version());
    println!("Created At: {}", timestamp(&board.dates.created));
    println!("Last Updated: {}", timestamp(&board.dates.updated));
    Ok(())
}
