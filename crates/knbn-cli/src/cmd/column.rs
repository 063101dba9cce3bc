use super::{parse_position, NO_UPDATES};
use crate::board::Target;
use crate::output::print_json;
use anyhow::{bail, Context};
use knbn_core::column as column_ops;

pub fn list(target: &Target, count: bool, json: bool) -> anyhow::Result<()> {
    let (_, board) = target.load()?;

    if json {
        let items: Vec<serde_json::Value> = board
            .columns
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name,
                    "tasks": column_ops::task_count(&board, &c.name),
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "columns": items,
            "unassigned": column_ops::unassigned_count(&board),
        }));
    }

    if board.columns.is_empty() {
        println!("No columns found.");
        return Ok(());
    }

    println!("Found {} column(s):\n", board.columns.len());
    for (i, column) in board.columns.iter().enumerate() {
        println!("{}. {}", i + 1, column.name);
        if count {
            println!("   Tasks: {}", column_ops::task_count(&board, &column.name));
        }
        println!();
    }

    // Tasks without a column.
    if count {
        println!("Backlog: {}", column_ops::unassigned_count(&board));
    }
    Ok(())
}

pub fn create(
    target: &Target,
    name: &str,
    position: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let position = position.map(parse_position).transpose()?;
    let (path, mut board) = target.load()?;

    column_ops::create_column(&mut board, name, position).context("Failed to create column")?;
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&serde_json::json!({ "name": name, "position": position }));
    }
    println!("Created column: {name}");
    if let Some(position) = position {
        println!("Position: {position}");
    }
    Ok(())
}

pub fn update(
    target: &Target,
    name: &str,
    new_name: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let Some(new_name) = new_name else {
        println!("{NO_UPDATES}");
        return Ok(());
    };

    let (path, mut board) = target.load()?;
    if column_ops::column(&board, name).is_none() {
        bail!("Column \"{name}\" not found");
    }
    column_ops::update_column(&mut board, name, &new_name).context("Failed to update column")?;
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&serde_json::json!({ "name": new_name, "previous": name }));
    }
    println!("Updated column: {new_name}");
    if new_name != name {
        println!("Renamed from: {name}");
    }
    Ok(())
}

pub fn remove(target: &Target, name: &str, json: bool) -> anyhow::Result<()> {
    let (path, mut board) = target.load()?;

    if column_ops::column(&board, name).is_none() {
        if json {
            return print_json(&serde_json::json!({ "name": name, "removed": false }));
        }
        println!("Column \"{name}\" was not found");
        return Ok(());
    }

    let count = column_ops::task_count(&board, name);
    if count > 0 {
        bail!(
            "Cannot remove column \"{name}\" because it contains {count} task(s)\n\
             Move or remove the tasks first, then try again."
        );
    }

    column_ops::remove_column(&mut board, name).context("Failed to remove column")?;
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&serde_json::json!({ "name": name, "removed": true }));
    }
    println!("Removed column: {name}");
    Ok(())
}

pub fn move_to(target: &Target, name: &str, position: &str, json: bool) -> anyhow::Result<()> {
    let position = parse_position(position)?;
    let (path, mut board) = target.load()?;

    column_ops::move_column(&mut board, name, position).context("Failed to move column")?;
    board.save(&path).context("Failed to save board")?;

    let landed = board
        .columns
        .iter()
        .position(|c| c.name == name)
        .unwrap_or(position);
    if json {
        return print_json(&serde_json::json!({ "name": name, "position": landed }));
    }
    if landed == position {
        println!("Moved column \"{name}\" to position {position}");
    } else {
        println!("Column \"{name}\" moved successfully");
    }
    Ok(())
}
