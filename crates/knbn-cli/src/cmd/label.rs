use super::NO_UPDATES;
use crate::board::Target;
use crate::output::print_json;
use anyhow::{bail, Context};
use knbn_core::label::{self as label_ops, LabelUpdate};

pub fn list(target: &Target, json: bool) -> anyhow::Result<()> {
    let (_, board) = target.load()?;

    if json {
        return print_json(&board.labels);
    }

    if board.labels.is_empty() {
        println!("No labels found.");
        return Ok(());
    }

    println!("Found {} label(s):\n", board.labels.len());
    for (i, label) in board.labels.iter().enumerate() {
        println!("{}. {}", i + 1, label.name);
        if let Some(color) = &label.color {
            println!("   Color: {color}");
        }
        println!();
    }
    Ok(())
}

pub fn add(target: &Target, name: &str, color: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (path, mut board) = target.load()?;

    let label = label_ops::add_label(&mut board, name, color)
        .context("Failed to create label")?
        .clone();
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&label);
    }
    println!("Created label: {}", label.name);
    if let Some(color) = &label.color {
        println!("Color: {color}");
    }
    Ok(())
}

pub fn update(
    target: &Target,
    name: &str,
    new_name: Option<String>,
    color: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let update = LabelUpdate {
        name: new_name,
        color,
    };
    if update.is_empty() {
        println!("{NO_UPDATES}");
        return Ok(());
    }
    let renamed = update.name.as_deref().is_some_and(|n| n != name);

    let (path, mut board) = target.load()?;
    if label_ops::label(&board, name).is_none() {
        bail!("Label \"{name}\" not found");
    }
    let label = label_ops::update_label(&mut board, name, update)
        .context("Failed to update label")?
        .clone();
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&label);
    }
    println!("Updated label: {}", label.name);
    if renamed {
        println!("Renamed from: {name}");
    }
    if let Some(color) = &label.color {
        println!("Color: {color}");
    }
    Ok(())
}

pub fn remove(target: &Target, name: &str, json: bool) -> anyhow::Result<()> {
    let (path, mut board) = target.load()?;
    if label_ops::label(&board, name).is_none() {
        bail!("Label \"{name}\" not found");
    }

    label_ops::remove_label(&mut board, name).context("Failed to remove label")?;
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&serde_json::json!({ "name": name, "removed": true }));
    }
    println!("Removed label: {name}");
    Ok(())
}
