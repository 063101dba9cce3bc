use crate::board::Board;
use crate::error::{KnbnError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LabelUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl LabelUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

// ---------------------------------------------------------------------------
// Label operations (names compare case-insensitively)
// ---------------------------------------------------------------------------

pub fn label<'a>(board: &'a Board, name: &str) -> Option<&'a Label> {
    board.labels.iter().find(|l| same_name(&l.name, name))
}

pub fn add_label<'a>(
    board: &'a mut Board,
    name: &str,
    color: Option<&str>,
) -> Result<&'a Label> {
    if label(board, name).is_some() {
        return Err(KnbnError::LabelExists(name.to_string()));
    }
    board.labels.push(Label {
        name: name.to_string(),
        color: color.map(str::to_string),
    });
    board.touch();
    Ok(&board.labels[board.labels.len() - 1])
}

/// Update a label. A rename is applied to every task carrying it.
pub fn update_label<'a>(
    board: &'a mut Board,
    name: &str,
    update: LabelUpdate,
) -> Result<&'a Label> {
    let idx = index_of(board, name)?;
    if let Some(new_name) = &update.name {
        let clash = board
            .labels
            .iter()
            .enumerate()
            .any(|(i, l)| i != idx && same_name(&l.name, new_name));
        if clash {
            return Err(KnbnError::LabelExists(new_name.clone()));
        }
    }

    let old_name = board.labels[idx].name.clone();
    if let Some(new_name) = update.name {
        for task in board.tasks.values_mut() {
            for l in task.labels.iter_mut() {
                if same_name(l, &old_name) {
                    *l = new_name.clone();
                }
            }
        }
        board.labels[idx].name = new_name;
    }
    if let Some(color) = update.color {
        board.labels[idx].color = Some(color);
    }
    board.touch();
    Ok(&board.labels[idx])
}

/// Remove a label and detach it from all tasks.
pub fn remove_label(board: &mut Board, name: &str) -> Result<()> {
    let idx = index_of(board, name)?;
    let removed = board.labels.remove(idx);
    for task in board.tasks.values_mut() {
        task.labels.retain(|l| !same_name(l, &removed.name));
    }
    board.touch();
    Ok(())
}

fn index_of(board: &Board, name: &str) -> Result<usize> {
    board
        .labels
        .iter()
        .position(|l| same_name(&l.name, name))
        .ok_or_else(|| KnbnError::LabelNotFound(name.to_string()))
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
