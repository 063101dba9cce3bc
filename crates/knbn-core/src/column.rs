use crate::board::Board;
use crate::error::{KnbnError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ---------------------------------------------------------------------------
// Column operations
// ---------------------------------------------------------------------------

pub fn column<'a>(board: &'a Board, name: &str) -> Option<&'a Column> {
    board.columns.iter().find(|c| c.name == name)
}

/// Insert a column at `position` (0-based, clamped), or append when omitted.
pub fn create_column(board: &mut Board, name: &str, position: Option<usize>) -> Result<()> {
    if column(board, name).is_some() {
        return Err(KnbnError::ColumnExists(name.to_string()));
    }
    let at = position
        .unwrap_or(board.columns.len())
        .min(board.columns.len());
    board.columns.insert(at, Column::new(name));
    board.touch();
    Ok(())
}

/// Rename a column, carrying its tasks along.
pub fn update_column(board: &mut Board, name: &str, new_name: &str) -> Result<()> {
    let idx = index_of(board, name)?;
    if new_name != name && column(board, new_name).is_some() {
        return Err(KnbnError::ColumnExists(new_name.to_string()));
    }
    board.columns[idx].name = new_name.to_string();
    for task in board.tasks.values_mut() {
        if task.column.as_deref() == Some(name) {
            task.column = Some(new_name.to_string());
        }
    }
    board.touch();
    Ok(())
}

/// Remove an empty column.
pub fn remove_column(board: &mut Board, name: &str) -> Result<()> {
    let idx = index_of(board, name)?;
    let count = task_count(board, name);
    if count > 0 {
        return Err(KnbnError::ColumnNotEmpty {
            name: name.to_string(),
            count,
        });
    }
    board.columns.remove(idx);
    board.touch();
    Ok(())
}

/// Move a column to `position` (0-based, clamped to the last slot).
pub fn move_column(board: &mut Board, name: &str, position: usize) -> Result<()> {
    let idx = index_of(board, name)?;
    let col = board.columns.remove(idx);
    let at = position.min(board.columns.len());
    board.columns.insert(at, col);
    board.touch();
    Ok(())
}

pub fn task_count(board: &Board, name: &str) -> usize {
    board
        .tasks
        .values()
        .filter(|t| t.column.as_deref() == Some(name))
        .count()
}

/// Tasks that sit in no column.
pub fn unassigned_count(board: &Board) -> usize {
    board.tasks.values().filter(|t| t.column.is_none()).count()
}

fn index_of(board: &Board, name: &str) -> Result<usize> {
    board
        .columns
        .iter()
        .position(|c| c.name == name)
        .ok_or_else(|| KnbnError::ColumnNotFound(name.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
