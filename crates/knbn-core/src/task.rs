use crate::board::Board;
use crate::column;
use crate::error::{KnbnError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDates {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moved: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    pub dates: TaskDates,
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub column: Option<String>,
    pub priority: Option<i64>,
    pub labels: Vec<String>,
    pub sprint: Option<String>,
    pub story_points: Option<u32>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub column: Option<String>,
    pub priority: Option<i64>,
    pub labels: Option<Vec<String>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.column.is_none()
            && self.priority.is_none()
            && self.labels.is_none()
    }
}

// ---------------------------------------------------------------------------
// Task operations
// ---------------------------------------------------------------------------

/// Add a task under the next free ID. Without an explicit column the task
/// lands in the board's first column.
pub fn create_task(board: &mut Board, new: NewTask) -> Result<&Task> {
    let column = match new.column {
        Some(name) => {
            ensure_column(board, &name)?;
            Some(name)
        }
        None => board.columns.first().map(|c| c.name.clone()),
    };

    let id = board.metadata.next_id;
    let now = Utc::now();
    let task = Task {
        id,
        title: new.title,
        description: new.description,
        column,
        labels: new.labels,
        sprint: new.sprint,
        priority: new.priority,
        story_points: new.story_points,
        dates: TaskDates {
            created: now,
            updated: now,
            moved: None,
        },
    };
    board.tasks.insert(id, task);
    board.metadata.next_id = id + 1;
    board.touch();
    tracing::debug!(id, "created task");
    Ok(&board.tasks[&id])
}

pub fn task(board: &Board, id: u64) -> Option<&Task> {
    board.tasks.get(&id)
}

pub fn update_task(board: &mut Board, id: u64, update: TaskUpdate) -> Result<&Task> {
    if !board.tasks.contains_key(&id) {
        return Err(KnbnError::TaskNotFound(id));
    }
    if let Some(name) = &update.column {
        ensure_column(board, name)?;
    }

    let now = Utc::now();
    let task = board
        .tasks
        .get_mut(&id)
        .ok_or(KnbnError::TaskNotFound(id))?;

    if let Some(title) = update.title {
        task.title = title;
    }
    if let Some(description) = update.description {
        task.description = Some(description);
    }
    if let Some(name) = update.column {
        if task.column.as_deref() != Some(name.as_str()) {
            task.dates.moved = Some(now);
        }
        task.column = Some(name);
    }
    if let Some(priority) = update.priority {
        task.priority = Some(priority);
    }
    if let Some(labels) = update.labels {
        task.labels = labels;
    }
    task.dates.updated = now;
    board.touch();
    Ok(&board.tasks[&id])
}

/// Tasks whose title or description contains `query` (case-insensitive),
/// ordered by ID. An empty query matches every task.
pub fn find_tasks<'a>(board: &'a Board, query: &str) -> Vec<&'a Task> {
    let query = query.trim().to_lowercase();
    board
        .tasks
        .values()
        .filter(|t| {
            query.is_empty()
                || t.title.to_lowercase().contains(&query)
                || t
                    .description
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
                    .contains(&query)
        })
        .collect()
}

fn ensure_column(board: &Board, name: &str) -> Result<()> {
    match column::column(board, name) {
        Some(_) => Ok(()),
        None => Err(KnbnError::ColumnNotFound(name.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
