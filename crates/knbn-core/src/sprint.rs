use crate::board::Board;
use crate::error::{KnbnError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintDates {
    pub created: DateTime<Utc>,
    pub starts: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ends: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    pub dates: SprintDates,
}

#[derive(Debug, Clone, Default)]
pub struct NewSprint {
    pub name: String,
    pub description: Option<String>,
    pub capacity: Option<u32>,
    pub starts: Option<DateTime<Utc>>,
    pub ends: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct SprintUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<u32>,
    pub starts: Option<DateTime<Utc>>,
    pub ends: Option<DateTime<Utc>>,
}

impl SprintUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.capacity.is_none()
            && self.starts.is_none()
            && self.ends.is_none()
    }
}

// ---------------------------------------------------------------------------
// SprintFilter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SprintFilter {
    All,
    Active,
    Upcoming,
    Completed,
}

impl fmt::Display for SprintFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SprintFilter::All => "all",
            SprintFilter::Active => "active",
            SprintFilter::Upcoming => "upcoming",
            SprintFilter::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for SprintFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(SprintFilter::All),
            "active" => Ok(SprintFilter::Active),
            "upcoming" => Ok(SprintFilter::Upcoming),
            "completed" => Ok(SprintFilter::Completed),
            other => Err(format!(
                "unknown sprint filter '{other}' (expected all, active, upcoming, completed)"
            )),
        }
    }
}

impl Sprint {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.dates.starts > now
    }

    pub fn is_completed(&self, now: DateTime<Utc>) -> bool {
        self.dates.ends.is_some_and(|ends| ends < now)
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_upcoming(now) && !self.is_completed(now)
    }
}

// ---------------------------------------------------------------------------
// Sprint operations
// ---------------------------------------------------------------------------

pub fn sprint<'a>(board: &'a Board, name: &str) -> Option<&'a Sprint> {
    board.sprints.iter().find(|s| s.name == name)
}

/// Sprints matching `filter`, in board order, evaluated at `now`.
pub fn sprints(board: &Board, filter: SprintFilter, now: DateTime<Utc>) -> Vec<&Sprint> {
    board
        .sprints
        .iter()
        .filter(|s| match filter {
            SprintFilter::All => true,
            SprintFilter::Active => s.is_active(now),
            SprintFilter::Upcoming => s.is_upcoming(now),
            SprintFilter::Completed => s.is_completed(now),
        })
        .collect()
}

/// Add a sprint. The start defaults to the moment of creation.
pub fn add_sprint(board: &mut Board, new: NewSprint) -> Result<&Sprint> {
    if sprint(board, &new.name).is_some() {
        return Err(KnbnError::SprintExists(new.name));
    }
    let now = Utc::now();
    let starts = new.starts.unwrap_or(now);
    check_dates(starts, new.ends)?;

    board.sprints.push(Sprint {
        name: new.name,
        description: new.description,
        capacity: new.capacity,
        dates: SprintDates {
            created: now,
            starts,
            ends: new.ends,
        },
    });
    board.touch();
    Ok(&board.sprints[board.sprints.len() - 1])
}

/// Update a sprint, merging new dates with the existing ones. A rename is
/// applied to every task assigned to the sprint.
pub fn update_sprint<'a>(
    board: &'a mut Board,
    name: &str,
    update: SprintUpdate,
) -> Result<&'a Sprint> {
    let idx = index_of(board, name)?;
    if let Some(new_name) = &update.name {
        if new_name != name && sprint(board, new_name).is_some() {
            return Err(KnbnError::SprintExists(new_name.clone()));
        }
    }

    let current = &board.sprints[idx];
    let starts = update.starts.unwrap_or(current.dates.starts);
    let ends = update.ends.or(current.dates.ends);
    check_dates(starts, ends)?;

    if let Some(new_name) = update.name {
        for task in board.tasks.values_mut() {
            if task.sprint.as_deref() == Some(name) {
                task.sprint = Some(new_name.clone());
            }
        }
        board.sprints[idx].name = new_name;
    }
    let s = &mut board.sprints[idx];
    if let Some(description) = update.description {
        s.description = Some(description);
    }
    if let Some(capacity) = update.capacity {
        s.capacity = Some(capacity);
    }
    s.dates.starts = starts;
    s.dates.ends = ends;
    board.touch();
    Ok(&board.sprints[idx])
}

/// Remove a sprint and unassign its tasks.
pub fn remove_sprint(board: &mut Board, name: &str) -> Result<()> {
    let idx = index_of(board, name)?;
    board.sprints.remove(idx);
    for task in board.tasks.values_mut() {
        if task.sprint.as_deref() == Some(name) {
            task.sprint = None;
        }
    }
    board.touch();
    Ok(())
}

fn check_dates(starts: DateTime<Utc>, ends: Option<DateTime<Utc>>) -> Result<()> {
    match ends {
        Some(ends) if ends < starts => Err(KnbnError::InvalidSprintDates),
        _ => Ok(()),
    }
}

fn index_of(board: &Board, name: &str) -> Result<usize> {
    board
        .sprints
        .iter()
        .position(|s| s.name == name)
        .ok_or_else(|| KnbnError::SprintNotFound(name.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{create_task, NewTask};
    use chrono::Duration;

    fn named(name: &str) -> NewSprint {
        NewSprint {
            name: name.to_string(),
            ..NewSprint::default()
        }
    }

    #[test]
    fn add_defaults_start_to_now() {
        let mut board = Board::new(None);
        let before = Utc::now();
        let s = add_sprint(&mut board, named("Sprint 1")).unwrap();
        assert!(s.dates.starts >= before);
        assert!(s.dates.ends.is_none());
    }

    #[test]
    fn duplicate_rejected() {
        let mut board = Board::new(None);
        add_sprint(&mut board, named("Sprint 1")).unwrap();
        let err = add_sprint(&mut board, named("Sprint 1")).unwrap_err();
        assert_eq!(err.to_string(), "Sprint with name \"Sprint 1\" already exists");
    }

    #[test]
    fn end_before_start_rejected() {
        let mut board = Board::new(None);
        let now = Utc::now();
        let new = NewSprint {
            starts: Some(now),
            ends: Some(now - Duration::days(1)),
            ..named("Backwards")
        };
        assert!(matches!(
            add_sprint(&mut board, new),
            Err(KnbnError::InvalidSprintDates)
        ));
    }

    #[test]
    fn update_merges_dates_and_renames_tasks() {
        let mut board = Board::new(None);
        let starts = Utc::now();
        add_sprint(
            &mut board,
            NewSprint {
                starts: Some(starts),
                ..named("Sprint 1")
            },
        )
        .unwrap();
        create_task(
            &mut board,
            NewTask {
                sprint: Some("Sprint 1".into()),
                ..NewTask::titled("Ship it")
            },
        )
        .unwrap();

        let ends = starts + Duration::days(14);
        let update = SprintUpdate {
            name: Some("Updated Sprint".into()),
            capacity: Some(60),
            ends: Some(ends),
            ..SprintUpdate::default()
        };
        let s = update_sprint(&mut board, "Sprint 1", update).unwrap();
        assert_eq!(s.name, "Updated Sprint");
        assert_eq!(s.capacity, Some(60));
        assert_eq!(s.dates.starts, starts);
        assert_eq!(s.dates.ends, Some(ends));
        assert_eq!(board.tasks[&1].sprint.as_deref(), Some("Updated Sprint"));
    }

    #[test]
    fn updated_sprint_borrows_only_the_board() {
        let mut board = Board::new(None);
        add_sprint(&mut board, named("Sprint 1")).unwrap();
        let updated = {
            let name = String::from("Sprint 1");
            let update = SprintUpdate {
                capacity: Some(30),
                ..SprintUpdate::default()
            };
            update_sprint(&mut board, &name, update).unwrap()
        };
        assert_eq!(updated.capacity, Some(30));
    }

    #[test]
    fn update_missing_sprint() {
        let mut board = Board::new(None);
        let err = update_sprint(&mut board, "nonexistent", SprintUpdate::default()).unwrap_err();
        assert_eq!(err.to_string(), "Sprint with name \"nonexistent\" not found");
    }

    #[test]
    fn remove_unassigns_tasks() {
        let mut board = Board::new(None);
        add_sprint(&mut board, named("Sprint 1")).unwrap();
        create_task(
            &mut board,
            NewTask {
                sprint: Some("Sprint 1".into()),
                ..NewTask::titled("Ship it")
            },
        )
        .unwrap();
        remove_sprint(&mut board, "Sprint 1").unwrap();
        assert!(board.sprints.is_empty());
        assert!(board.tasks[&1].sprint.is_none());
    }

    #[test]
    fn filters_by_now() {
        let mut board = Board::new(None);
        let now = Utc::now();
        let day = Duration::days(1);
        add_sprint(
            &mut board,
            NewSprint {
                starts: Some(now - day * 10),
                ends: Some(now - day * 3),
                ..named("past")
            },
        )
        .unwrap();
        add_sprint(
            &mut board,
            NewSprint {
                starts: Some(now - day),
                ends: Some(now + day),
                ..named("current")
            },
        )
        .unwrap();
        add_sprint(
            &mut board,
            NewSprint {
                starts: Some(now + day * 3),
                ..named("future")
            },
        )
        .unwrap();

        let pick = |filter| -> Vec<String> {
            sprints(&board, filter, now)
                .iter()
                .map(|s| s.name.clone())
                .collect()
        };
        assert_eq!(pick(SprintFilter::All), vec!["past", "current", "future"]);
        assert_eq!(pick(SprintFilter::Active), vec!["current"]);
        assert_eq!(pick(SprintFilter::Upcoming), vec!["future"]);
        assert_eq!(pick(SprintFilter::Completed), vec!["past"]);
    }
}
