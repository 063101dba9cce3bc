use super::{parse_priority, parse_task_id};
use crate::board::Target;
use crate::output::{print_json, timestamp};
use anyhow::{bail, Context};
use clap::Args;
use knbn_core::task::{self as task_ops, NewTask, Task, TaskUpdate};

#[derive(Args)]
pub struct ListArgs {
    /// Search query to filter tasks
    #[arg(short, long)]
    pub query: Option<String>,
    /// Filter by column
    #[arg(short, long)]
    pub column: Option<String>,
    /// Filter by label
    #[arg(short, long)]
    pub label: Option<String>,
    /// Filter by sprint
    #[arg(short, long)]
    pub sprint: Option<String>,
    /// Filter by priority (number)
    #[arg(short, long, allow_negative_numbers = true)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct CreateArgs {
    pub title: String,
    /// Provide the task column
    #[arg(long)]
    pub column: Option<String>,
    /// Provide the task description
    #[arg(long)]
    pub description: Option<String>,
    /// Provide the task priority
    #[arg(long, allow_negative_numbers = true)]
    pub priority: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    #[arg(allow_negative_numbers = true)]
    pub id: String,
    /// Update the task title
    #[arg(long)]
    pub title: Option<String>,
    /// Update the task column
    #[arg(long)]
    pub column: Option<String>,
    /// Update the task description
    #[arg(long)]
    pub description: Option<String>,
    /// Update the task priority
    #[arg(long, allow_negative_numbers = true)]
    pub priority: Option<String>,
    /// Update the task labels (comma-separated)
    #[arg(long)]
    pub labels: Option<String>,
}

pub fn get(target: &Target, raw_id: &str, json: bool) -> anyhow::Result<()> {
    let id = parse_task_id(raw_id)?;
    let (_, board) = target.load()?;
    let Some(task) = u64::try_from(id).ok().and_then(|id| task_ops::task(&board, id)) else {
        bail!("Task #{id} not found");
    };

    if json {
        return print_json(task);
    }

    println!("Task #{}: {}", task.id, task.title);
    println!("Column: {}", column_of(task));
    if let Some(description) = &task.description {
        println!("Description: {description}");
    }
    if let Some(priority) = task.priority {
        println!("Priority: {priority}");
    }
    if let Some(sprint) = &task.sprint {
        println!("Sprint: {sprint}");
    }
    if !task.labels.is_empty() {
        println!("Labels: {}", task.labels.join(", "));
    }
    if let Some(points) = task.story_points {
        println!("Story Points: {points}");
    }
    println!("Created: {}", timestamp(&task.dates.created));
    println!("Updated: {}", timestamp(&task.dates.updated));
    if let Some(moved) = &task.dates.moved {
        println!("Last Moved: {}", timestamp(moved));
    }
    Ok(())
}

pub fn list(target: &Target, args: ListArgs, json: bool) -> anyhow::Result<()> {
    let priority = args.priority.as_deref().map(parse_priority).transpose()?;
    let (_, board) = target.load()?;

    let tasks: Vec<&Task> = task_ops::find_tasks(&board, args.query.as_deref().unwrap_or(""))
        .into_iter()
        .filter(|t| args.column.is_none() || t.column == args.column)
        .filter(|t| args.label.as_ref().map_or(true, |l| t.labels.contains(l)))
        .filter(|t| args.sprint.is_none() || t.sprint == args.sprint)
        .filter(|t| priority.is_none() || t.priority == priority)
        .collect();

    if json {
        return print_json(&tasks);
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    println!("Found {} task(s):\n", tasks.len());
    for task in tasks {
        println!("#{}: {}", task.id, task.title);
        println!("  Column: {}", column_of(task));
        if let Some(description) = &task.description {
            println!("  Description: {description}");
        }
        if let Some(priority) = task.priority {
            println!("  Priority: {priority}");
        }
        if let Some(sprint) = &task.sprint {
            println!("  Sprint: {sprint}");
        }
        if !task.labels.is_empty() {
            println!("  Labels: {}", task.labels.join(", "));
        }
        if let Some(points) = task.story_points {
            println!("  Story Points: {points}");
        }
        println!("  Created: {}", timestamp(&task.dates.created));
        println!();
    }
    Ok(())
}

pub fn create(target: &Target, args: CreateArgs, json: bool) -> anyhow::Result<()> {
    let priority = args.priority.as_deref().map(parse_priority).transpose()?;
    let (path, mut board) = target.load()?;

    let new = NewTask {
        description: args.description,
        column: args.column,
        priority,
        ..NewTask::titled(args.title)
    };
    let task = task_ops::create_task(&mut board, new)
        .context("Failed to create task")?
        .clone();
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&task);
    }
    println!("Created task #{}: {}", task.id, task.title);
    println!("Column: {}", column_of(&task));
    Ok(())
}

pub fn update(target: &Target, args: UpdateArgs, json: bool) -> anyhow::Result<()> {
    let id = parse_task_id(&args.id)?;
    let update = TaskUpdate {
        title: args.title,
        description: args.description,
        column: args.column,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        labels: args.labels.map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect()
        }),
    };
    if update.is_empty() {
        bail!("No updates specified. Use --title, --column, --description, or --priority");
    }

    // Updating never offers to create a board.
    let (path, mut board) = target.load_with(true)?;
    let Ok(id) = u64::try_from(id) else {
        bail!("Task #{id} not found");
    };
    let task = task_ops::update_task(&mut board, id, update)
        .context("Failed to update task")?
        .clone();
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&task);
    }
    println!("Updated task #{}: {}", task.id, task.title);
    if let Some(column) = &task.column {
        println!("Column: {column}");
    }
    Ok(())
}

fn column_of(task: &Task) -> &str {
    task.column.as_deref().unwrap_or("(none)")
}
