use super::{parse_capacity, NO_UPDATES};
use crate::board::Target;
use crate::output::{print_json, timestamp};
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::Args;
use knbn_cli::dates;
use knbn_core::sprint::{self as sprint_ops, NewSprint, Sprint, SprintFilter, SprintUpdate};

#[derive(Args)]
pub struct AddArgs {
    pub name: String,
    /// Sprint description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Sprint capacity (number)
    #[arg(short, long, allow_negative_numbers = true)]
    pub capacity: Option<String>,
    /// Sprint start date (ISO format or relative like "today", "tomorrow")
    #[arg(short, long)]
    pub starts: Option<String>,
    /// Sprint end date (ISO format or relative like "next week", "+2 weeks")
    #[arg(short, long)]
    pub ends: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub name: String,
    /// New sprint name
    #[arg(long = "name", value_name = "NEW_NAME")]
    pub new_name: Option<String>,
    /// Sprint description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Sprint capacity (number)
    #[arg(short, long, allow_negative_numbers = true)]
    pub capacity: Option<String>,
    /// Sprint start date (ISO format or relative)
    #[arg(short, long)]
    pub starts: Option<String>,
    /// Sprint end date (ISO format or relative)
    #[arg(short, long)]
    pub ends: Option<String>,
}

fn resolve_date(raw: Option<&str>, now: DateTime<Utc>) -> anyhow::Result<Option<DateTime<Utc>>> {
    raw.map(|raw| dates::resolve(raw, now).with_context(|| format!("Invalid date: {raw}")))
        .transpose()
}

pub fn list(target: &Target, filter: SprintFilter, json: bool) -> anyhow::Result<()> {
    let (_, board) = target.load()?;
    let sprints = sprint_ops::sprints(&board, filter, Utc::now());

    if json {
        return print_json(&sprints);
    }

    let suffix = match filter {
        SprintFilter::All => String::new(),
        other => format!(" ({other})"),
    };
    if sprints.is_empty() {
        println!("No sprints found{suffix}.");
        return Ok(());
    }

    println!("Found {} sprint(s){suffix}:\n", sprints.len());
    for (i, sprint) in sprints.iter().enumerate() {
        println!("{}. {}", i + 1, sprint.name);
        if let Some(description) = &sprint.description {
            println!("   Description: {description}");
        }
        if let Some(capacity) = sprint.capacity {
            println!("   Capacity: {capacity}");
        }
        println!("   Created: {}", timestamp(&sprint.dates.created));
        println!("   Starts: {}", timestamp(&sprint.dates.starts));
        if let Some(ends) = &sprint.dates.ends {
            println!("   Ends: {}", timestamp(ends));
        }
        println!();
    }
    Ok(())
}

pub fn add(target: &Target, args: AddArgs, json: bool) -> anyhow::Result<()> {
    let now = Utc::now();
    let new = NewSprint {
        name: args.name,
        description: args.description,
        capacity: args.capacity.as_deref().map(parse_capacity).transpose()?,
        starts: resolve_date(args.starts.as_deref(), now)?,
        ends: resolve_date(args.ends.as_deref(), now)?,
    };

    let (path, mut board) = target.load()?;
    let sprint = sprint_ops::add_sprint(&mut board, new)
        .context("Failed to create sprint")?
        .clone();
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&sprint);
    }
    print_sprint("Created", &sprint);
    Ok(())
}

pub fn update(target: &Target, args: UpdateArgs, json: bool) -> anyhow::Result<()> {
    let now = Utc::now();
    let update = SprintUpdate {
        name: args.new_name,
        description: args.description,
        capacity: args.capacity.as_deref().map(parse_capacity).transpose()?,
        starts: resolve_date(args.starts.as_deref(), now)?,
        ends: resolve_date(args.ends.as_deref(), now)?,
    };
    if update.is_empty() {
        println!("{NO_UPDATES}");
        return Ok(());
    }

    let (path, mut board) = target.load()?;
    let sprint = sprint_ops::update_sprint(&mut board, &args.name, update)
        .context("Failed to update sprint")?
        .clone();
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&sprint);
    }
    print_sprint("Updated", &sprint);
    Ok(())
}

pub fn remove(target: &Target, name: &str, json: bool) -> anyhow::Result<()> {
    let (path, mut board) = target.load()?;
    if sprint_ops::sprint(&board, name).is_none() {
        bail!("Sprint \"{name}\" not found");
    }

    sprint_ops::remove_sprint(&mut board, name).context("Failed to remove sprint")?;
    board.save(&path).context("Failed to save board")?;

    if json {
        return print_json(&serde_json::json!({ "name": name, "removed": true }));
    }
    println!("Removed sprint: {name}");
    Ok(())
}

fn print_sprint(verb: &str, sprint: &Sprint) {
    println!("{verb} sprint: {}", sprint.name);
    if let Some(description) = &sprint.description {
        println!("Description: {description}");
    }
    if let Some(capacity) = sprint.capacity {
        println!("Capacity: {capacity}");
    }
    println!("Starts: {}", timestamp(&sprint.dates.starts));
    if let Some(ends) = &sprint.dates.ends {
        println!("Ends: {}", timestamp(ends));
    }
}
