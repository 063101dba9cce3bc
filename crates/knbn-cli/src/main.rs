mod board;
mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{migrate::MigrateArgs, sprint, task};
use knbn_core::sprint::SprintFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "knbn",
    about = "KnBn - Kanban CLI Tool. Boards live in local .knbn files",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding board files (default: current directory)
    #[arg(short = 'C', long, global = true, env = "KNBN_DIR")]
    dir: Option<PathBuf>,

    /// Board file to use (default: first .knbn file in the directory)
    #[arg(short = 'f', long, global = true, env = "KNBN_FILE")]
    file: Option<PathBuf>,

    /// Never prompt to create a board when none is found
    #[arg(long, global = true)]
    skip_prompt: bool,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List board files
    List,

    /// Create a new board file
    CreateBoard {
        /// Board name; the file is named after it (default: .knbn)
        name: Option<String>,
    },

    /// Show a board file's summary
    GetBoard {
        /// Board file name (default: .knbn)
        filename: Option<String>,
    },

    /// Get details of a specific task
    GetTask {
        #[arg(allow_negative_numbers = true)]
        id: String,
    },

    /// List tasks with optional filtering
    ListTasks(task::ListArgs),

    /// Create a new task
    CreateTask(task::CreateArgs),

    /// Update an existing task
    UpdateTask(task::UpdateArgs),

    /// List all columns in the board
    ListColumns {
        /// Show task count for each column
        #[arg(long)]
        count: bool,
    },

    /// Create a new column
    CreateColumn {
        name: String,
        /// Position to insert the column (0-based index)
        #[arg(short, long, allow_negative_numbers = true)]
        position: Option<String>,
    },

    /// Update an existing column
    UpdateColumn {
        name: String,
        /// New column name
        #[arg(long = "name", value_name = "NEW_NAME")]
        new_name: Option<String>,
    },

    /// Remove a column from the board
    RemoveColumn { name: String },

    /// Move a column to a new position
    MoveColumn {
        name: String,
        /// New 0-based position
        #[arg(allow_negative_numbers = true)]
        position: String,
    },

    /// List all labels in the board
    ListLabels,

    /// Create a new label
    AddLabel {
        name: String,
        /// Label color (hex, rgb, or hsl format)
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Update an existing label
    UpdateLabel {
        name: String,
        /// New label name
        #[arg(long = "name", value_name = "NEW_NAME")]
        new_name: Option<String>,
        /// Label color (hex, rgb, or hsl format)
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Remove a label from the board
    RemoveLabel { name: String },

    /// List sprints with optional filtering
    ListSprints {
        /// Filter sprints by status: all, active, upcoming, completed
        #[arg(long, default_value = "all")]
        filter: SprintFilter,
    },

    /// Create a new sprint
    AddSprint(sprint::AddArgs),

    /// Update an existing sprint
    UpdateSprint(sprint::UpdateArgs),

    /// Remove a sprint from the board
    RemoveSprint { name: String },

    /// Migrate board files to the latest version
    Migrate(MigrateArgs),

    /// Start the web server (requires knbn-web on PATH)
    Serve {
        /// Server port
        #[arg(short, long, default_value_t = 9000, value_parser = clap::value_parser!(u16).range(1..))]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let dir = board::resolve_dir(cli.dir.as_deref());
    let target = board::Target {
        dir: dir.clone(),
        file: cli.file,
        skip_prompt: cli.skip_prompt,
    };
    let json = cli.json;

    let result = match cli.command {
        None => cmd::board::list(&target, true, json),
        Some(Commands::List) => cmd::board::list(&target, target.skip_prompt, json),
        Some(Commands::CreateBoard { name }) => cmd::board::create(&dir, name.as_deref(), json),
        Some(Commands::GetBoard { filename }) => cmd::board::get(&dir, filename.as_deref(), json),
        Some(Commands::GetTask { id }) => cmd::task::get(&target, &id, json),
        Some(Commands::ListTasks(args)) => cmd::task::list(&target, args, json),
        Some(Commands::CreateTask(args)) => cmd::task::create(&target, args, json),
        Some(Commands::UpdateTask(args)) => cmd::task::update(&target, args, json),
        Some(Commands::ListColumns { count }) => cmd::column::list(&target, count, json),
        Some(Commands::CreateColumn { name, position }) => {
            cmd::column::create(&target, &name, position.as_deref(), json)
        }
        Some(Commands::UpdateColumn { name, new_name }) => {
            cmd::column::update(&target, &name, new_name, json)
        }
        Some(Commands::RemoveColumn { name }) => cmd::column::remove(&target, &name, json),
        Some(Commands::MoveColumn { name, position }) => {
            cmd::column::move_to(&target, &name, &position, json)
        }
        Some(Commands::ListLabels) => cmd::label::list(&target, json),
        Some(Commands::AddLabel { name, color }) => {
            cmd::label::add(&target, &name, color.as_deref(), json)
        }
        Some(Commands::UpdateLabel {
            name,
            new_name,
            color,
        }) => cmd::label::update(&target, &name, new_name, color, json),
        Some(Commands::RemoveLabel { name }) => cmd::label::remove(&target, &name, json),
        Some(Commands::ListSprints { filter }) => cmd::sprint::list(&target, filter, json),
        Some(Commands::AddSprint(args)) => cmd::sprint::add(&target, args, json),
        Some(Commands::UpdateSprint(args)) => cmd::sprint::update(&target, args, json),
        Some(Commands::RemoveSprint { name }) => cmd::sprint::remove(&target, &name, json),
        Some(Commands::Migrate(args)) => cmd::migrate::run(&dir, args, json),
        Some(Commands::Serve { port }) => cmd::serve::run(port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
