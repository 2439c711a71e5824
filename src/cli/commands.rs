use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "kanban",
    version = VERSION,
    about = "Kanban task board with drag-and-drop ordering",
    after_help = "\
NOTE:
  Board data lives in .kanban/ (found by walking up from the current directory,
  or set KANBAN_HOME). Run `kanban init` first, then `kanban signup` or `kanban login`.

EXIT CODES:
  0  Success
  1  Error (validation, not signed in, failed write, etc.)

ORDERING RULES:
  Dropping a task on a task in the same column renumbers that column 0..n-1.
  Dropping a task on another column (or a task in it) appends it to that column.
  The source column is not compacted unless `compact_source_on_move` is enabled.
  Default columns (to-do, doing, done) can be reordered but not renamed or deleted.

LOGGING:
  KANBAN_LOG=<filter> (default: warn), KANBAN_LOG_JSON=1 for JSON lines on stderr."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a board home in this directory
    Init,

    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show all columns and their tasks
    Board,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Column management
    #[command(subcommand)]
    Column(ColumnCommands),

    /// Drop a task or column onto a target (task id or column name)
    #[command(after_help = "\
NOTE:
  The dragged item is a column if ACTIVE names a column, otherwise a task.
  Omitting OVER is a drop outside any target and changes nothing.")]
    Drag {
        /// Dragged task id (or prefix) or column name
        active: String,
        /// Drop target: task id (or prefix) or column name
        over: Option<String>,
    },

    /// Board options
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task at the bottom of a column
    Add {
        content: String,
        #[arg(long, default_value = "to-do")]
        status: String,
    },
    /// List tasks, optionally for one column
    List {
        #[arg(long)]
        status: Option<String>,
    },
    /// Show task details
    Show {
        /// Task ID or prefix
        id: String,
    },
    /// Replace the task content
    Edit { id: String, content: String },
    /// Set the task description
    Describe { id: String, text: String },
    /// Add a comment to the task activity
    Comment { id: String, text: String },
    /// Delete a task
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ColumnCommands {
    /// Add a column at the right end
    Add { name: String },
    /// List columns in display order
    List,
    /// Rename a user-created column
    Rename { name: String, new_name: String },
    /// Delete a user-created column and all of its tasks
    Delete { name: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current options
    Show,
    /// Change an option
    Set {
        #[command(subcommand)]
        option: ConfigOption,
    },
}

#[derive(Subcommand)]
pub enum ConfigOption {
    /// Renumber the source column when a task moves to another column
    CompactSourceOnMove {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}
