use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rWorklog
/// CLI application to clock work sessions with SQLite
#[derive(Parser)]
#[command(
    name = "rworklog",
    version = env!("CARGO_PKG_VERSION"),
    about = "A work session ledger: clock in/out, track the weekly goal and archive past months",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update, no background archive)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Freeze the clock at a local wall time (YYYY-MM-DDTHH:MM[:SS])
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/vim/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Start a work session
    #[command(visible_alias = "in")]
    Clockin {
        /// Optional note for the session
        note: Option<String>,

        #[arg(
            short = 't',
            long = "time",
            help = "Start time (HH:MM); a time later than now means yesterday"
        )]
        time: Option<String>,

        #[arg(
            long = "close-at",
            value_name = "HH:MM",
            help = "Close the active session at this time before clocking in"
        )]
        close_at: Option<String>,
    },

    /// Close the active session
    #[command(visible_alias = "out")]
    Clockout {
        /// Break in minutes (same as --break)
        #[arg(value_name = "BREAK")]
        break_pos: Option<i32>,

        #[arg(
            short = 'b',
            long = "break",
            help = "Break in minutes (default from work rules)"
        )]
        break_minutes: Option<i32>,

        #[arg(short = 't', long = "time", help = "End time (HH:MM)")]
        time: Option<String>,

        #[arg(short = 'n', long = "note", help = "Note (replaces the current one)")]
        note: Option<String>,

        #[arg(long = "id", help = "Session id (must be the active session)")]
        id: Option<String>,
    },

    /// Today's progress and the active session
    Status {
        #[arg(long, help = "Print a JSON snapshot")]
        json: bool,
    },

    /// Weekly progress against the goal
    Week {
        /// `last`, or any date (YYYY-MM-DD) inside the wanted week
        which: Option<String>,

        #[arg(long, help = "Print a JSON snapshot")]
        json: bool,
    },

    /// Month-to-date progress
    Month {
        #[arg(long, help = "Print a JSON snapshot")]
        json: bool,
    },

    /// Total hours and daily breakdown over a date range
    #[command(visible_aliases = ["report", "between"])]
    Range {
        /// `last-week`, `last-month` or a single day (YYYY-MM-DD); default: last 7 days
        which: Option<String>,

        #[arg(short = 's', long = "start", value_name = "YYYY-MM-DD")]
        start: Option<String>,

        #[arg(short = 'e', long = "end", value_name = "YYYY-MM-DD")]
        end: Option<String>,

        #[arg(long, help = "Print a JSON snapshot")]
        json: bool,
    },

    /// Edit a session (default: the active one)
    Edit {
        /// Session id (full or first 8 characters)
        id: Option<String>,

        #[arg(short = 'b', long = "break", help = "Break in minutes")]
        break_minutes: Option<i32>,

        #[arg(short = 'n', long = "note", help = "Note (empty string clears it)")]
        note: Option<String>,

        #[arg(short = 't', long = "start", help = "Start time (HH:MM)")]
        start: Option<String>,

        #[arg(short = 'e', long = "end", help = "End time (HH:MM)")]
        end: Option<String>,
    },

    /// Delete a session
    Delete {
        /// Session id (full or first 8 characters)
        id: String,

        #[arg(long, short = 'f', help = "Do not ask for confirmation")]
        force: bool,
    },

    /// List this week's sessions
    Sessions,

    /// Monthly Markdown archives
    Archive {
        #[command(subcommand)]
        action: ArchiveAction,
    },

    /// Summary of the last archived months
    History {
        /// Number of months to show
        #[arg(default_value_t = 3)]
        months: usize,
    },

    /// Export work session data
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day, a custom range or `all` (default: last 30 days)"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ArchiveAction {
    /// Archive every complete past month not yet archived
    Auto,

    /// Archive one month (YYYY-MM)
    Month {
        month: String,

        #[arg(long, help = "Remove the archived sessions from the database")]
        clean: bool,
    },

    /// List archived months
    List,

    /// Print an archived month (YYYY-MM)
    Show { month: String },
}
