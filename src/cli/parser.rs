use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface for EnviroSage
/// Fleet monitoring for waste-collection bins
#[derive(Parser)]
#[command(
    name = "envirosage",
    version = env!("CARGO_PKG_VERSION"),
    about = "Fleet monitoring for waste-collection bins: fill status, search and role-gated sessions",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the session file path
    #[arg(global = true, long = "session")]
    pub session: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Debug diagnostics on stderr
    #[arg(global = true, short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only print errors
    #[arg(global = true, short = 'q', long = "quiet")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Import bins, user profiles and the registration roster from a JSON file
    Seed {
        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Create an account for an email listed in the roster
    Register {
        #[arg(long)]
        email: String,

        #[arg(long = "employee-id")]
        employee_id: String,

        #[arg(long)]
        password: String,

        #[arg(long = "confirm")]
        confirm_password: String,
    },

    /// Sign in with an email or an employee id
    Login {
        /// Email address, or employee id when it contains no '@'
        identifier: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out and clear the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// Fleet dashboard (administrators)
    Bins {
        #[command(subcommand)]
        action: BinsCommand,
    },

    /// Driver console
    Driver,

    /// Export the fleet (administrators)
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Only bins whose id contains this text")]
        search: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long, help = "Only the most recent N rows")]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum BinsCommand {
    /// List bins sorted by id
    List {
        #[arg(long, short = 's', help = "Only bins whose id contains this text")]
        search: Option<String>,

        #[arg(long, help = "low | medium | high")]
        status: Option<String>,
    },

    /// Detail view of one bin
    Show { id: u64 },

    /// Bins with coordinates
    Map,

    /// Collection priority from the fill trend
    Priority,

    /// Apply simulated telemetry on a fixed interval
    Watch {
        #[arg(long, default_value_t = 3)]
        ticks: u64,

        #[arg(long = "interval-ms")]
        interval_ms: Option<u64>,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}
