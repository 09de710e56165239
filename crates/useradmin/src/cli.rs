use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;
use useradmin_core::{SortField, StatusFilter, UserStatus};

#[derive(Parser, Debug)]
#[command(name = "useradmin", version, about = "Manage user accounts over a REST backend")]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a TOML config file
    #[arg(long, env = "USERADMIN_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend API root, e.g. https://admin.example.com/api (overrides config file)
    #[arg(long, env = "USERADMIN_URL", global = true)]
    pub url: Option<String>,

    /// Bearer token (overrides config file)
    #[arg(long, env = "USERADMIN_TOKEN", global = true)]
    pub token: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

/// Status filter as accepted on the command line
#[derive(ValueEnum, Clone, Debug, Copy, Default, PartialEq, Eq)]
pub enum StatusArg {
    #[default]
    All,
    Active,
    Inactive,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Active => StatusFilter::Active,
            StatusArg::Inactive => StatusFilter::Inactive,
        }
    }
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum CurrentStatus {
    Active,
    Inactive,
}

impl From<CurrentStatus> for UserStatus {
    fn from(arg: CurrentStatus) -> Self {
        match arg {
            CurrentStatus::Active => UserStatus::Active,
            CurrentStatus::Inactive => UserStatus::Inactive,
        }
    }
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum SortArg {
    Id,
    Username,
    Status,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Id => SortField::Id,
            SortArg::Username => SortField::Username,
            SortArg::Status => SortField::Status,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List users (one page, server-side filtered and sorted)
    #[command(visible_alias = "ls")]
    List {
        /// Search text
        #[arg(long, short = 's', default_value = "")]
        search: String,

        /// Status filter
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,

        /// Page number, starting at 1
        #[arg(long, short = 'p', default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Rows per page (defaults to the configured page size)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        page_size: Option<u64>,

        /// Column to sort by
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,
    },
    /// Create a new user
    #[command(visible_alias = "new")]
    Create {
        /// Username (at least 3 characters)
        #[arg(long, short = 'u')]
        username: String,

        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,

        /// Password confirmation (prompted for when omitted)
        #[arg(long)]
        confirm_password: Option<String>,

        /// Show passwords while typing them
        #[arg(long)]
        show_password: bool,
    },
    /// Change a user's username
    Edit {
        /// User ID
        id: String,

        /// New username (at least 3 characters)
        #[arg(long, short = 'u')]
        username: String,
    },
    /// Flip a user between active and inactive
    Toggle {
        /// User ID
        id: String,

        /// Current status (looked up when omitted)
        #[arg(long, value_enum)]
        current: Option<CurrentStatus>,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Delete a user
    #[command(visible_alias = "rm")]
    Delete {
        /// User ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Interactive user table with paging, search and row actions
    Browse,
    /// Configuration inspection
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Write a .useradmin.toml config file in the current directory
    /// from --url and --token
    Init,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration (token redacted)
    Show,
    /// List config file locations in lookup order
    Path,
}

impl Cli {
    /// Generate shell completions and write to stdout
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "useradmin", &mut std::io::stdout());
    }
}
