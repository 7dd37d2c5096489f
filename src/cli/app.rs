//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{self, Context};
use campusfix::core::models::{IssueStatus, Priority};
use campusfix::core::services::QueueFilter;
use campusfix::output::OutputMode;

/// campusfix - Campus facility issue tracking
#[derive(Parser, Debug)]
#[command(
    name = "campusfix",
    version,
    about = "Campus facility issue tracking",
    long_about = "Track facility issues from report to verified resolution.\n\n\
                  Priority and SLA come from the report, affected users escalate it,\n\
                  and reporters have a window to verify or dispute each fix."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Act as this user (e-mail or uid)
    #[arg(long = "as", value_name = "USER", global = true, env = "CAMPUSFIX_USER")]
    pub user: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH", global = true, env = "CAMPUSFIX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report a new issue
    Report {
        /// Short title
        #[arg(short, long)]
        title: String,

        /// What is wrong
        #[arg(short, long)]
        description: String,

        /// Category, e.g. Electrical, Plumbing
        #[arg(short, long)]
        category: String,

        /// Building and room
        #[arg(short, long, default_value = "")]
        location: String,

        /// Hide from the public feed
        #[arg(long)]
        private: bool,

        /// Photo reference
        #[arg(long)]
        image: Option<String>,
    },

    /// Move an issue between pending and in-progress (admin)
    Status {
        /// Issue ID
        id: String,

        /// pending or in-progress
        status: IssueStatus,
    },

    /// Mark an issue resolved (admin)
    Resolve {
        /// Issue ID
        id: String,

        /// What was done
        #[arg(short, long)]
        note: String,

        /// Photo of the fix
        #[arg(long)]
        image: Option<String>,
    },

    /// Confirm a resolution (reporter)
    Verify {
        /// Issue ID
        id: String,
    },

    /// Dispute a resolution (reporter)
    Reopen {
        /// Issue ID
        id: String,

        /// Reason category, e.g. "Issue Not Fixed"
        #[arg(short, long)]
        category: String,

        /// Details
        #[arg(short, long)]
        reason: String,
    },

    /// Add yourself to the affected users
    MeToo {
        /// Issue ID
        id: String,
    },

    /// Show one issue
    Show {
        /// Issue ID
        id: String,
    },

    /// Show the audit timeline of an issue
    Timeline {
        /// Issue ID
        id: String,
    },

    /// Public unresolved issues, newest first
    Feed {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Your own issues, active and resolved
    Mine,

    /// Unresolved issues by urgency (admin)
    Queue {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Resolved issues, latest first
    Resolved,

    /// Issue counts by status
    Stats,

    /// Auto-verify issues whose verification window has elapsed, once
    Sweep,

    /// Run the verification scheduler until interrupted
    Watch,

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Listing filters shared by `feed` and `queue`
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only this status
    #[arg(long)]
    pub status: Option<IssueStatus>,

    /// Only this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only this priority
    #[arg(long)]
    pub priority: Option<Priority>,
}

impl From<FilterArgs> for QueueFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            status: args.status,
            category: args.category,
            priority: args.priority,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let Some(command) = cli.command else {
        if output_mode == OutputMode::Json {
            println!(
                "{}",
                serde_json::json!({
                    "version": campusfix::VERSION,
                    "hint": "Use --help for usage"
                })
            );
        } else {
            println!("campusfix v{}", campusfix::VERSION);
            println!("\nRun 'campusfix --help' for usage");
        }
        return Ok(());
    };

    let config_path = cli.config.unwrap_or_else(campusfix::Config::default_path);
    let open = || Context::open(&config_path, cli.user.clone(), output_mode);

    match command {
        Command::Report {
            title,
            description,
            category,
            location,
            private,
            image,
        } => {
            let args = commands::ReportArgs {
                title,
                description,
                category,
                location,
                private,
                image,
            };
            commands::report(&open()?, args)
        },
        Command::Status { id, status } => commands::set_status(&open()?, &id, status),
        Command::Resolve { id, note, image } => {
            commands::resolve(&open()?, &id, &note, image.as_deref())
        },
        Command::Verify { id } => commands::verify(&open()?, &id),
        Command::Reopen {
            id,
            category,
            reason,
        } => commands::reopen(&open()?, &id, &category, &reason),
        Command::MeToo { id } => commands::me_too(&open()?, &id),
        Command::Show { id } => commands::show(&open()?, &id),
        Command::Timeline { id } => commands::timeline(&open()?, &id),
        Command::Feed { filter } => commands::feed(&open()?, &filter.into()),
        Command::Mine => commands::mine(&open()?),
        Command::Queue { filter } => commands::queue(&open()?, &filter.into()),
        Command::Resolved => commands::resolved(&open()?),
        Command::Stats => commands::stats(&open()?),
        Command::Sweep => commands::sweep(&open()?),
        Command::Watch => commands::watch(&open()?),
        Command::Config { action } => commands::config(action, &config_path, output_mode),
    }
}
