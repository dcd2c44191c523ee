mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kalender_core::Settings;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kalender")]
#[command(about = "Query a remote event calendar and work with its auth tokens")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List events of one or more calendars
    Events {
        /// Calendar (structure) ids, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        scope: Vec<i64>,

        /// Filter as a JSON object, e.g. '{"limit": 10}'
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Show calendars and their categories
    Structures {
        #[arg(short, long, value_delimiter = ',', required = true)]
        scope: Vec<i64>,
    },
    /// Print the index tree below the given nodes
    Index {
        #[arg(short, long, value_delimiter = ',', required = true)]
        scope: Vec<i64>,

        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Check (or request) write permission for a calendar
    Permission {
        #[arg(short, long)]
        calendar: i64,

        /// Act as this user instead of the configured api_user
        #[arg(short, long)]
        user: Option<String>,

        /// Ask the calendar's owners for write permission
        #[arg(long)]
        request: bool,
    },
    /// Generate, issue or verify auth tokens
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
    /// Print the login page link
    LoginUrl {
        /// Where the login page should send the user back to
        #[arg(short, long)]
        redirect: Option<String>,
    },
    /// Write a commented default config file
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Write token for a check value, signed with the configured api_key
    Generate { check: String },
    /// Login token for a user, as the login page would issue it
    Issue { user: String },
    /// Verify a login token against the [auth] settings
    Verify { token: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load()?;

    match cli.command {
        Commands::Events { scope, filter } => {
            commands::events::run(&settings, &scope, filter.as_deref())
        }
        Commands::Structures { scope } => commands::structures::run(&settings, &scope),
        Commands::Index { scope, filter } => {
            commands::index::run(&settings, &scope, filter.as_deref())
        }
        Commands::Permission {
            calendar,
            user,
            request,
        } => commands::permission::run(&settings, calendar, user.as_deref(), request),
        Commands::Token { command } => match command {
            TokenCommands::Generate { check } => commands::token::generate(&settings, &check),
            TokenCommands::Issue { user } => commands::token::issue(&settings, &user),
            TokenCommands::Verify { token } => commands::token::verify(&settings, &token),
        },
        Commands::LoginUrl { redirect } => commands::login_url::run(&settings, redirect.as_deref()),
        Commands::InitConfig { force } => commands::init_config::run(force),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
