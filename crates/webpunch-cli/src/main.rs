use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};

use webpunch_browser::PunchKind;
use webpunch_cli::commands::{self, config::SetOptions};
use webpunch_cli::OutputFormat;
use webpunch_core::CredentialStore;

#[derive(Parser)]
#[command(name = "webpunch")]
#[command(author, version)]
#[command(
    about = "Automates clock-in/clock-out punches on a web attendance portal",
    long_about = "Webpunch logs into your employer's web attendance portal with a \
                  controlled browser and clicks the clock-in/clock-out controls for you. \
                  Credentials are stored encrypted on this machine."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Append structured log lines to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Directory holding config.json and key.bin (default: ~/.webpunch)
    #[arg(long, global = true, env = "WEBPUNCH_CONFIG_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Punch in for the day
    ClockIn,

    /// Punch out for the day
    ClockOut,

    /// Log in to the portal with the saved settings, without punching
    TestLogin,

    /// Show configuration status
    Status {
        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Manage stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Save portal URL, identity, element locators and options
    Set {
        /// Login page URL of the attendance portal
        #[arg(long)]
        url: Option<String>,

        /// Portal user id
        #[arg(long)]
        user_id: Option<String>,

        /// Portal password (stored encrypted; prefer --prompt-password)
        #[arg(long)]
        password: Option<String>,

        /// Prompt for the password without echoing it
        #[arg(long, conflicts_with = "password")]
        prompt_password: bool,

        /// Override an element locator, e.g. --selector login_button=signin-btn
        #[arg(long = "selector", value_name = "ROLE=ID")]
        selectors: Vec<String>,

        /// Enable automatic clock-out at the given time
        #[arg(long, value_name = "HH:MM")]
        auto_end: Option<String>,

        /// Disable automatic clock-out
        #[arg(long, conflicts_with = "auto_end")]
        no_auto_end: bool,

        /// Run the browser without a visible window (default)
        #[arg(long)]
        headless: bool,

        /// Run the browser with a visible window
        #[arg(long, conflicts_with = "headless")]
        no_headless: bool,
    },

    /// Print the stored configuration (password masked)
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Delete the stored configuration
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.log_file.as_deref());

    let store = open_store(cli.config_dir);

    match cli.command {
        Commands::ClockIn => commands::clock::execute(store, PunchKind::ClockIn),
        Commands::ClockOut => commands::clock::execute(store, PunchKind::ClockOut),
        Commands::TestLogin => commands::test_login::execute(store),
        Commands::Status { format } => commands::status::execute(&store, format),
        Commands::Config { action } => match action {
            ConfigAction::Set {
                url,
                user_id,
                password,
                prompt_password,
                selectors,
                auto_end,
                no_auto_end,
                headless,
                no_headless,
            } => commands::config::set(
                &store,
                SetOptions {
                    url,
                    user_id,
                    password,
                    prompt_password,
                    selectors,
                    auto_end,
                    no_auto_end,
                    headless,
                    no_headless,
                },
            ),
            ConfigAction::Show { format } => commands::config::show(&store, format),
            ConfigAction::Reset { yes } => commands::config::reset(&store, yes),
        },
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn open_store(config_dir: Option<PathBuf>) -> CredentialStore {
    match config_dir {
        Some(dir) => CredentialStore::open(dir),
        None => CredentialStore::open_default(),
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) {
    use tracing_subscriber::EnvFilter;

    let directives = if verbose {
        "webpunch=debug,webpunch_core=debug,webpunch_browser=debug"
    } else {
        "webpunch=info,webpunch_core=info,webpunch_browser=info"
    };
    let filter = EnvFilter::new(directives);

    if let Some(path) = log_file {
        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(file)
                    .init();
                return;
            }
            Err(e) => eprintln!("could not open log file {}: {}", path.display(), e),
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
