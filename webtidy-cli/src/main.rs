//! # webtidy CLI
//!
//! Command-line interface for the webtidy source formatter.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use webtidy_core::Mode;

#[derive(Parser)]
#[command(name = "webtidy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults to the nearest .webtidy.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new webtidy project
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Minify sources into the configured output directory
    Minify {
        /// Single file to format (defaults to the whole project)
        path: Option<PathBuf>,

        /// Overwrite sources instead of writing to the output directory
        #[arg(long)]
        in_place: bool,

        /// Ignore any config file and use built-in defaults
        #[arg(long)]
        use_defaults: bool,
    },

    /// Prettify sources in place
    Prettify {
        /// Single file to format (defaults to the whole project)
        path: Option<PathBuf>,

        /// Write to the configured output directory instead of in place
        #[arg(long)]
        no_in_place: bool,

        /// Ignore any config file and use built-in defaults
        #[arg(long)]
        use_defaults: bool,
    },

    /// Open or close discussion threads
    Thread {
        #[command(subcommand)]
        command: ThreadCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Minify {
            path,
            in_place,
            use_defaults,
        } => commands::format_files(commands::FormatOptions {
            mode: Mode::Minify,
            path,
            in_place,
            config_path: cli.config,
            use_defaults,
        }),
        Commands::Prettify {
            path,
            no_in_place,
            use_defaults,
        } => commands::format_files(commands::FormatOptions {
            mode: Mode::Prettify,
            path,
            in_place: !no_in_place,
            config_path: cli.config,
            use_defaults,
        }),
        Commands::Thread { command } => match command {
            ThreadCommands::Open {
                title,
                content,
                base_url,
                first_id,
            } => {
                commands::open_thread(cli.config.as_deref(), base_url, first_id, &title, &content)
                    .await
            }
            ThreadCommands::Close {
                id,
                base_url,
                first_id,
            } => commands::close_thread(cli.config.as_deref(), base_url, first_id, id).await,
        },
    }
}

#[derive(Subcommand)]
pub enum ThreadCommands {
    /// Open a new thread
    Open {
        /// Thread title
        #[arg(long)]
        title: String,

        /// Thread body
        #[arg(long)]
        content: String,

        /// Thread server base URL (overrides [threads] in config)
        #[arg(long)]
        base_url: Option<String>,

        /// First thread id to hand out (overrides [threads] in config)
        #[arg(long)]
        first_id: Option<u64>,
    },

    /// Close an existing thread
    Close {
        /// Thread id to close
        id: u64,

        /// Thread server base URL (overrides [threads] in config)
        #[arg(long)]
        base_url: Option<String>,

        /// First thread id to hand out (overrides [threads] in config)
        #[arg(long)]
        first_id: Option<u64>,
    },
}
