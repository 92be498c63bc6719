use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "chimera")]
#[command(about = "Chimera Migrator - AI-assisted code migration between languages", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate code from one language to another
    Migrate {
        /// Source language label (see `chimera languages`)
        #[arg(long)]
        from: String,
        /// Target language label
        #[arg(long)]
        to: String,
        /// Input file, or `-` for stdin (default)
        #[arg(short, long, conflicts_with = "example")]
        input: Option<PathBuf>,
        /// Migrate the bundled sample for the source language instead of reading input
        #[arg(long)]
        example: bool,
        /// Override a setting for this run, e.g. `--set temperature=0.2`
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
        /// Enable and print the unified diff
        #[arg(long)]
        diff: bool,
        /// Print the analysis report of the output
        #[arg(long)]
        report: bool,
    },
    /// Guess the language of a code sample
    Detect {
        /// Input file, or `-` for stdin (default)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print the analysis report of a code sample
    Analyze {
        /// Language label of the sample
        #[arg(long)]
        lang: String,
        /// Input file, or `-` for stdin (default)
        #[arg(short, long, conflicts_with = "example")]
        input: Option<PathBuf>,
        /// Analyze the bundled sample for the language instead of reading input
        #[arg(long)]
        example: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported language labels
    Languages,
    /// Inspect or create the settings file
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the effective settings
    Show {
        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Write the default settings file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Migrate {
            from,
            to,
            input,
            example,
            overrides,
            diff,
            report,
        } => {
            commands::migrate::run(commands::migrate::MigrateArgs {
                from,
                to,
                input,
                example,
                overrides,
                diff,
                report,
            })
            .await?
        }
        Commands::Detect { input } => commands::detect::run(input.as_deref())?,
        Commands::Analyze {
            lang,
            input,
            example,
            json,
        } => commands::analyze::run(&lang, input.as_deref(), example, json).await?,
        Commands::Languages => commands::languages::run(),
        Commands::Settings { action } => match action {
            SettingsAction::Show { json } => commands::settings::show(json)?,
            SettingsAction::Init { force } => commands::settings::init(force)?,
        },
    }

    Ok(())
}
