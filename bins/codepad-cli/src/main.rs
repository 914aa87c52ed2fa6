mod commands;
mod samples;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codepad-cli")]
#[command(about = "codepad CLI - Run code on the judge from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a source file on the judge
    Run {
        /// Language id (e.g., python, cpp, java)
        #[arg(short, long)]
        language: String,

        /// Source file to execute
        #[arg(short, long)]
        file: PathBuf,

        /// File whose contents are fed to the program as stdin
        #[arg(short, long)]
        stdin: Option<PathBuf>,

        /// CPU time limit in seconds
        #[arg(short, long)]
        time_limit: Option<f64>,

        /// Memory limit in KB
        #[arg(short, long)]
        memory_limit: Option<u64>,

        /// Print the full result as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List supported languages and their judge ids
    Languages,

    /// Run the built-in sample program for each language that has one
    Smoke {
        /// Only check this language
        #[arg(short, long)]
        language: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            language,
            file,
            stdin,
            time_limit,
            memory_limit,
            json,
        } => {
            let ok = commands::run_file(
                &language,
                &file,
                stdin.as_deref(),
                time_limit,
                memory_limit,
                json,
            )
            .await?;
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Languages => {
            commands::list_languages();
        }
        Commands::Smoke { language } => {
            let ok = commands::smoke(language.as_deref()).await?;
            if !ok {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
