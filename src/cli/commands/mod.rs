//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod files;
mod helpers;
mod init;
mod process;
mod serve;
mod tools;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "docingest")]
#[command(about = "Document ingestion: text extraction, entity analysis and deduplicated storage")]
#[command(version)]
pub struct Cli {
    /// Data directory or database file (overrides config file).
    /// Can be a directory containing docingest.db or a .db file directly.
    #[arg(long, short = 'd', global = true)]
    data: Option<PathBuf>,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Start the web server
    Serve {
        /// Address to bind (defaults to server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Process files through the ingestion pipeline
    Process {
        /// Files to process
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List processed files, newest first
    List,

    /// Show the stored extraction for a file
    Show {
        /// Record ID (from `list`)
        id: i64,
    },

    /// Check if the conversion tools are installed
    Tools,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        data: cli.data,
    };
    let (settings, _config) = load_settings_with_options(options).await?;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| settings.host.clone());
            let port = port.unwrap_or(settings.port);
            serve::cmd_serve(&settings, &host, port).await
        }
        Commands::Process { files, json } => process::cmd_process(&settings, &files, json).await,
        Commands::List => files::cmd_list(&settings).await,
        Commands::Show { id } => files::cmd_show(&settings, id).await,
        Commands::Tools => tools::cmd_tools(&settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process() {
        let cli = Cli::try_parse_from(["docingest", "process", "a.pdf", "b.txt", "--json"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Process {
                files: vec![PathBuf::from("a.pdf"), PathBuf::from("b.txt")],
                json: true,
            }
        );
    }

    #[test]
    fn test_process_requires_files() {
        assert!(Cli::try_parse_from(["docingest", "process"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docingest",
            "serve",
            "--port",
            "9000",
            "--data",
            "/tmp/docs",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/docs")));
        assert_eq!(
            cli.command,
            Commands::Serve {
                host: None,
                port: Some(9000),
            }
        );
    }

    #[test]
    fn test_show_requires_numeric_id() {
        assert!(Cli::try_parse_from(["docingest", "show", "abc"]).is_err());
        let cli = Cli::try_parse_from(["docingest", "show", "7"]).unwrap();
        assert_eq!(cli.command, Commands::Show { id: 7 });
    }
}
