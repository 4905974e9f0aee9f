// Command line parsing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{BuildCommand, RunCommand};
use crate::error::CliResult;
use crate::logging::{init_logging, LogMode};

/// notodash - incremental Noto font build dashboard
#[derive(Parser, Debug)]
#[command(name = "notodash")]
#[command(bin_name = "notodash")]
#[command(about = "Incremental Noto font build dashboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (YAML, TOML or JSON)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rebuild changed projects and publish the dashboard
    Run {
        /// Print the build queue without building or publishing
        #[arg(long)]
        dry_run: bool,

        /// Maximum projects rebuilt this run
        #[arg(long, value_name = "N")]
        max_build: Option<usize>,
    },

    /// Build one project from its sources
    Build {
        /// Source files; the first one names the family
        #[arg(value_name = "FILE", required = true)]
        sources: Vec<PathBuf>,

        /// Build the variable font (default)
        #[arg(long, overrides_with = "no_variable")]
        variable: bool,

        /// Skip the variable font
        #[arg(long, overrides_with = "variable")]
        no_variable: bool,

        /// Build OTF static fonts (default)
        #[arg(long, overrides_with = "no_otf")]
        otf: bool,

        /// Skip OTF static fonts
        #[arg(long, overrides_with = "otf")]
        no_otf: bool,
    },
}

/// Routes parsed commands to their handlers
pub struct CommandRouter;

impl CommandRouter {
    /// Parse the process arguments and run the command
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();
        let mode = match cli.command {
            Commands::Run { .. } => LogMode::Run,
            Commands::Build { .. } => LogMode::Build,
        };
        init_logging(mode, cli.verbose, cli.quiet);

        Self::execute(&cli).await
    }

    /// Execute a parsed command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        match &cli.command {
            Commands::Run { dry_run, max_build } => {
                RunCommand::new(cli.config.clone())
                    .with_dry_run(*dry_run)
                    .with_max_build(*max_build)
                    .execute()
                    .await
            }
            Commands::Build {
                sources,
                no_variable,
                no_otf,
                ..
            } => {
                BuildCommand::new(cli.config.clone(), sources.clone())
                    .with_variable(!*no_variable)
                    .with_otf(!*no_otf)
                    .execute()
                    .await
            }
        }
    }
}
