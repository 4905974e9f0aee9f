// CLI errors and their user-facing messages

use notodash_dashboard::DashboardError;
use notodash_storage::StorageError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] StorageError),

    #[error("Build of {family} failed: {message}")]
    Build { family: String, message: String },

    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Message printed before exiting with status 1
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!("Invalid argument: {}\n\nRun 'notodash --help' for usage information.", message)
            }
            CliError::Config(e) => {
                format!("Configuration error: {}\n\nCheck the --config file and NOTODASH_* variables.", e)
            }
            CliError::Build { family, message } => {
                format!("Build of {} failed: {}\n\nSee {}/build.log in the output directory.", family, message, family)
            }
            CliError::Dashboard(e) => {
                format!("Dashboard run aborted: {}", e)
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
