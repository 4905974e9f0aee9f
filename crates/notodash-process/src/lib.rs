//! # notodash-process
//!
//! **Purpose**: Run the external font tools (builder, autohinter, QA checker)
//! as child processes.
//!
//! ## Features
//!
//! - **Output Capture**: stdout/stderr collected for the per-family build log
//! - **Timeout Support**: every invocation is bounded; a run cannot hang on one tool
//! - **Process Group Kill**: on timeout the whole tool tree is terminated (Unix)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use notodash_process::{ProcessManager, ProcessConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ProcessManager::new();
//!
//! let config = ProcessConfig::new("ttfautohint")
//!     .args(["in.ttf", "out.ttf"])
//!     .timeout_secs(600);
//!
//! let output = manager.run(config).await?;
//! println!("exit: {}", output.status);
//! # Ok(())
//! # }
//! ```

pub mod child;
pub mod config;
pub mod error;
pub mod manager;

pub use child::{ManagedChild, ProcessOutput};
pub use config::ProcessConfig;
pub use error::{ProcessError, Result};
pub use manager::ProcessManager;
