//! CLI command implementations
//!
//! This module contains the business logic for CLI commands,
//! extracted from main.rs for testability.

// CLI glue code - relaxed lint requirements
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]

use crate::error::Result;

pub mod handlers;
pub use handlers::{Cli, Commands, SummarizeConfig};

/// Main CLI entrypoint - dispatches commands to handlers
pub fn entrypoint(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Summarize {
            data,
            config,
            format,
            output,
        } => handlers::handle_summarize(SummarizeConfig {
            data,
            config,
            format,
            output,
        }),
        Commands::Time { command, threads } => handlers::handle_time(&command, threads),
        Commands::Config { config } => handlers::handle_config(config.as_deref()),
        Commands::Info => {
            handlers::print_info();
            Ok(())
        },
    }
}
