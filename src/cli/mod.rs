//! CLI module for the gradebook service
//!
//! Provides subcommands:
//! - `serve`: run the HTTP API (default)
//! - `migrate`: apply or revert PostgreSQL schema migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Gradebook API - users, courses and weighted grade averages
#[derive(Parser)]
#[command(name = "gradebook-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server (default mode)
    Serve,

    /// Apply pending schema migrations
    Migrate(migrate::MigrateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["gradebook-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_migrate_revert_flag() {
        let cli = Cli::try_parse_from(["gradebook-api", "migrate", "--revert"]).unwrap();

        match cli.command {
            Some(Command::Migrate(args)) => assert!(args.revert),
            _ => panic!("expected migrate command"),
        }
    }
}
