//! Defines the command-line arguments and subcommands for the `jsl` CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "jsl",
    version,
    about = "Scan, parse and check Jaslang source files."
)]
pub struct JslArgs {
    /// A YAML dialect definition to use instead of the stock language.
    #[arg(long, global = true, value_name = "FILE")]
    pub dialect: Option<PathBuf>,

    /// Print the grammar route taken before a rejected token.
    #[arg(long, global = true)]
    pub route: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the lexemes of a source file.
    Tokens {
        /// The path to the source file to scan.
        #[arg(required = true)]
        file: PathBuf,
        /// Print the lexemes as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the syntax tree of a source file as JSON.
    Ast {
        /// The path to the source file to parse.
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Parse a file, or every `.jsl` file under a directory, and report errors.
    Check {
        /// A source file or a directory to search.
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_consistent() {
        JslArgs::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let args =
            JslArgs::try_parse_from(["jsl", "tokens", "a.jsl", "--json", "--route"]).unwrap();
        assert!(args.route);
        assert!(matches!(args.command, Command::Tokens { json: true, .. }));
    }
}
