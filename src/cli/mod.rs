use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "outreach-portal")]
#[command(about = "Authorization and workflow core of the outreach portal")]
#[command(long_about = "Runs portal operations (users, institutes, OC/NC centres, workshops) through \
                       the argument, authorization and state checks that guard every change. \
                       Start with 'outreach-portal operations' to see what can be called.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every operation with its argument signature
    Operations {
        /// Print the list as JSON
        #[arg(long, help = "Emit machine-readable JSON instead of a table")]
        json: bool,
    },
    /// Replay a JSON operation script against a fresh portal
    Run {
        /// Path to the script file
        script: PathBuf,
        /// Keep running after a step does not match its expectation
        #[arg(long, help = "Run every step even after a mismatch")]
        keep_going: bool,
    },
    /// Load, validate and print the effective configuration
    CheckConfig,
}
