//! Command-line interface.

pub mod output;

mod delete;
mod generate;
mod get;
mod list;
mod search;
mod share;
mod whoami;

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use crate::core::config::Settings;
use crate::core::directory::Directory;
use crate::error::Result;

/// Deaddrop - share secrets with members and teams of your organization.
#[derive(Parser)]
#[command(
    name = "deaddrop",
    about = "Share secrets with members and teams of your organization",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Organization whose directory to use
    #[arg(long, global = true, env = "DEADDROP_ORG")]
    pub org: Option<String>,

    /// Base URL of the directory API
    #[arg(long, global = true, env = "DEADDROP_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Where to cache directory snapshots
    #[arg(long, global = true, env = "DEADDROP_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Refetch the directory even when the cache is fresh
    #[arg(long, global = true)]
    pub refresh: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Drop a secret for one or more members and teams
    #[command(group(ArgGroup::new("targets").required(true).multiple(true)))]
    Share {
        /// File containing the secret
        #[arg(short, long, value_name = "FILE")]
        filename: PathBuf,
        /// Name of the secret
        #[arg(short, long)]
        name: String,
        /// Member to drop the secret for (repeat for multiple members)
        #[arg(short, long, group = "targets")]
        member: Vec<String>,
        /// Team to drop the secret for (repeat for multiple teams)
        #[arg(short, long, group = "targets")]
        team: Vec<String>,
    },

    /// Print a secret from your drop
    Get {
        /// Name of the secret
        name: String,
    },

    /// List the secrets dropped for you and your teams
    List,

    /// Delete a secret from your drop
    Delete {
        /// Name of the secret
        name: String,
        /// Team drop to delete from instead of your own
        #[arg(short, long)]
        team: Option<String>,
    },

    /// Search the directory for members and teams
    Search {
        /// Search terms; leave empty to list everything
        terms: Vec<String>,
    },

    /// Generate storage policies and auth roles for every member and team
    Generate {
        /// Directory for the generated policy files
        #[arg(long, value_name = "DIR")]
        policy_dir: PathBuf,
        /// Directory for the generated role files
        #[arg(long, value_name = "DIR")]
        role_dir: PathBuf,
        /// Team containing every member of the organization
        #[arg(long, default_value = "all")]
        default_team: String,
    },

    /// Print the login your credentials resolve to
    Whoami,
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(cli.org, cli.api_url, cli.cache_dir, cli.refresh)?;
    let directory = Directory::connect(&settings)?;

    match cli.command {
        Command::Share {
            filename,
            name,
            member,
            team,
        } => share::run(&settings, &directory, &filename, &name, &member, &team),
        Command::Get { name } => get::run(&settings, &directory, &name),
        Command::List => list::run(&settings, &directory),
        Command::Delete { name, team } => delete::run(&settings, &directory, &name, team.as_deref()),
        Command::Search { terms } => search::run(&directory, &terms),
        Command::Generate {
            policy_dir,
            role_dir,
            default_team,
        } => generate::run(&directory, policy_dir, role_dir, default_team),
        Command::Whoami => whoami::run(&directory),
    }
}
