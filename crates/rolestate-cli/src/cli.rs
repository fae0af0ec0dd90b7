use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rolestate",
    about = "rolestate — user roles over an ordered key-value store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// State snapshot file (overrides the configured path)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize the contract
    Init(InitArgs),
    /// Create a user role
    Create(CreateArgs),
    /// Show the user role stored at an id
    Get(GetArgs),
    /// List user roles with a given name
    ByName(ByNameArgs),
    /// List every user role
    All(AllArgs),
    /// Invoke a contract function by name
    Invoke(InvokeArgs),
    /// List the functions the contract accepts
    Operations(OperationsArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct CreateArgs {
    pub id: String,
    pub name: String,
}

#[derive(Args)]
pub struct GetArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ByNameArgs {
    pub name: String,
}

#[derive(Args)]
pub struct AllArgs {}

#[derive(Args)]
pub struct InvokeArgs {
    /// Function name, e.g. GetUserByRoleName
    pub function: String,
    /// Positional string arguments
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct OperationsArgs {}
