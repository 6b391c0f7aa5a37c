//! Clap derive structures for the `terraform-provider-ns1` command line.

use clap::{Args, Parser, Subcommand};

/// Drive one NS1 resource operation over a JSON attribute bag
#[derive(Debug, Parser)]
#[command(
    name = "terraform-provider-ns1",
    version,
    about = "Run one NS1 resource operation",
    long_about = "Runs a single lifecycle operation against the NS1 API.\n\n\
        The attribute bag {\"id\", \"state\", \"config\"} is read as JSON from stdin\n\
        and the resulting bag is written as JSON to stdout.",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "NS1_LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a resource from its configuration
    Create(TypeArgs),
    /// Refresh a resource from the API
    Read(TypeArgs),
    /// Apply configuration changes in place
    Update(TypeArgs),
    /// Delete a resource
    Delete(TypeArgs),
    /// Adopt an existing remote object
    Import(ImportArgs),
    /// Show the attribute changes an apply would make
    Plan(TypeArgs),
    /// Read a data source
    Data(TypeArgs),
    /// List registered resource and data source types
    Types,
}

#[derive(Debug, Args)]
pub struct TypeArgs {
    /// Resource or data source type (e.g. ns1_zone)
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Resource ID, overriding the one in the input bag
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Resource type (e.g. ns1_record)
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Import ID, e.g. zone/domain/type for records
    #[arg(long)]
    pub id: String,
}
