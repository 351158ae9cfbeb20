use clap::{Parser, Subcommand};

pub(crate) const DEFAULT_URL: &str = "http://127.0.0.1:4583";

/// Manage the client directory of a running rolo server.
#[derive(Debug, Parser)]
#[command(name = "rolo", version, about)]
pub(crate) struct Cli {
    /// Base URL of the server.
    #[arg(long, global = true, env = "ROLO_URL", default_value = DEFAULT_URL)]
    pub(crate) url: String,

    /// Rows per page.
    #[arg(
        long,
        global = true,
        default_value_t = 10,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub(crate) page_size: u16,

    /// Only accept digits in phone numbers.
    #[arg(long, global = true)]
    pub(crate) strict_phone: bool,

    /// Log requests (repeat for more detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub(crate) enum Command {
    /// Show one page of clients, newest first.
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Find clients by name, email or phone (case-insensitive).
    Search { query: String },
    /// Create a client.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a client by id.
    Delete { id: String },
}
