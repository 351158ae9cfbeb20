//! `rolo`: command line front end for the client directory.

mod cli;
mod render;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use rolo::features::clients::{
    ClientCandidate, ClientDirectory, ClientError, ClientId, HttpGateway, RuleSet,
};
use rolo_logger::{LevelFilter, Logger};
use std::io::{self, Write};

#[rolo_runtime::main(compact)]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let _logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level).init()?;

    let gateway = HttpGateway::new(&cli.url).context("Invalid --url")?;
    let rules = if cli.strict_phone { RuleSet::strict() } else { RuleSet::standard() };
    let mut directory = ClientDirectory::new(gateway, rules, usize::from(cli.page_size));

    let mut out = io::stdout().lock();
    run(&mut directory, cli.command, &mut out).await
}

async fn run<W: Write>(
    directory: &mut ClientDirectory<HttpGateway>,
    command: Command,
    out: &mut W,
) -> Result<()> {
    directory.refresh().await.context("Failed to load clients")?;

    match command {
        Command::List { page } => {
            let page = directory.set_page(page);
            let rows: Vec<_> = directory.page().iter().collect();
            render::records(out, &rows)?;
            render::pagination(out, &directory.summary(), &directory.page_links(), page)?;
        },
        Command::Search { query } => {
            let hits = directory.search(&query);
            render::records(out, &hits)?;
            writeln!(out, "{} match(es)", hits.len())?;
        },
        Command::Add { name, email, phone } => {
            let candidate = ClientCandidate { name, email, phone };
            match directory.create(&candidate).await {
                Ok(record) => writeln!(out, "Client created successfully ({})", record.id)?,
                Err(err) => {
                    if let Some(report) = err.field_errors() {
                        writeln!(out, "Validation failed:")?;
                        render::violations(out, &report)?;
                        bail!("client was not created");
                    }
                    return Err(err).context("Failed to create client");
                },
            }
        },
        Command::Delete { id } => {
            let id = ClientId::from(id);
            match directory.delete(&id).await {
                Ok(()) => writeln!(out, "Client deleted successfully")?,
                Err(ClientError::NotFound { .. }) => bail!("no client with id {id}"),
                Err(err) => return Err(err).context("Failed to delete client"),
            }
        },
    }

    Ok(())
}
