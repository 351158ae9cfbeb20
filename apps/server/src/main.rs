use anyhow::Context;
use rolo::domain::config::ApiConfig;
use rolo::kernel::config::load_config;
use rolo_logger::{Logger, parse_level};
use rolo_server::Server;

/// Config file searched for when `ROLO_CONFIG` is unset (any extension `config` reads).
const DEFAULT_CONFIG: &str = "server";

#[rolo_runtime::main(server)]
async fn main() -> anyhow::Result<()> {
    let path = std::env::var("ROLO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_owned());
    let cfg: ApiConfig = load_config(Some(&path)).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg)?;
    tracing::info!(config = %path, app = %cfg.app.name, "Configuration loaded");

    Server::builder().config(cfg).build().await?.run().await
}

fn init_logger(cfg: &ApiConfig) -> anyhow::Result<Logger> {
    let log = &cfg.log;
    let builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(parse_level(&log.level)?);
    let builder = match &log.filter {
        Some(filter) => builder.env_filter(filter),
        None => builder,
    };

    let logger = match &log.path {
        Some(path) => builder.path(path).json(log.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}
