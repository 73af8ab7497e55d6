use anyhow::Result;
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use trends_relay::config::{Config, Credential};
use trends_relay::server::build_rocket;

#[derive(Parser, Debug)]
#[command(name = "trends-relay")]
#[command(about = "Answers chat mentions with the day's trending searches for a region")]
#[command(version)]
struct Cli {
    /// Path to config file (default: <config dir>/trends-relay/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    address: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    // Without a token there is no way to answer anyone, so refuse to start.
    let credential = Credential::from_env()?;

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(address) = cli.address {
        config.address = address;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    tracing::info!(
        address = %config.address,
        port = config.port,
        presentation = ?config.presentation,
        region_strategy = ?config.region_strategy,
        filter_to_today = config.filter_to_today,
        "starting trends relay"
    );

    let handler = trends_relay::build_handler(&config, credential);
    build_rocket(handler, config.address, config.port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("server failed: {}", e))?;

    Ok(())
}
