#![allow(missing_docs)]
use anyhow::{Context, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use booking_api::{Credentials, run};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let AppArgs {
        host,
        port,
        credentials,
    } = AppArgs::parse().context("parsing arguments")?;
    let addr = SocketAddr::from((host, port));
    run(addr, credentials).await?;

    info!("booking API stopped");
    Ok(())
}

#[derive(Debug)]
struct AppArgs {
    host: IpAddr,
    port: u16,
    credentials: Credentials,
}

impl AppArgs {
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let host = pargs
            .opt_value_from_str(["-h", "--host"])
            .context("parsing host argument")?;

        let port = pargs
            .opt_value_from_str(["-p", "--port"])
            .context("parsing port argument")?;

        let username: Option<String> = pargs
            .opt_value_from_str("--username")
            .context("parsing username argument")?;

        let password: Option<String> = pargs
            .opt_value_from_str("--password")
            .context("parsing password argument")?;

        let defaults = Credentials::default();
        let result = Self {
            host: host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            port: port.unwrap_or(3000),
            credentials: Credentials::new(
                username.unwrap_or(defaults.username),
                password.unwrap_or(defaults.password),
            ),
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "ignoring unknown arguments");
        }
        Ok(result)
    }
}
