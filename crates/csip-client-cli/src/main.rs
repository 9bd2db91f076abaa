//! # CSIP Client CLI
//!
//! Runs a handshake against a CSIP server and prints what was discovered.
//! Connection settings come from `CSIP_*` environment variables (see
//! [`CliConfig::from_env`]).

use anyhow::{Context, Result};
use chrono::Utc;
use csip_client::{CsipClient, HttpTransport};
use std::env;
use tracing_subscriber::EnvFilter;

mod config;

pub use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "handshake" => {
            let (mut client, config) = connect()?;
            client
                .handshake(&config.dcap_path)
                .await
                .context("Handshake failed")?;
            print_summary(&client)?;
        }
        "time" => {
            let (mut client, config) = connect()?;
            client
                .load_capability(&config.dcap_path)
                .await
                .context("Failed to load device capability")?;
            client.load_time().await.context("Failed to load server time")?;

            if let Some(time) = client.session().time.as_ref() {
                let server = time
                    .current_datetime()
                    .context("Server time out of range")?;
                println!("server time: {}", server.to_rfc3339());
                println!("offset:      {}s", time.offset_from(Utc::now()));
            }
        }
        "usage-points" => {
            let (mut client, config) = connect()?;
            client
                .load_capability(&config.dcap_path)
                .await
                .context("Failed to load device capability")?;
            client
                .load_usage_points()
                .await
                .context("Failed to load usage points")?;
            client
                .load_mirror_usage_points()
                .await
                .context("Failed to load mirror usage points")?;
            print_summary(&client)?;
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn connect() -> Result<(CsipClient<HttpTransport>, CliConfig)> {
    let config = CliConfig::from_env()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.transport.base_url,
        dcap = %config.dcap_path,
        "Connecting"
    );

    let transport =
        HttpTransport::new(config.transport.clone()).context("Failed to create transport")?;
    Ok((CsipClient::with_options(transport, config.options), config))
}

fn print_summary(client: &CsipClient<HttpTransport>) -> Result<()> {
    let summary = serde_json::to_string_pretty(&client.session().summary())?;
    println!("{summary}");
    Ok(())
}

fn print_help() {
    println!(
        r#"CSIP Client

USAGE:
    csip-client <COMMAND>

COMMANDS:
    handshake       Discover devices, programs, controls, and curves
    time            Print server time and local clock offset
    usage-points    Load usage points and mirror usage points
    help            Show this help message

ENVIRONMENT:
    CSIP_BASE_URL                 Server base URL (default http://localhost:8443)
    CSIP_DCAP_PATH                Device capability path (default /dcap)
    CSIP_BEARER_TOKEN             Bearer token
    CSIP_CA_CERT                  CA certificate (PEM)
    CSIP_CLIENT_CERT              Client certificate for mTLS (PEM)
    CSIP_CLIENT_KEY               Client private key for mTLS (PEM)
    CSIP_TIMEOUT_SECS             Per-request timeout
    CSIP_HANDSHAKE_TIMEOUT_SECS   Whole-handshake timeout

EXAMPLES:
    CSIP_BASE_URL=https://utility.example:8443 csip-client handshake
    RUST_LOG=csip_client=debug csip-client time
"#
    );
}
