//! SMS Beacon — Binary Entrypoint
//! Polls the Twilio message store on the configured cadence and prints each
//! normalized batch as one JSON line on stdout.

use std::sync::Arc;

use sms_beacon::beacon::config;
use sms_beacon::beacon::scheduler::{spawn_beacon_scheduler, BeaconSchedulerCfg};
use sms_beacon::source::TwilioSource;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sms_beacon=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = config::load_config_default()?;
    tracing::info!(config = ?cfg, "sms beacon starting");

    let source = Arc::new(TwilioSource::new(
        cfg.account_sid.clone(),
        cfg.auth_token.clone(),
    ));

    let handle = spawn_beacon_scheduler(BeaconSchedulerCfg::default(), source, cfg, |batch| {
        match serde_json::to_string(&batch) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = ?e, "batch serialization failed"),
        }
    });

    handle.await?;
    Ok(())
}
