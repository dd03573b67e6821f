//! `chatrelay run` — Register every model and relay until interrupted.

use std::path::Path;

use chatrelay_channels::ChatRelayAdapter;
use tracing::{error, info, warn};

pub async fn run(
    config_path: Option<&Path>,
    port_override: Option<u16>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config =
        super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.host.port = port;
        config
            .validate()
            .map_err(|e| format!("Invalid --port: {e}"))?;
    }

    println!("ChatRelay");
    println!(
        "   Postbacks: http://{}:{}",
        config.host.postback_host, config.host.port
    );
    println!("   Models: {}", config.models.len());

    let adapter = ChatRelayAdapter::from_config(&config);

    for model in config.descriptors() {
        if let Err(e) = adapter.register_collection(&model).await {
            error!(identity = %model.identity, error = %e, "Model registration failed");
            if strict {
                adapter.teardown_all().await;
                return Err(format!("Failed to register model '{}': {e}", model.identity).into());
            }
        }
    }

    let registered = adapter.len().await;
    if registered == 0 {
        warn!("No models registered, nothing to relay");
        return Ok(());
    }
    info!(registered, "Relaying IRC messages, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    adapter.teardown_all().await;

    Ok(())
}
