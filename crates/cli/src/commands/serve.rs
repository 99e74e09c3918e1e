//! `serve` command implementation.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use contracts::RelayConfig;
use dispatcher::{DispatcherBuilder, DispatcherConfig};
use server::AppState;

use crate::cli::ServeArgs;

/// Execute the `serve` command
pub async fn run_serve(args: &ServeArgs) -> Result<()> {
    let config = build_config(args)?;

    for writer in &config.writers {
        info!(
            writer = %writer.name,
            kind = ?writer.kind,
            endpoint = %writer.endpoint,
            send_timeout_ms = writer.send_timeout_ms,
            "Writer configured"
        );
    }
    info!(
        listen_address = %config.server.listen_address,
        writers = config.writers.len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let addr: SocketAddr = config
        .server
        .socket_addr()
        .with_context(|| format!("Invalid listen address {}", config.server.listen_address))?;

    let dispatcher = DispatcherBuilder::new(DispatcherConfig {
        writers: config.writers.clone(),
    })
    .span(info_span!("dispatcher"))
    .build()
    .context("Failed to build writers")?;

    info!("Starting up...");

    let state = AppState::new(dispatcher.clone(), config.server.max_body_bytes);
    server::serve(addr, state, shutdown_signal())
        .await
        .with_context(|| format!("Failed to listen on {addr}"))?;

    for (name, snapshot) in dispatcher.metrics() {
        info!(
            writer = %name,
            writes = snapshot.write_count,
            failures = snapshot.failure_count,
            samples = snapshot.samples_written,
            "Writer totals"
        );
    }

    info!("Remote relay finished");
    Ok(())
}

/// Load the config file (if any) and apply CLI overrides
fn build_config(args: &ServeArgs) -> Result<RelayConfig> {
    let mut config = match args.config {
        Some(ref path) => {
            info!(config = %path.display(), "Loading configuration");
            config_loader::ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => RelayConfig::default(),
    };

    if let Some(ref address) = args.listen_address {
        info!(listen_address = %address, "Overriding listen address from CLI");
        config.server.listen_address = address.clone();
    }
    if let Some(limit) = args.max_body_bytes {
        config.server.max_body_bytes = limit;
    }
    if let Some(ref url) = args.kafka_url {
        info!(endpoint = %url, "Overriding writer endpoint from CLI");
        for writer in &mut config.writers {
            writer.endpoint = url.clone();
        }
    }
    if let Some(timeout) = args.send_timeout {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        for writer in &mut config.writers {
            writer.send_timeout_ms = millis;
        }
    }

    config_loader::ConfigLoader::validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Received shutdown signal, draining in-flight requests...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_defaults_without_config_file() {
        let config = build_config(&ServeArgs::default()).unwrap();
        assert_eq!(config.server.listen_address, "0.0.0.0:9201");
        assert_eq!(config.writers.len(), 1);
        assert_eq!(config.writers[0].name, "kafka");
        assert_eq!(config.writers[0].endpoint, "localhost:9092");
        assert_eq!(config.writers[0].send_timeout_ms, 30_000);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(
            br#"
[server]
listen_address = "127.0.0.1:1234"

[[writers]]
name = "primary"

[[writers]]
name = "secondary"
"#,
        )
        .unwrap();

        let args = ServeArgs {
            config: Some(file.path().to_path_buf()),
            kafka_url: Some("broker:9092".into()),
            send_timeout: Some(Duration::from_secs(5)),
            ..Default::default()
        };

        let config = build_config(&args).unwrap();
        assert_eq!(config.server.listen_address, "127.0.0.1:1234");
        assert!(config
            .writers
            .iter()
            .all(|w| w.endpoint == "broker:9092" && w.send_timeout_ms == 5_000));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = ServeArgs {
            listen_address: Some("9201".into()),
            ..Default::default()
        };
        assert!(build_config(&args).is_err());
    }

    #[test]
    fn test_port_only_listen_address_override() {
        let args = ServeArgs {
            listen_address: Some(":9201".into()),
            ..Default::default()
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.server.socket_addr().unwrap().to_string(), "0.0.0.0:9201");
    }
}
