//! f1-ingestd - F1 2022 telemetry forwarder
//!
//! Listens for the game's UDP telemetry, flattens each packet into per-car
//! records and forwards them to Splunk HEC (events) and Splunk Observability
//! (gauges) until interrupted.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod cli;
mod settings;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use f1_ingest_packets::PacketListener;
use f1_ingest_pipeline::{Dispatcher, EventSink, MetricsSink, PipelineConfig};
use f1_ingest_sinks::{HecClient, SignalFxClient};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::settings::Settings;

/// Upper bound on waiting for in-flight sends at shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = if cli.config.exists() {
        Settings::load(&cli.config)
            .with_context(|| format!("loading {}", cli.config.display()))?
    } else {
        warn!(path = %cli.config.display(), "settings file not found, using defaults");
        Settings::default()
    };
    settings.apply_token_overrides(cli.hec_token.clone(), cli.sim_token.clone());
    settings
        .validate(cli.splunk.enabled(), cli.o11y.enabled())
        .context("invalid settings")?;

    log_banner(&cli, &settings);

    let events: Option<Arc<dyn EventSink>> = if cli.splunk.enabled() {
        let client = HecClient::new(settings.hec_config(&cli.hostname))
            .context("creating HEC client")?;
        Some(Arc::new(client))
    } else {
        None
    };
    let metrics: Option<Arc<dyn MetricsSink>> = if cli.o11y.enabled() {
        let client =
            SignalFxClient::new(settings.signalfx_config()).context("creating metrics client")?;
        Some(Arc::new(client))
    } else {
        None
    };

    let config = PipelineConfig {
        mode: cli.mode,
        player_name: cli.player.clone(),
        hostname: cli.hostname.clone(),
        debug: settings.debug,
        features: settings.features,
        gauges: settings.metrics.gauges.clone(),
        send_pool_size: settings.send_pool_size,
    };
    let mut dispatcher = Dispatcher::new(config, events, metrics);

    let mut listener = PacketListener::bind(cli.port)
        .await
        .with_context(|| format!("binding UDP port {}", cli.port))?;

    dispatcher.announce_startup();
    run(&mut listener, &mut dispatcher).await;

    if !dispatcher.flush(SHUTDOWN_GRACE).await {
        warn!(
            in_flight = dispatcher.pool().in_flight(),
            "shutdown grace period elapsed with sends still in flight"
        );
    }
    info!(
        dropped = dispatcher.pool().dropped_count(),
        failed = dispatcher.pool().failed_count(),
        "stopped"
    );
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("f1_ingest={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn log_banner(cli: &Cli, settings: &Settings) {
    info!(
        hostname = %cli.hostname,
        player = %cli.player,
        port = cli.port,
        mode = %cli.mode,
        debug = settings.debug,
        "starting f1-ingestd"
    );
    info!(
        splunk = cli.splunk.enabled(),
        hec_url = %settings.hec.url,
        o11y = cli.o11y.enabled(),
        metrics_endpoint = %settings.metrics.endpoint,
        "sinks"
    );
    info!(
        motion = settings.features.motion,
        telemetry = settings.features.telemetry,
        lap = settings.features.lap,
        status = settings.features.status,
        send_pool_size = settings.send_pool_size,
        "features"
    );
}

/// Receive and dispatch until Ctrl-C.
async fn run(listener: &mut PacketListener, dispatcher: &mut Dispatcher) {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            signal = &mut shutdown => {
                if let Err(err) = signal {
                    warn!(error = %err, "failed to listen for Ctrl-C");
                }
                info!("shutdown requested");
                break;
            }
            received = listener.recv() => match received {
                Ok(packet) => {
                    let kind = packet.kind();
                    let outcome = dispatcher.dispatch(packet);
                    debug!(kind = %kind, ?outcome, "dispatched");
                }
                Err(err) if err.is_unsupported() => debug!(error = %err, "ignoring datagram"),
                Err(err) => warn!(error = %err, "failed to decode datagram"),
            },
        }
    }
}
