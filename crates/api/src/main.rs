//! Anger Watch - Main Entry Point

use std::sync::Arc;

use alerting::{AlertConfig, AlertDebouncer, AlertSink, SoundSwitch, TerminalBell};
use anyhow::{Context, Result};
use api::{init_logging, install_metrics, open_inputs, run_server, AppState, Inputs, Settings};
use session::EmotionSession;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    init_logging(&settings.logging)?;

    info!("=== Anger Watch v{} ===", env!("CARGO_PKG_VERSION"));

    let metrics = match install_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            None
        }
    };

    let sound = SoundSwitch::new(settings.alerting.sound_enabled);
    let sink = build_sink(&settings.alerting).context("Failed to open alert output")?;
    let debouncer = AlertDebouncer::new(settings.alerting.clone(), sink, sound.clone());
    let mut session = EmotionSession::new(
        settings.session.clone(),
        settings.expression.clone(),
        debouncer,
    )
    .with_camera(&settings.camera);

    let state = Arc::new(RwLock::new(AppState::new(sound, session.subscribe(), metrics)));
    let (stop_tx, stop_rx) = watch::channel(false);

    let listener = tokio::net::TcpListener::bind(&settings.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", settings.server.bind))?;
    let server = tokio::spawn(run_server(listener, state, stop_rx.clone()));

    // Startup failures are fatal: the status line shows them and we exit
    let Inputs {
        mut detector,
        mut source,
    } = open_inputs(&mut session, &settings)?;

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
        }
        let _ = stop_tx.send(true);
    });

    let summary = session.run(&mut source, &mut detector, stop_rx).await;
    info!("Session summary: {:?}", summary);

    server.await.context("API server task panicked")??;
    Ok(())
}

fn build_sink(config: &AlertConfig) -> Result<Box<dyn AlertSink + Send>> {
    if config.use_audio_device {
        #[cfg(feature = "audio")]
        {
            let chime = alerting::ToneChime::new(config)?;
            return Ok(Box::new(chime));
        }
        #[cfg(not(feature = "audio"))]
        anyhow::bail!("built without audio support (enable the `audio` feature)");
    }
    Ok(Box::new(TerminalBell))
}

