//! pcos-predict: PCOS risk prediction from hormone measurements.
//!
//! Main entry point for the terminal application.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pcos_predict::adapters::sanitize::SanitizingMakeWriter;
use pcos_predict::adapters::ArtifactLoader;
use pcos_predict::config::AppConfig;
use pcos_predict::tui::App;
use pcos_predict::{ArtifactStore, InferencePipeline};

fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Writing logs to the terminal would corrupt the TUI (alternate screen),
    // so an interactive run logs to a file unless told otherwise.
    let interactive = std::io::stdout().is_terminal();
    let (writer, _guard) = if config.log_mode.use_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting pcos-predict...");
    tracing::debug!("Configuration: {:?}", config);

    // Refuse to start without both artifacts; nothing is served from a half-loaded store.
    let loader = ArtifactLoader::new().require_manifest(config.require_manifest);
    let store = ArtifactStore::load_with(&loader, &config.model_path, &config.scaler_path)
        .inspect_err(|e| tracing::error!("Artifact load failed: {}", e))
        .with_context(|| {
            format!(
                "Failed to load artifacts (model {:?}, scaler {:?}). Set PCOS_ARTIFACT_DIR (e.g. PCOS_ARTIFACT_DIR=models from a checkout), PCOS_MODEL_PATH or PCOS_SCALER_PATH.",
                config.model_path, config.scaler_path
            )
        })?;

    let pipeline = InferencePipeline::new(Arc::new(store));

    let mut app = App::new(pipeline);
    app.run()?;

    tracing::info!("pcos-predict shutdown complete.");
    Ok(())
}
