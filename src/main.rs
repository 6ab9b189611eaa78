//! wavplay: a minimal WAV player with a static waveform and a transport bar.
//!
//! The whole file is decoded up front. Playback position lives in one shared
//! store that the CPAL callback pulls chunks from and the UI seeks and
//! snapshots once per frame.

mod app;
mod audio;
mod cli;
mod ui;
mod waveform_cache;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use audio::position::PositionStore;
use audio::types::PlaybackStatus;
use waveform_cache::WaveformSummary;

fn main() -> ExitCode {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,wavplay=info")),
        )
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: cli::Args) -> Result<()> {
    let decoded = audio::decoder::decode_file(&args.path)
        .with_context(|| format!("loading {}", args.path.display()))?;
    let format = decoded.format;
    tracing::info!(
        path = %args.path.display(),
        sample_rate = format.sample_rate,
        channels = format.channels,
        source_bits = ?decoded.source_bits,
        samples = decoded.samples.len(),
        "loaded"
    );

    let columns = ui::waveform::columns_for_width(args.width);
    let summary = WaveformSummary::compute(&decoded.samples, columns, args.meter);
    let store = Arc::new(PositionStore::new(decoded.to_pcm_bytes(), format));
    drop(decoded);

    let output = audio::engine::spawn_output(store.clone(), !args.paused, args.volume)
        .context("opening audio output")?;

    let filename = args
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let session = app::Session {
        store,
        output,
        summary,
        filename,
        status: if args.paused {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Playing
        },
        volume: args.volume,
    };

    app::run(session, (args.width as f32, args.height as f32))
        .map_err(|e| anyhow::anyhow!("running window: {e}"))
}
