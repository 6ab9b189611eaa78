use std::path::PathBuf;

use clap::Parser;

use crate::waveform_cache::Measure;

#[derive(Parser, Debug)]
#[command(name = "wavplay", version, about = "Play a WAV file with a waveform and transport bar")]
pub struct Args {
    /// Path to a WAV file
    pub path: PathBuf,

    /// Initial output volume, clamped to 0.0..=1.0
    #[arg(long, default_value_t = 1.0, value_parser = parse_gain)]
    pub volume: f32,

    /// Open paused instead of starting playback right away
    #[arg(long)]
    pub paused: bool,

    /// How each waveform column is measured (RMS unless peak is asked for)
    #[arg(long, value_enum, default_value_t = Measure::Rms)]
    pub meter: Measure,

    /// Window width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,
}

fn parse_gain(s: &str) -> Result<f32, String> {
    let gain: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if gain.is_nan() {
        return Err("volume must be a number".into());
    }
    Ok(gain.clamp(0.0, 1.0))
}
