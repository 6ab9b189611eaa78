use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};

use super::error::OutputError;
use super::position::{PositionStore, CHUNK_BYTES};
use super::types::{AudioCommand, AudioEvent, BYTES_PER_SAMPLE};

/// State owned by the output callback.
///
/// Pulls fixed chunks from the [`PositionStore`] on whatever thread the
/// device calls back on. Never blocks beyond the store's short critical
/// section and never allocates.
pub struct Feeder {
    store: Arc<PositionStore>,
    cmd_rx: Receiver<AudioCommand>,
    event_tx: Sender<AudioEvent>,
    playing: bool,
    gain: f32,
    scratch: [u8; CHUNK_BYTES],
}

impl Feeder {
    pub fn new(
        store: Arc<PositionStore>,
        cmd_rx: Receiver<AudioCommand>,
        event_tx: Sender<AudioEvent>,
        playing: bool,
        gain: f32,
    ) -> Self {
        Self {
            store,
            cmd_rx,
            event_tx,
            playing,
            gain: gain.clamp(0.0, 1.0),
            scratch: [0; CHUNK_BYTES],
        }
    }

    fn handle_command(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::Play => self.playing = true,
            AudioCommand::Pause => self.playing = false,
            AudioCommand::SetVolume(gain) => self.gain = gain.clamp(0.0, 1.0),
        }
    }

    /// Fill one device buffer of interleaved samples.
    pub fn fill<T>(&mut self, output: &mut [T])
    where
        T: cpal::Sample + cpal::FromSample<f32>,
    {
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            self.handle_command(cmd);
        }

        let silence = <T as cpal::Sample>::from_sample::<f32>(0.0);
        if !self.playing {
            output.fill(silence);
            return;
        }

        let mut written = 0;
        while written < output.len() {
            let wanted = ((output.len() - written) * BYTES_PER_SAMPLE).min(CHUNK_BYTES);
            match self.store.read_and_advance(&mut self.scratch[..wanted]) {
                Some(0) => break,
                Some(n) => {
                    for bytes in self.scratch[..n].chunks_exact(BYTES_PER_SAMPLE) {
                        let sample = i16::from_le_bytes([bytes[0], bytes[1]]);
                        let value = f32::from(sample) / 32768.0 * self.gain;
                        output[written] = <T as cpal::Sample>::from_sample::<f32>(value);
                        written += 1;
                    }
                }
                None => {
                    self.finish();
                    break;
                }
            }
        }

        output[written..].fill(silence);
    }

    fn finish(&mut self) {
        self.playing = false;
        #[cfg(debug_assertions)]
        tracing::debug!("end of data, pausing feed");
        let _ = self.event_tx.try_send(AudioEvent::PlaybackFinished);
    }
}

/// UI-side handles to a running output stream.
#[derive(Clone)]
pub struct Output {
    pub cmd_tx: Sender<AudioCommand>,
    pub event_rx: Receiver<AudioEvent>,
}

/// Open the default output device with the store's format and start feeding it.
///
/// The stream lives on a parked keepalive thread for the rest of the process.
pub fn spawn_output(
    store: Arc<PositionStore>,
    playing: bool,
    gain: f32,
) -> Result<Output, OutputError> {
    let (cmd_tx, cmd_rx) = crossbeam_channel::bounded::<AudioCommand>(64);
    let (event_tx, event_rx) = crossbeam_channel::bounded::<AudioEvent>(16);

    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(OutputError::NoDevice)?;

    let sample_format = device.default_output_config()?.sample_format();
    let format = store.format();
    let config = cpal::StreamConfig {
        channels: format.channels,
        sample_rate: format.sample_rate,
        buffer_size: cpal::BufferSize::Default,
    };
    tracing::info!(
        sample_rate = format.sample_rate,
        channels = format.channels,
        ?sample_format,
        "opening output stream"
    );

    let feeder = Feeder::new(store, cmd_rx, event_tx, playing, gain);
    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, feeder)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, feeder)?,
        cpal::SampleFormat::I32 => build_stream::<i32>(&device, &config, feeder)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, feeder)?,
        other => return Err(OutputError::UnsupportedFormat(other)),
    };

    stream.play()?;

    std::thread::Builder::new()
        .name("audio-keepalive".into())
        .spawn(move || {
            let _stream = stream;
            loop {
                std::thread::park();
            }
        })
        .map_err(OutputError::Keepalive)?;

    Ok(Output { cmd_tx, event_rx })
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut feeder: Feeder,
) -> Result<cpal::Stream, OutputError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| feeder.fill(data),
        |err| tracing::warn!("audio stream error: {err}"),
        None,
    )?;
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::AudioFormat;

    struct Rig {
        store: Arc<PositionStore>,
        feeder: Feeder,
        cmd_tx: Sender<AudioCommand>,
        event_rx: Receiver<AudioEvent>,
    }

    fn rig(samples: &[i16], channels: u16, playing: bool) -> Rig {
        let pcm = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let store = Arc::new(PositionStore::new(pcm, AudioFormat::pcm16(8_000, channels)));
        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(8);
        let (event_tx, event_rx) = crossbeam_channel::bounded(8);
        let feeder = Feeder::new(store.clone(), cmd_rx, event_tx, playing, 1.0);
        Rig {
            store,
            feeder,
            cmd_tx,
            event_rx,
        }
    }

    #[test]
    fn fills_whole_buffer_across_chunks() {
        let samples: Vec<i16> = (0..2048).map(|i| i as i16).collect();
        let mut r = rig(&samples, 1, true);
        let mut out = vec![0i16; 600];
        r.feeder.fill(&mut out);
        assert_eq!(out, samples[..600]);
        assert_eq!(r.store.snapshot().position, 1200);
        assert!(r.event_rx.try_recv().is_err());
    }

    #[test]
    fn paused_feed_outputs_silence_without_advancing() {
        let samples = vec![1000i16; 2048];
        let mut r = rig(&samples, 1, false);
        let mut out = vec![1.0f32; 256];
        r.feeder.fill(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(r.store.snapshot().position, 0);
    }

    #[test]
    fn commands_apply_before_filling() {
        let samples = vec![16384i16; 2048];
        let mut r = rig(&samples, 1, false);
        r.cmd_tx.send(AudioCommand::Play).unwrap();
        r.cmd_tx.send(AudioCommand::SetVolume(0.5)).unwrap();
        let mut out = vec![0.0f32; 4];
        r.feeder.fill(&mut out);
        for s in out {
            approx::assert_relative_eq!(s, 0.25, epsilon = 1e-6);
        }

        r.cmd_tx.send(AudioCommand::Pause).unwrap();
        let before = r.store.snapshot().position;
        let mut out = vec![1.0f32; 4];
        r.feeder.fill(&mut out);
        assert_eq!(out, vec![0.0; 4]);
        assert_eq!(r.store.snapshot().position, before);
    }

    #[test]
    fn tail_shorter_than_a_chunk_finishes_playback() {
        // 300 samples = 600 bytes: one 512-byte chunk, then 88 bytes left over.
        let samples = vec![7i16; 300];
        let mut r = rig(&samples, 1, true);
        let mut out = vec![-1i16; 400];
        r.feeder.fill(&mut out);
        assert!(out[..256].iter().all(|&s| s == 7));
        assert!(out[256..].iter().all(|&s| s == 0));
        assert_eq!(r.store.snapshot().position, CHUNK_BYTES);
        assert_eq!(r.event_rx.try_recv(), Ok(AudioEvent::PlaybackFinished));

        // Stays paused and silent afterwards; no further events.
        let mut out = vec![-1i16; 16];
        r.feeder.fill(&mut out);
        assert!(out.iter().all(|&s| s == 0));
        assert!(r.event_rx.try_recv().is_err());
    }

    #[test]
    fn empty_store_finishes_on_first_fill() {
        let mut r = rig(&[], 1, true);
        let mut out = vec![-1i16; 64];
        r.feeder.fill(&mut out);
        assert!(out.iter().all(|&s| s == 0));
        assert_eq!(r.event_rx.try_recv(), Ok(AudioEvent::PlaybackFinished));
        assert_eq!(r.store.snapshot().position, 0);

        r.feeder.fill(&mut out);
        assert!(r.event_rx.try_recv().is_err());
    }

    #[test]
    fn stereo_output_stays_frame_aligned() {
        let samples: Vec<i16> = (0..4096).map(|i| (i % 2) as i16).collect();
        let mut r = rig(&samples, 2, true);
        let mut out = vec![-1i16; 302];
        r.feeder.fill(&mut out);
        for frame in out.chunks_exact(2) {
            assert_eq!(frame, [0, 1]);
        }
        assert_eq!(r.store.snapshot().position % 4, 0);
    }

    #[test]
    fn seek_from_another_thread_is_picked_up_next_cycle() {
        let samples: Vec<i16> = (0..4096).map(|i| i as i16).collect();
        let mut r = rig(&samples, 1, true);
        r.store.seek(0.5);
        let mut out = vec![0i16; 2];
        r.feeder.fill(&mut out);
        assert_eq!(out, vec![2048, 2049]);
    }
}
