use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::error::LoadError;
use super::position::CHUNK_BYTES;
use super::types::{AudioFormat, BYTES_PER_SAMPLE};

/// A whole file decoded to interleaved signed 16-bit samples.
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub format: AudioFormat,
    /// Bit depth declared by the container, before conversion to 16-bit.
    pub source_bits: Option<u32>,
}

impl DecodedAudio {
    /// Little-endian PCM bytes, the layout the position store streams from.
    pub fn to_pcm_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.samples.len() * BYTES_PER_SAMPLE);
        for sample in &self.samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }
}

/// Decode a WAV file into memory.
pub fn decode_file(path: &Path) -> Result<DecodedAudio, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let detected = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(LoadError::Format)?;

    let mut format = detected.format;

    let track = format.default_track().ok_or(LoadError::NoTrack)?.clone();

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(LoadError::MissingSampleRate)?;
    let channels = check_channels(
        track
            .codec_params
            .channels
            .map(|c| c.count())
            .unwrap_or(0),
    )?;
    let source_bits = track.codec_params.bits_per_sample;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(LoadError::Codec)?;

    let mut samples: Vec<i16> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(LoadError::Packet(e)),
        };

        if packet.track_id() != track.id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!("skipping undecodable packet: {e}");
                continue;
            }
            Err(e) => return Err(LoadError::Decode(e)),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.capacity();

        let mut sample_buf = SampleBuffer::<i16>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sample_buf.samples());
    }

    Ok(DecodedAudio {
        samples,
        format: AudioFormat::pcm16(sample_rate, channels),
        source_bits,
    })
}

/// At least one channel, and one 16-bit frame must fit in a feed chunk.
fn check_channels(count: usize) -> Result<u16, LoadError> {
    if count == 0 || count * BYTES_PER_SAMPLE > CHUNK_BYTES {
        return Err(LoadError::UnsupportedChannels(count));
    }
    u16::try_from(count).map_err(|_| LoadError::UnsupportedChannels(count))
}
