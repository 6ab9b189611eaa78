/// Bytes per stored sample. Every loaded file is held as signed 16-bit PCM.
pub const BYTES_PER_SAMPLE: usize = 2;

/// Format of the PCM held by the position store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl AudioFormat {
    pub fn pcm16(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample: (BYTES_PER_SAMPLE * 8) as u16,
        }
    }

    /// Bytes in one frame (one sample per channel).
    pub fn bytes_per_frame(&self) -> usize {
        (self.bits_per_sample as usize / 8) * self.channels as usize
    }
}

/// Commands sent from the UI thread to the audio callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCommand {
    Play,
    Pause,
    SetVolume(f32),
}

/// Events sent from the audio callback to the UI thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEvent {
    /// The feed ran out of data and paused itself.
    PlaybackFinished,
}

/// Current playback status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
}

impl PlaybackStatus {
    pub fn toggled(self) -> Self {
        match self {
            PlaybackStatus::Playing => PlaybackStatus::Paused,
            PlaybackStatus::Paused => PlaybackStatus::Playing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm16_frame_size_scales_with_channels() {
        assert_eq!(AudioFormat::pcm16(44_100, 1).bytes_per_frame(), 2);
        assert_eq!(AudioFormat::pcm16(48_000, 2).bytes_per_frame(), 4);
        assert_eq!(AudioFormat::pcm16(48_000, 0).bytes_per_frame(), 0);
    }

    #[test]
    fn status_toggles_both_ways() {
        assert_eq!(PlaybackStatus::Playing.toggled(), PlaybackStatus::Paused);
        assert_eq!(PlaybackStatus::Paused.toggled(), PlaybackStatus::Playing);
    }
}
