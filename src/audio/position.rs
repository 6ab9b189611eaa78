//! Playback position store.
//!
//! Single source of truth for how far into the track playback is. The PCM
//! payload and its format never change after construction; only the read
//! position is shared mutable state, and it sits behind one mutex that both
//! the audio callback and the UI thread take for a handful of instructions.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::types::AudioFormat;

/// Fixed unit of bytes moved from the store to the device per feed iteration.
pub const CHUNK_BYTES: usize = 512;

/// Scalar copy of the store state, taken under the lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub position: usize,
    pub length: usize,
    pub format: AudioFormat,
}

impl Snapshot {
    /// Playback progress in `0.0..=1.0`. Zero for an empty buffer.
    pub fn fraction(&self) -> f32 {
        if self.length == 0 {
            return 0.0;
        }
        (self.position.min(self.length) as f64 / self.length as f64) as f32
    }
}

pub struct PositionStore {
    pcm: Vec<u8>,
    format: AudioFormat,
    position: Mutex<usize>,
}

impl PositionStore {
    pub fn new(pcm: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            pcm,
            format,
            position: Mutex::new(0),
        }
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    // The guarded value is a plain integer, so a poisoned lock still holds a
    // whole value and is safe to keep using.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.position.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy the next frame-aligned run of at most `out.len()` bytes into `out`
    /// and advance past it.
    ///
    /// Returns `None` without moving the position when fewer than
    /// [`CHUNK_BYTES`] remain; that is the end-of-data signal for the feed.
    /// Never allocates.
    pub fn read_and_advance(&self, out: &mut [u8]) -> Option<usize> {
        let mut position = self.lock();
        let available = self.pcm.len().saturating_sub(*position);
        if available < CHUNK_BYTES {
            return None;
        }
        let n = align_down(out.len().min(available), self.format.bytes_per_frame());
        let start = *position;
        out[..n].copy_from_slice(&self.pcm[start..start + n]);
        *position = start + n;
        Some(n)
    }

    /// Jump to `fraction` of the buffer, truncated to a frame boundary.
    pub fn seek(&self, fraction: f64) -> usize {
        let target = seek_target(self.pcm.len(), self.format.bytes_per_frame(), fraction);
        *self.lock() = target;
        target
    }

    pub fn snapshot(&self) -> Snapshot {
        let position = *self.lock();
        Snapshot {
            position,
            length: self.pcm.len(),
            format: self.format,
        }
    }

    /// True once the feed can no longer pull a full chunk.
    pub fn is_exhausted(&self) -> bool {
        self.pcm.len().saturating_sub(*self.lock()) < CHUNK_BYTES
    }
}

fn align_down(bytes: usize, frame: usize) -> usize {
    if frame == 0 {
        return 0;
    }
    bytes - bytes % frame
}

fn seek_target(length: usize, frame: usize, fraction: f64) -> usize {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let raw = ((length as f64 * fraction) as usize).min(length);
    align_down(raw, frame)
}
