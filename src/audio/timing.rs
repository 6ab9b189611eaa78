//! Elapsed / remaining / total seconds derived from a byte position.

use super::position::Snapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackTime {
    pub elapsed_sec: u64,
    pub remaining_sec: u64,
    pub total_sec: u64,
}

impl TrackTime {
    pub fn from_snapshot(snap: &Snapshot) -> Self {
        track_time(
            snap.position,
            snap.length,
            snap.format.sample_rate,
            snap.format.bytes_per_frame(),
        )
    }
}

/// Elapsed and total are truncated, remaining is rounded up so the display
/// lands on exactly zero at the end of the track.
pub fn track_time(
    position: usize,
    length: usize,
    sample_rate: u32,
    bytes_per_frame: usize,
) -> TrackTime {
    if length == 0 || bytes_per_frame == 0 || sample_rate == 0 {
        return TrackTime::default();
    }
    let rate = sample_rate as u64;
    let frame = bytes_per_frame as u64;

    let total_ms = (length as u64 / frame) * 1000 / rate;
    let elapsed_ms = ((position.min(length) as u64 / frame) * 1000 / rate).min(total_ms);
    let remaining_ms = total_ms - elapsed_ms;

    let total_sec = total_ms / 1000;
    TrackTime {
        elapsed_sec: (elapsed_ms / 1000).min(total_sec),
        remaining_sec: remaining_ms.div_ceil(1000).min(total_sec),
        total_sec,
    }
}
