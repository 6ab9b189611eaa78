/// Full-scale value of a signed 16-bit sample.
const FULL_SCALE: f64 = 32767.0;

/// How a window of samples is reduced to one intensity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Measure {
    #[default]
    Rms,
    Peak,
}

/// Per-column intensities in `0.0..=1.0`, computed once when a file loads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaveformSummary {
    pub columns: Vec<f32>,
}

impl WaveformSummary {
    /// Summarize `samples` into `windows` columns.
    ///
    /// Samples are treated as one flat series, interleaved channels included.
    pub fn compute(samples: &[i16], windows: usize, measure: Measure) -> Self {
        let window_samples = if windows == 0 {
            0
        } else {
            samples.len() / windows
        };
        let columns = match measure {
            Measure::Rms => calculate_rms(samples, windows, window_samples),
            Measure::Peak => calculate_peaks(samples, windows, window_samples),
        };
        WaveformSummary { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Root-mean-square of each window, normalized to full scale.
///
/// Samples past `windows * window_samples` are dropped. A window with no
/// samples yields 0.0.
pub fn calculate_rms(samples: &[i16], windows: usize, window_samples: usize) -> Vec<f32> {
    summarize(samples, windows, window_samples, |window| {
        let sum: f64 = window.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
        (sum / window.len() as f64).sqrt()
    })
}

/// Largest absolute sample of each window, normalized to full scale.
pub fn calculate_peaks(samples: &[i16], windows: usize, window_samples: usize) -> Vec<f32> {
    summarize(samples, windows, window_samples, |window| {
        window
            .iter()
            .map(|&s| f64::from(s.unsigned_abs()))
            .fold(0.0, f64::max)
    })
}

fn summarize<F>(samples: &[i16], windows: usize, window_samples: usize, measure: F) -> Vec<f32>
where
    F: Fn(&[i16]) -> f64,
{
    (0..windows)
        .map(|i| {
            let start = (i * window_samples).min(samples.len());
            let end = (start + window_samples).min(samples.len());
            let window = &samples[start..end];
            if window.is_empty() {
                return 0.0;
            }
            (measure(window) / FULL_SCALE).min(1.0) as f32
        })
        .collect()
}
