use iced::mouse;
use iced::widget::canvas::{self, Cache, Frame, Geometry, Path, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Theme};

use crate::waveform_cache::WaveformSummary;

/// Width of one waveform bar.
pub const BAR_WIDTH: f32 = 2.0;
/// Horizontal distance between the starts of two bars.
pub const BAR_STRIDE: u32 = 3;

const BACKGROUND: Color = Color::from_rgb8(209, 229, 244);
const BARS: Color = Color::from_rgb8(22, 30, 26);
const PLAYHEAD: Color = Color::from_rgb8(200, 60, 40);

/// Number of columns the summarizer should produce for a given width.
pub fn columns_for_width(width: u32) -> usize {
    (width / BAR_STRIDE) as usize
}

/// Static waveform with a playhead overlay.
pub struct WaveformView {
    waveform_cache: Cache,
    summary: WaveformSummary,
    pub playhead: f32, // 0.0 to 1.0 fraction
}

impl WaveformView {
    pub fn new(summary: WaveformSummary) -> Self {
        Self {
            waveform_cache: Cache::new(),
            summary,
            playhead: 0.0,
        }
    }
}

/// Vertical extent of one bar: louder columns reach further towards the
/// padding, silent ones shrink to the middle third.
fn bar_span(top: f32, bottom: f32, intensity: f32) -> (f32, f32) {
    let max_len = bottom - top;
    let inset = max_len * (1.0 - intensity.clamp(0.0, 1.0)) / 3.0;
    (top + inset, bottom - inset)
}

impl<Message> canvas::Program<Message> for WaveformView {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let width = bounds.width;
        let height = bounds.height;

        let waveform = self.waveform_cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);

            if self.summary.is_empty() {
                return;
            }
            let step = width / self.summary.len() as f32;
            let padding = height * 0.1;
            let bar = Stroke::default().with_color(BARS).with_width(BAR_WIDTH);

            for (i, &intensity) in self.summary.columns.iter().enumerate() {
                let x = i as f32 * step + BAR_WIDTH / 2.0;
                let (y1, y2) = bar_span(padding, height - padding, intensity);
                let line = Path::line(Point::new(x, y1), Point::new(x, y2));
                frame.stroke(&line, bar.clone());
            }
        });

        let overlay = {
            let mut frame = Frame::new(renderer, bounds.size());
            let x = self.playhead.clamp(0.0, 1.0) * width;
            let playhead = Path::line(Point::new(x, 0.0), Point::new(x, height));
            frame.stroke(
                &playhead,
                Stroke::default().with_color(PLAYHEAD).with_width(2.0),
            );
            frame.into_geometry()
        };

        vec![waveform, overlay]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_spans_padding_to_padding() {
        assert_eq!(bar_span(150.0, 450.0, 1.0), (150.0, 450.0));
    }

    #[test]
    fn silence_keeps_the_middle_third() {
        assert_eq!(bar_span(150.0, 450.0, 0.0), (250.0, 350.0));
    }

    #[test]
    fn default_width_gets_266_columns() {
        assert_eq!(columns_for_width(800), 266);
        assert_eq!(columns_for_width(2), 0);
    }
}
