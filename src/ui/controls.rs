use iced::mouse;
use iced::widget::canvas::{self, Action, Event, Frame, Geometry, Path, Stroke};
use iced::{Color, Pixels, Point, Rectangle, Renderer, Size, Theme};

use super::interaction::{Drag, Pointer, PointerButton, Region};
use crate::audio::timing::TrackTime;
use crate::audio::types::PlaybackStatus;

pub const BAR_HEIGHT: f32 = 60.0;

const PADDING: i32 = 16;
const BUTTON_SIZE: u32 = 40;
const LABEL_WIDTH: i32 = 56;
const VOLUME_WIDTH: u32 = 100;
const TRACK_HEIGHT: u32 = 6;

const BACKGROUND: Color = Color::from_rgb8(209, 229, 244);
const FOREGROUND: Color = Color::from_rgb8(22, 30, 26);
const TRACK: Color = Color::from_rgb8(160, 180, 196);

/// Format seconds as M:SS.
pub fn format_time(seconds: u64) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    format!("{mins}:{secs:02}")
}

/// Widget rectangles of the transport bar, in the bar's own coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportLayout {
    pub play: Region,
    pub seek_track: Region,
    pub volume_track: Region,
}

impl TransportLayout {
    pub fn new(width: f32, height: f32) -> Self {
        let width = width.max(0.0) as i32;
        let mid = height.max(0.0) as i32 / 2;
        let track_y = mid - TRACK_HEIGHT as i32 / 2;

        let play = Region::new(
            PADDING,
            mid - BUTTON_SIZE as i32 / 2,
            BUTTON_SIZE,
            BUTTON_SIZE,
        );
        let volume_x = width - PADDING - VOLUME_WIDTH as i32;
        let volume_track = Region::new(volume_x, track_y, VOLUME_WIDTH, TRACK_HEIGHT);

        let seek_x = play.right() + LABEL_WIDTH;
        let seek_end = volume_x - PADDING - LABEL_WIDTH;
        let seek_track = Region::new(
            seek_x,
            track_y,
            (seek_end - seek_x).max(1) as u32,
            TRACK_HEIGHT,
        );

        Self {
            play,
            seek_track,
            volume_track,
        }
    }
}

/// Pointer event in transport-bar coordinates, with the bar size it was
/// observed against.
#[derive(Debug, Clone, Copy)]
pub struct PointerInput {
    pub pointer: Pointer,
    pub bounds: Size,
}

/// Play/pause button, seek slider with time labels, and volume slider.
pub struct TransportBar {
    pub status: PlaybackStatus,
    pub seek: f32,
    pub volume: f32,
    pub time: TrackTime,
    pub drag: Drag,
}

fn button_of(button: mouse::Button) -> PointerButton {
    match button {
        mouse::Button::Left => PointerButton::Primary,
        _ => PointerButton::Other,
    }
}

fn to_point(r: Region) -> Point {
    Point::new(r.x as f32, r.y as f32)
}

fn draw_play_button(frame: &mut Frame, r: Region, status: PlaybackStatus) {
    let origin = to_point(r);
    let size = r.width as f32;
    match status {
        PlaybackStatus::Playing => {
            let bar = Size::new(size * 0.25, size * 0.7);
            let top = origin.y + size * 0.15;
            frame.fill_rectangle(Point::new(origin.x + size * 0.15, top), bar, FOREGROUND);
            frame.fill_rectangle(Point::new(origin.x + size * 0.6, top), bar, FOREGROUND);
        }
        PlaybackStatus::Paused => {
            let triangle = Path::new(|b| {
                b.move_to(Point::new(origin.x + size * 0.2, origin.y + size * 0.1));
                b.line_to(Point::new(origin.x + size * 0.9, origin.y + size * 0.5));
                b.line_to(Point::new(origin.x + size * 0.2, origin.y + size * 0.9));
                b.close();
            });
            frame.fill(&triangle, FOREGROUND);
        }
    }
}

fn draw_slider(frame: &mut Frame, track: Region, fraction: f32, held: bool) {
    frame.fill_rectangle(
        to_point(track),
        Size::new(track.width as f32, track.height as f32),
        TRACK,
    );
    let filled = track.width as f32 * fraction.clamp(0.0, 1.0);
    frame.fill_rectangle(
        to_point(track),
        Size::new(filled, track.height as f32),
        FOREGROUND,
    );

    let knob = track.knob(fraction);
    let center = Point::new(
        knob.x as f32 + knob.width as f32 / 2.0,
        knob.y as f32 + knob.height as f32 / 2.0,
    );
    let circle = Path::circle(center, knob.width as f32 / 2.0);
    frame.fill(&circle, if held { FOREGROUND } else { BACKGROUND });
    frame.stroke(
        &circle,
        Stroke::default().with_color(FOREGROUND).with_width(2.0),
    );
}

fn draw_label(frame: &mut Frame, x: f32, y: f32, content: String) {
    frame.fill_text(canvas::Text {
        content,
        position: Point::new(x, y - 8.0),
        color: FOREGROUND,
        size: Pixels(14.0),
        ..canvas::Text::default()
    });
}

impl canvas::Program<PointerInput> for TransportBar {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let layout = TransportLayout::new(bounds.width, bounds.height);
        let mut frame = Frame::new(renderer, bounds.size());

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), BACKGROUND);
        draw_play_button(&mut frame, layout.play, self.status);
        draw_slider(
            &mut frame,
            layout.seek_track,
            self.seek,
            self.drag == Drag::Seek,
        );
        draw_slider(
            &mut frame,
            layout.volume_track,
            self.volume,
            self.drag == Drag::Volume,
        );

        let label_y = layout.seek_track.center_y() as f32;
        draw_label(
            &mut frame,
            (layout.play.right() + 8) as f32,
            label_y,
            format_time(self.time.elapsed_sec),
        );
        draw_label(
            &mut frame,
            (layout.seek_track.right() + 8) as f32,
            label_y,
            format!("-{}", format_time(self.time.remaining_sec)),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        _state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<Action<PointerInput>> {
        let position = cursor.position()?;
        let x = (position.x - bounds.x).floor() as i32;
        let y = (position.y - bounds.y).floor() as i32;

        let pointer = match event {
            Event::Mouse(mouse::Event::ButtonPressed(button)) if cursor.is_over(bounds) => {
                Pointer::Down {
                    button: button_of(*button),
                    x,
                    y,
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) if self.drag != Drag::None => {
                Pointer::Move { x, y }
            }
            Event::Mouse(mouse::Event::ButtonReleased(button)) if self.drag != Drag::None => {
                Pointer::Up {
                    button: button_of(*button),
                    x,
                    y,
                }
            }
            _ => return None,
        };

        let input = PointerInput {
            pointer,
            bounds: bounds.size(),
        };
        Some(Action::publish(input).and_capture())
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.drag != Drag::None {
            return mouse::Interaction::Grabbing;
        }
        match cursor.position_in(bounds) {
            Some(p) => {
                let layout = TransportLayout::new(bounds.width, bounds.height);
                let (x, y) = (p.x as i32, p.y as i32);
                if layout.play.contains(x, y) {
                    mouse::Interaction::Pointer
                } else if layout.seek_track.knob(self.seek).contains(x, y)
                    || layout.volume_track.knob(self.volume).contains(x, y)
                {
                    mouse::Interaction::Grab
                } else {
                    mouse::Interaction::default()
                }
            }
            None => mouse::Interaction::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(5), "0:05");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn layout_keeps_widgets_apart() {
        let l = TransportLayout::new(800.0, BAR_HEIGHT);
        assert!(l.play.right() < l.seek_track.knob(0.0).x);
        assert!(l.seek_track.knob(1.0).right() < l.volume_track.knob(0.0).x);
        assert!(l.volume_track.knob(1.0).right() <= 800);
        assert_eq!(l.seek_track.center_y(), l.volume_track.center_y());
    }

    #[test]
    fn narrow_layout_still_has_a_seek_track() {
        let l = TransportLayout::new(100.0, BAR_HEIGHT);
        assert!(l.seek_track.width >= 1);
    }
}
