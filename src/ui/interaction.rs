//! Pointer hit-testing and the slider drag state machine.
//!
//! Owned by the UI thread. Seeks are only committed on release; volume is
//! applied continuously while dragging.

use super::controls::TransportLayout;

/// Side length of a slider knob's hit region.
pub const KNOB_SIZE: u32 = 16;

/// Integer pixel rectangle in transport-bar coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Unsigned subtraction wraps points left of or above the region to huge
    /// values, so one comparison per axis covers both sides.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (x.wrapping_sub(self.x) as u32) < self.width
            && (y.wrapping_sub(self.y) as u32) < self.height
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.height as i32 / 2
    }

    /// Clamp `x` into the region and map it onto `0.0..=1.0`.
    pub fn fraction_at(&self, x: i32) -> f32 {
        if self.width == 0 {
            return 0.0;
        }
        let offset = x.saturating_sub(self.x).clamp(0, self.width as i32);
        offset as f32 / self.width as f32
    }

    /// Hit region of a knob sitting at `fraction` along this track.
    pub fn knob(&self, fraction: f32) -> Region {
        let center_x = self.x + (fraction.clamp(0.0, 1.0) * self.width as f32).round() as i32;
        let half = KNOB_SIZE as i32 / 2;
        Region::new(
            center_x - half,
            self.center_y() - half,
            KNOB_SIZE,
            KNOB_SIZE,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Down { button: PointerButton, x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Up { button: PointerButton, x: i32, y: i32 },
}

/// What the pointer is currently holding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Drag {
    #[default]
    None,
    Seek,
    Volume,
}

/// Work the application must carry out after a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    TogglePlayback,
    SetVolume(f32),
    Seek(f32),
}

/// Visual positions of both sliders, `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sliders {
    pub seek: f32,
    pub volume: f32,
}

#[derive(Debug, Clone)]
pub struct Interaction {
    drag: Drag,
    sliders: Sliders,
}

impl Interaction {
    pub fn new(volume: f32) -> Self {
        Self {
            drag: Drag::None,
            sliders: Sliders {
                seek: 0.0,
                volume: volume.clamp(0.0, 1.0),
            },
        }
    }

    pub fn drag(&self) -> Drag {
        self.drag
    }

    pub fn sliders(&self) -> Sliders {
        self.sliders
    }

    pub fn handle(&mut self, pointer: Pointer, layout: &TransportLayout) -> Option<Effect> {
        match (self.drag, pointer) {
            (
                Drag::None,
                Pointer::Down {
                    button: PointerButton::Primary,
                    x,
                    y,
                },
            ) => {
                if layout.play.contains(x, y) {
                    Some(Effect::TogglePlayback)
                } else if layout.seek_track.knob(self.sliders.seek).contains(x, y) {
                    self.drag = Drag::Seek;
                    None
                } else if layout.volume_track.knob(self.sliders.volume).contains(x, y) {
                    self.drag = Drag::Volume;
                    None
                } else {
                    None
                }
            }
            (Drag::Seek, Pointer::Move { x, .. }) => {
                self.sliders.seek = layout.seek_track.fraction_at(x);
                None
            }
            (Drag::Volume, Pointer::Move { x, .. }) => {
                self.sliders.volume = layout.volume_track.fraction_at(x);
                Some(Effect::SetVolume(self.sliders.volume))
            }
            (
                Drag::Seek,
                Pointer::Up {
                    button: PointerButton::Primary,
                    ..
                },
            ) => {
                self.drag = Drag::None;
                Some(Effect::Seek(self.sliders.seek))
            }
            (
                Drag::Volume,
                Pointer::Up {
                    button: PointerButton::Primary,
                    ..
                },
            ) => {
                self.drag = Drag::None;
                None
            }
            _ => None,
        }
    }

    /// Per-frame refresh from the playback position. Ignored while the seek
    /// knob is held, since the pointer owns it then.
    pub fn sync_seek(&mut self, fraction: f32) {
        if self.drag != Drag::Seek {
            self.sliders.seek = fraction.clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> TransportLayout {
        TransportLayout::new(800.0, 60.0)
    }

    fn down(x: i32, y: i32) -> Pointer {
        Pointer::Down {
            button: PointerButton::Primary,
            x,
            y,
        }
    }

    fn up(x: i32, y: i32) -> Pointer {
        Pointer::Up {
            button: PointerButton::Primary,
            x,
            y,
        }
    }

    fn center(r: Region) -> (i32, i32) {
        (r.x + r.width as i32 / 2, r.y + r.height as i32 / 2)
    }

    #[test]
    fn hit_test_uses_half_open_bounds() {
        let r = Region::new(10, 10, 20, 20);
        assert!(r.contains(15, 15));
        assert!(r.contains(10, 10));
        assert!(!r.contains(5, 5));
        assert!(!r.contains(31, 15));
        assert!(!r.contains(15, 31));
        assert!(!r.contains(30, 15));
        assert!(!r.contains(-15, 15));
    }

    #[test]
    fn fraction_clamps_to_track() {
        let track = Region::new(100, 0, 200, 6);
        assert_eq!(track.fraction_at(50), 0.0);
        assert_eq!(track.fraction_at(200), 0.5);
        assert_eq!(track.fraction_at(900), 1.0);
        assert_eq!(Region::new(0, 0, 0, 0).fraction_at(10), 0.0);
    }

    #[test]
    fn click_on_play_toggles_without_dragging() {
        let l = layout();
        let mut i = Interaction::new(1.0);
        let (x, y) = center(l.play);
        assert_eq!(i.handle(down(x, y), &l), Some(Effect::TogglePlayback));
        assert_eq!(i.drag(), Drag::None);
    }

    #[test]
    fn seek_commits_once_on_release_with_last_move() {
        let l = layout();
        let mut i = Interaction::new(1.0);
        let (x, y) = center(l.seek_track.knob(0.0));
        assert_eq!(i.handle(down(x, y), &l), None);
        assert_eq!(i.drag(), Drag::Seek);

        let quarter = l.seek_track.x + l.seek_track.width as i32 / 4;
        let half = l.seek_track.x + l.seek_track.width as i32 / 2;
        assert_eq!(i.handle(Pointer::Move { x: quarter, y }, &l), None);
        assert_eq!(i.handle(Pointer::Move { x: half, y }, &l), None);
        let expected = l.seek_track.fraction_at(half);
        assert_eq!(i.sliders().seek, expected);

        assert_eq!(i.handle(up(half, y), &l), Some(Effect::Seek(expected)));
        assert_eq!(i.drag(), Drag::None);
        assert_eq!(i.handle(Pointer::Move { x: quarter, y }, &l), None);
    }

    #[test]
    fn playback_does_not_move_a_held_seek_knob() {
        let l = layout();
        let mut i = Interaction::new(1.0);
        let (x, y) = center(l.seek_track.knob(0.0));
        i.handle(down(x, y), &l);
        i.handle(Pointer::Move { x: l.seek_track.right(), y }, &l);
        i.sync_seek(0.2);
        assert_eq!(i.sliders().seek, 1.0);

        i.handle(up(0, 0), &l);
        i.sync_seek(0.2);
        assert_eq!(i.sliders().seek, 0.2);
    }

    #[test]
    fn volume_applies_live_and_release_commits_nothing() {
        let l = layout();
        let mut i = Interaction::new(1.0);
        let (x, y) = center(l.volume_track.knob(1.0));
        i.handle(down(x, y), &l);
        assert_eq!(i.drag(), Drag::Volume);

        let Some(Effect::SetVolume(v)) = i.handle(Pointer::Move { x: l.volume_track.x, y }, &l)
        else {
            panic!("expected a live volume change");
        };
        assert_eq!(v, 0.0);
        assert_eq!(i.sliders().volume, 0.0);
        assert_eq!(i.handle(up(x, y), &l), None);
        assert_eq!(i.drag(), Drag::None);
    }

    #[test]
    fn secondary_button_is_ignored() {
        let l = layout();
        let mut i = Interaction::new(1.0);
        let (x, y) = center(l.play);
        let pointer = Pointer::Down {
            button: PointerButton::Other,
            x,
            y,
        };
        assert_eq!(i.handle(pointer, &l), None);

        let (x, y) = center(l.seek_track.knob(0.0));
        i.handle(down(x, y), &l);
        let release = Pointer::Up {
            button: PointerButton::Other,
            x,
            y,
        };
        assert_eq!(i.handle(release, &l), None);
        assert_eq!(i.drag(), Drag::Seek);
    }

    #[test]
    fn moves_without_a_drag_do_nothing() {
        let l = layout();
        let mut i = Interaction::new(0.5);
        assert_eq!(i.handle(Pointer::Move { x: 10, y: 10 }, &l), None);
        assert_eq!(i.sliders().volume, 0.5);
        assert_eq!(i.sliders().seek, 0.0);
    }
}
