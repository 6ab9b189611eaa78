use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use iced::keyboard;
use iced::widget::{canvas, column};
use iced::{Element, Length, Subscription, Task, Theme};

use crate::audio::engine::Output;
use crate::audio::position::PositionStore;
use crate::audio::timing::TrackTime;
use crate::audio::types::*;
use crate::ui::controls::{self, PointerInput, TransportBar, TransportLayout};
use crate::ui::interaction::{Effect, Interaction};
use crate::ui::waveform::WaveformView;
use crate::waveform_cache::WaveformSummary;

/// Arrow keys jump this many seconds.
const KEY_SEEK_SECS: f64 = 5.0;

/// Everything the window needs, prepared before it opens.
#[derive(Clone)]
pub struct Session {
    pub store: Arc<PositionStore>,
    pub output: Output,
    pub summary: WaveformSummary,
    pub filename: String,
    pub status: PlaybackStatus,
    pub volume: f32,
}

pub struct App {
    // Audio engine
    store: Arc<PositionStore>,
    cmd_tx: Sender<AudioCommand>,
    event_rx: Receiver<AudioEvent>,

    // State
    status: PlaybackStatus,
    time: TrackTime,
    filename: String,
    interaction: Interaction,

    // Waveform
    waveform_view: WaveformView,
}

#[derive(Debug, Clone)]
pub enum Message {
    Tick,
    KeyEvent(keyboard::Event),
    Transport(PointerInput),
}

impl App {
    fn new(session: Session) -> Self {
        let mut app = App {
            store: session.store,
            cmd_tx: session.output.cmd_tx,
            event_rx: session.output.event_rx,
            status: session.status,
            time: TrackTime::default(),
            filename: session.filename,
            interaction: Interaction::new(session.volume),
            waveform_view: WaveformView::new(session.summary),
        };
        app.refresh();
        app
    }

    fn send(&self, cmd: AudioCommand) {
        if let Err(e) = self.cmd_tx.try_send(cmd) {
            tracing::warn!("audio command {cmd:?} dropped: {e}");
        }
    }

    fn toggle_playback(&mut self) {
        match self.status {
            PlaybackStatus::Playing => self.send(AudioCommand::Pause),
            PlaybackStatus::Paused => {
                if self.store.is_exhausted() {
                    self.store.seek(0.0);
                }
                self.send(AudioCommand::Play);
            }
        }
        self.status = self.status.toggled();
        self.refresh();
    }

    fn seek_relative(&mut self, seconds: f64) {
        let snap = self.store.snapshot();
        if snap.length == 0 {
            return;
        }
        let bytes_per_second =
            snap.format.sample_rate as f64 * snap.format.bytes_per_frame() as f64;
        let target = snap.position as f64 + seconds * bytes_per_second;
        self.store.seek(target / snap.length as f64);
        self.refresh();
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::TogglePlayback => self.toggle_playback(),
            Effect::SetVolume(gain) => self.send(AudioCommand::SetVolume(gain)),
            Effect::Seek(fraction) => {
                self.store.seek(fraction as f64);
                self.refresh();
            }
        }
    }

    /// Re-derive everything shown from the position store.
    fn refresh(&mut self) {
        let snap = self.store.snapshot();
        self.time = TrackTime::from_snapshot(&snap);
        self.interaction.sync_seek(snap.fraction());
        self.waveform_view.playhead = self.interaction.sliders().seek;
    }
}

fn title(app: &App) -> String {
    format!(
        "{} ({}) - wavplay",
        app.filename,
        controls::format_time(app.time.total_sec)
    )
}

fn update(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::Tick => {
            while let Ok(event) = app.event_rx.try_recv() {
                match event {
                    // A rewind and Play may have been issued since the feed
                    // finished; only a still-exhausted store means paused.
                    AudioEvent::PlaybackFinished if app.store.is_exhausted() => {
                        tracing::info!("playback finished");
                        app.status = PlaybackStatus::Paused;
                    }
                    AudioEvent::PlaybackFinished => {
                        tracing::debug!("ignoring stale playback finished");
                    }
                }
            }
            app.refresh();
            Task::none()
        }
        Message::Transport(input) => {
            let layout = TransportLayout::new(input.bounds.width, input.bounds.height);
            if let Some(effect) = app.interaction.handle(input.pointer, &layout) {
                app.apply(effect);
            }
            app.waveform_view.playhead = app.interaction.sliders().seek;
            Task::none()
        }
        Message::KeyEvent(key_event) => match key_event {
            keyboard::Event::KeyPressed {
                key, modifiers: _, ..
            } => {
                match key.as_ref() {
                    keyboard::Key::Named(keyboard::key::Named::Space) => app.toggle_playback(),
                    keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => {
                        app.seek_relative(-KEY_SEEK_SECS)
                    }
                    keyboard::Key::Named(keyboard::key::Named::ArrowRight) => {
                        app.seek_relative(KEY_SEEK_SECS)
                    }
                    _ => {}
                }
                Task::none()
            }
            _ => Task::none(),
        },
    }
}

fn view(app: &App) -> Element<'_, Message> {
    let waveform = canvas::Canvas::new(&app.waveform_view)
        .width(Length::Fill)
        .height(Length::Fill);

    let sliders = app.interaction.sliders();
    let transport: Element<PointerInput> = canvas::Canvas::new(TransportBar {
        status: app.status,
        seek: sliders.seek,
        volume: sliders.volume,
        time: app.time,
        drag: app.interaction.drag(),
    })
    .width(Length::Fill)
    .height(Length::Fixed(controls::BAR_HEIGHT))
    .into();

    column![waveform, transport.map(Message::Transport)].into()
}

fn subscription(_app: &App) -> Subscription<Message> {
    let tick =
        iced::time::every(std::time::Duration::from_millis(16)).map(|_| Message::Tick);

    let keys = keyboard::listen().map(Message::KeyEvent);

    Subscription::batch([tick, keys])
}

fn theme(_app: &App) -> Theme {
    Theme::Light
}

pub fn run(session: Session, window_size: (f32, f32)) -> iced::Result {
    iced::application(
        move || (App::new(session.clone()), Task::none()),
        update,
        view,
    )
    .title(title)
    .subscription(subscription)
    .theme(theme)
    .window_size(window_size)
    .run()
}
