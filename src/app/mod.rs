// SPDX-License-Identifier: MPL-2.0
//! Application root state: the story shell.
//!
//! The `App` struct wires the story sequence, the playback controller, the
//! interaction surface and the progress renderer to Iced. Workers (decoder,
//! HLS engine) run as subscriptions; timers (play retry, hold) run as
//! abortable tasks owned by the current story.

pub mod config;
mod message;
pub mod paths;
pub mod persisted_state;
mod screen;
mod subscription;
mod update;
mod view;

pub use message::{Flags, Message};
pub use screen::Screen;

use crate::application::gesture::GestureLedger;
use crate::application::interaction::{InteractionSurface, PointerInput};
use crate::application::playback::{BandwidthHistory, SessionController};
use crate::application::port::SystemClock;
use crate::application::progress::ProgressRenderer;
use crate::application::sequence::StorySequence;
use crate::i18n::fluent::I18n;
use crate::infrastructure::peertube::SourceSettings;
use crate::infrastructure::{http, FfmpegSink, HlsEngineFactory};
use crate::ui::notifications::{self, Notification};
use crate::ui::story::PointerTracker;
use iced::widget::image;
use iced::{task, window, Element, Subscription, Task, Theme};
use persisted_state::CborStore;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// The controller as wired in the desktop app.
pub(crate) type Controller = SessionController<FfmpegSink, HlsEngineFactory, CborStore>;

/// Root Iced application state.
pub struct App {
    pub i18n: I18n,
    screen: Screen,
    sequence: StorySequence,
    controller: Controller,
    progress: ProgressRenderer,
    surface: InteractionSurface,
    pointer: PointerTracker,
    /// `None` if the TLS backend could not be initialised.
    http: Option<reqwest::Client>,
    source: Option<SourceSettings>,
    autostart: bool,
    /// Latest decoded frame of the current story.
    frame: Option<image::Handle>,
    /// Thumbnail of the current story, shown until the first frame.
    poster: Option<image::Handle>,
    /// First `Playing` seen for the current story.
    started: bool,
    /// Indices whose playback failed since the last restart.
    failed: BTreeSet<usize>,
    spinner_rotation: f32,
    last_animation: Option<Instant>,
    retry_timer: Option<task::Handle>,
    hold_timer: Option<task::Handle>,
    notifications: notifications::Manager,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("screen", &self.screen)
            .field("sequence", &self.sequence.info())
            .field("session", &self.controller.session_id())
            .finish_non_exhaustive()
    }
}

pub const WINDOW_DEFAULT_HEIGHT: u32 = 800;
pub const WINDOW_DEFAULT_WIDTH: u32 = 450;
pub const MIN_WINDOW_HEIGHT: u32 = 400;
pub const MIN_WINDOW_WIDTH: u32 = 280;

/// Portrait window sized for vertical video.
#[must_use]
pub fn window_settings() -> window::Settings {
    #[allow(clippy::cast_precision_loss)]
    window::Settings {
        size: iced::Size::new(WINDOW_DEFAULT_WIDTH as f32, WINDOW_DEFAULT_HEIGHT as f32),
        min_size: Some(iced::Size::new(
            MIN_WINDOW_WIDTH as f32,
            MIN_WINDOW_HEIGHT as f32,
        )),
        ..window::Settings::default()
    }
}

/// Entry point used by `main.rs` to launch the Iced application loop.
pub fn run(flags: Flags) -> iced::Result {
    use std::cell::RefCell;

    // iced 0.14 requires an `Fn` boot closure; flags are consumed once.
    let boot_state = RefCell::new(Some(flags));
    let boot = move || App::new(boot_state.borrow_mut().take().unwrap_or_default());

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .window(window_settings())
        .subscription(App::subscription)
        .run()
}

impl App {
    /// Builds the shell from configuration and starts the initial load.
    fn new(flags: Flags) -> (Self, Task<Message>) {
        // Directory overrides from `flags` were registered by `main`.
        let (mut config, config_warning) = config::load();
        flags.apply_to(&mut config);

        let i18n = I18n::new(flags.lang.clone(), &config);
        let (store, state_warning) = CborStore::open(None);

        let ledger = GestureLedger::new(Arc::new(SystemClock::new()));
        let controller = SessionController::new(
            FfmpegSink::new(),
            HlsEngineFactory::new(),
            BandwidthHistory::new(store),
            ledger.clone(),
            config.controller_settings(),
        );
        tracing::debug!(
            seed_bps = controller.bandwidth().seed_bps(),
            "bandwidth seed for the first adaptive session"
        );
        let surface = InteractionSurface::new(ledger, config.surface_settings());

        let http = match http::client() {
            Ok(client) => Some(client),
            Err(err) => {
                tracing::error!(%err, "HTTP client unavailable");
                None
            }
        };

        let mut app = App {
            i18n,
            screen: Screen::Loading,
            sequence: StorySequence::with_muted(config.start_muted()),
            controller,
            progress: ProgressRenderer::new(),
            surface,
            pointer: PointerTracker::new(),
            http,
            source: config.source_settings(),
            autostart: config.autostart(),
            frame: None,
            poster: None,
            started: false,
            failed: BTreeSet::new(),
            spinner_rotation: 0.0,
            last_animation: None,
            retry_timer: None,
            hold_timer: None,
            notifications: notifications::Manager::new(),
        };

        for key in [config_warning, state_warning].into_iter().flatten() {
            app.notifications.push(Notification::warning(key));
        }

        let task = app.start_loading();
        (app, task)
    }

    fn title(&self) -> String {
        let app_name = self.i18n.tr("window-title");
        match (&self.screen, self.sequence.current()) {
            (Screen::Stories, Some(item)) => format!("{} - {app_name}", item.title),
            _ => app_name,
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        let spinner_visible = matches!(self.screen, Screen::Loading)
            || (self.screen == Screen::Stories && !self.started);

        Subscription::batch([
            subscription::create_event_subscription(self.screen.is_interactive()),
            subscription::create_worker_subscription(&self.controller),
            subscription::create_animation_subscription(
                self.progress.is_running() || spinner_visible,
                self.progress.generation(),
            ),
            subscription::create_notification_subscription(
                self.notifications.has_notifications(),
            ),
        ])
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SequenceLoaded { ticket, result } => self.handle_sequence_loaded(ticket, result),
            Message::Hls(message) => self.handle_hls_message(message),
            Message::Sink(message) => self.handle_sink_message(message),
            Message::RetryElapsed(session) => {
                self.retry_timer = None;
                let effects = self.controller.retry_elapsed(session);
                self.apply_effects(effects)
            }
            Message::HoldElapsed(press) => {
                self.hold_timer = None;
                self.handle_pointer_input(PointerInput::HoldElapsed { press })
            }
            Message::Pointer { event, captured } => self.handle_pointer_event(&event, captured),
            Message::WindowResized(size) => {
                self.surface.set_width(size.width);
                Task::none()
            }
            Message::KeyPressed(key) => self.handle_key(&key),
            Message::AnimationFrame { generation, at } => {
                self.handle_animation_frame(generation, at);
                Task::none()
            }
            Message::PosterLoaded { item_id, result } => {
                self.handle_poster_loaded(item_id, result);
                Task::none()
            }
            Message::Story(message) => self.handle_story_message(message),
            Message::Notification(message) => {
                self.notifications.handle_message(&message);
                Task::none()
            }
            Message::Tick(now) => {
                self.notifications.tick(now);
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(view::ViewContext {
            i18n: &self.i18n,
            screen: &self.screen,
            sequence: &self.sequence,
            fills: self.progress.fills(self.sequence.len()),
            started: self.started,
            paused: self.surface.is_holding(),
            frame: self.frame.as_ref(),
            poster: self.poster.as_ref(),
            spinner_rotation: self.spinner_rotation,
            notifications: &self.notifications,
        })
    }
}
