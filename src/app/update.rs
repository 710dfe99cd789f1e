// SPDX-License-Identifier: MPL-2.0
//! Message handlers of the story shell.
//!
//! Every story change goes through [`App::bind_current`]: timers of the
//! previous story are aborted, the controller tears the old session down and
//! binds the new item, and the progress loop restarts for the new index.

use super::{App, Message, Screen};
use crate::application::interaction::{Direction, PointerInput, SurfaceAction};
use crate::application::loader::load_sequence;
use crate::application::playback::Effect;
use crate::application::port::MediaSink;
use crate::application::sequence::{Advance, LoadTicket};
use crate::domain::error::CatalogError;
use crate::domain::playback::SessionId;
use crate::domain::story::PlayableItem;
use crate::infrastructure::ffmpeg::SinkMessage;
use crate::infrastructure::hls::HlsMessage;
use crate::infrastructure::http;
use crate::infrastructure::peertube::PeerTubeCatalog;
use crate::ui::notifications::Notification;
use crate::ui::story;
use crate::ui::widgets::animated_spinner;
use iced::keyboard::{self, key::Named, Key};
use iced::widget::image;
use iced::Task;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Longest step the spinner takes after a stalled frame.
const MAX_SPIN_STEP: Duration = Duration::from_millis(100);

impl App {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Starts the one-time channel listing.
    pub(super) fn start_loading(&mut self) -> Task<Message> {
        let Some(settings) = self.source.clone() else {
            tracing::info!("no instance configured");
            self.screen = Screen::Unconfigured;
            return Task::none();
        };
        let Some(client) = self.http.clone() else {
            self.screen = Screen::LoadFailed(CatalogError::Network(
                "HTTP client unavailable".to_string(),
            ));
            return Task::none();
        };
        let Some(ticket) = self.sequence.begin_load() else {
            return Task::none();
        };

        tracing::info!(instance = %settings.instance, "loading stories");
        self.screen = Screen::Loading;
        let catalog = PeerTubeCatalog::new(client, settings);
        Task::perform(
            async move { load_sequence(&catalog).await },
            move |result| Message::SequenceLoaded { ticket, result },
        )
    }

    pub(super) fn handle_sequence_loaded(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<PlayableItem>, CatalogError>,
    ) -> Task<Message> {
        if let Err(err) = &result {
            tracing::error!(error = %err, "could not load stories");
        }
        if !self.sequence.finish_load(ticket, result) {
            return Task::none();
        }

        if let Some(err) = self.sequence.error() {
            self.screen = Screen::LoadFailed(err.clone());
            return Task::none();
        }
        if self.sequence.is_empty() {
            self.screen = Screen::Empty;
            return Task::none();
        }
        self.screen = Screen::Stories;
        self.bind_current(self.autostart)
    }

    // =========================================================================
    // Story transitions
    // =========================================================================

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.retry_timer.take() {
            handle.abort();
        }
        if let Some(handle) = self.hold_timer.take() {
            handle.abort();
        }
    }

    fn is_current(&self, session: SessionId) -> bool {
        self.controller.session_id() == Some(session)
    }

    /// Binds the item at the current index. Unplayable items are skipped.
    fn bind_current(&mut self, auto_start: bool) -> Task<Message> {
        self.cancel_timers();
        self.frame = None;
        self.poster = None;
        self.started = false;

        let Some(item) = self.sequence.current().cloned() else {
            return self.close_out();
        };
        let index = self.sequence.index();
        tracing::info!(index, item = item.id, title = %item.title, "showing story");

        self.progress.stop();
        self.progress.start(index, item.duration_secs);

        match self
            .controller
            .bind(&item, self.sequence.is_muted(), auto_start)
        {
            Ok(binding) => {
                tracing::debug!(index, plan = ?self.controller.plan(), "story bound");
                let poster = self.fetch_poster(&item);
                let effects = self.apply_effects(binding.effects);
                Task::batch([poster, effects])
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping story");
                self.failed.insert(index);
                self.go_next()
            }
        }
    }

    fn go_next(&mut self) -> Task<Message> {
        match self.sequence.next() {
            Advance::Moved(_) => self.bind_current(self.autostart),
            Advance::EndOfSequence => self.close_out(),
        }
    }

    fn go_previous(&mut self) -> Task<Message> {
        self.sequence.prev();
        self.bind_current(self.autostart)
    }

    /// Leaves the sequence: nothing stays bound, nothing keeps sampling.
    fn close_out(&mut self) -> Task<Message> {
        self.cancel_timers();
        self.controller.teardown();
        self.progress.stop();
        self.frame = None;
        self.poster = None;

        let all_failed = !self.sequence.is_empty() && self.failed.len() >= self.sequence.len();
        self.screen = if all_failed {
            Screen::NoPlayable
        } else {
            Screen::Finished
        };
        tracing::info!(screen = ?self.screen, "end of stories");
        Task::none()
    }

    fn restart(&mut self) -> Task<Message> {
        if !matches!(self.screen, Screen::Finished | Screen::NoPlayable) {
            return Task::none();
        }
        self.controller.ledger().mark();
        self.sequence.rewind();
        self.failed.clear();
        self.screen = Screen::Stories;
        self.bind_current(true)
    }

    /// Carries out controller follow-ups.
    pub(super) fn apply_effects(&mut self, effects: Vec<Effect>) -> Task<Message> {
        let mut tasks = Vec::new();
        for effect in effects {
            match effect {
                Effect::ScheduleRetry { session, delay } => {
                    let (task, handle) = Task::perform(tokio::time::sleep(delay), move |()| {
                        Message::RetryElapsed(session)
                    })
                    .abortable();
                    if let Some(previous) = self.retry_timer.replace(handle) {
                        previous.abort();
                    }
                    tasks.push(task);
                }
                Effect::Started { session } => {
                    if self.is_current(session) {
                        self.started = true;
                    }
                }
                Effect::Ended { session } => {
                    if self.is_current(session) {
                        tasks.push(self.go_next());
                    }
                }
                Effect::Fatal { session, error } => {
                    if self.is_current(session) {
                        tracing::warn!(index = self.sequence.index(), %error, "story failed");
                        self.failed.insert(self.sequence.index());
                        tasks.push(self.go_next());
                    }
                }
            }
        }
        Task::batch(tasks)
    }

    // =========================================================================
    // Workers
    // =========================================================================

    pub(super) fn handle_sink_message(&mut self, message: SinkMessage) -> Task<Message> {
        if !self.controller.sink().accepts(message.generation()) {
            return Task::none();
        }
        match message {
            SinkMessage::Connected {
                generation,
                commands,
            } => {
                self.controller.sink_mut().connect(generation, commands);
                Task::none()
            }
            SinkMessage::Lifecycle { event, .. } => {
                let effects = self.controller.handle_sink_event(event);
                self.apply_effects(effects)
            }
            SinkMessage::Frame { frame, .. } => {
                let pixels = Arc::unwrap_or_clone(frame.rgba_data);
                self.frame = Some(image::Handle::from_rgba(frame.width, frame.height, pixels));
                self.poster = None;
                Task::none()
            }
        }
    }

    pub(super) fn handle_hls_message(&mut self, message: HlsMessage) -> Task<Message> {
        match message {
            HlsMessage::Ready(handle) => {
                tracing::debug!("HLS worker ready");
                self.controller.engines_mut().connect(handle);
                Task::none()
            }
            HlsMessage::Event { session, event } => {
                let effects = self.controller.handle_engine_event(session, event);
                self.apply_effects(effects)
            }
        }
    }

    fn fetch_poster(&self, item: &PlayableItem) -> Task<Message> {
        let (Some(client), Some(url)) = (self.http.clone(), item.thumbnail_url.clone()) else {
            return Task::none();
        };
        let item_id = item.id;
        Task::perform(http::fetch_poster(client, url), move |result| {
            Message::PosterLoaded {
                item_id,
                result: result.map_err(|err| err.to_string()),
            }
        })
    }

    pub(super) fn handle_poster_loaded(&mut self, item_id: u64, result: Result<Vec<u8>, String>) {
        let current = self.sequence.current().map(|item| item.id);
        if current != Some(item_id) || self.frame.is_some() {
            return;
        }
        match result {
            Ok(bytes) => self.poster = Some(image::Handle::from_bytes(bytes)),
            Err(reason) => tracing::debug!(item = item_id, %reason, "poster unavailable"),
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub(super) fn handle_pointer_event(&mut self, event: &iced::Event, captured: bool) -> Task<Message> {
        match self.pointer.translate(event, captured) {
            Some(input) => self.handle_pointer_input(input),
            None => Task::none(),
        }
    }

    pub(super) fn handle_pointer_input(&mut self, input: PointerInput) -> Task<Message> {
        if !self.screen.is_interactive() {
            return Task::none();
        }
        let mut tasks = Vec::new();
        for action in self.surface.handle(input) {
            match action {
                SurfaceAction::Pause => self.controller.pause(),
                SurfaceAction::Resume => {
                    let effects = self.controller.resume();
                    tasks.push(self.apply_effects(effects));
                }
                SurfaceAction::Navigate(Direction::Next) => tasks.push(self.go_next()),
                SurfaceAction::Navigate(Direction::Previous) => tasks.push(self.go_previous()),
                SurfaceAction::ScheduleHold { press, delay } => {
                    let (task, handle) = Task::perform(tokio::time::sleep(delay), move |()| {
                        Message::HoldElapsed(press)
                    })
                    .abortable();
                    if let Some(previous) = self.hold_timer.replace(handle) {
                        previous.abort();
                    }
                    tasks.push(task);
                }
                SurfaceAction::CancelHold => {
                    if let Some(handle) = self.hold_timer.take() {
                        handle.abort();
                    }
                }
                SurfaceAction::HoldConfirmed => tracing::debug!("hold confirmed"),
            }
        }
        Task::batch(tasks)
    }

    pub(super) fn handle_key(&mut self, key: &keyboard::Key) -> Task<Message> {
        if !self.screen.is_interactive() {
            return Task::none();
        }
        match key.as_ref() {
            Key::Named(Named::ArrowRight) => {
                self.controller.ledger().mark();
                self.go_next()
            }
            Key::Named(Named::ArrowLeft) => {
                self.controller.ledger().mark();
                self.go_previous()
            }
            Key::Character("m") => {
                self.toggle_mute();
                Task::none()
            }
            _ => Task::none(),
        }
    }

    fn toggle_mute(&mut self) {
        self.controller.ledger().mark();
        let muted = self.sequence.toggle_muted();
        self.controller.set_muted(muted);
        tracing::debug!(muted, "mute toggled");
    }

    pub(super) fn handle_story_message(&mut self, message: story::Message) -> Task<Message> {
        match message {
            story::Message::ToggleMute => {
                self.toggle_mute();
                Task::none()
            }
            story::Message::CopyLink => {
                let Some(url) = self.sequence.current().map(|item| item.page_url.clone()) else {
                    return Task::none();
                };
                self.notifications
                    .push(Notification::success("story-link-copied"));
                iced::clipboard::write(url)
            }
            story::Message::Restart => self.restart(),
        }
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Samples the playback clock and turns the spinner.
    ///
    /// Frames tagged with an older progress generation belong to a story
    /// that is gone and are not sampled.
    pub(super) fn handle_animation_frame(&mut self, generation: u64, at: Instant) {
        let step = self
            .last_animation
            .map_or(Duration::ZERO, |last| at.saturating_duration_since(last))
            .min(MAX_SPIN_STEP);
        self.last_animation = Some(at);
        self.spinner_rotation =
            animated_spinner::advance(self.spinner_rotation, step.as_secs_f32());

        if generation == self.progress.generation() && self.controller.sink().source().is_some() {
            self.progress.sample(self.controller.current_time());
        }
    }
}
