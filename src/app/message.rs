// SPDX-License-Identifier: MPL-2.0
//! Top-level messages and runtime flags for the application.

use super::config::Config;
use crate::application::interaction::PressId;
use crate::application::sequence::LoadTicket;
use crate::domain::error::CatalogError;
use crate::domain::playback::SessionId;
use crate::domain::story::PlayableItem;
use crate::infrastructure::ffmpeg::SinkMessage;
use crate::infrastructure::hls::HlsMessage;
use crate::ui::notifications;
use crate::ui::story;
use std::time::Instant;

/// Top-level messages consumed by `App::update`.
#[derive(Debug, Clone)]
pub enum Message {
    SequenceLoaded {
        ticket: LoadTicket,
        result: Result<Vec<PlayableItem>, CatalogError>,
    },
    /// From the adaptive engine worker.
    Hls(HlsMessage),
    /// From the decode worker of the current sink source.
    Sink(SinkMessage),
    /// The retry delay of a refused play request elapsed.
    RetryElapsed(SessionId),
    /// A press lasted long enough to be a hold.
    HoldElapsed(PressId),
    Pointer {
        event: iced::Event,
        /// A widget (story control) consumed the event.
        captured: bool,
    },
    WindowResized(iced::Size),
    KeyPressed(iced::keyboard::Key),
    /// Animation frame for the progress bar and spinner.
    AnimationFrame {
        generation: u64,
        at: Instant,
    },
    PosterLoaded {
        item_id: u64,
        result: Result<Vec<u8>, String>,
    },
    Story(story::Message),
    Notification(notifications::NotificationMessage),
    /// Periodic tick for notification auto-dismiss.
    Tick(Instant),
}

/// Runtime flags passed in from the CLI.
#[derive(Debug, Default)]
pub struct Flags {
    /// Optional locale override in BCP-47 form (e.g. `fr`, `en-US`).
    pub lang: Option<String>,
    /// PeerTube instance, overrides `[source] instance`.
    pub instance: Option<String>,
    /// Start video reference, overrides `[source] start_video`.
    pub start: Option<String>,
    pub page_count: Option<u32>,
    pub max_duration: Option<u32>,
    /// Start the first story without waiting for a gesture.
    pub autostart: bool,
    /// Optional data directory override (for state files).
    /// Takes precedence over `ICED_STORIES_DATA_DIR` environment variable.
    pub data_dir: Option<String>,
    /// Optional config directory override (for settings.toml).
    /// Takes precedence over `ICED_STORIES_CONFIG_DIR` environment variable.
    pub config_dir: Option<String>,
}

impl Flags {
    /// Overlays command-line values on the file configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(instance) = &self.instance {
            config.source.instance = Some(instance.clone());
        }
        if let Some(start) = &self.start {
            config.source.start_video = Some(start.clone());
        }
        if let Some(count) = self.page_count {
            config.source.page_count = Some(count);
        }
        if let Some(secs) = self.max_duration {
            config.source.max_duration_secs = Some(secs);
        }
        if self.autostart {
            config.playback.autostart = Some(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_values_override_file_values() {
        let mut config = Config::default();
        config.source.instance = Some("https://file.example".into());
        config.source.page_count = Some(5);

        let flags = Flags {
            instance: Some("https://cli.example".into()),
            max_duration: Some(60),
            autostart: true,
            ..Flags::default()
        };
        flags.apply_to(&mut config);

        assert_eq!(config.source.instance.as_deref(), Some("https://cli.example"));
        assert_eq!(config.source.page_count, Some(5));
        assert_eq!(config.source.max_duration_secs, Some(60));
        assert_eq!(config.playback.autostart, Some(true));
    }

    #[test]
    fn absent_autostart_flag_keeps_file_value() {
        let mut config = Config::default();
        config.playback.autostart = Some(false);
        Flags::default().apply_to(&mut config);
        assert_eq!(config.playback.autostart, Some(false));
    }
}
