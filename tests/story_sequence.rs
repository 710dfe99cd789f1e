// SPDX-License-Identifier: MPL-2.0
mod common;

use approx::assert_relative_eq;
use common::{items, start_video, StaticCatalog};
use iced_stories::application::loader::load_sequence;
use iced_stories::application::progress::ProgressRenderer;
use iced_stories::application::sequence::{Advance, StorySequence};
use iced_stories::domain::error::CatalogError;

#[tokio::test]
async fn loads_the_channel_of_the_start_video() {
    let catalog = StaticCatalog::new(start_video(Some(9), Some("alice")), items(3));
    let loaded = load_sequence(&catalog).await.unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(
        catalog.listed_with(),
        Some((Some(9), Some("alice".to_string())))
    );
}

#[tokio::test]
async fn account_is_listed_when_no_channel_is_known() {
    let catalog = StaticCatalog::new(start_video(None, Some("alice@tube.example")), items(2));
    load_sequence(&catalog).await.unwrap();
    assert_eq!(
        catalog.listed_with(),
        Some((None, Some("alice@tube.example".to_string())))
    );
}

#[tokio::test]
async fn start_video_without_owner_fails_before_listing() {
    let catalog = StaticCatalog::new(start_video(None, None), items(2));
    let err = load_sequence(&catalog).await.unwrap_err();
    assert!(matches!(err, CatalogError::Resolution(_)));
    assert_eq!(catalog.listed_with(), None);
}

#[tokio::test]
async fn resolution_failure_is_returned_as_is() {
    let mut catalog = StaticCatalog::new(start_video(Some(1), None), items(1));
    catalog.start = Err(CatalogError::Http {
        status: 404,
        url: "https://tube.example/api/v1/videos/x".into(),
    });
    let err = load_sequence(&catalog).await.unwrap_err();
    assert_eq!(err.i18n_key(), "error-host-unreachable");
}

#[tokio::test]
async fn loaded_items_feed_the_sequence() {
    let catalog = StaticCatalog::new(start_video(Some(3), None), items(4));
    let mut sequence = StorySequence::new();
    let ticket = sequence.begin_load().unwrap();
    assert!(sequence.is_loading());

    let result = load_sequence(&catalog).await;
    assert!(sequence.finish_load(ticket, result));
    assert!(!sequence.is_loading());
    assert_eq!(sequence.len(), 4);
    assert_eq!(sequence.current().map(|item| item.id), Some(1));
}

#[test]
fn only_one_load_is_ever_started() {
    let mut sequence = StorySequence::new();
    assert!(sequence.begin_load().is_some());
    assert!(sequence.begin_load().is_none());
}

#[test]
fn results_after_close_are_discarded() {
    let mut sequence = StorySequence::new();
    let ticket = sequence.begin_load().unwrap();
    sequence.close();
    assert!(!sequence.finish_load(ticket, Ok(items(3))));
    assert!(sequence.is_empty());
}

#[test]
fn navigation_stays_within_bounds() {
    let mut sequence = StorySequence::new();
    let ticket = sequence.begin_load().unwrap();
    sequence.finish_load(ticket, Ok(items(3)));

    assert_eq!(sequence.prev(), 0);
    assert_eq!(sequence.next(), Advance::Moved(1));
    assert_eq!(sequence.next(), Advance::Moved(2));
    assert_eq!(sequence.next(), Advance::EndOfSequence);
    assert_eq!(sequence.index(), 2);
    assert!(sequence.info().at_last);

    assert_eq!(sequence.rewind(), 0);
    assert!(sequence.info().at_first);
}

#[test]
fn failed_load_leaves_an_empty_sequence() {
    let mut sequence = StorySequence::new();
    let ticket = sequence.begin_load().unwrap();
    sequence.finish_load(ticket, Err(CatalogError::Network("dns".into())));
    assert!(sequence.is_empty());
    assert_eq!(sequence.next(), Advance::EndOfSequence);
    assert!(sequence.error().is_some());
    assert_eq!(sequence.info().current_index, None);
}

#[test]
fn mute_preference_survives_navigation() {
    let mut sequence = StorySequence::new();
    let ticket = sequence.begin_load().unwrap();
    sequence.finish_load(ticket, Ok(items(2)));
    assert!(sequence.is_muted());
    assert!(!sequence.toggle_muted());
    sequence.next();
    assert!(!sequence.is_muted());
}

#[test]
fn progress_follows_the_current_item() {
    let mut sequence = StorySequence::new();
    let ticket = sequence.begin_load().unwrap();
    sequence.finish_load(ticket, Ok(items(3)));
    sequence.next();

    let mut progress = ProgressRenderer::new();
    let duration = sequence.current().map_or(0.0, |item| item.duration_secs);
    progress.start(sequence.index(), duration);
    progress.sample(3.0);

    let fills = progress.fills(sequence.len());
    assert_relative_eq!(fills[0], 1.0);
    assert_relative_eq!(fills[1], 0.25);
    assert_relative_eq!(fills[2], 0.0);

    let generation = progress.generation();
    progress.stop();
    progress.sample(9.0);
    assert_relative_eq!(progress.ratio(), 0.25);
    progress.start(sequence.index(), duration);
    assert_ne!(progress.generation(), generation);
}
