// SPDX-License-Identifier: MPL-2.0
//! Localization of the overlay and notices.
//!
//! Translations live in `assets/i18n/*.ftl` and are embedded at build time.
//! The locale is chosen from `--lang`, then `[general] language`, then the
//! OS locale, then `en-US`.

pub mod fluent;
