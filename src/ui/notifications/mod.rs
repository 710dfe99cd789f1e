// SPDX-License-Identifier: MPL-2.0
//! Toast notifications over the story.
//!
//! Used for startup warnings (settings or state file unreadable) and for
//! confirming the copy-link control.
//!
//! - Success toasts stay 2s, warnings 5s, errors until dismissed
//! - At most 3 visible, the rest queued

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, Severity};
pub use toast::Toast;
