// SPDX-License-Identifier: MPL-2.0
//! PeerTube REST adapter for the video catalog port.

mod catalog;
pub mod dto;

pub use catalog::{account_handle, build_item, short_id, PeerTubeCatalog, Site, SourceSettings};
