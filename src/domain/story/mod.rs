// SPDX-License-Identifier: MPL-2.0
//! Story domain types.
//!
//! Items are produced once by the catalog and never mutated afterwards; the
//! sequence store only reorders access to them through its index.

mod hit;
mod item;
pub mod newtypes;

pub use hit::{ancestor_or_self_has, Capability, HitChain, TaggedElement};
pub use item::{PlayableItem, StartVideo};
pub use newtypes::{MaxDuration, PageCount};
