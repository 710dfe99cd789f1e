// SPDX-License-Identifier: MPL-2.0
//! Widget styles of the story screen.

pub mod button;
pub mod overlay;
