// SPDX-License-Identifier: MPL-2.0
//! Errors raised while resolving and listing remote videos.

use std::fmt;

/// Errors produced by a video catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No start video could be found by search, direct lookup or account fallback.
    Resolution(String),

    /// The configured start reference cannot be interpreted.
    InvalidStartReference(String),

    /// The host answered with a non-success status.
    Http { status: u16, url: String },

    /// The request never produced a response (DNS, TLS, timeout...).
    Network(String),

    /// The response body did not match the expected shape.
    Decode(String),
}

impl CatalogError {
    /// Returns the i18n message key shown on the load-failure screen.
    #[must_use]
    pub fn i18n_key(&self) -> &'static str {
        match self {
            CatalogError::Resolution(_) | CatalogError::InvalidStartReference(_) => {
                "error-start-not-found"
            }
            CatalogError::Http { .. } | CatalogError::Network(_) => "error-host-unreachable",
            CatalogError::Decode(_) => "error-host-unexpected-response",
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Resolution(msg) => write!(f, "Start video not resolvable: {msg}"),
            CatalogError::InvalidStartReference(reference) => {
                write!(f, "Invalid start reference: {reference}")
            }
            CatalogError::Http { status, url } => write!(f, "HTTP {status} for {url}"),
            CatalogError::Network(msg) => write!(f, "Network error: {msg}"),
            CatalogError::Decode(msg) => write!(f, "Unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}
