// SPDX-License-Identifier: MPL-2.0
//! Stream source selection.

use crate::domain::error::PlaybackError;

/// What the platform can do with an adaptive manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceCapabilities {
    /// A software adaptive-streaming engine is available.
    pub adaptive_engine: bool,
    /// The sink demuxes the manifest format on its own.
    pub native_manifest: bool,
}

/// How an item will be fed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePlan {
    /// Drive the manifest through the adaptive engine.
    Adaptive { manifest: String },
    /// Hand the manifest URL straight to the sink.
    NativeManifest { manifest: String },
    /// Play the single-bitrate file.
    Progressive { url: String },
}

impl SourcePlan {
    /// Returns the URL the plan starts from.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            SourcePlan::Adaptive { manifest } | SourcePlan::NativeManifest { manifest } => manifest,
            SourcePlan::Progressive { url } => url,
        }
    }

    #[must_use]
    pub fn is_adaptive(&self) -> bool {
        matches!(self, SourcePlan::Adaptive { .. })
    }
}

/// Picks the source for an item. First match wins:
///
/// 1. manifest + adaptive engine
/// 2. manifest + native manifest support
/// 3. progressive file
///
/// Blank URLs count as absent.
///
/// # Errors
///
/// Returns [`PlaybackError::NoPlayableSource`] when nothing matches.
pub fn select_source(
    caps: SourceCapabilities,
    manifest_url: Option<&str>,
    progressive_url: Option<&str>,
) -> Result<SourcePlan, PlaybackError> {
    let manifest = manifest_url.filter(|u| !u.trim().is_empty());
    let progressive = progressive_url.filter(|u| !u.trim().is_empty());

    match (manifest, progressive) {
        (Some(m), _) if caps.adaptive_engine => Ok(SourcePlan::Adaptive {
            manifest: m.to_string(),
        }),
        (Some(m), _) if caps.native_manifest => Ok(SourcePlan::NativeManifest {
            manifest: m.to_string(),
        }),
        (_, Some(p)) => Ok(SourcePlan::Progressive { url: p.to_string() }),
        _ => Err(PlaybackError::NoPlayableSource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGINE: SourceCapabilities = SourceCapabilities {
        adaptive_engine: true,
        native_manifest: false,
    };
    const NOTHING: SourceCapabilities = SourceCapabilities {
        adaptive_engine: false,
        native_manifest: false,
    };

    #[test]
    fn engine_with_manifest_is_adaptive() {
        let plan = select_source(ENGINE, Some("m"), Some("p")).unwrap();
        assert_eq!(plan, SourcePlan::Adaptive { manifest: "m".into() });
    }

    #[test]
    fn no_engine_falls_to_progressive() {
        let plan = select_source(NOTHING, Some("m"), Some("p")).unwrap();
        assert_eq!(plan, SourcePlan::Progressive { url: "p".into() });
    }

    #[test]
    fn native_manifest_beats_progressive() {
        let caps = SourceCapabilities {
            adaptive_engine: false,
            native_manifest: true,
        };
        let plan = select_source(caps, Some("m"), Some("p")).unwrap();
        assert_eq!(plan, SourcePlan::NativeManifest { manifest: "m".into() });
    }

    #[test]
    fn engine_is_preferred_over_native_support() {
        let caps = SourceCapabilities {
            adaptive_engine: true,
            native_manifest: true,
        };
        assert!(select_source(caps, Some("m"), None).unwrap().is_adaptive());
    }

    #[test]
    fn nothing_present_is_no_source() {
        assert_eq!(
            select_source(NOTHING, None, None),
            Err(PlaybackError::NoPlayableSource)
        );
        assert_eq!(
            select_source(ENGINE, Some(""), None),
            Err(PlaybackError::NoPlayableSource)
        );
    }

    #[test]
    fn manifest_without_any_support_and_no_file_fails() {
        assert_eq!(
            select_source(NOTHING, Some("m"), None),
            Err(PlaybackError::NoPlayableSource)
        );
    }
}
