// SPDX-License-Identifier: MPL-2.0
//! Capability tags on hit-test targets.
//!
//! A pointer press is attributed to a chain of elements, innermost first.
//! Controls mark themselves with [`Capability::Control`]; the interaction
//! surface ignores presses whose chain carries that tag anywhere.

/// Capabilities an element can advertise to the hit tester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Interactive control (mute button, copy link...). Presses on it are
    /// never interpreted as story gestures.
    Control,
}

/// Element that may carry capability tags.
pub trait TaggedElement {
    fn has_capability(&self, capability: Capability) -> bool;
}

/// Returns true if the target or any of its ancestors carries `capability`.
///
/// `chain` is ordered innermost first, the target itself being the first
/// element.
pub fn ancestor_or_self_has<'a, E, I>(chain: I, capability: Capability) -> bool
where
    E: TaggedElement + ?Sized + 'a,
    I: IntoIterator<Item = &'a E>,
{
    chain.into_iter().any(|el| el.has_capability(capability))
}

/// Owned hit chain: the tags of each element from target to root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitChain {
    elements: Vec<Vec<Capability>>,
}

impl HitChain {
    /// Creates an empty chain (a press on the bare surface).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next outer element with the given tags.
    #[must_use]
    pub fn push(mut self, tags: &[Capability]) -> Self {
        self.elements.push(tags.to_vec());
        self
    }

    /// Chain for a press that landed directly on a control.
    #[must_use]
    pub fn control() -> Self {
        Self::new().push(&[Capability::Control])
    }

    /// Returns true if any element carries `capability`.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        ancestor_or_self_has(self.elements.iter(), capability)
    }
}

impl TaggedElement for Vec<Capability> {
    fn has_capability(&self, capability: Capability) -> bool {
        self.contains(&capability)
    }
}
