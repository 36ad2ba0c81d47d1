//! Multipart boundary generation.
//!
//! Every message uses two boundaries: one for the outer `multipart/mixed`
//! section and one for the nested `multipart/alternative` section. Random
//! boundaries are long enough that a collision with encoded content is not
//! a practical concern, and they are never cached between messages.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of a randomly generated boundary token.
pub const BOUNDARY_LENGTH: usize = 40;

/// Generates a random boundary token.
#[must_use]
pub fn random_boundary() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_LENGTH)
        .map(char::from)
        .collect()
}

/// The boundary pair used by a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundaries {
    /// Boundary of the outer `multipart/mixed` section.
    pub mixed: String,
    /// Boundary of the nested `multipart/alternative` section.
    pub alternative: String,
}

impl Boundaries {
    /// Creates a fixed boundary pair.
    ///
    /// The caller is responsible for choosing tokens that do not occur in
    /// the message content. The two tokens must differ: with equal tokens
    /// the closing line of the alternative section would also close the
    /// mixed section, and debug builds panic on them.
    #[must_use]
    pub fn new(mixed: impl Into<String>, alternative: impl Into<String>) -> Self {
        let boundaries = Self {
            mixed: mixed.into(),
            alternative: alternative.into(),
        };
        debug_assert_ne!(
            boundaries.mixed, boundaries.alternative,
            "mixed and alternative boundaries must differ"
        );
        boundaries
    }

    /// Generates a fresh random boundary pair with distinct tokens.
    #[must_use]
    pub fn random() -> Self {
        let mixed = random_boundary();
        let mut alternative = random_boundary();
        while alternative == mixed {
            alternative = random_boundary();
        }
        Self { mixed, alternative }
    }
}

/// How a message obtains its boundaries at build time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryStrategy {
    /// Fresh random boundaries for every build.
    #[default]
    Random,
    /// The same literal boundaries on every build, for reproducible output.
    Fixed(Boundaries),
}

impl BoundaryStrategy {
    /// Produces the boundaries for one build.
    #[must_use]
    pub fn boundaries(&self) -> Boundaries {
        match self {
            Self::Random => Boundaries::random(),
            Self::Fixed(boundaries) => boundaries.clone(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_boundary_shape() {
        let boundary = random_boundary();
        assert_eq!(boundary.len(), BOUNDARY_LENGTH);
        assert!(boundary.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_pair_is_distinct() {
        let boundaries = Boundaries::random();
        assert_ne!(boundaries.mixed, boundaries.alternative);
    }

    #[test]
    fn test_random_boundaries_do_not_repeat() {
        let seen: HashSet<String> = (0..256).map(|_| random_boundary()).collect();
        assert_eq!(seen.len(), 256);
    }

    #[test]
    fn test_fixed_strategy_is_stable() {
        let strategy = BoundaryStrategy::Fixed(Boundaries::new("mixed", "alt"));
        assert_eq!(strategy.boundaries(), strategy.boundaries());
        assert_eq!(strategy.boundaries().mixed, "mixed");
        assert_eq!(strategy.boundaries().alternative, "alt");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "mixed and alternative boundaries must differ")]
    fn test_fixed_pair_must_differ() {
        let _ = Boundaries::new("same", "same");
    }

    #[test]
    fn test_random_strategy_is_default() {
        let strategy = BoundaryStrategy::default();
        assert_eq!(strategy, BoundaryStrategy::Random);
        assert_ne!(strategy.boundaries(), strategy.boundaries());
    }
}
