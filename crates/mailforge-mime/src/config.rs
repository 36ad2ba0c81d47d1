//! Composition configuration types.

use crate::boundary::{Boundaries, BoundaryStrategy};

/// Base64 line width recommended by RFC 2045.
pub const DEFAULT_LINE_LENGTH: usize = 76;

/// Message composition configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComposeConfig {
    /// Boundary source used at build time.
    pub boundaries: BoundaryStrategy,
    /// Width of base64 attachment lines; `0` disables wrapping.
    pub line_length: usize,
    /// Emit non-ASCII subjects and display names as RFC 2047 encoded-words.
    pub encode_headers: bool,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            boundaries: BoundaryStrategy::Random,
            line_length: DEFAULT_LINE_LENGTH,
            encode_headers: false,
        }
    }
}

impl ComposeConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ComposeConfigBuilder {
        ComposeConfigBuilder::new()
    }
}

/// Builder for composition configuration.
#[derive(Debug, Clone, Default)]
pub struct ComposeConfigBuilder {
    config: ComposeConfig,
}

impl ComposeConfigBuilder {
    /// Creates a builder holding the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses fixed boundaries for every build.
    #[must_use]
    pub fn fixed_boundaries(
        mut self,
        mixed: impl Into<String>,
        alternative: impl Into<String>,
    ) -> Self {
        self.config.boundaries = BoundaryStrategy::Fixed(Boundaries::new(mixed, alternative));
        self
    }

    /// Sets the boundary strategy.
    #[must_use]
    pub fn boundaries(mut self, strategy: BoundaryStrategy) -> Self {
        self.config.boundaries = strategy;
        self
    }

    /// Sets the base64 line width.
    #[must_use]
    pub const fn line_length(mut self, line_length: usize) -> Self {
        self.config.line_length = line_length;
        self
    }

    /// Enables RFC 2047 encoding of non-ASCII header text.
    #[must_use]
    pub const fn encode_headers(mut self, enabled: bool) -> Self {
        self.config.encode_headers = enabled;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ComposeConfig {
        self.config
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

    #[test]
    fn test_config_defaults() {
        let config = ComposeConfig::new();
        assert_eq!(config.boundaries, BoundaryStrategy::Random);
        assert_eq!(config.line_length, 76);
        assert!(!config.encode_headers);
    }

    #[test]
    fn test_config_builder() {
        let config = ComposeConfig::builder()
            .fixed_boundaries("mixed", "alt")
            .line_length(0)
            .encode_headers(true)
            .build();

        assert_eq!(
            config.boundaries,
            BoundaryStrategy::Fixed(Boundaries::new("mixed", "alt"))
        );
        assert_eq!(config.line_length, 0);
        assert!(config.encode_headers);
    }

    #[test]
    fn test_builder_strategy_override() {
        let config = ComposeConfig::builder()
            .fixed_boundaries("a", "b")
            .boundaries(BoundaryStrategy::Random)
            .build();
        assert_eq!(config.boundaries, BoundaryStrategy::Random);
    }
}
