//! Limits, capacity hints and identity constants for the expander.
//!
//! This module centralizes every tunable number of the engine so that the
//! defaults of [`crate::config::Limits`] and the cache stamp live in one place.

// ============================================================================
// Engine Identity
// ============================================================================

/// Version stamp of the expansion algorithm.
///
/// Callers that memoize expansions key their cache by `(body, EXPANDER_VERSION)`.
/// Bump this whenever the expanded text or the range map of any input changes.
pub const EXPANDER_VERSION: u32 = 1;

/// Names of the built-in macros whose bodies are expanded by this crate.
pub const FORMAT_MACROS: &[&str] = &["format_args", "format_args_nl"];

// ============================================================================
// Resource Limits
// ============================================================================

/// Maximum length of a template literal in bytes, quotes included.
pub const MAX_TEMPLATE_LEN: usize = 10_000;

/// Maximum number of placeholders in one template.
pub const MAX_PLACEHOLDERS: usize = 256;

/// Maximum length of an identifier in a placeholder.
pub const MAX_IDENTIFIER_LEN: usize = 128;

// ============================================================================
// Memory Pre-Allocation Hints
// ============================================================================

/// Initial capacity hint for the template element vector.
///
/// Most templates have a handful of text runs and placeholders.
pub const ELEMENTS_INITIAL_CAPACITY: usize = 8;

/// Initial capacity hint for the span list of an expansion.
///
/// Prefix, body, closing paren and three spans per appended capture.
pub const SPANS_INITIAL_CAPACITY: usize = 8;

/// Extra bytes reserved for the expanded text beyond the body itself.
pub const EXPANSION_TEXT_SLACK: usize = 32;
