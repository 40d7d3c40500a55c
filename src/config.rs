//! Tunable limits of the template parser.

use crate::constants::{MAX_IDENTIFIER_LEN, MAX_PLACEHOLDERS, MAX_TEMPLATE_LEN};

/// Resource limits applied while parsing a format template.
///
/// Exceeding a limit is reported as a template diagnostic, so an oversized
/// invocation is left unexpanded instead of being processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum raw length of the template literal in bytes.
    pub max_template_len: usize,
    /// Maximum number of placeholders in one template.
    pub max_placeholders: usize,
    /// Maximum length of an argument name.
    pub max_identifier_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_template_len: MAX_TEMPLATE_LEN,
            max_placeholders: MAX_PLACEHOLDERS,
            max_identifier_len: MAX_IDENTIFIER_LEN,
        }
    }
}

impl Limits {
    /// Limits that never trigger; for trusted inputs.
    pub const fn unbounded() -> Self {
        Self {
            max_template_len: usize::MAX,
            max_placeholders: usize::MAX,
            max_identifier_len: usize::MAX,
        }
    }
}
