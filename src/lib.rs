//! Expansion of `format_args!`-family invocations for source analysis.
//!
//! Given the name of a macro and the text between its delimiters, this crate
//! rewrites every identifier captured implicitly by the format template
//! (`{name}`, `{:width$}`, ...) into an explicit `name = name` argument, and
//! records which bytes of the rewritten text were copied from the original
//! body.
//!
//! # Architecture
//!
//! Expansion runs in four phases:
//! 1. **Structure**: the body is parsed as an argument list whose first
//!    argument is a string literal
//! 2. **Template**: the literal is decoded and tokenized into text and
//!    placeholders, collecting every diagnostic in one pass
//! 3. **Classification**: placeholders become parameter references; those
//!    bound by an explicit argument are dropped
//! 4. **Rewrite**: the invocation text is rebuilt with the remaining
//!    captures appended, together with its [`RangeMap`]
//!
//! The implementation is organized into focused modules:
//! - `constants`: Limits and allocation hints
//! - `config`: Runtime limits
//! - `types`: Core type definitions
//! - `validation`: Identifier validation
//! - `format`: Literal decoding and the placeholder grammar
//! - `tokenization`: Template tokenization with error recovery
//! - `parsing`: Macro body parsing
//! - `classify`: Parameter classification
//! - `codegen`: Expansion text generation
//! - `range_map`: Offset mapping
//!
//! # Offsets
//!
//! All offsets are byte offsets. Offsets into the body start at the first
//! byte after the opening delimiter. Diagnostic spans are relative to the
//! template literal, opening quote included.
//!
//! # Known Limitations
//!
//! - **Shorthand binding**: a bare identifier argument `x` binds the name
//!   `x`, so `{x}` is not captured again even when `x` is also consumed
//!   positionally.
//! - **Escaped identifiers**: a capture spelled with escapes (`{\u{78}}`)
//!   is appended without a source mapping.
//! - **Span source map**: token offsets come from `proc-macro2`'s
//!   thread-local source map, which is cleared after every parsed body.
//!   Any other `proc_macro2::Span` created on the calling thread is
//!   invalidated along with it, and expansion cannot run inside a
//!   procedural macro.

#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

// ============================================================================
// Module Organization
// ============================================================================

pub mod classify;
mod codegen;
pub mod config;
pub mod constants;
mod error;
pub mod format;
pub mod parsing;
pub mod range_map;
mod tokenization;
pub mod types;
mod validation;

// ============================================================================
// Re-exports for Public API
// ============================================================================

use log::debug;

use codegen::{ImplicitArgument, generate_expansion};
use parsing::MacroBody;

pub use config::Limits;
pub use constants::{EXPANDER_VERSION, FORMAT_MACROS};
pub use error::{Diagnostic, ExpansionError};
pub use range_map::{MappedRange, MappedSpan, MappedText, RangeMap};

// ============================================================================
// Public API
// ============================================================================

/// Whether `name` is one of the macros this crate expands.
pub fn is_format_macro(name: &str) -> bool {
    FORMAT_MACROS.contains(&name)
}

/// Expands `name!(body)` with the default [`Limits`].
///
/// # Examples
///
/// ```
/// let expanded = format_args_expand::expand("format_args", "\"{x} and {y}\", y = 2").unwrap();
/// assert_eq!(expanded.text(), "format_args!(\"{x} and {y}\", y = 2, x = x)");
///
/// // The appended `x` maps back to the `x` inside the template.
/// let appended = expanded.text().len() - 2;
/// assert_eq!(expanded.ranges().map_offset_to_source(appended), Some(2));
/// ```
pub fn expand(name: &str, body: &str) -> Result<MappedText, ExpansionError> {
    FormatMacroExpander::default().expand(name, body)
}

/// A macro call site: the macro name without `!`, and the text between its
/// delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroInvocation<'a> {
    pub name: &'a str,
    pub body: &'a str,
}

impl<'a> MacroInvocation<'a> {
    pub fn new(name: &'a str, body: &'a str) -> Self {
        Self { name, body }
    }

    pub fn expand(&self) -> Result<MappedText, ExpansionError> {
        expand(self.name, self.body)
    }
}

/// Expander carrying its own [`Limits`].
///
/// Holds no state between calls and may be shared between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatMacroExpander {
    limits: Limits,
}

impl FormatMacroExpander {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Version of the expansion output; see [`EXPANDER_VERSION`].
    pub fn version(&self) -> u32 {
        EXPANDER_VERSION
    }

    /// Rewrites implicit captures of `name!(body)` into named arguments.
    ///
    /// # Errors
    ///
    /// - [`ExpansionError::NotApplicable`] if `name` is not a format macro
    /// - [`ExpansionError::StructuralParse`] if `body` is not an argument
    ///   list starting with a string literal
    /// - [`ExpansionError::TemplateSyntax`] if the template is malformed
    /// - [`ExpansionError::NoImplicitArguments`] if nothing needs appending
    pub fn expand(&self, name: &str, body: &str) -> Result<MappedText, ExpansionError> {
        if !is_format_macro(name) {
            debug!("skipping `{name}!`: not a format macro");
            return Err(ExpansionError::NotApplicable(name.to_owned()));
        }

        let parsed = MacroBody::parse(body).inspect_err(|error| {
            debug!("`{name}!` body does not parse: {error}");
        })?;
        let template = parsed.template().ok_or_else(|| {
            ExpansionError::StructuralParse("template literal is outside the body".to_owned())
        })?;

        let parsed_template = format::Template::parse_with_limits(template.raw_text, &self.limits)
            .map_err(|diagnostics| {
                debug!(
                    "`{name}!` template has {} diagnostic(s)",
                    diagnostics.len()
                );
                ExpansionError::TemplateSyntax(diagnostics)
            })?;

        let parameters = classify::resolve(
            classify::classify(parsed_template.placeholders()),
            &parsed.bound_names(),
        );
        let captures: Vec<ImplicitArgument<'_>> = classify::unbound_captures(&parameters)
            .into_iter()
            .filter_map(|parameter| {
                let name = parameter.implicit_name()?;
                let span = parameter.span();
                let source_offset = (template.raw_text.get(span.clone()) == Some(name))
                    .then_some(template.offset_in_body + span.start);
                Some(ImplicitArgument {
                    name,
                    source_offset,
                })
            })
            .collect();

        let expanded = generate_expansion(name, &parsed, &captures).ok_or_else(|| {
            debug!("`{name}!` has no implicit arguments");
            ExpansionError::NoImplicitArguments
        })?;
        debug!(
            "expanded `{name}!` with {} implicit argument(s)",
            captures.len()
        );
        Ok(expanded)
    }
}
