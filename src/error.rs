//! Failure kinds of an expansion and template diagnostics.

use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// A problem found in a format template.
///
/// `span` is a byte range inside the raw template literal, opening quote
/// included, so `&literal[span]` is the offending source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    message: String,
    span: Range<usize>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message, self.span.start, self.span.end
        )
    }
}

/// Why an invocation was left unexpanded.
///
/// None of these are fatal for the caller: the original invocation text is
/// still valid to display and analyze as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    /// The macro is not one of the recognized format macros.
    #[error("`{0}!` is not a format macro")]
    NotApplicable(String),

    /// The body is not an argument list, or its first argument is not a
    /// string literal.
    #[error("malformed format macro body: {0}")]
    StructuralParse(String),

    /// The template contains malformed placeholders.
    #[error("invalid format string: {} ({} error(s))", first_message(.0), .0.len())]
    TemplateSyntax(Vec<Diagnostic>),

    /// The template is valid but every capture is already explicit.
    #[error("format string has no implicit arguments")]
    NoImplicitArguments,
}

impl ExpansionError {
    /// Template diagnostics, empty for every other failure kind.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::TemplateSyntax(diagnostics) => diagnostics,
            _ => &[],
        }
    }
}

fn first_message(diagnostics: &[Diagnostic]) -> &str {
    diagnostics.first().map_or("", Diagnostic::message)
}

impl From<syn::Error> for ExpansionError {
    fn from(error: syn::Error) -> Self {
        Self::StructuralParse(error.to_string())
    }
}
