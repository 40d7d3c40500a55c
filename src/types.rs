//! Core types for template parsing and classification.
//!
//! Every span in this module is a byte range into the *raw* template literal,
//! opening quote included. For `"{x}"` the identifier `x` has span `2..3`.

use std::ops::Range;

/// Selector written in a placeholder, or in a `$`-terminated width/precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// An explicit positional index, e.g. `{1}` or `{:1$}`.
    Index(usize),
    /// An identifier, e.g. `{name}` or `{:width$}`.
    Name(String),
}

/// A selector together with its location in the literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub selector: Selector,
    pub span: Range<usize>,
}

/// Width or precision of a format spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Count {
    /// A literal number, e.g. `{:5}`.
    Literal(usize),
    /// Taken from an argument, e.g. `{:w$}` or `{:.1$}`.
    Parameter(Argument),
    /// `.*`: precision taken from the next positional argument.
    NextArgument(Range<usize>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

/// Everything after the `:` of a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatSpec {
    pub fill: Option<char>,
    pub align: Option<Alignment>,
    pub sign: Option<Sign>,
    pub alternate: bool,
    pub zero_pad: bool,
    pub width: Option<Count>,
    pub precision: Option<Count>,
    /// Formatting trait selector: `""` (Display), `"?"`, `"x"`, ...
    pub format_trait: String,
}

/// A `{...}` placeholder of the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// `None` for `{}` and `{:...}`.
    pub argument: Option<Argument>,
    pub spec: FormatSpec,
    /// The whole placeholder, braces included.
    pub span: Range<usize>,
}

/// One element of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateElement {
    /// Literal text after unescaping, `{{` and `}}` already collapsed.
    Text(String),
    Placeholder(Placeholder),
}

/// A parameter reference made by the template.
///
/// Produced by [`crate::classify::classify`] in textual order; `Named` only
/// appears once references have been resolved against the explicit
/// argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// Consumes the explicit positional argument at `index`.
    Positional { index: usize, span: Range<usize> },
    /// Matches an explicit `name = expr` (or shorthand `name`) argument.
    Named { name: String, span: Range<usize> },
    /// An identifier captured from the enclosing scope.
    Implicit { name: String, span: Range<usize> },
}

impl Parameter {
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Positional { span, .. } | Self::Named { span, .. } | Self::Implicit { span, .. } => {
                span.clone()
            }
        }
    }

    /// The captured identifier, if this is an implicit capture.
    pub fn implicit_name(&self) -> Option<&str> {
        match self {
            Self::Implicit { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// The template argument of a format macro as it appears in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateLiteral<'a> {
    /// Literal source text, quotes included.
    pub raw_text: &'a str,
    /// Byte offset of `raw_text` inside the macro body.
    pub offset_in_body: usize,
}

/// One argument following the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitArgument {
    /// Bound name for `name = expr` and shorthand `name` arguments.
    pub name: Option<String>,
    /// Byte offset of the argument inside the macro body.
    pub offset: usize,
}
