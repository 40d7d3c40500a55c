//! Format template parsing.
//!
//! A [`Template`] is parsed from the *source* text of the literal, quotes
//! included, so that every span it reports can be used against the macro
//! body directly once shifted by the literal's offset.

use crate::config::Limits;
use crate::error::Diagnostic;
use crate::tokenization::tokenize_template;
use crate::types::{Placeholder, TemplateElement};

pub(crate) mod format_parser;
pub mod literal;

/// A parsed format template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    elements: Vec<TemplateElement>,
}

impl Template {
    /// Parses `raw` with the default [`Limits`].
    pub fn parse(raw: &str) -> Result<Self, Vec<Diagnostic>> {
        Self::parse_with_limits(raw, &Limits::default())
    }

    /// Parses `raw`, the literal source text (`"..."` or `r#"..."#`).
    ///
    /// Either every element parsed cleanly, or the full list of diagnostics
    /// found in one pass is returned.
    pub fn parse_with_limits(raw: &str, limits: &Limits) -> Result<Self, Vec<Diagnostic>> {
        if raw.len() > limits.max_template_len {
            return Err(vec![Diagnostic::new(
                format!(
                    "format string too long ({} bytes). Maximum allowed: {} bytes",
                    raw.len(),
                    limits.max_template_len
                ),
                0..raw.len(),
            )]);
        }

        let (cooked, mut diagnostics) = literal::decode(raw);
        if diagnostics.is_empty() || !cooked.text().is_empty() {
            let (elements, template_diagnostics) = tokenize_template(&cooked, limits);
            diagnostics.extend(template_diagnostics);
            if diagnostics.is_empty() {
                return Ok(Self { elements });
            }
        }
        diagnostics.sort_by_key(|diagnostic| diagnostic.span().start);
        Err(diagnostics)
    }

    pub fn elements(&self) -> &[TemplateElement] {
        &self.elements
    }

    /// Placeholders in textual order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.elements.iter().filter_map(|element| match element {
            TemplateElement::Placeholder(placeholder) => Some(placeholder),
            TemplateElement::Text(_) => None,
        })
    }
}
