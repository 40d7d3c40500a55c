//! Template tokenization with error recovery.

use log::trace;

use crate::config::Limits;
use crate::constants::ELEMENTS_INITIAL_CAPACITY;
use crate::error::Diagnostic;
use crate::format::format_parser::Grammar;
use crate::format::literal::CookedLiteral;
use crate::types::{Argument, Count, Placeholder, Selector, TemplateElement};
use crate::validation::is_valid_identifier;

/// Formatting traits accepted after the `:` of a placeholder.
const FORMAT_TRAITS: &[&str] = &["", "?", "x?", "X?", "o", "x", "X", "p", "b", "e", "E"];

/// Tokenize a decoded template into text/placeholders. Handles `{{`/`}}` escapes.
///
/// Never stops at the first malformed placeholder: each one is reported and
/// scanning resumes after its closing `}`. Only `Limits::max_placeholders`
/// ends the scan early.
pub fn tokenize_template(
    literal: &CookedLiteral,
    limits: &Limits,
) -> (Vec<TemplateElement>, Vec<Diagnostic>) {
    let grammar = Grammar::new(literal);
    let mut elements = Vec::with_capacity(ELEMENTS_INITIAL_CAPACITY);
    let mut diagnostics = Vec::new();
    let mut current_text = String::new();
    let mut placeholders = 0usize;
    let mut rest = literal.text();

    while let Some(position) = rest.find(['{', '}']) {
        current_text.push_str(&rest[..position]);
        rest = &rest[position..];

        if let Some(after) = rest.strip_prefix("{{").or_else(|| rest.strip_prefix("}}")) {
            current_text.push_str(&rest[..1]);
            rest = after;
            continue;
        }

        let at = grammar.offset(rest);
        if rest.starts_with('}') {
            diagnostics.push(Diagnostic::new(
                "invalid format string: unmatched `}` found",
                literal.raw_range(at..at + 1),
            ));
            rest = &rest[1..];
            continue;
        }

        if placeholders >= limits.max_placeholders {
            diagnostics.push(Diagnostic::new(
                format!(
                    "too many placeholders in format string (maximum allowed: {})",
                    limits.max_placeholders
                ),
                literal.raw_range(at..at + 1),
            ));
            break;
        }

        if !current_text.is_empty() {
            elements.push(TemplateElement::Text(std::mem::take(&mut current_text)));
        }

        match grammar.placeholder(rest) {
            Ok((after, placeholder)) => {
                validate_placeholder(&placeholder, limits, &mut diagnostics);
                elements.push(TemplateElement::Placeholder(placeholder));
                placeholders += 1;
                rest = after;
            }
            Err(error) => {
                let failed_at = match &error {
                    nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
                    nom::Err::Incomplete(_) => "",
                };
                diagnostics.push(describe_failure(literal, &grammar, rest, failed_at));
                // resume after the closing brace of the broken placeholder
                rest = match rest[1..].find('}') {
                    Some(close) => &rest[close + 2..],
                    None => "",
                };
                trace!("recovered from malformed placeholder at cooked offset {at}");
            }
        }
    }

    current_text.push_str(rest);
    if !current_text.is_empty() {
        elements.push(TemplateElement::Text(current_text));
    }

    (elements, diagnostics)
}

/// Diagnostic for a placeholder starting at `start` that failed at `failed_at`.
fn describe_failure(
    literal: &CookedLiteral,
    grammar: &Grammar<'_>,
    start: &str,
    failed_at: &str,
) -> Diagnostic {
    let open = grammar.offset(start);
    if !start[1..].contains('}') {
        return Diagnostic::new(
            "invalid format string: expected `}` but string was terminated (unmatched `{`)",
            literal.raw_range(open..open + 1),
        );
    }

    let at = grammar.offset(failed_at);
    let digits = failed_at
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(failed_at.len());
    if digits > 0 && failed_at[..digits].parse::<usize>().is_err() {
        return Diagnostic::new(
            format!(
                "invalid format string: integer `{}` does not fit into usize",
                &failed_at[..digits]
            ),
            literal.raw_range(at..at + digits),
        );
    }

    match failed_at.chars().next() {
        Some(found) => Diagnostic::new(
            format!("invalid format string: expected `}}`, found `{found}`"),
            literal.raw_range(at..at + found.len_utf8()),
        ),
        None => Diagnostic::new(
            "invalid format string: expected `}` but string was terminated",
            literal.raw_range(open..open + 1),
        ),
    }
}

/// Checks the parts of a syntactically valid placeholder that the grammar
/// does not: argument names and the formatting trait.
fn validate_placeholder(
    placeholder: &Placeholder,
    limits: &Limits,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let spec = &placeholder.spec;
    let counts = [&spec.width, &spec.precision];
    let arguments = placeholder
        .argument
        .iter()
        .chain(counts.into_iter().filter_map(|count| match count {
            Some(Count::Parameter(argument)) => Some(argument),
            _ => None,
        }));

    for argument in arguments {
        validate_argument(argument, limits, diagnostics);
    }

    if !FORMAT_TRAITS.contains(&spec.format_trait.as_str()) {
        diagnostics.push(Diagnostic::new(
            format!("unknown format trait `{}`", spec.format_trait),
            placeholder.span.clone(),
        ));
    }
}

fn validate_argument(argument: &Argument, limits: &Limits, diagnostics: &mut Vec<Diagnostic>) {
    let Selector::Name(name) = &argument.selector else {
        return;
    };

    if name.chars().count() > limits.max_identifier_len {
        diagnostics.push(Diagnostic::new(
            format!(
                "argument name too long (>{} characters)",
                limits.max_identifier_len
            ),
            argument.span.clone(),
        ));
    } else if !is_valid_identifier(name) {
        diagnostics.push(Diagnostic::new(
            format!("invalid format string: invalid argument name `{name}`"),
            argument.span.clone(),
        ));
    }
}
