//! Expansion text generation.

use crate::constants::{EXPANSION_TEXT_SLACK, SPANS_INITIAL_CAPACITY};
use crate::parsing::MacroBody;
use crate::range_map::{MappedSpan, MappedText};

/// An implicit capture to be appended as `name = name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplicitArgument<'a> {
    pub name: &'a str,
    /// Body offset of the identifier inside the template, when the template
    /// spells it byte for byte (no escapes).
    pub source_offset: Option<usize>,
}

/// Generate `name!(<body>, a = a, b = b)` for the given captures.
///
/// Returns `None` when there is nothing to append.
pub fn generate_expansion(
    macro_name: &str,
    body: &MacroBody<'_>,
    captures: &[ImplicitArgument<'_>],
) -> Option<MappedText> {
    if captures.is_empty() {
        return None;
    }

    let mut spans = Vec::with_capacity(SPANS_INITIAL_CAPACITY + 3 * captures.len());
    spans.push(MappedSpan::Synthesized(format!("{macro_name}!(")));
    spans.push(MappedSpan::Verbatim {
        text: body.text(),
        source_offset: 0,
    });

    if body.ends_in_line_comment() {
        spans.push(MappedSpan::Synthesized("\n".to_owned()));
    }

    let mut ends_with_comma = body.ends_with_comma();
    for capture in captures {
        spans.extend(generate_separator(&spans, ends_with_comma));
        ends_with_comma = false;
        spans.extend(generate_named_argument(capture));
    }
    spans.push(MappedSpan::Synthesized(")".to_owned()));

    let capacity = body.text().len()
        + macro_name.len()
        + EXPANSION_TEXT_SLACK
        + captures.iter().map(|c| 2 * c.name.len() + 5).sum::<usize>();
    Some(MappedText::from_spans(spans, capacity))
}

/// Generates what goes between the previous argument and a new one.
///
/// After an existing trailing comma only a space is needed, and not even
/// that when the text already ends with one.
fn generate_separator<'a>(
    spans: &[MappedSpan<'_>],
    ends_with_comma: bool,
) -> Option<MappedSpan<'a>> {
    if !ends_with_comma {
        return Some(MappedSpan::Synthesized(", ".to_owned()));
    }
    let ends_with_space = spans
        .iter()
        .rev()
        .map(MappedSpan::text)
        .find(|text| !text.is_empty())
        .is_some_and(|text| text.ends_with(' '));
    (!ends_with_space).then(|| MappedSpan::Synthesized(" ".to_owned()))
}

/// Generates `name = name`, the value mapped back into the template.
fn generate_named_argument<'a>(capture: &ImplicitArgument<'a>) -> [MappedSpan<'a>; 2] {
    let value = match capture.source_offset {
        Some(source_offset) => MappedSpan::Verbatim {
            text: capture.name,
            source_offset,
        },
        None => MappedSpan::Synthesized(capture.name.to_owned()),
    };
    [MappedSpan::Synthesized(format!("{} = ", capture.name)), value]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(name: &str, offset: usize) -> ImplicitArgument<'_> {
        ImplicitArgument {
            name,
            source_offset: Some(offset),
        }
    }

    fn expand(body: &str, captures: &[ImplicitArgument<'_>]) -> String {
        let body = MacroBody::parse(body).unwrap();
        generate_expansion("format_args", &body, captures)
            .unwrap()
            .text()
            .to_owned()
    }

    #[test]
    fn test_appends_after_last_argument() {
        assert_eq!(
            expand("\"{x}{y}\", 1", &[capture("x", 2), capture("y", 5)]),
            "format_args!(\"{x}{y}\", 1, x = x, y = y)"
        );
    }

    #[test]
    fn test_reuses_trailing_comma() {
        assert_eq!(
            expand("\"{x}{y}\",", &[capture("x", 2), capture("y", 5)]),
            "format_args!(\"{x}{y}\", x = x, y = y)"
        );
        assert_eq!(
            expand("\"{x}\", ", &[capture("x", 2)]),
            "format_args!(\"{x}\", x = x)"
        );
    }

    #[test]
    fn test_line_comment_at_end() {
        assert_eq!(
            expand("\"{x}\" // why", &[capture("x", 2)]),
            "format_args!(\"{x}\" // why\n, x = x)"
        );
    }

    #[test]
    fn test_escaped_identifier_is_synthesized() {
        let body = MacroBody::parse("\"{\\u{78}}\"").unwrap();
        let captures = [ImplicitArgument {
            name: "x",
            source_offset: None,
        }];
        let mapped = generate_expansion("format_args", &body, &captures).unwrap();
        assert_eq!(mapped.text(), "format_args!(\"{\\u{78}}\", x = x)");
        assert_eq!(mapped.ranges().ranges().len(), 1);
    }

    #[test]
    fn test_nothing_to_append() {
        let body = MacroBody::parse("\"{}\", 1").unwrap();
        assert!(generate_expansion("format_args", &body, &[]).is_none());
    }
}
