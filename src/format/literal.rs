//! Decoding of string literal source text.
//!
//! The template parser works on the literal's *value* (escapes resolved),
//! but every location it reports must point into the literal's *source*.
//! [`CookedLiteral`] keeps both views: the decoded text and, for every
//! decoded byte, the raw range of the source character it came from.

use std::ops::Range;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while_m_n, take_while1},
    character::complete::{anychar, char, multispace0, none_of, one_of},
    combinator::{map, map_opt, opt, recognize, success, value, verify},
    multi::many0_count,
    sequence::{delimited, pair, preceded, terminated},
};

use crate::error::Diagnostic;

/// Decoded value of a string literal with a cooked-to-raw offset table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookedLiteral {
    text: String,
    /// Raw start of the source character behind each cooked byte.
    starts: Vec<usize>,
    /// Raw end of the source character behind each cooked byte.
    ends: Vec<usize>,
    /// Raw offset of the closing delimiter.
    end: usize,
}

impl CookedLiteral {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
            starts: Vec::with_capacity(capacity),
            ends: Vec::with_capacity(capacity),
            end: 0,
        }
    }

    fn push(&mut self, c: char, raw: Range<usize>) {
        self.text.push(c);
        for _ in 0..c.len_utf8() {
            self.starts.push(raw.start);
            self.ends.push(raw.end);
        }
    }

    /// The decoded literal value.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw offset of the cooked byte at `cooked`; the closing delimiter for
    /// the end of the text.
    pub fn raw_offset(&self, cooked: usize) -> usize {
        self.starts.get(cooked).copied().unwrap_or(self.end)
    }

    /// Raw source range covering the cooked range `cooked`.
    pub fn raw_range(&self, cooked: Range<usize>) -> Range<usize> {
        let start = self.raw_offset(cooked.start);
        if cooked.is_empty() {
            return start..start;
        }
        let end = self
            .ends
            .get(cooked.end - 1)
            .copied()
            .unwrap_or(self.end);
        start..end
    }
}

/// Decode the raw source of a string literal.
///
/// Accepts `"..."` and raw `r"..."` / `r#"..."#` literals. Problems are
/// reported as diagnostics against the raw text; decoding goes on past a
/// bad escape so that all of them are reported at once.
pub fn decode(raw: &str) -> (CookedLiteral, Vec<Diagnostic>) {
    let mut cooked = CookedLiteral::with_capacity(raw.len());

    let delimiters = match delimit(raw) {
        Ok(delimiters) => delimiters,
        Err(diagnostic) => {
            cooked.end = raw.len();
            return (cooked, vec![diagnostic]);
        }
    };
    let base = raw.len() - delimiters.after_open.len();
    cooked.end = base + delimiters.content.len();

    let mut diagnostics = Vec::new();
    if delimiters.is_raw {
        for (i, c) in delimiters.content.char_indices() {
            cooked.push(c, base + i..base + i + c.len_utf8());
        }
    } else {
        unescape(delimiters.content, base, &mut cooked, &mut diagnostics);
    }

    if !delimiters.suffix.is_empty() {
        let suffix_start = raw.len() - delimiters.suffix.len();
        diagnostics.push(Diagnostic::new(
            format!("unexpected suffix `{}` on format string", delimiters.suffix),
            suffix_start..raw.len(),
        ));
    }

    (cooked, diagnostics)
}

struct Delimiters<'r> {
    /// Everything after the opening delimiter.
    after_open: &'r str,
    content: &'r str,
    suffix: &'r str,
    is_raw: bool,
}

fn delimit(raw: &str) -> Result<Delimiters<'_>, Diagnostic> {
    let (after_open, hashes) = opening(raw).map_err(|_| {
        Diagnostic::new("format argument must be a string literal", 0..raw.len())
    })?;

    let closed = match hashes {
        Some(hashes) => raw_content(after_open, hashes),
        None => quoted_content(after_open),
    };
    let (suffix, content) =
        closed.map_err(|_| Diagnostic::new("unterminated string literal", 0..raw.len()))?;

    Ok(Delimiters {
        after_open,
        content,
        suffix,
        is_raw: hashes.is_some(),
    })
}

/// `"` or `r#*"`; the number of `#` for raw literals.
fn opening(input: &str) -> IResult<&str, Option<usize>> {
    alt((
        map(delimited(char('r'), many0_count(char('#')), char('"')), Some),
        value(None, char('"')),
    ))
    .parse(input)
}

/// Raw literal content up to `"` followed by `hashes` times `#`.
fn raw_content(input: &str, hashes: usize) -> IResult<&str, &str> {
    let closing = format!("\"{}", "#".repeat(hashes));
    terminated(take_until(closing.as_str()), tag(closing.as_str())).parse(input)
}

/// Content up to the first unescaped `"`.
fn quoted_content(input: &str) -> IResult<&str, &str> {
    terminated(
        recognize(many0_count(alt((
            recognize(pair(char('\\'), anychar)),
            recognize(none_of("\\\"")),
        )))),
        char('"'),
    )
    .parse(input)
}

/// One decoded unit of quoted literal content.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    Char(char),
    /// `\` + newline: the newline and the whitespace after it are dropped.
    Continuation,
    Invalid(String),
}

fn unescape(
    content: &str,
    base: usize,
    cooked: &mut CookedLiteral,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let offset = |rest: &str| base + content.len() - rest.len();

    let mut rest = content;
    while let Ok((after, piece)) = fragment(rest) {
        let raw = offset(rest)..offset(after);
        match piece {
            Fragment::Char(c) => cooked.push(c, raw),
            Fragment::Continuation => {}
            Fragment::Invalid(message) => diagnostics.push(Diagnostic::new(message, raw)),
        }
        rest = after;
    }
}

fn fragment(input: &str) -> IResult<&str, Fragment> {
    alt((
        map(none_of("\\"), Fragment::Char),
        preceded(char('\\'), escape),
    ))
    .parse(input)
}

/// Everything after a backslash. Never fails: an unknown escape becomes
/// [`Fragment::Invalid`] covering what was consumed.
fn escape(input: &str) -> IResult<&str, Fragment> {
    alt((
        map(simple_escape, Fragment::Char),
        preceded(char('x'), hex_escape),
        preceded(char('u'), unicode_escape),
        value(
            Fragment::Continuation,
            preceded(one_of("\r\n"), multispace0),
        ),
        map(anychar, |c| {
            Fragment::Invalid(format!("unknown character escape: `{}`", c.escape_default()))
        }),
        success(Fragment::Invalid("incomplete escape".to_owned())),
    ))
    .parse(input)
}

fn simple_escape(input: &str) -> IResult<&str, char> {
    map(one_of("nrt\\0'\""), |c| match c {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        '0' => '\0',
        other => other,
    })
    .parse(input)
}

/// `XX` of `\xXX`: two hex digits, at most `7F`.
fn hex_escape(input: &str) -> IResult<&str, Fragment> {
    alt((
        map(
            take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
            |digits: &str| match u8::from_str_radix(digits, 16) {
                Ok(value) if value <= 0x7F => Fragment::Char(char::from(value)),
                _ => Fragment::Invalid("out of range hex escape".to_owned()),
            },
        ),
        map(
            take_while_m_n(0, 1, |c: char| c.is_ascii_hexdigit()),
            |_| Fragment::Invalid("numeric character escape is too short".to_owned()),
        ),
    ))
    .parse(input)
}

/// `{XXXX}` of `\u{XXXX}`: 1 to 6 hex digits, `_` separators allowed after
/// the first, naming a Unicode scalar value.
fn unicode_escape(input: &str) -> IResult<&str, Fragment> {
    let is_digit = |c: char| c.is_ascii_hexdigit() || c == '_';
    alt((
        map(
            map_opt(
                delimited(
                    char('{'),
                    verify(take_while1(is_digit), |digits: &str| {
                        !digits.starts_with('_')
                    }),
                    char('}'),
                ),
                scalar_value,
            ),
            Fragment::Char,
        ),
        map(
            recognize(opt(preceded(
                char('{'),
                pair(take_while(is_digit), opt(char('}'))),
            ))),
            |_| Fragment::Invalid("invalid unicode character escape".to_owned()),
        ),
    ))
    .parse(input)
}

fn scalar_value(digits: &str) -> Option<char> {
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if digits.len() > 6 {
        return None;
    }
    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_literal_offsets() {
        let (cooked, diagnostics) = decode(r#""a{x}""#);
        assert!(diagnostics.is_empty());
        assert_eq!(cooked.text(), "a{x}");
        assert_eq!(cooked.raw_offset(0), 1);
        assert_eq!(cooked.raw_range(2..3), 3..4);
        assert_eq!(cooked.raw_offset(4), 5);
    }

    #[test]
    fn test_escapes_shift_offsets() {
        let (cooked, diagnostics) = decode(r#""\n\u{7B}x}""#);
        assert!(diagnostics.is_empty());
        assert_eq!(cooked.text(), "\n{x}");
        // `\n` covers raw 1..3, `\u{7B}` covers raw 3..9
        assert_eq!(cooked.raw_range(0..1), 1..3);
        assert_eq!(cooked.raw_range(1..2), 3..9);
        assert_eq!(cooked.raw_range(2..3), 9..10);
    }

    #[test]
    fn test_raw_literal() {
        let (cooked, diagnostics) = decode(r###"r#"{x}\n"#"###);
        assert!(diagnostics.is_empty());
        assert_eq!(cooked.text(), r"{x}\n");
        assert_eq!(cooked.raw_range(1..2), 4..5);
    }

    #[test]
    fn test_line_continuation() {
        let (cooked, diagnostics) = decode("\"a\\\n    b\"");
        assert!(diagnostics.is_empty());
        assert_eq!(cooked.text(), "ab");
        assert_eq!(cooked.raw_offset(1), 8);
    }

    #[test]
    fn test_invalid_escapes_are_all_reported() {
        let (cooked, diagnostics) = decode(r#""\q\x80\u{110000}ok""#);
        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics[0].span(), 1..3);
        assert_eq!(diagnostics[1].message(), "out of range hex escape");
        assert_eq!(cooked.text(), "ok");
    }

    #[test]
    fn test_not_a_string() {
        let (_, diagnostics) = decode("b\"x\"");
        assert_eq!(diagnostics.len(), 1);
        let (_, diagnostics) = decode("\"open");
        assert_eq!(diagnostics[0].message(), "unterminated string literal");
    }

    #[test]
    fn test_suffix_rejected() {
        let (cooked, diagnostics) = decode("\"x\"suffix");
        assert_eq!(cooked.text(), "x");
        assert_eq!(diagnostics[0].span(), 3..9);
    }

    #[test]
    fn test_unicode_escape_forms() {
        let (cooked, diagnostics) = decode(r#""\u{1_F6_00}\u{e9}""#);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(cooked.text(), "\u{1F600}\u{e9}");
        assert_eq!(cooked.raw_range(0..4), 1..12);

        let (_, diagnostics) = decode(r#""\u{_1}\u{1234567}\u{}\u12""#);
        assert_eq!(diagnostics.len(), 4);
        assert!(
            diagnostics
                .iter()
                .all(|d| d.message() == "invalid unicode character escape")
        );
        assert_eq!(diagnostics[0].span(), 1..7);
    }

    #[test]
    fn test_short_hex_escape() {
        let (cooked, diagnostics) = decode(r#""\x7\x41""#);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message(),
            "numeric character escape is too short"
        );
        assert_eq!(diagnostics[0].span(), 1..4);
        assert_eq!(cooked.text(), "A");
    }

    #[test]
    fn test_crlf_line_continuation() {
        let (cooked, diagnostics) = decode("\"a\\\r\n\tb\"");
        assert!(diagnostics.is_empty());
        assert_eq!(cooked.text(), "ab");
        assert_eq!(cooked.raw_offset(1), 6);
    }
}
