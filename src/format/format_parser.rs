use std::ops::Range;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, multispace0, none_of, satisfy},
    combinator::{map, map_res, not, opt, recognize, success, value},
    sequence::{pair, preceded, terminated},
};

use super::literal::CookedLiteral;
use crate::types::{Alignment, Argument, Count, FormatSpec, Placeholder, Selector, Sign};
use crate::validation::{is_identifier_continue, is_identifier_start};

/// Placeholder grammar over the cooked text of a literal.
///
/// Parsers consume slices of `literal.text()`; the position of a slice is
/// recovered from its remaining length, then translated to raw offsets.
pub(crate) struct Grammar<'t> {
    literal: &'t CookedLiteral,
}

impl<'t> Grammar<'t> {
    pub(crate) fn new(literal: &'t CookedLiteral) -> Self {
        Self { literal }
    }

    /// Cooked offset of a suffix of the literal text.
    pub(crate) fn offset(&self, rest: &str) -> usize {
        self.literal.text().len() - rest.len()
    }

    /// Raw range consumed between two suffixes of the literal text.
    fn raw_span(&self, before: &str, after: &str) -> Range<usize> {
        self.literal
            .raw_range(self.offset(before)..self.offset(after))
    }

    /// `'{' [argument] [':' spec] ws* '}'`
    pub(crate) fn placeholder(&self, input: &'t str) -> IResult<&'t str, Placeholder> {
        let (rest, _) = char('{').parse(input)?;
        let (rest, argument) = opt(|i: &'t str| self.argument(i)).parse(rest)?;
        let (rest, spec) = opt(preceded(char(':'), |i: &'t str| self.format_spec(i))).parse(rest)?;
        let (rest, _) = multispace0(rest)?;
        let (rest, _) = char('}').parse(rest)?;

        let placeholder = Placeholder {
            argument,
            spec: spec.unwrap_or_default(),
            span: self.raw_span(input, rest),
        };
        Ok((rest, placeholder))
    }

    fn argument(&self, input: &'t str) -> IResult<&'t str, Argument> {
        let (rest, selector) = alt((
            map(integer, Selector::Index),
            map(identifier, |name: &str| Selector::Name(name.to_owned())),
        ))
        .parse(input)?;

        let argument = Argument {
            selector,
            span: self.raw_span(input, rest),
        };
        Ok((rest, argument))
    }

    /// `[[fill] align] [sign] ['#'] ['0'] [width] ['.' precision] type`
    fn format_spec(&self, input: &'t str) -> IResult<&'t str, FormatSpec> {
        let (rest, (fill, align)) = alt((
            map(pair(none_of("}"), alignment), |(fill, align)| {
                (Some(fill), Some(align))
            }),
            map(alignment, |align| (None, Some(align))),
            success((None, None)),
        ))
        .parse(input)?;
        let (rest, sign) = opt(alt((
            value(Sign::Plus, char('+')),
            value(Sign::Minus, char('-')),
        )))
        .parse(rest)?;
        let (rest, alternate) = opt(char('#')).parse(rest)?;
        // `0$` is a width taken from argument 0, not the zero flag
        let (rest, zero_pad) = opt(terminated(char('0'), not(char('$')))).parse(rest)?;
        let (rest, width) = opt(|i: &'t str| self.count(i)).parse(rest)?;
        let (rest, precision) =
            opt(preceded(char('.'), |i: &'t str| self.precision(i))).parse(rest)?;
        let (rest, format_trait) =
            alt((tag("x?"), tag("X?"), tag("?"), identifier, success(""))).parse(rest)?;

        let spec = FormatSpec {
            fill,
            align,
            sign,
            alternate: alternate.is_some(),
            zero_pad: zero_pad.is_some(),
            width,
            precision,
            format_trait: format_trait.to_owned(),
        };
        Ok((rest, spec))
    }

    /// `argument '$' | integer`
    fn count(&self, input: &'t str) -> IResult<&'t str, Count> {
        alt((
            map(
                terminated(|i: &'t str| self.argument(i), char('$')),
                Count::Parameter,
            ),
            map(integer, Count::Literal),
        ))
        .parse(input)
    }

    /// `count | '*'`
    fn precision(&self, input: &'t str) -> IResult<&'t str, Count> {
        alt((
            |i: &'t str| self.next_argument(i),
            |i: &'t str| self.count(i),
        ))
        .parse(input)
    }

    fn next_argument(&self, input: &'t str) -> IResult<&'t str, Count> {
        let (rest, _) = char('*').parse(input)?;
        Ok((rest, Count::NextArgument(self.raw_span(input, rest))))
    }
}

fn alignment(input: &str) -> IResult<&str, Alignment> {
    alt((
        value(Alignment::Left, char('<')),
        value(Alignment::Center, char('^')),
        value(Alignment::Right, char('>')),
    ))
    .parse(input)
}

fn integer(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>()).parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(is_identifier_start),
        take_while(is_identifier_continue),
    ))
    .parse(input)
}
