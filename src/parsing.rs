//! Macro body parsing and explicit-argument collection.

use std::collections::HashSet;
use std::ops::Range;

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{anychar, multispace1},
    combinator::{not, recognize, value},
    multi::{many0, many0_count},
    sequence::{delimited, pair, preceded},
};
use proc_macro2::{Span, TokenStream, TokenTree};
use syn::{
    Expr, ExprLit, Lit, LitStr, Token,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    token::Comma,
};

use crate::error::ExpansionError;
use crate::types::{ExplicitArgument, TemplateLiteral};

/// Format macro arguments: template, args
pub struct FormatArgs {
    pub format: LitStr,
    pub args: Punctuated<Expr, Comma>,
}

impl Parse for FormatArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let format = match input.parse::<Expr>()? {
            Expr::Lit(ExprLit {
                lit: Lit::Str(format),
                ..
            }) => format,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "format argument must be a string literal",
                ));
            }
        };

        let args = if input.is_empty() {
            Punctuated::new()
        } else {
            input.parse::<Token![,]>()?;
            Punctuated::parse_terminated(input)?
        };

        Ok(Self { format, args })
    }
}

/// The text between the delimiters of a format macro call, parsed.
///
/// Every offset is a byte offset into `text`, resolved while parsing; no
/// token spans outlive [`MacroBody::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroBody<'a> {
    text: &'a str,
    template: Range<usize>,
    arguments: Vec<ExplicitArgument>,
    ends_with_comma: bool,
    /// Start of the whitespace/comments after the last token.
    trailing_trivia: usize,
}

impl<'a> MacroBody<'a> {
    /// Parses `text` as `"template", args...`.
    ///
    /// Token locations live in `proc-macro2`'s thread-local source map only
    /// for the duration of this call: the map is cleared before returning,
    /// so no span of the current thread stays valid afterwards.
    pub fn parse(text: &'a str) -> Result<Self, ExpansionError> {
        let parsed = Self::parse_tokens(text).map_err(ExpansionError::from);
        proc_macro2::extra::invalidate_current_thread_spans();
        parsed
    }

    fn parse_tokens(text: &'a str) -> syn::Result<Self> {
        let tokens: TokenStream = text
            .parse()
            .map_err(|error| syn::Error::new(Span::call_site(), error))?;

        let last = tokens.clone().into_iter().last();
        let ends_with_comma = matches!(&last, Some(TokenTree::Punct(punct)) if punct.as_char() == ',');
        let trailing_trivia = last.map_or(0, |token| token.span().byte_range().end);

        let args = syn::parse2::<FormatArgs>(tokens)?;
        let arguments = args
            .args
            .iter()
            .map(|expr| ExplicitArgument {
                name: bound_name(expr),
                offset: expr.span().byte_range().start,
            })
            .collect();

        Ok(Self {
            text,
            template: args.format.span().byte_range(),
            arguments,
            ends_with_comma,
            trailing_trivia,
        })
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The template literal, located in the body text.
    pub fn template(&self) -> Option<TemplateLiteral<'a>> {
        let raw_text = self.text.get(self.template.clone())?;
        Some(TemplateLiteral {
            raw_text,
            offset_in_body: self.template.start,
        })
    }

    /// Every argument after the template, with its bound name if any.
    pub fn explicit_arguments(&self) -> &[ExplicitArgument] {
        &self.arguments
    }

    /// Names bound by `name = expr` or shorthand `name` arguments.
    pub fn bound_names(&self) -> HashSet<String> {
        self.arguments
            .iter()
            .filter_map(|argument| argument.name.clone())
            .collect()
    }

    /// Whether the last token of the body is a comma.
    pub fn ends_with_comma(&self) -> bool {
        self.ends_with_comma
    }

    /// Whether the body ends inside a `//` comment, so that appended text
    /// would be commented out unless it starts on a new line.
    pub fn ends_in_line_comment(&self) -> bool {
        self.text
            .get(self.trailing_trivia..)
            .is_some_and(ends_in_line_comment)
    }
}

fn bound_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Assign(assign) => path_identifier(&assign.left),
        other => path_identifier(other),
    }
}

fn path_identifier(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Path(path) if path.qself.is_none() => path
            .path
            .get_ident()
            .map(|ident| ident.unraw().to_string()),
        _ => None,
    }
}

/// Whether the last piece of `trivia` (whitespace and comments only) is a
/// line comment.
fn ends_in_line_comment(trivia: &str) -> bool {
    many0(alt((
        value(false, multispace1),
        value(false, block_comment),
        value(true, line_comment),
    )))
    .parse(trivia)
    .is_ok_and(|(rest, pieces)| rest.is_empty() && pieces.last() == Some(&true))
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), take_till(|c| c == '\n'))).parse(input)
}

/// `/* ... */`, nesting like Rust block comments.
fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        tag("/*"),
        many0_count(alt((
            block_comment,
            recognize(preceded(not(alt((tag("/*"), tag("*/")))), anychar)),
        ))),
        tag("*/"),
    ))
    .parse(input)
}
