//! Classification of placeholders into parameter references.

use std::collections::HashSet;

use crate::types::{Argument, Count, Parameter, Placeholder, Selector};

/// Turn placeholders into parameter references, in textual order.
///
/// Each placeholder contributes its own argument first, then its width,
/// then its precision. Empty selectors draw from one counter shared by the
/// whole template; a `.*` precision draws from it *before* the value of the
/// same placeholder, matching `std::fmt`.
pub fn classify<'a>(placeholders: impl IntoIterator<Item = &'a Placeholder>) -> Vec<Parameter> {
    let mut next_index = 0usize;
    let mut next_positional = || {
        let index = next_index;
        next_index += 1;
        index
    };

    let mut parameters = Vec::new();
    for placeholder in placeholders {
        let precision = match &placeholder.spec.precision {
            Some(Count::NextArgument(span)) => Some(Parameter::Positional {
                index: next_positional(),
                span: span.clone(),
            }),
            Some(Count::Parameter(argument)) => Some(from_argument(argument)),
            Some(Count::Literal(_)) | None => None,
        };

        let value = match &placeholder.argument {
            Some(argument) => from_argument(argument),
            None => Parameter::Positional {
                index: next_positional(),
                span: placeholder.span.clone(),
            },
        };
        parameters.push(value);

        if let Some(Count::Parameter(argument)) = &placeholder.spec.width {
            parameters.push(from_argument(argument));
        }
        parameters.extend(precision);
    }
    parameters
}

fn from_argument(argument: &Argument) -> Parameter {
    match &argument.selector {
        Selector::Index(index) => Parameter::Positional {
            index: *index,
            span: argument.span.clone(),
        },
        Selector::Name(name) => Parameter::Implicit {
            name: name.clone(),
            span: argument.span.clone(),
        },
    }
}

/// Resolve implicit references against the names bound by explicit
/// arguments: bound ones become [`Parameter::Named`].
pub fn resolve(parameters: Vec<Parameter>, bound: &HashSet<String>) -> Vec<Parameter> {
    parameters
        .into_iter()
        .map(|parameter| match parameter {
            Parameter::Implicit { name, span } if bound.contains(&name) => {
                Parameter::Named { name, span }
            }
            other => other,
        })
        .collect()
}

/// Captures left implicit after [`resolve`], first occurrence of each name
/// only.
pub fn unbound_captures(parameters: &[Parameter]) -> Vec<&Parameter> {
    let mut seen = HashSet::new();
    parameters
        .iter()
        .filter(|parameter| {
            parameter
                .implicit_name()
                .is_some_and(|name| seen.insert(name))
        })
        .collect()
}
