use std::str::FromStr;

use crate::api::capture::InvalidCapture;
use crate::prelude::CompletionSource;

/// Converts the text of one Cli token into a `T`.
pub(crate) struct ValueParser<T> {
    parse: Box<dyn Fn(&str) -> Option<T>>,
    type_name: &'static str,
}

impl<T: FromStr + 'static> ValueParser<T> {
    pub(crate) fn from_str() -> Self {
        Self {
            parse: Box::new(|token| T::from_str(token).ok()),
            type_name: std::any::type_name::<T>(),
        }
    }
}

impl<T> ValueParser<T> {
    pub(crate) fn custom(parse: impl Fn(&str) -> Option<T> + 'static) -> Self {
        Self {
            parse: Box::new(parse),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub(crate) fn parse(&self, token: &str) -> Result<T, InvalidCapture> {
        (self.parse)(token).ok_or_else(|| InvalidCapture::InvalidConversion {
            token: token.to_string(),
            type_name: self.type_name,
        })
    }
}

/// A fixed set of completion candidates, offered when they start with the partial text.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{prelude::*, Choices};
///
/// let colours = Choices::new(["red", "green", "grey"]);
/// assert_eq!(colours.complete("gr"), vec!["green".to_string(), "grey".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choices {
    candidates: Vec<String>,
}

impl Choices {
    /// Create the choices, in the order they should be offered.
    pub fn new<S: Into<String>>(candidates: impl IntoIterator<Item = S>) -> Self {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

impl CompletionSource for Choices {
    fn complete(&self, partial: &str) -> Vec<String> {
        self.candidates
            .iter()
            .filter(|candidate| candidate.starts_with(partial))
            .cloned()
            .collect()
    }
}

impl<F> CompletionSource for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn complete(&self, partial: &str) -> Vec<String> {
        self(partial)
    }
}
