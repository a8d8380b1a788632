use std::any::Any;
use thiserror::Error;

use crate::api::field::ValueParser;

#[derive(Debug, Error, PartialEq, Eq)]
#[doc(hidden)]
pub enum InvalidCapture {
    #[error("cannot convert '{token}' to {type_name}.")]
    InvalidConversion {
        token: String,
        type_name: &'static str,
    },
}

/// Behaviour to capture an implicit generic type T from an input `&str`.
///
/// We use this at the middle/top of the command line object graph so that options and parameters of different types may all be bound by one driver.
pub(crate) trait AnonymousCapturable {
    /// Declare that the slot has been accepted without a value.
    fn matched(&mut self);

    /// Capture a value anonymously for this slot.
    fn capture(&mut self, token: &str) -> Result<(), InvalidCapture>;

    /// The number of times this slot has been accepted.
    fn count(&self) -> usize;

    /// Forget every accepted value.
    fn reset(&mut self);

    fn as_any(&self) -> &dyn Any;
}

/// The bound state of one option or parameter, with its type T intact.
pub(crate) struct Capture<T> {
    parser: ValueParser<T>,
    // Bound when the slot is accepted without a value (flags, options with an optional value).
    fallback: Option<Box<dyn Fn() -> T>>,
    collect: bool,
    value: Option<T>,
    values: Vec<T>,
    count: usize,
}

impl<T> Capture<T> {
    pub(crate) fn single(parser: ValueParser<T>) -> Self {
        Self::new(parser, false)
    }

    pub(crate) fn multiple(parser: ValueParser<T>) -> Self {
        Self::new(parser, true)
    }

    fn new(parser: ValueParser<T>, collect: bool) -> Self {
        Self {
            parser,
            fallback: None,
            collect,
            value: None,
            values: Vec::default(),
            count: 0,
        }
    }

    pub(crate) fn with_fallback(mut self, fallback: impl Fn() -> T + 'static) -> Self {
        self.fallback.replace(Box::new(fallback));
        self
    }

    fn bind(&mut self, value: T) {
        if self.collect {
            self.values.push(value);
        } else {
            self.value.replace(value);
        }

        self.count += 1;
    }

    pub(crate) fn value(&self) -> Option<&T> {
        if self.collect {
            self.values.last()
        } else {
            self.value.as_ref()
        }
    }

    pub(crate) fn values(&self) -> &[T] {
        if self.collect {
            &self.values
        } else {
            match &self.value {
                Some(value) => std::slice::from_ref(value),
                None => &[],
            }
        }
    }
}

impl<T: 'static> AnonymousCapturable for Capture<T> {
    fn matched(&mut self) {
        match &self.fallback {
            Some(fallback) => {
                let value = fallback();
                self.bind(value);
            }
            None => self.count += 1,
        }
    }

    fn capture(&mut self, token: &str) -> Result<(), InvalidCapture> {
        let value = self.parser.parse(token)?;
        self.bind(value);
        Ok(())
    }

    fn count(&self) -> usize {
        self.count
    }

    fn reset(&mut self) {
        self.value = None;
        self.values.clear();
        self.count = 0;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    /// A slot that accepts anything and remembers nothing but the count.
    #[derive(Default)]
    pub(crate) struct BlackHole {
        count: usize,
    }

    impl AnonymousCapturable for BlackHole {
        fn matched(&mut self) {
            self.count += 1;
        }

        fn capture(&mut self, _token: &str) -> Result<(), InvalidCapture> {
            self.count += 1;
            Ok(())
        }

        fn count(&self) -> usize {
            self.count
        }

        fn reset(&mut self) {
            self.count = 0;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }
}
