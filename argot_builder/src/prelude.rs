//! Traits which, typically, may be imported without concern: `use argot::prelude::*`.

/// Behaviour to offer completion candidates for the partially typed value of an option or parameter.
// Needs to be imported in order to implement a custom `CompletionSource`.
pub trait CompletionSource {
    /// The candidates for `partial`, in the order they should be offered.
    ///
    /// Candidates are complete values; they are not required to start with `partial`.
    fn complete(&self, partial: &str) -> Vec<String>;
}
