pub(crate) mod capture;
mod core;
mod field;
mod parameter;

pub use self::core::*;
pub(crate) use capture::*;
pub use field::Choices;
pub use parameter::*;
