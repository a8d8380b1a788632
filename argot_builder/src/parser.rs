mod base;
mod completion;
mod interface;
mod middleware;
mod printer;

pub(crate) use self::base::*;
pub(crate) use self::printer::*;
pub use self::base::{ConfigError, InvalidCommandLine, ParseErrorKind};
pub use self::interface::{ConsoleInterface, UserInterface};

#[cfg(test)]
pub(crate) use self::interface::util;
