use crate::model::{CommandId, OptionKey};

/// One classified Cli token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// `-x`, one character of `-xyz`, or `-x=value`.
    ShortOption {
        option: OptionKey,
        name: char,
        value: Option<&'a str>,
    },
    /// `--name` or `--name=value`.
    LongOption {
        option: OptionKey,
        name: &'a str,
        value: Option<&'a str>,
    },
    UnrecognizedShortOption(char),
    UnrecognizedLongOption(&'a str),
    /// `--`: no option is recognized after this.
    Terminator,
    /// The active command moved to this sub-command.
    Command(CommandId),
    /// Text for the next positional parameter.
    Parameter(&'a str),
}

impl<'a> Token<'a> {
    /// The option as the user typed it (ex: `-x` or `--name`).
    pub(crate) fn option_text(&self) -> Option<String> {
        match self {
            Token::ShortOption { name, .. } | Token::UnrecognizedShortOption(name) => {
                Some(format!("-{name}"))
            }
            Token::LongOption { name, .. } | Token::UnrecognizedLongOption(name) => {
                Some(format!("--{name}"))
            }
            _ => None,
        }
    }
}

/// The classification state carried from one argument to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClassifyState {
    /// The command whose options and sub-commands are in effect.
    pub(crate) command: CommandId,
    /// Set once `--` is seen.
    pub(crate) options_terminated: bool,
    /// Set once sub-command names are no longer matched.
    pub(crate) command_determined: bool,
}

impl ClassifyState {
    pub(crate) fn new(root: CommandId) -> Self {
        Self {
            command: root,
            options_terminated: false,
            command_determined: false,
        }
    }
}

/// The not yet classified characters of a bundled short option argument (ex: the `yz` of `-xyz`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingShorts<'a> {
    pub(crate) argument: &'a str,
    // Byte offset of the next character to classify.
    pub(crate) offset: usize,
}

impl<'a> PendingShorts<'a> {
    pub(crate) fn remaining(&self) -> &'a str {
        &self.argument[self.offset..]
    }
}
