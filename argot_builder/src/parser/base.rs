use thiserror::Error;

use crate::api::{AnonymousCapturable, Capture};
use crate::matcher::{Classifier, Token};
use crate::model::*;
use crate::schema::{ParameterNode, Schema};
use crate::wildcard;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A mistake in the configuration of a [`CommandLine`](crate::CommandLine).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The command id was created by another command line.
    #[error("Config error: the command {0:?} does not belong to this command line.")]
    UnknownCommand(CommandId),

    /// The option id was created by another command line.
    #[error("Config error: the option does not belong to this command line.")]
    UnknownOption,

    /// The command name is empty or contains whitespace.
    #[error("Config error: command names must not be empty or contain whitespace: '{0}'.")]
    InvalidCommandName(String),

    /// A sibling command already has this name.
    #[error("Config error: cannot duplicate the command '{0}'.")]
    DuplicateCommand(String),

    /// The option has neither a short nor a long name.
    #[error("Config error: an option must have a short or long name.")]
    UnnamedOption,

    /// The short name is whitespace, `-` or `=`.
    #[error("Config error: invalid short option '{0}'.")]
    InvalidShortName(char),

    /// The long name is empty, or contains whitespace or `=`.
    #[error("Config error: invalid long option '{0}'.")]
    InvalidLongName(String),

    /// The short name clashes with another option visible on the same command.
    #[error("Config error: cannot duplicate the short option '-{0}'.")]
    DuplicateShortOption(char),

    /// The long name clashes with another option visible on the same command.
    #[error("Config error: cannot duplicate the long option '--{0}'.")]
    DuplicateLongOption(String),

    /// The parameter name is empty.
    #[error("Config error: parameter names must not be empty.")]
    UnnamedParameter,

    /// A parameter was added after a variadic parameter.
    #[error("Config error: parameter '{0}' cannot follow the variadic parameter '{1}'.")]
    ParameterAfterVariadic(String, String),

    /// The designated help/verbose option is not a flag visible on the command.
    #[error("Config error: option '{0}' must be a flag visible on command '{1}'.")]
    InvalidDesignation(String, String),
}

/// The reason a command line was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No option visible on the active command has this name.
    #[error("Unrecognized option \"{0}\".")]
    UnrecognizedOption(String),

    /// A value-taking option was given no value.
    #[error("Missing value for option \"{0}\".")]
    MissingValue(String),

    /// A flag was given an inline value.
    #[error("Unexpected value \"{value}\" for option \"{option}\".")]
    UnexpectedValue {
        /// The flag's name, as specified.
        option: String,
        /// The inline value.
        value: String,
    },

    /// The option's value could not be converted.
    #[error("Invalid value \"{value}\" for option \"{option}\".")]
    InvalidValue {
        /// The option's name, as specified.
        option: String,
        /// The rejected value.
        value: String,
    },

    /// Positional text beyond the declared parameters.
    #[error("Unexpected argument \"{0}\".")]
    UnexpectedArgument(String),

    /// The parameter's value could not be converted.
    #[error("Invalid argument \"{value}\" for parameter \"{parameter}\".")]
    InvalidArgument {
        /// The parameter's name, upper cased.
        parameter: String,
        /// The rejected value (after any wildcard expansion).
        value: String,
    },

    /// A required option was not specified.
    #[error("Missing required option \"{0}\".")]
    MissingRequiredOption(String),

    /// A required parameter received no value.
    #[error("Expected additional arguments.")]
    ExpectedAdditionalArguments,
}

/// A command line rejected by the parser, along with the command that was active at the time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct InvalidCommandLine {
    command: CommandId,
    kind: ParseErrorKind,
}

impl InvalidCommandLine {
    pub(crate) fn new(command: CommandId, kind: ParseErrorKind) -> Self {
        Self { command, kind }
    }

    /// The command active when the error was detected.
    pub fn command(&self) -> CommandId {
        self.command
    }

    /// Why the command line was rejected.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

/// The bound state of every option and parameter, addressed by the same keys as the [`Schema`].
///
/// Kept apart from the schema so the classifier may borrow the schema while slots are bound.
#[derive(Default)]
pub(crate) struct Captures {
    pub(crate) options: Vec<Box<dyn AnonymousCapturable>>,
    pub(crate) parameters: Vec<Box<dyn AnonymousCapturable>>,
}

impl Captures {
    pub(crate) fn option(&self, key: OptionKey) -> &dyn AnonymousCapturable {
        self.options[key.0].as_ref()
    }

    pub(crate) fn parameter(&self, key: ParameterKey) -> &dyn AnonymousCapturable {
        self.parameters[key.0].as_ref()
    }

    pub(crate) fn slot(&self, key: SlotKey) -> &dyn AnonymousCapturable {
        match key {
            SlotKey::Option(i) => self.options[i].as_ref(),
            SlotKey::Parameter(i) => self.parameters[i].as_ref(),
        }
    }

    /// The typed slot behind `key`.
    pub(crate) fn typed<T: 'static>(&self, key: SlotKey) -> &Capture<T> {
        self.slot(key)
            .as_any()
            .downcast_ref::<Capture<T>>()
            .expect("internal error - slot type must match its typed id")
    }

    /// Forget the bound state of `command` and every command below it.
    pub(crate) fn reset(&mut self, schema: &Schema, command: CommandId) {
        let node = schema.command(command);

        for key in &node.options {
            self.options[key.0].reset();
        }

        for key in &node.parameters {
            self.parameters[key.0].reset();
        }

        for child in &node.commands {
            self.reset(schema, *child);
        }
    }
}

/// Which declared parameter of the active command receives the next positional text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParameterCursor {
    /// No positional text has been seen yet.
    Unclaimed,
    /// The index (into the command's parameters) of the parameter claimed last.
    Claimed(usize),
    /// Every declared parameter has been claimed (and the last is not variadic).
    Exhausted,
}

impl ParameterCursor {
    /// Move to the parameter for the next positional text.
    pub(crate) fn advance(self, schema: &Schema, command: CommandId) -> Self {
        let parameters = &schema.command(command).parameters;

        match self {
            ParameterCursor::Unclaimed => {
                if parameters.is_empty() {
                    ParameterCursor::Exhausted
                } else {
                    ParameterCursor::Claimed(0)
                }
            }
            ParameterCursor::Claimed(i) => {
                if schema.parameter(parameters[i]).variadic {
                    ParameterCursor::Claimed(i)
                } else if i + 1 < parameters.len() {
                    ParameterCursor::Claimed(i + 1)
                } else {
                    ParameterCursor::Exhausted
                }
            }
            ParameterCursor::Exhausted => ParameterCursor::Exhausted,
        }
    }

    pub(crate) fn parameter(&self, schema: &Schema, command: CommandId) -> Option<ParameterKey> {
        match self {
            ParameterCursor::Claimed(i) => Some(schema.command(command).parameters[*i]),
            ParameterCursor::Unclaimed | ParameterCursor::Exhausted => None,
        }
    }
}

/// What to do once the arguments are bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The help option was specified.
    Help { command: CommandId, verbose: bool },
    /// Nothing (but perhaps the verbose option) was specified for a command that requires parameters.
    ImplicitHelp { command: CommandId, verbose: bool },
    /// Run the command.
    Invoke { command: CommandId },
}

/// Bind `arguments` into `captures`, then decide the [`Outcome`].
///
/// The first error aborts the scan; the slots keep whatever was bound up to that point.
pub(crate) fn bind(
    schema: &Schema,
    captures: &mut Captures,
    arguments: &[&str],
) -> Result<Outcome, InvalidCommandLine> {
    let mut classifier = Classifier::new(schema);
    let mut cursor = ParameterCursor::Unclaimed;
    let mut index = 0;

    while index < arguments.len() {
        let mut token = classifier.classify(arguments[index]);

        loop {
            let command = classifier.state().command;
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Binding {token:?} on '{}'.", schema.command(command).name);
            }

            match token {
                Token::UnrecognizedShortOption(_) | Token::UnrecognizedLongOption(_) => {
                    return Err(InvalidCommandLine::new(
                        command,
                        ParseErrorKind::UnrecognizedOption(option_text(&token)),
                    ));
                }
                Token::ShortOption { option, value, .. } | Token::LongOption { option, value, .. } => {
                    let kind = &schema.option(option).kind;
                    let capture = captures.options[option.0].as_mut();

                    if !kind.is_parameterized() {
                        if let Some(value) = value {
                            return Err(InvalidCommandLine::new(
                                command,
                                ParseErrorKind::UnexpectedValue {
                                    option: option_text(&token),
                                    value: value.to_string(),
                                },
                            ));
                        }

                        capture.matched();
                    } else if value.is_none() && kind.is_value_optional() {
                        capture.matched();
                    } else {
                        let value = match value {
                            Some(value) => value,
                            // A bundled short option cannot take the following argument.
                            None if classifier.has_pending_shorts() => {
                                return Err(InvalidCommandLine::new(
                                    command,
                                    ParseErrorKind::MissingValue(option_text(&token)),
                                ));
                            }
                            None => match arguments.get(index + 1) {
                                Some(next) => {
                                    index += 1;
                                    *next
                                }
                                None => {
                                    return Err(InvalidCommandLine::new(
                                        command,
                                        ParseErrorKind::MissingValue(option_text(&token)),
                                    ));
                                }
                            },
                        };

                        capture.capture(value).map_err(|_| {
                            InvalidCommandLine::new(
                                command,
                                ParseErrorKind::InvalidValue {
                                    option: option_text(&token),
                                    value: value.to_string(),
                                },
                            )
                        })?;
                    }
                }
                Token::Terminator | Token::Command(_) => {
                    // Nothing to bind.
                }
                Token::Parameter(text) => {
                    cursor = cursor.advance(schema, command);
                    let key = cursor.parameter(schema, command).ok_or_else(|| {
                        InvalidCommandLine::new(
                            command,
                            ParseErrorKind::UnexpectedArgument(text.to_string()),
                        )
                    })?;
                    bind_parameter(
                        schema.parameter(key),
                        captures.parameters[key.0].as_mut(),
                        text,
                    )
                    .map_err(|kind| InvalidCommandLine::new(command, kind))?;
                }
            }

            if classifier.has_pending_shorts() {
                token = classifier.next_short();
            } else {
                break;
            }
        }

        index += 1;
    }

    validate(schema, captures, classifier.state().command, cursor)
}

fn option_text(token: &Token) -> String {
    token
        .option_text()
        .expect("internal error - token must be an option")
}

fn bind_parameter(
    node: &ParameterNode,
    capture: &mut dyn AnonymousCapturable,
    text: &str,
) -> Result<(), ParseErrorKind> {
    let invalid = |value: &str| ParseErrorKind::InvalidArgument {
        parameter: node.name.to_ascii_uppercase(),
        value: value.to_string(),
    };

    if node.wildcards.applies() && wildcard::has_wildcards(text) {
        for expanded in wildcard::expand(text) {
            capture.capture(&expanded).map_err(|_| invalid(&expanded))?;
        }

        Ok(())
    } else {
        capture.capture(text).map_err(|_| invalid(text))
    }
}

/// Decide the outcome once every argument is bound.
///
/// Precedence: help, then required options, then required parameters.
fn validate(
    schema: &Schema,
    captures: &Captures,
    command: CommandId,
    cursor: ParameterCursor,
) -> Result<Outcome, InvalidCommandLine> {
    let verbose_option = schema.verbose_option(command);
    let verbose = verbose_option
        .map(|key| captures.option(key).count() > 0)
        .unwrap_or(false);

    if let Some(help_option) = schema.help_option(command) {
        if captures.option(help_option).count() > 0 {
            return Ok(Outcome::Help { command, verbose });
        }
    }

    let visible = schema.visible_options(command);

    for key in &visible {
        let node = schema.option(*key);

        if node.required && captures.option(*key).count() == 0 {
            return Err(InvalidCommandLine::new(
                command,
                ParseErrorKind::MissingRequiredOption(node.display_name()),
            ));
        }
    }

    for key in &schema.command(command).parameters {
        if captures.parameter(*key).count() > 0 {
            continue;
        }

        if schema.parameter(*key).optional {
            // This and every later parameter may be absent.
            break;
        }

        let any_option = visible
            .iter()
            .any(|key| Some(*key) != verbose_option && captures.option(*key).count() > 0);

        if cursor != ParameterCursor::Unclaimed || any_option {
            return Err(InvalidCommandLine::new(
                command,
                ParseErrorKind::ExpectedAdditionalArguments,
            ));
        }

        return Ok(Outcome::ImplicitHelp { command, verbose });
    }

    Ok(Outcome::Invoke { command })
}
