use std::collections::HashMap;

use crate::api::{OptionSpec, ParameterSpec};
use crate::constant::*;
use crate::model::*;
use crate::parser::{terminal_width, Captures, ConfigError, ConsoleInterface, UserInterface};
use crate::schema::{CommandNode, OptionNode, Schema};

pub(crate) type Handler = Box<dyn FnMut(&Invocation<'_>) -> i32>;

/// The command line: a tree of commands, their options and parameters, and the values bound to them.
///
/// Configure the tree with [`CommandLine::add_command`], [`CommandLine::add_option`] and [`CommandLine::add_parameter`].
/// Then run it with [`CommandLine::parse`] (or [`CommandLine::run`]/[`CommandLine::execute`]), and read the values back via the returned ids.
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{CommandLine, OptionSpec, ParameterSpec};
///
/// let mut cli = CommandLine::new("program").about("Adds numbers.");
/// let root = cli.root();
/// cli.add_help_option(root).unwrap();
/// let verbose = cli.add_option(root, OptionSpec::flag().short('v')).unwrap();
/// let items = cli.add_parameter(root, ParameterSpec::<u32>::values("items")).unwrap();
///
/// assert_eq!(cli.run(&["-v", "1", "2"]), -1);
/// assert_eq!(cli.count(verbose), 1);
/// assert_eq!(cli.values(items), &[1, 2]);
/// ```
pub struct CommandLine {
    pub(crate) schema: Schema,
    pub(crate) captures: Captures,
    pub(crate) handlers: HashMap<CommandId, Handler>,
    pub(crate) user_interface: Box<dyn UserInterface>,
    pub(crate) terminal_width: Option<usize>,
}

impl CommandLine {
    /// Create a command line, where `program` names the root command.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            schema: Schema::new(program),
            captures: Captures::default(),
            handlers: HashMap::default(),
            user_interface: Box::new(ConsoleInterface::default()),
            terminal_width: terminal_width(),
        }
    }

    /// Document the root command.
    /// If repeated, only the final description applies.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        let root = self.schema.root();
        self.schema.commands[root.0]
            .description
            .replace(description.into());
        self
    }

    /// Direct help and error output to `user_interface` (default: stdout and stderr).
    pub fn user_interface(mut self, user_interface: impl UserInterface + 'static) -> Self {
        self.user_interface = Box::new(user_interface);
        self
    }

    /// The root command.
    pub fn root(&self) -> CommandId {
        self.schema.root()
    }

    /// Add a sub-command under `parent`.
    ///
    /// On the Cli, a sub-command is selected by its exact `name`, before any positional parameter or non-inherited option of its parent.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::CommandLine;
    ///
    /// let mut cli = CommandLine::new("git");
    /// let root = cli.root();
    /// let remote = cli.add_command(root, "remote", "Manage remotes.").unwrap();
    /// let add = cli.add_command(remote, "add", "Add a remote.").unwrap();
    ///
    /// assert_eq!(cli.path(add), "git remote add");
    /// assert!(cli.add_command(root, "remote", "").is_err());
    /// ```
    pub fn add_command(
        &mut self,
        parent: CommandId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<CommandId, ConfigError> {
        self.check_command(parent)?;
        let name = name.into();
        let description = description.into();

        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidCommandName(name));
        }

        if self.schema.subcommand(parent, &name).is_some() {
            return Err(ConfigError::DuplicateCommand(name));
        }

        let id = CommandId(self.schema.commands.len());
        self.schema.commands.push(CommandNode {
            name,
            description: if description.is_empty() {
                None
            } else {
                Some(description)
            },
            parent: Some(parent),
            commands: Vec::default(),
            parameters: Vec::default(),
            options: Vec::default(),
            help_option: None,
            verbose_option: None,
        });
        self.schema.commands[parent.0].commands.push(id);
        Ok(id)
    }

    /// Add an option to `command`.
    ///
    /// The option's names must not clash with any other option visible on `command`.
    /// An [inherited](OptionSpec::inherited) option must also not clash with the options of any command beneath `command`.
    pub fn add_option<T: 'static>(
        &mut self,
        command: CommandId,
        option: OptionSpec<T>,
    ) -> Result<OptionId<T>, ConfigError> {
        self.check_command(command)?;
        let (node, capture) = option.consume(command);
        self.check_option(&node)?;

        let key = OptionKey(self.schema.options.len());
        self.schema.options.push(node);
        self.schema.commands[command.0].options.push(key);
        self.captures.options.push(capture);
        Ok(OptionId::new(key))
    }

    /// Add a positional parameter to `command`.
    ///
    /// Parameters bind in the order they are added; nothing may follow a variadic parameter.
    pub fn add_parameter<T: 'static>(
        &mut self,
        command: CommandId,
        parameter: ParameterSpec<T>,
    ) -> Result<ParameterId<T>, ConfigError> {
        self.check_command(command)?;

        if parameter.name().trim().is_empty() {
            return Err(ConfigError::UnnamedParameter);
        }

        if let Some(last) = self.schema.command(command).parameters.last() {
            let last = self.schema.parameter(*last);

            if last.variadic {
                return Err(ConfigError::ParameterAfterVariadic(
                    parameter.name().to_string(),
                    last.name.clone(),
                ));
            }
        }

        let (node, capture) = parameter.consume();
        let key = ParameterKey(self.schema.parameters.len());
        self.schema.parameters.push(node);
        self.schema.commands[command.0].parameters.push(key);
        self.captures.parameters.push(capture);
        Ok(ParameterId::new(key))
    }

    /// Designate the help option of `command`: once specified, the help message is written instead of invoking the command.
    ///
    /// The option must be a flag visible on `command`.
    /// When it is [inherited](OptionSpec::inherited), it also serves every command beneath `command` without their own designation.
    pub fn set_help_option(
        &mut self,
        command: CommandId,
        option: OptionId<bool>,
    ) -> Result<(), ConfigError> {
        let key = self.check_designation(command, option)?;
        self.schema.commands[command.0].help_option.replace(key);
        Ok(())
    }

    /// Designate the verbose option of `command`: it lists the [`HelpVisibility::Verbose`] items in the help message.
    ///
    /// Designation follows the same rules as [`CommandLine::set_help_option`].
    pub fn set_verbose_option(
        &mut self,
        command: CommandId,
        option: OptionId<bool>,
    ) -> Result<(), ConfigError> {
        let key = self.check_designation(command, option)?;
        self.schema.commands[command.0].verbose_option.replace(key);
        Ok(())
    }

    /// Add and designate an inherited `-h, --help` option.
    pub fn add_help_option(&mut self, command: CommandId) -> Result<OptionId<bool>, ConfigError> {
        let option = self.add_option(
            command,
            OptionSpec::flag()
                .short(HELP_SHORT)
                .long(HELP_NAME)
                .description(HELP_MESSAGE)
                .inherited(),
        )?;
        self.set_help_option(command, option)?;
        Ok(option)
    }

    /// Add and designate an inherited `-v, --verbose` option.
    pub fn add_verbose_option(
        &mut self,
        command: CommandId,
    ) -> Result<OptionId<bool>, ConfigError> {
        let option = self.add_option(
            command,
            OptionSpec::flag()
                .short(VERBOSE_SHORT)
                .long(VERBOSE_NAME)
                .description(VERBOSE_MESSAGE)
                .inherited(),
        )?;
        self.set_verbose_option(command, option)?;
        Ok(option)
    }

    /// Run `handler` when `command` is invoked; its return value becomes the exit code.
    /// If repeated, only the final handler applies.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{CommandLine, ParameterSpec};
    ///
    /// let mut cli = CommandLine::new("program");
    /// let root = cli.root();
    /// let count = cli.add_parameter(root, ParameterSpec::<i32>::value("count")).unwrap();
    /// cli.on_invoke(root, move |invocation| *invocation.value(count).unwrap() * 2).unwrap();
    ///
    /// assert_eq!(cli.run(&["21"]), 42);
    /// ```
    pub fn on_invoke(
        &mut self,
        command: CommandId,
        handler: impl FnMut(&Invocation<'_>) -> i32 + 'static,
    ) -> Result<(), ConfigError> {
        self.check_command(command)?;
        self.handlers.insert(command, Box::new(handler));
        Ok(())
    }

    /// The latest value bound to the option or parameter.
    ///
    /// For a variadic option/parameter, this is the last of its values.
    pub fn value<T: 'static>(&self, slot: impl Slot<T>) -> Option<&T> {
        self.captures.typed::<T>(slot.slot_key()).value()
    }

    /// Every value bound to the option or parameter, in Cli order.
    pub fn values<T: 'static>(&self, slot: impl Slot<T>) -> &[T] {
        self.captures.typed::<T>(slot.slot_key()).values()
    }

    /// How many times the option or parameter was bound.
    pub fn count<T>(&self, slot: impl Slot<T>) -> usize {
        self.captures.slot(slot.slot_key()).count()
    }

    /// The command names from the root down to `command`, joined by spaces.
    pub fn path(&self, command: CommandId) -> String {
        self.schema.path(command)
    }

    fn check_command(&self, command: CommandId) -> Result<(), ConfigError> {
        if self.schema.contains(command) {
            Ok(())
        } else {
            Err(ConfigError::UnknownCommand(command))
        }
    }

    fn check_option(&self, node: &OptionNode) -> Result<(), ConfigError> {
        if node.short.is_none() && node.long.is_none() {
            return Err(ConfigError::UnnamedOption);
        }

        if let Some(short) = node.short {
            if short.is_whitespace() || short == '-' || short == '=' {
                return Err(ConfigError::InvalidShortName(short));
            }
        }

        if let Some(long) = &node.long {
            if long.is_empty() || long.chars().any(|c| c.is_whitespace() || c == '=') {
                return Err(ConfigError::InvalidLongName(long.clone()));
            }
        }

        let mut scopes = vec![node.owner];

        if node.inherited {
            scopes.extend(self.schema.descendants(node.owner));
        }

        for scope in scopes {
            for key in self.schema.visible_options(scope) {
                let other = self.schema.option(key);

                if let Some(short) = node.short.filter(|short| other.short == Some(*short)) {
                    return Err(ConfigError::DuplicateShortOption(short));
                }

                if let Some(long) = node.long.as_ref().filter(|long| other.long.as_ref() == Some(*long)) {
                    return Err(ConfigError::DuplicateLongOption(long.clone()));
                }
            }
        }

        Ok(())
    }

    fn check_designation(
        &self,
        command: CommandId,
        option: OptionId<bool>,
    ) -> Result<OptionKey, ConfigError> {
        self.check_command(command)?;

        if option.key.0 >= self.schema.options.len() {
            return Err(ConfigError::UnknownOption);
        }

        let node = self.schema.option(option.key);

        if node.kind == OptionKind::Flag && self.schema.visible_options(command).contains(&option.key) {
            Ok(option.key)
        } else {
            Err(ConfigError::InvalidDesignation(
                node.display_name(),
                self.schema.path(command),
            ))
        }
    }
}

/// The invoked command, with read access to every bound value.
///
/// Passed to the handler registered via [`CommandLine::on_invoke`].
pub struct Invocation<'c> {
    command_line: &'c CommandLine,
    command: CommandId,
}

impl<'c> Invocation<'c> {
    pub(crate) fn new(command_line: &'c CommandLine, command: CommandId) -> Self {
        Self {
            command_line,
            command,
        }
    }

    /// The invoked command.
    pub fn command(&self) -> CommandId {
        self.command
    }

    /// The command names from the root down to the invoked command (ex: `git remote add`).
    pub fn path(&self) -> String {
        self.command_line.path(self.command)
    }

    /// See [`CommandLine::value`].
    pub fn value<T: 'static>(&self, slot: impl Slot<T>) -> Option<&'c T> {
        self.command_line.value(slot)
    }

    /// See [`CommandLine::values`].
    pub fn values<T: 'static>(&self, slot: impl Slot<T>) -> &'c [T] {
        self.command_line.values(slot)
    }

    /// See [`CommandLine::count`].
    pub fn count<T>(&self, slot: impl Slot<T>) -> usize {
        self.command_line.count(slot)
    }

    /// The whole command line, for reading the values of other commands.
    pub fn command_line(&self) -> &'c CommandLine {
        self.command_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HelpVisibility;
    use rstest::rstest;

    #[test]
    fn add_command() {
        let mut cli = CommandLine::new("git");
        let root = cli.root();

        let remote = cli.add_command(root, "remote", "Manage remotes.").unwrap();
        let add = cli.add_command(remote, "add", "").unwrap();
        // The same name is fine under a different parent.
        let other = cli.add_command(root, "add", "").unwrap();

        assert_eq!(cli.path(add), "git remote add");
        assert_eq!(cli.path(other), "git add");
        assert_eq!(
            cli.schema.command(remote).description,
            Some("Manage remotes.".to_string())
        );
        assert_eq!(cli.schema.command(add).description, None);
    }

    #[rstest]
    #[case("", ConfigError::InvalidCommandName("".to_string()))]
    #[case("two words", ConfigError::InvalidCommandName("two words".to_string()))]
    #[case("remote", ConfigError::DuplicateCommand("remote".to_string()))]
    fn add_command_invalid(#[case] name: &str, #[case] expected: ConfigError) {
        let mut cli = CommandLine::new("git");
        let root = cli.root();
        cli.add_command(root, "remote", "").unwrap();

        assert_eq!(cli.add_command(root, name, "").unwrap_err(), expected);
    }

    #[test]
    fn unknown_command() {
        let mut cli = CommandLine::new("program");
        let mut other = CommandLine::new("other");
        let foreign = other.add_command(other.root(), "sub", "").unwrap();

        assert_eq!(
            cli.add_option(foreign, OptionSpec::flag().short('a')).unwrap_err(),
            ConfigError::UnknownCommand(foreign)
        );
        assert_eq!(
            cli.add_command(foreign, "x", "").unwrap_err(),
            ConfigError::UnknownCommand(foreign)
        );
        assert_eq!(
            cli.on_invoke(foreign, |_| 0).unwrap_err(),
            ConfigError::UnknownCommand(foreign)
        );
    }

    #[rstest]
    #[case(OptionSpec::flag(), ConfigError::UnnamedOption)]
    #[case(OptionSpec::flag().short(' '), ConfigError::InvalidShortName(' '))]
    #[case(OptionSpec::flag().short('-'), ConfigError::InvalidShortName('-'))]
    #[case(OptionSpec::flag().short('='), ConfigError::InvalidShortName('='))]
    #[case(OptionSpec::flag().long(""), ConfigError::InvalidLongName("".to_string()))]
    #[case(OptionSpec::flag().long("a b"), ConfigError::InvalidLongName("a b".to_string()))]
    #[case(OptionSpec::flag().long("a=b"), ConfigError::InvalidLongName("a=b".to_string()))]
    #[case(OptionSpec::flag().short('x'), ConfigError::DuplicateShortOption('x'))]
    #[case(OptionSpec::flag().long("ex"), ConfigError::DuplicateLongOption("ex".to_string()))]
    fn add_option_invalid(#[case] option: OptionSpec<bool>, #[case] expected: ConfigError) {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        cli.add_option(root, OptionSpec::flag().short('x').long("ex"))
            .unwrap();

        assert_eq!(cli.add_option(root, option).unwrap_err(), expected);
    }

    #[test]
    fn add_option_inherited_clash() {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        let sub = cli.add_command(root, "sub", "").unwrap();
        let leaf = cli.add_command(sub, "leaf", "").unwrap();
        cli.add_option(root, OptionSpec::flag().short('a').inherited())
            .unwrap();
        cli.add_option(leaf, OptionSpec::flag().short('b')).unwrap();
        // Not inherited, so it does not clash with the sub-command.
        cli.add_option(root, OptionSpec::flag().short('c')).unwrap();
        cli.add_option(sub, OptionSpec::flag().short('c')).unwrap();

        // Visible from an ancestor.
        assert_eq!(
            cli.add_option(leaf, OptionSpec::flag().short('a')).unwrap_err(),
            ConfigError::DuplicateShortOption('a')
        );
        // Would be visible on a descendant.
        assert_eq!(
            cli.add_option(root, OptionSpec::flag().short('b').inherited())
                .unwrap_err(),
            ConfigError::DuplicateShortOption('b')
        );
        cli.add_option(root, OptionSpec::flag().short('b')).unwrap();
    }

    #[test]
    fn add_parameter() {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        cli.add_parameter(root, ParameterSpec::<u32>::value("first"))
            .unwrap();
        cli.add_parameter(root, ParameterSpec::<u32>::values("rest"))
            .unwrap();

        assert_eq!(
            cli.add_parameter(root, ParameterSpec::<u32>::value("more"))
                .unwrap_err(),
            ConfigError::ParameterAfterVariadic("more".to_string(), "rest".to_string())
        );
        assert_eq!(
            cli.add_parameter(root, ParameterSpec::<u32>::value(" "))
                .unwrap_err(),
            ConfigError::UnnamedParameter
        );
    }

    #[test]
    fn designation() {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        let sub = cli.add_command(root, "sub", "").unwrap();
        let own = cli.add_option(sub, OptionSpec::flag().long("own")).unwrap();
        let private = cli.add_option(root, OptionSpec::flag().long("private")).unwrap();

        cli.set_help_option(sub, own).unwrap();
        assert_eq!(cli.schema.help_option(sub), Some(own.key));
        assert_eq!(
            cli.set_verbose_option(sub, private).unwrap_err(),
            ConfigError::InvalidDesignation("--private".to_string(), "program sub".to_string())
        );
    }

    #[test]
    fn designation_foreign_option() {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        let mut other = CommandLine::new("other");
        let other_root = other.root();
        other.add_option(other_root, OptionSpec::flag().short('a')).unwrap();
        let foreign = other.add_option(other_root, OptionSpec::flag().short('b')).unwrap();
        cli.add_option(root, OptionSpec::flag().short('c')).unwrap();

        assert_eq!(
            cli.set_help_option(root, foreign).unwrap_err(),
            ConfigError::UnknownOption
        );
        assert_eq!(
            cli.set_verbose_option(root, foreign).unwrap_err(),
            ConfigError::UnknownOption
        );
    }

    #[test]
    fn add_help_and_verbose() {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        let sub = cli.add_command(root, "sub", "").unwrap();

        let help = cli.add_help_option(root).unwrap();
        let verbose = cli.add_verbose_option(root).unwrap();

        assert_eq!(cli.schema.help_option(sub), Some(help.key));
        assert_eq!(cli.schema.verbose_option(sub), Some(verbose.key));
        assert_eq!(
            cli.add_option(sub, OptionSpec::flag().short('h')).unwrap_err(),
            ConfigError::DuplicateShortOption('h')
        );
        assert_eq!(cli.schema.option(help.key).visibility, HelpVisibility::Always);
    }

    #[test]
    fn readback_before_parse() {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        let option = cli
            .add_option(root, OptionSpec::<u32>::value("N").short('n'))
            .unwrap();
        let parameter = cli
            .add_parameter(root, ParameterSpec::<String>::values("items"))
            .unwrap();

        assert_eq!(cli.value(option), None);
        assert_eq!(cli.count(option), 0);
        assert_eq!(cli.values(parameter), &[] as &[String]);
    }
}
