use std::env;

use crate::api::{CommandLine, Invocation};
use crate::constant::*;
use crate::model::CommandId;
use crate::parser::base::*;
use crate::parser::completion;
use crate::parser::printer::Printer;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

impl CommandLine {
    /// Bind the `arguments` and act on them.
    ///
    /// Parsing happens in two phases:
    /// 1. Every argument is classified and bound to its option or parameter, in order.
    /// The first argument which cannot be bound aborts with `Err`.
    /// 2. The bound state is validated:
    ///    * If the help option was specified, the help message is written and the result is `Ok(0)`.
    ///    * Each required option must have been specified.
    ///    * Each required parameter must have been bound.
    ///      When nothing (except, perhaps, the verbose option) was specified, the help message is written and the result is `Ok(-1)`.
    ///
    /// Otherwise the active command's handler is invoked and its return value is the result (`Ok(-1)` when it has no handler).
    ///
    /// Bound values accumulate across calls; see [`CommandLine::reset`].
    pub fn execute(&mut self, arguments: &[&str]) -> Result<i32, InvalidCommandLine> {
        match bind(&self.schema, &mut self.captures, arguments)? {
            Outcome::Help { command, verbose } => {
                self.write_help(command, verbose);
                Ok(HELP_EXIT)
            }
            Outcome::ImplicitHelp { command, verbose } => {
                self.write_help(command, verbose);
                Ok(INVOKE_DEFAULT)
            }
            Outcome::Invoke { command } => Ok(self.invoke(command)),
        }
    }

    /// Like [`CommandLine::execute`], but reports an error along with the usage of the failing command and results in `1`.
    pub fn run(&mut self, arguments: &[&str]) -> i32 {
        match self.execute(arguments) {
            Ok(code) => code,
            Err(error) => {
                let command = error.command();
                self.user_interface.print_error(error);
                Printer::new(&self.schema, self.terminal_width)
                    .print_usage(command, &*self.user_interface);
                ERROR_EXIT
            }
        }
    }

    /// Run the command line against the Cli [`env::args`], and exit the process with the result (via [`std::process::exit`]).
    ///
    /// See [`CommandLine::execute`] for the parsing semantics.
    pub fn parse(mut self) -> ! {
        let command_input: Vec<String> = env::args().skip(1).collect();
        let code = self.run(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        );
        std::process::exit(code);
    }

    /// The completion candidates for the argument at `index` of `arguments`.
    ///
    /// The arguments before `index` are interpreted exactly as [`CommandLine::execute`] would, but nothing is bound.
    /// When `index == arguments.len()`, candidates are produced for a new (empty) argument.
    ///
    /// ### Example
    /// ```
    /// # use argot_builder as argot;
    /// use argot::{Choices, CommandLine, OptionSpec};
    ///
    /// let mut cli = CommandLine::new("program");
    /// let root = cli.root();
    /// cli.add_option(root, OptionSpec::flag().long("alpha")).unwrap();
    /// cli.add_option(
    ///     root,
    ///     OptionSpec::<String>::value("NAME")
    ///         .long("name")
    ///         .completions(Choices::new(["ann", "bob"])),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(cli.complete(&["--al"], 0), vec!["--alpha"]);
    /// assert_eq!(cli.complete(&["--name"], 1), vec!["ann", "bob"]);
    /// assert_eq!(cli.complete(&["--name=b"], 0), vec!["--name=bob"]);
    /// ```
    pub fn complete(&self, arguments: &[&str], index: usize) -> Vec<String> {
        completion::complete(&self.schema, arguments, index)
    }

    /// Write the help message of `command`; `verbose` includes the [`HelpVisibility::Verbose`](crate::HelpVisibility::Verbose) items.
    pub fn write_help(&self, command: CommandId, verbose: bool) {
        Printer::new(&self.schema, self.terminal_width).print_help(
            command,
            verbose,
            &*self.user_interface,
        );
    }

    /// Forget every bound value, so the command line may run again.
    pub fn reset(&mut self) {
        let root = self.schema.root();
        self.reset_command(root);
    }

    /// Forget the values bound to `command` and every command beneath it.
    pub fn reset_command(&mut self, command: CommandId) {
        self.captures.reset(&self.schema, command);
    }

    fn invoke(&mut self, command: CommandId) -> i32 {
        match self.handlers.remove(&command) {
            Some(mut handler) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Invoking '{}'.", self.schema.path(command));
                }
                let code = handler(&Invocation::new(self, command));
                self.handlers.insert(command, handler);
                code
            }
            None => INVOKE_DEFAULT,
        }
    }
}
