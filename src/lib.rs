//! `argot` is a hierarchical command line parser for Rust.
//!
//! A program's Cli is a tree of commands.
//! Each command owns its options (`-x`, `--name`) and its positional parameters, and may branch into sub-commands.
//! `argot` focuses on the following concerns:
//! * *Typed values*:
//! The user should not call any `&str -> T` conversion functions directly.
//! Every option and parameter converts via [`std::str::FromStr`], or a custom parser, and reads back through a typed id.
//! * *Sub-command trees*:
//! Commands nest to any depth, and an *inherited* option remains available to every command beneath its owner.
//! * *Conventional syntax*:
//! Bundled short options (`-abc`), `=` delimited values (`--name=value`, `-n=3`), and the `--` options terminator.
//! * *Detailed yet basic UX*:
//! The help and error output of the Cli should leave no ambiguity in how to use the program.
//! * *Shell completion*:
//! The same rules which parse the Cli also produce the completion candidates for a partially typed argument.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/summer.rs")]
//! ```
//!
//! This generates the following Cli program:
//! ```console
//! $ summer -h
//! usage: summer [-h] ITEM ...
//!
//! parameters:
//!  ITEM         The items to sum.
//!
//! options:
//!  -h, --help   Show this help message and exit.
//!
//! $ summer 1 2 3
//! Sum: 6
//!
//! $ summer 1 blah
//! Invalid argument "blah" for parameter "ITEM".
//! usage: summer [-h] ITEM ...
//! ```
//!
//! # Builder Api
//! Start from a [`CommandLine`], then add to its commands:
//! * [`CommandLine::add_command`]: a sub-command, selected on the Cli by its exact name.
//! * [`CommandLine::add_option`]: an [`OptionSpec`], which is a flag, a single value (the latest occurrence wins), or a repeatable value (every occurrence is collected).
//! * [`CommandLine::add_parameter`]: a [`ParameterSpec`], which binds positionally, one value or (variadic) every remaining value.
//!
//! Each `add_*` returns an id; after parsing, read the values back with [`CommandLine::value`], [`CommandLine::values`] and [`CommandLine::count`].
//! Invalid configurations (ex: duplicate option names) are rejected eagerly with a [`ConfigError`].
//!
//! The program's behaviour hangs off [`CommandLine::on_invoke`].
//! Only the *active* command (the deepest command selected on the Cli) is invoked, and its handler's return value becomes the exit code.
//!
//! ```no_run
#![doc = include_str!("../demos/tool.rs")]
//! ```
//!
//! # Cli Semantics
//! `argot` binds the Cli arguments left to right, according to the following rules.
//!
//! * `--name` names a long option; `--name=value` supplies its value inline.
//! * `-x` names a short option; `-xyz` bundles several.
//! An `=` directly after a short option delimits its value (`-n=3`, or `-abn=3` when bundled).
//! * A value-taking option without an inline value consumes the next argument, even if it looks like an option.
//! Inside a bundle, only the final option may do so (`-abn 3`).
//! An option with an [optional value](OptionSpec::optional_value) only ever accepts an inline value.
//! * A bare word first selects a sub-command of the current command, then binds to the next positional parameter.
//! Once a parameter or non-inherited option is bound, the command is *determined*, and bare words no longer select sub-commands.
//! * After `--`, no argument is treated as an option (`test -- -one` binds `-one` positionally).
//! * `-` alone is a positional value.
//!
//! Once every argument is bound:
//! * When the help option was given, the help message is written and the exit code is `0`.
//! * A missing required option is an error.
//! * A missing required parameter is an error, unless nothing was given to the command at all, in which case the help message is written and the exit code is `-1`.
//!
//! Errors are an [`InvalidCommandLine`], naming the command whose usage to show.
//!
//! # Completion
//! [`CommandLine::complete`] replays the arguments before a position, then offers candidates for the argument at that position:
//! sub-command names, option names (`--al` to `--alpha`), and the values of the option or parameter being typed (via [`prelude::CompletionSource`]).
//!
//! # Features
//! * `tracing_debug`: emit `tracing` debug events while classifying and binding the Cli.
pub use argot_builder::*;
