use terminal_size::{terminal_size, Width};

use crate::model::{CommandId, OptionKind};
use crate::parser::interface::*;
use crate::schema::{OptionNode, ParameterNode, Schema};

const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;
const DEFAULT_TOTAL_WIDTH: usize = 80;

/// The width of the attached terminal, if any.
pub(crate) fn terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(width), _)| width as usize)
}

/// Writes the usage line and help message of a command.
pub(crate) struct Printer<'s> {
    schema: &'s Schema,
    total_width: usize,
}

impl<'s> Printer<'s> {
    pub(crate) fn new(schema: &'s Schema, terminal_width: Option<usize>) -> Self {
        Self {
            schema,
            total_width: terminal_width.unwrap_or(DEFAULT_TOTAL_WIDTH),
        }
    }

    /// The one line summary, ex: `usage: tool sub [-h] [-n COUNT] SOURCE [TARGET]`.
    pub(crate) fn usage(&self, command: CommandId, verbose: bool) -> String {
        let node = self.schema.command(command);
        let mut summary = vec![format!("usage: {}", self.schema.path(command))];

        for key in self.schema.visible_options(command) {
            let option = self.schema.option(key);

            if option.visibility.shown(verbose) {
                let grammar = format!("{}{}", option.display_name(), option_grammar(&option.kind));

                if option.required {
                    summary.push(grammar);
                } else {
                    summary.push(format!("[{grammar}]"));
                }
            }
        }

        for key in &node.parameters {
            let parameter = self.schema.parameter(*key);

            if parameter.visibility.shown(verbose) {
                summary.push(parameter_grammar(parameter));
            }
        }

        if !node.commands.is_empty() {
            let names: Vec<&str> = node
                .commands
                .iter()
                .map(|child| self.schema.command(*child).name.as_str())
                .collect();
            summary.push(format!("{{{}}} ...", names.join(",")));
        }

        summary.join(" ")
    }

    pub(crate) fn print_usage(&self, command: CommandId, user_interface: &(impl UserInterface + ?Sized)) {
        user_interface.print(self.usage(command, false));
    }

    pub(crate) fn print_help(
        &self,
        command: CommandId,
        verbose: bool,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let node = self.schema.command(command);
        let parameters: Vec<(String, &str)> = node
            .parameters
            .iter()
            .map(|key| self.schema.parameter(*key))
            .filter(|parameter| parameter.visibility.shown(verbose))
            .map(|parameter| {
                (
                    parameter.name.to_ascii_uppercase(),
                    parameter.description.as_deref().unwrap_or(""),
                )
            })
            .collect();
        let options: Vec<(String, &str)> = self
            .schema
            .visible_options(command)
            .into_iter()
            .map(|key| self.schema.option(key))
            .filter(|option| option.visibility.shown(verbose))
            .map(|option| (option_names(option), option.description.as_deref().unwrap_or("")))
            .collect();
        let commands: Vec<(String, &str)> = node
            .commands
            .iter()
            .map(|child| self.schema.command(*child))
            .map(|child| (child.name.clone(), child.description.as_deref().unwrap_or("")))
            .collect();

        let mut left_column_width = 1;
        let mut middle_column_width = 2;

        for (left, middle) in parameters.iter().chain(&options).chain(&commands) {
            left_column_width = std::cmp::max(left_column_width, left.chars().count());
            middle_column_width =
                std::cmp::max(middle_column_width, middle.chars().count() + MAIN_INDENT);
        }

        let column_renderer = ColumnRenderer::guided(
            PaddingWidth::new(PADDING_WIDTH).expect("internal error - padding must be valid"),
            LeftWidth::new(left_column_width).expect("internal error - left must be at least 1"),
            MiddleWidth::new(middle_column_width)
                .expect("internal error - middle must be at least 2"),
            TotalWidth(self.total_width),
        );

        user_interface.print(self.usage(command, verbose));

        if let Some(description) = &node.description {
            user_interface.print("".to_string());
            user_interface.print(description.clone());
        }

        for (title, rows) in [
            ("parameters:", &parameters),
            ("options:", &options),
            ("commands:", &commands),
        ] {
            if rows.is_empty() {
                continue;
            }

            user_interface.print("".to_string());
            user_interface.print(title.to_string());

            for (left, middle) in rows {
                for line in column_renderer.render(MAIN_INDENT, left, middle) {
                    user_interface.print(line);
                }
            }
        }
    }
}

fn option_grammar(kind: &OptionKind) -> String {
    match kind.parameter() {
        None => String::default(),
        Some(parameter) if kind.is_value_optional() => format!("[={parameter}]"),
        Some(parameter) => format!(" {parameter}"),
    }
}

// Ex: "-n COUNT, --count COUNT"
fn option_names(option: &OptionNode) -> String {
    let grammar = option_grammar(&option.kind);
    let mut names = Vec::default();

    if let Some(short) = &option.short {
        names.push(format!("-{short}{grammar}"));
    }

    if let Some(long) = &option.long {
        names.push(format!("--{long}{grammar}"));
    }

    names.join(", ")
}

fn parameter_grammar(parameter: &ParameterNode) -> String {
    let mut grammar = parameter.name.to_ascii_uppercase();

    if parameter.variadic {
        grammar.push_str(" ...");
    }

    if parameter.optional {
        format!("[{grammar}]")
    } else {
        grammar
    }
}
