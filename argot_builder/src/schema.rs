use crate::model::*;
use crate::prelude::CompletionSource;

pub(crate) struct CommandNode {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) parent: Option<CommandId>,
    pub(crate) commands: Vec<CommandId>,
    pub(crate) parameters: Vec<ParameterKey>,
    pub(crate) options: Vec<OptionKey>,
    pub(crate) help_option: Option<OptionKey>,
    pub(crate) verbose_option: Option<OptionKey>,
}

pub(crate) struct OptionNode {
    pub(crate) owner: CommandId,
    pub(crate) short: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) required: bool,
    pub(crate) inherited: bool,
    pub(crate) visibility: HelpVisibility,
    pub(crate) kind: OptionKind,
    pub(crate) completions: Option<Box<dyn CompletionSource>>,
}

impl OptionNode {
    /// The name to report for this option: the short form when there is one.
    pub(crate) fn display_name(&self) -> String {
        match (&self.short, &self.long) {
            (Some(short), _) => format!("-{short}"),
            (None, Some(long)) => format!("--{long}"),
            (None, None) => unreachable!("internal error - an option must have a short or long name"),
        }
    }
}

pub(crate) struct ParameterNode {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) optional: bool,
    pub(crate) variadic: bool,
    pub(crate) visibility: HelpVisibility,
    pub(crate) wildcards: WildcardExpansion,
    pub(crate) completions: Option<Box<dyn CompletionSource>>,
}

/// The declared command tree.
///
/// Commands, options and parameters live in flat arenas, addressed by index.
/// A command only refers to its parent by index, so the tree never owns upwards.
pub(crate) struct Schema {
    pub(crate) commands: Vec<CommandNode>,
    pub(crate) options: Vec<OptionNode>,
    pub(crate) parameters: Vec<ParameterNode>,
}

impl Schema {
    pub(crate) fn new(program: impl Into<String>) -> Self {
        Self {
            commands: vec![CommandNode {
                name: program.into(),
                description: None,
                parent: None,
                commands: Vec::default(),
                parameters: Vec::default(),
                options: Vec::default(),
                help_option: None,
                verbose_option: None,
            }],
            options: Vec::default(),
            parameters: Vec::default(),
        }
    }

    pub(crate) fn root(&self) -> CommandId {
        CommandId(0)
    }

    pub(crate) fn command(&self, id: CommandId) -> &CommandNode {
        &self.commands[id.0]
    }

    pub(crate) fn option(&self, key: OptionKey) -> &OptionNode {
        &self.options[key.0]
    }

    pub(crate) fn parameter(&self, key: ParameterKey) -> &ParameterNode {
        &self.parameters[key.0]
    }

    pub(crate) fn contains(&self, id: CommandId) -> bool {
        id.0 < self.commands.len()
    }

    /// The proper ancestors of `id`, nearest first.
    pub(crate) fn ancestors(&self, id: CommandId) -> Ancestors<'_> {
        Ancestors {
            schema: self,
            next: self.command(id).parent,
        }
    }

    /// Every command under `id` (not including `id`), depth first.
    pub(crate) fn descendants(&self, id: CommandId) -> Vec<CommandId> {
        let mut out = Vec::default();
        let mut stack: Vec<CommandId> = self.command(id).commands.iter().rev().cloned().collect();

        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.command(next).commands.iter().rev());
        }

        out
    }

    /// The names from the root down to `id`, joined by spaces (ex: `git remote add`).
    pub(crate) fn path(&self, id: CommandId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .map(|ancestor| self.command(ancestor).name.as_str())
            .collect();
        names.reverse();
        names.push(&self.command(id).name);
        names.join(" ")
    }

    /// The options acceptable while `id` is the active command:
    /// its own options, then the inherited options of each ancestor (nearest first).
    pub(crate) fn visible_options(&self, id: CommandId) -> Vec<OptionKey> {
        let mut out = self.command(id).options.clone();

        for ancestor in self.ancestors(id) {
            out.extend(
                self.command(ancestor)
                    .options
                    .iter()
                    .filter(|key| self.option(**key).inherited),
            );
        }

        out
    }

    pub(crate) fn subcommand(&self, id: CommandId, name: &str) -> Option<CommandId> {
        self.command(id)
            .commands
            .iter()
            .find(|child| self.command(**child).name == name)
            .cloned()
    }

    /// The designated help option in effect for `id`.
    pub(crate) fn help_option(&self, id: CommandId) -> Option<OptionKey> {
        self.designated(id, |command| command.help_option)
    }

    /// The designated verbose option in effect for `id`.
    pub(crate) fn verbose_option(&self, id: CommandId) -> Option<OptionKey> {
        self.designated(id, |command| command.verbose_option)
    }

    // A command's own designation wins; otherwise the nearest ancestor whose designated option is inherited.
    fn designated(
        &self,
        id: CommandId,
        select: impl Fn(&CommandNode) -> Option<OptionKey>,
    ) -> Option<OptionKey> {
        if let Some(key) = select(self.command(id)) {
            return Some(key);
        }

        self.ancestors(id)
            .filter_map(|ancestor| select(self.command(ancestor)))
            .find(|key| self.option(*key).inherited)
    }
}

pub(crate) struct Ancestors<'s> {
    schema: &'s Schema,
    next: Option<CommandId>,
}

impl<'s> Iterator for Ancestors<'s> {
    type Item = CommandId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.schema.command(current).parent;
        Some(current)
    }
}
