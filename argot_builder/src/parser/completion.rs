use crate::constant::OPTIONS_TERMINATOR;
use crate::matcher::{split_equals_delimiter, Classifier, Token};
use crate::model::OptionKey;
use crate::parser::base::ParameterCursor;
use crate::schema::Schema;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Completion candidates for the argument at `index`.
///
/// The arguments before `index` are replayed through the classifier (but never bound);
/// the argument at `index` (or the empty string, when `index == arguments.len()`) is the partial text.
pub(crate) fn complete(schema: &Schema, arguments: &[&str], index: usize) -> Vec<String> {
    if index > arguments.len() {
        return Vec::default();
    }

    let mut classifier = Classifier::new(schema);
    let mut cursor = ParameterCursor::Unclaimed;
    // The option whose separate value is the next argument.
    let mut expecting: Option<OptionKey> = None;

    for &argument in &arguments[..index] {
        if expecting.take().is_some() {
            continue;
        }

        let mut token = classifier.classify(argument);

        loop {
            match token {
                Token::ShortOption { option, value, .. } | Token::LongOption { option, value, .. } => {
                    let kind = &schema.option(option).kind;

                    if kind.is_parameterized()
                        && !kind.is_value_optional()
                        && value.is_none()
                        && !classifier.has_pending_shorts()
                    {
                        expecting.replace(option);
                    }
                }
                Token::Parameter(_) => {
                    cursor = cursor.advance(schema, classifier.state().command);
                }
                Token::UnrecognizedShortOption(_)
                | Token::UnrecognizedLongOption(_)
                | Token::Terminator
                | Token::Command(_) => {}
            }

            if classifier.has_pending_shorts() {
                token = classifier.next_short();
            } else {
                break;
            }
        }
    }

    let partial = arguments.get(index).copied().unwrap_or("");
    #[cfg(feature = "tracing_debug")]
    {
        debug!(
            "Completing '{partial}' on '{}' (expecting: {expecting:?}, cursor: {cursor:?}).",
            schema.command(classifier.state().command).name
        );
    }

    if let Some(option) = expecting {
        return option_values(schema, option, partial, "");
    }

    if !classifier.state().options_terminated && partial.starts_with('-') {
        return complete_option(schema, &mut classifier, partial);
    }

    let command = classifier.state().command;
    let mut out = Vec::default();

    if !classifier.state().command_determined {
        out.extend(
            schema
                .command(command)
                .commands
                .iter()
                .map(|child| &schema.command(*child).name)
                .filter(|name| name.starts_with(partial))
                .cloned(),
        );
    }

    if let Some(key) = cursor.advance(schema, command).parameter(schema, command) {
        if let Some(source) = &schema.parameter(key).completions {
            let mut suppressed = false;

            for candidate in source.complete(partial) {
                if !classifier.state().options_terminated && candidate.starts_with('-') {
                    // Would be read as an option.
                    suppressed = true;
                } else {
                    out.push(candidate);
                }
            }

            if suppressed && partial.is_empty() {
                out.push(OPTIONS_TERMINATOR.to_string());
            }
        }
    }

    out
}

fn complete_option<'a>(
    schema: &Schema,
    classifier: &mut Classifier<'_, 'a>,
    partial: &'a str,
) -> Vec<String> {
    if let Some(long) = partial.strip_prefix(OPTIONS_TERMINATOR) {
        return match split_equals_delimiter(long) {
            (name, Some(value)) => classifier
                .visible_options()
                .iter()
                .find(|key| schema.option(**key).long.as_deref() == Some(name))
                .map(|key| option_values(schema, *key, value, &format!("--{name}=")))
                .unwrap_or_default(),
            (name, None) => {
                let mut out = Vec::default();

                if partial == OPTIONS_TERMINATOR {
                    out.push(OPTIONS_TERMINATOR.to_string());
                }

                out.extend(long_forms(schema, classifier.visible_options(), name));
                out
            }
        };
    }

    if partial == "-" {
        let visible = classifier.visible_options();
        let mut out: Vec<String> = visible
            .iter()
            .filter_map(|key| schema.option(*key).short)
            .map(|short| format!("-{short}"))
            .collect();
        out.push(OPTIONS_TERMINATOR.to_string());
        out.extend(long_forms(schema, visible, ""));
        return out;
    }

    // Bundled short options: replay each character.
    let mut token = classifier.classify(partial);
    let mut resolved = true;

    loop {
        match token {
            Token::ShortOption {
                option,
                value: Some(value),
                ..
            } => {
                let prefix = &partial[..partial.len() - value.len()];
                return option_values(schema, option, value, prefix);
            }
            Token::ShortOption { .. } => {}
            _ => resolved = false,
        }

        if classifier.has_pending_shorts() {
            token = classifier.next_short();
        } else {
            break;
        }
    }

    if resolved {
        vec![partial.to_string()]
    } else {
        Vec::default()
    }
}

// Ex: `--alpha`, followed by `--alpha=` when the value may be omitted.
fn long_forms(schema: &Schema, visible: &[OptionKey], prefix: &str) -> Vec<String> {
    let mut out = Vec::default();

    for key in visible {
        let option = schema.option(*key);

        if let Some(long) = option.long.as_ref().filter(|long| long.starts_with(prefix)) {
            out.push(format!("--{long}"));

            if option.kind.is_value_optional() {
                out.push(format!("--{long}="));
            }
        }
    }

    out
}

fn option_values(schema: &Schema, option: OptionKey, partial: &str, prefix: &str) -> Vec<String> {
    let option = schema.option(option);

    match &option.completions {
        Some(source) if option.kind.is_parameterized() => source
            .complete(partial)
            .into_iter()
            .map(|candidate| format!("{prefix}{candidate}"))
            .collect(),
        _ => Vec::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Choices, CommandLine, OptionSpec, ParameterSpec};
    use rstest::rstest;

    fn complete_cli(cli: &CommandLine, arguments: &[&str], index: usize) -> Vec<String> {
        complete(&cli.schema, arguments, index)
    }

    fn alpha() -> CommandLine {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        cli.add_option(root, OptionSpec::flag().short('a').long("alpha"))
            .unwrap();
        cli.add_option(
            root,
            OptionSpec::<String>::value("WHEN")
                .short('b')
                .long("alpha-alpha")
                .optional_value("auto".to_string())
                .completions(Choices::new(["auto", "always", "never"])),
        )
        .unwrap();
        cli.add_option(
            root,
            OptionSpec::<String>::value("NAME")
                .short('c')
                .long("charlie")
                .completions(Choices::new(["carl", "cathy"])),
        )
        .unwrap();
        cli
    }

    #[rstest]
    #[case(vec!["--al"], vec!["--alpha", "--alpha-alpha", "--alpha-alpha="])]
    #[case(vec!["--alpha-"], vec!["--alpha-alpha", "--alpha-alpha="])]
    #[case(vec!["--"], vec!["--", "--alpha", "--alpha-alpha", "--alpha-alpha=", "--charlie"])]
    #[case(vec!["--z"], vec![])]
    #[case(vec!["-"], vec!["-a", "-b", "-c", "--", "--alpha", "--alpha-alpha", "--alpha-alpha=", "--charlie"])]
    fn long_options(#[case] arguments: Vec<&str>, #[case] expected: Vec<&str>) {
        let cli = alpha();

        assert_eq!(complete_cli(&cli, arguments.as_slice(), 0), expected);
    }

    #[rstest]
    #[case(vec!["--charlie=ca"], vec!["--charlie=carl", "--charlie=cathy"])]
    #[case(vec!["--alpha-alpha=a"], vec!["--alpha-alpha=auto", "--alpha-alpha=always"])]
    #[case(vec!["--alpha="], vec![])]
    #[case(vec!["--unknown="], vec![])]
    #[case(vec!["-c=ca"], vec!["-c=carl", "-c=cathy"])]
    #[case(vec!["-ac=cat"], vec!["-ac=cathy"])]
    #[case(vec!["-a=x"], vec![])]
    fn option_value_inline(#[case] arguments: Vec<&str>, #[case] expected: Vec<&str>) {
        let cli = alpha();

        assert_eq!(complete_cli(&cli, arguments.as_slice(), 0), expected);
    }

    #[rstest]
    #[case(vec!["-ab"], vec!["-ab"])]
    #[case(vec!["-az"], vec![])]
    #[case(vec!["-a"], vec!["-a"])]
    fn bundled(#[case] arguments: Vec<&str>, #[case] expected: Vec<&str>) {
        let cli = alpha();

        assert_eq!(complete_cli(&cli, arguments.as_slice(), 0), expected);
    }

    #[rstest]
    #[case(vec!["--charlie", "c"], 1, vec!["carl", "cathy"])]
    #[case(vec!["-c"], 1, vec!["carl", "cathy"])]
    #[case(vec!["-ac", "cath"], 1, vec!["cathy"])]
    // An optional value is never taken from the next argument.
    #[case(vec!["--alpha-alpha"], 1, vec![])]
    #[case(vec!["--charlie=carl"], 1, vec![])]
    fn option_value_separate(
        #[case] arguments: Vec<&str>,
        #[case] index: usize,
        #[case] expected: Vec<&str>,
    ) {
        let cli = alpha();

        assert_eq!(complete_cli(&cli, arguments.as_slice(), index), expected);
    }

    #[test]
    fn sub_commands_then_parameter() {
        let mut cli = CommandLine::new("git");
        let root = cli.root();
        cli.add_command(root, "remote", "").unwrap();
        cli.add_command(root, "rebase", "").unwrap();
        cli.add_command(root, "status", "").unwrap();
        cli.add_parameter(
            root,
            ParameterSpec::<String>::value("target").completions(Choices::new(["red", "blue"])),
        )
        .unwrap();

        assert_eq!(
            complete_cli(&cli, &["re"], 0),
            vec!["remote", "rebase", "red"]
        );
        assert_eq!(
            complete_cli(&cli, empty::slice(), 0),
            vec!["remote", "rebase", "status", "red", "blue"]
        );
    }

    #[test]
    fn sub_command_nested() {
        let mut cli = CommandLine::new("git");
        let root = cli.root();
        let remote = cli.add_command(root, "remote", "").unwrap();
        cli.add_command(remote, "add", "").unwrap();
        cli.add_command(remote, "remove", "").unwrap();
        cli.add_option(remote, OptionSpec::flag().long("verbose"))
            .unwrap();

        assert_eq!(complete_cli(&cli, &["remote", "a"], 1), vec!["add"]);
        assert_eq!(complete_cli(&cli, &["remote", ""], 1), vec!["add", "remove"]);
        assert_eq!(complete_cli(&cli, &["remote", "--v"], 1), vec!["--verbose"]);
        // A non-inherited option determines the command.
        assert_eq!(
            complete_cli(&cli, &["remote", "--verbose", "a"], 2),
            Vec::<String>::new()
        );
    }

    #[test]
    fn parameters_in_order() {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        cli.add_parameter(
            root,
            ParameterSpec::<String>::value("first").completions(Choices::new(["one"])),
        )
        .unwrap();
        cli.add_parameter(
            root,
            ParameterSpec::<String>::values("rest").completions(Choices::new(["two"])),
        )
        .unwrap();

        assert_eq!(complete_cli(&cli, &["o"], 0), vec!["one"]);
        assert_eq!(complete_cli(&cli, &["x", ""], 1), vec!["two"]);
        assert_eq!(complete_cli(&cli, &["x", "y", ""], 2), vec!["two"]);
    }

    #[test]
    fn parameters_exhausted() {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        cli.add_parameter(
            root,
            ParameterSpec::<String>::value("only").completions(Choices::new(["one"])),
        )
        .unwrap();

        assert_eq!(complete_cli(&cli, &["x", ""], 1), Vec::<String>::new());
    }

    #[rstest]
    #[case(vec![""], 0, vec!["plain", "--"])]
    #[case(vec!["p"], 0, vec!["plain"])]
    #[case(vec!["--", ""], 1, vec!["-dash", "plain"])]
    #[case(vec!["--", "-d"], 1, vec!["-dash"])]
    fn parameter_option_looking(
        #[case] arguments: Vec<&str>,
        #[case] index: usize,
        #[case] expected: Vec<&str>,
    ) {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        cli.add_parameter(
            root,
            ParameterSpec::<String>::value("item")
                .completions(|partial: &str| {
                    ["-dash", "plain"]
                        .into_iter()
                        .filter(|candidate| candidate.starts_with(partial))
                        .map(str::to_string)
                        .collect::<Vec<String>>()
                }),
        )
        .unwrap();

        assert_eq!(complete_cli(&cli, arguments.as_slice(), index), expected);
    }

    #[test]
    fn index_at_end() {
        let cli = alpha();

        assert_eq!(complete_cli(&cli, &["-c"], 1), vec!["carl", "cathy"]);
        assert_eq!(complete_cli(&cli, &["-c"], 2), Vec::<String>::new());
    }

    #[test]
    fn inherited_options_on_sub_command() {
        let mut cli = CommandLine::new("program");
        let root = cli.root();
        cli.add_option(root, OptionSpec::flag().long("global").inherited())
            .unwrap();
        cli.add_option(root, OptionSpec::flag().long("local"))
            .unwrap();
        let sub = cli.add_command(root, "sub", "").unwrap();
        cli.add_option(sub, OptionSpec::flag().long("own")).unwrap();

        assert_eq!(
            complete_cli(&cli, &["--"], 0),
            vec!["--", "--global", "--local"]
        );
        assert_eq!(
            complete_cli(&cli, &["sub", "--"], 1),
            vec!["--", "--own", "--global"]
        );
    }
}
