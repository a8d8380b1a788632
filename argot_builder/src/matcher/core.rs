use crate::constant::OPTIONS_TERMINATOR;
use crate::matcher::model::*;
use crate::model::OptionKey;
use crate::schema::Schema;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Classifies raw Cli arguments against the command tree, one token at a time.
///
/// The classifier tracks the active command, the `--` terminator, and whether the command is determined.
/// A bundled short option argument (ex: `-xyz`) is classified one character per call:
/// after [`Classifier::classify`] the caller must drain [`Classifier::next_short`] while [`Classifier::has_pending_shorts`].
pub(crate) struct Classifier<'s, 'a> {
    schema: &'s Schema,
    state: ClassifyState,
    visible: Vec<OptionKey>,
    pending: Option<PendingShorts<'a>>,
}

impl<'s, 'a> Classifier<'s, 'a> {
    pub(crate) fn new(schema: &'s Schema) -> Self {
        let root = schema.root();
        Self {
            schema,
            state: ClassifyState::new(root),
            visible: schema.visible_options(root),
            pending: None,
        }
    }

    pub(crate) fn state(&self) -> &ClassifyState {
        &self.state
    }

    /// The options acceptable under the active command.
    pub(crate) fn visible_options(&self) -> &[OptionKey] {
        &self.visible
    }

    pub(crate) fn has_pending_shorts(&self) -> bool {
        self.pending.is_some()
    }

    /// Classify the next whole argument.
    pub(crate) fn classify(&mut self, argument: &'a str) -> Token<'a> {
        assert!(
            self.pending.is_none(),
            "internal error - must drain the pending short options before classifying the next argument"
        );

        if !self.state.options_terminated {
            // 1. Find the options terminator:
            //  --
            // 2. Find a 'long' option, such as:
            //  --initial
            //  --initial=..
            // 3. Find 'short' option(s), such as (both -i and -v are example short options):
            //  -i
            //  -i=..
            //  -iv
            //  -iv=..
            if argument == OPTIONS_TERMINATOR {
                self.state.options_terminated = true;
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Options terminated.");
                }
                return Token::Terminator;
            }

            if let Some(long) = argument.strip_prefix(OPTIONS_TERMINATOR) {
                let (name, value) = split_equals_delimiter(long);
                return match self.find_long(name) {
                    Some(option) => {
                        self.resolved(option);
                        Token::LongOption {
                            option,
                            name,
                            value,
                        }
                    }
                    None => Token::UnrecognizedLongOption(name),
                };
            }

            if argument.len() > 1 && argument.starts_with('-') {
                self.pending.replace(PendingShorts {
                    argument,
                    offset: 1,
                });
                return self.next_short();
            }
        }

        // 4. Match against a sub-command.
        if !self.state.command_determined {
            if let Some(command) = self.schema.subcommand(self.state.command, argument) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Command '{argument}' selected.");
                }
                self.state.command = command;
                self.visible = self.schema.visible_options(command);
                return Token::Command(command);
            }

            self.state.command_determined = true;
        }

        // 5. Match against a parameter.
        Token::Parameter(argument)
    }

    /// Classify the next character of the bundled short option argument.
    pub(crate) fn next_short(&mut self) -> Token<'a> {
        let pending = self
            .pending
            .take()
            .expect("internal error - there must be pending short options");
        let single = pending
            .remaining()
            .chars()
            .next()
            .expect("internal error - pending short options must not be empty");
        let offset = pending.offset + single.len_utf8();
        let remainder = &pending.argument[offset..];

        let value = match remainder.strip_prefix('=') {
            // An '=' ends the bundle: the rest is the value for this option.
            Some(value) => Some(value),
            None => {
                if !remainder.is_empty() {
                    self.pending.replace(PendingShorts {
                        argument: pending.argument,
                        offset,
                    });
                }

                None
            }
        };

        match self.find_short(single) {
            Some(option) => {
                self.resolved(option);
                Token::ShortOption {
                    option,
                    name: single,
                    value,
                }
            }
            None => Token::UnrecognizedShortOption(single),
        }
    }

    fn find_short(&self, single: char) -> Option<OptionKey> {
        self.visible
            .iter()
            .find(|key| self.schema.option(**key).short == Some(single))
            .cloned()
    }

    fn find_long(&self, name: &str) -> Option<OptionKey> {
        self.visible
            .iter()
            .find(|key| self.schema.option(**key).long.as_deref() == Some(name))
            .cloned()
    }

    fn resolved(&mut self, option: OptionKey) {
        // Inherited options are acceptable on any descendant, so they do not pin the command.
        if !self.schema.option(option).inherited && !self.state.command_determined {
            #[cfg(feature = "tracing_debug")]
            {
                debug!(
                    "Option '{}' determines the command.",
                    self.schema.option(option).display_name()
                );
            }
            self.state.command_determined = true;
        }
    }
}

pub(crate) fn split_equals_delimiter(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((n, v)) => (n, Some(v)),
        None => (token, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OptionKind;
    use crate::schema::test::*;
    use rstest::rstest;

    fn classify_all<'a>(classifier: &mut Classifier<'_, 'a>, argument: &'a str) -> Vec<Token<'a>> {
        let mut out = vec![classifier.classify(argument)];

        while classifier.has_pending_shorts() {
            out.push(classifier.next_short());
        }

        out
    }

    #[rstest]
    #[case("abc")]
    #[case("-")]
    #[case("")]
    #[case("a-b")]
    fn not_an_option(#[case] argument: &str) {
        let builder = SchemaBuilder::new();
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(classifier.classify(argument), Token::Parameter(argument));
        assert!(classifier.state().command_determined);
    }

    #[rstest]
    #[case("--alpha", "alpha", None)]
    #[case("--alpha=", "alpha", Some(""))]
    #[case("--alpha=1", "alpha", Some("1"))]
    #[case("--alpha=a=b", "alpha", Some("a=b"))]
    fn long_option(#[case] argument: &str, #[case] name: &str, #[case] value: Option<&str>) {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        let alpha = builder.option(root, None, Some("alpha"), monadic("A"), false);
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(
            classifier.classify(argument),
            Token::LongOption {
                option: alpha,
                name,
                value,
            }
        );
        assert!(!classifier.has_pending_shorts());
    }

    #[test]
    fn long_option_unrecognized() {
        let builder = SchemaBuilder::new();
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(
            classifier.classify("--beta=1"),
            Token::UnrecognizedLongOption("beta")
        );
    }

    #[test]
    fn short_options_bundled() {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        let a = builder.flag(root, 'a', "alpha");
        let b = builder.flag(root, 'b', "bravo");
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(
            classify_all(&mut classifier, "-ab"),
            vec![
                Token::ShortOption {
                    option: a,
                    name: 'a',
                    value: None,
                },
                Token::ShortOption {
                    option: b,
                    name: 'b',
                    value: None,
                },
            ]
        );
    }

    #[rstest]
    #[case("-ab=x", Some("x"))]
    #[case("-ab=", Some(""))]
    #[case("-ab=x=y", Some("x=y"))]
    #[case("-ab", None)]
    fn short_options_equals(#[case] argument: &str, #[case] value: Option<&str>) {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        let a = builder.flag(root, 'a', "alpha");
        let b = builder.option(root, Some('b'), None, monadic("B"), false);
        let mut classifier = Classifier::new(&builder.schema);

        let tokens = classify_all(&mut classifier, argument);

        assert_eq!(
            tokens,
            vec![
                Token::ShortOption {
                    option: a,
                    name: 'a',
                    value: None,
                },
                Token::ShortOption {
                    option: b,
                    name: 'b',
                    value,
                },
            ]
        );
    }

    #[test]
    fn short_option_equals_stops_bundle() {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        let a = builder.option(root, Some('a'), None, monadic("A"), false);
        builder.flag(root, 'b', "bravo");
        let mut classifier = Classifier::new(&builder.schema);

        // The 'b' after '=' is part of the value, not another option.
        assert_eq!(
            classify_all(&mut classifier, "-a=b"),
            vec![Token::ShortOption {
                option: a,
                name: 'a',
                value: Some("b"),
            }]
        );
    }

    #[test]
    fn short_option_unrecognized_continues() {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        let a = builder.flag(root, 'a', "alpha");
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(
            classify_all(&mut classifier, "-za"),
            vec![
                Token::UnrecognizedShortOption('z'),
                Token::ShortOption {
                    option: a,
                    name: 'a',
                    value: None,
                },
            ]
        );
    }

    #[test]
    fn short_option_multibyte() {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        let lambda = builder.option(root, Some('λ'), None, OptionKind::Flag, false);
        let a = builder.flag(root, 'a', "alpha");
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(
            classify_all(&mut classifier, "-λa"),
            vec![
                Token::ShortOption {
                    option: lambda,
                    name: 'λ',
                    value: None,
                },
                Token::ShortOption {
                    option: a,
                    name: 'a',
                    value: None,
                },
            ]
        );
    }

    #[test]
    #[should_panic(expected = "internal error - there must be pending short options")]
    fn next_short_without_pending() {
        let builder = SchemaBuilder::new();
        let mut classifier = Classifier::new(&builder.schema);
        classifier.next_short();
    }

    #[test]
    fn terminator() {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        builder.flag(root, 'o', "one");
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(classifier.classify("--"), Token::Terminator);
        assert!(classifier.state().options_terminated);
        assert_eq!(classifier.classify("-o"), Token::Parameter("-o"));
        assert_eq!(classifier.classify("--one"), Token::Parameter("--one"));
        assert_eq!(classifier.classify("--"), Token::Parameter("--"));
    }

    #[test]
    fn sub_command() {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        let sub = builder.command(root, "sub");
        let leaf = builder.command(sub, "leaf");
        let leaf_option = builder.flag(leaf, 'l', "leaf");
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(classifier.classify("sub"), Token::Command(sub));
        assert_eq!(classifier.state().command, sub);
        assert_eq!(classifier.classify("leaf"), Token::Command(leaf));
        assert_eq!(classifier.visible_options(), &[leaf_option]);
        // Names are no longer matched once the command is determined.
        assert_eq!(classifier.classify("x"), Token::Parameter("x"));
        assert_eq!(classifier.classify("leaf"), Token::Parameter("leaf"));
    }

    #[test]
    fn sub_command_is_case_sensitive() {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        builder.command(root, "sub");
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(classifier.classify("SUB"), Token::Parameter("SUB"));
        assert_eq!(classifier.state().command, root);
    }

    #[test]
    fn sub_command_after_terminator() {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        let sub = builder.command(root, "sub");
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(classifier.classify("--"), Token::Terminator);
        assert_eq!(classifier.classify("sub"), Token::Command(sub));
    }

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn option_determines_command(#[case] inherited: bool, #[case] sub_command_matches: bool) {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        let sub = builder.command(root, "sub");
        builder.option(root, Some('v'), None, OptionKind::Flag, inherited);
        let mut classifier = Classifier::new(&builder.schema);

        assert_matches!(classifier.classify("-v"), Token::ShortOption { .. });
        assert_eq!(classifier.state().command_determined, !inherited);

        let expected = if sub_command_matches {
            Token::Command(sub)
        } else {
            Token::Parameter("sub")
        };
        assert_eq!(classifier.classify("sub"), expected);
    }

    #[test]
    fn inherited_option_visible_on_sub_command() {
        let mut builder = SchemaBuilder::new();
        let root = builder.schema.root();
        let sub = builder.command(root, "sub");
        let verbose = builder.option(root, Some('v'), None, OptionKind::Flag, true);
        builder.flag(root, 'p', "private");
        let mut classifier = Classifier::new(&builder.schema);

        assert_eq!(classifier.classify("sub"), Token::Command(sub));
        assert_eq!(
            classifier.classify("-v"),
            Token::ShortOption {
                option: verbose,
                name: 'v',
                value: None,
            }
        );
        assert_eq!(
            classifier.classify("--private"),
            Token::UnrecognizedLongOption("private")
        );
        assert_eq!(classifier.state().command, sub);
    }

    #[rstest]
    #[case("a", ("a", None))]
    #[case("a=", ("a", Some("")))]
    #[case("a=b", ("a", Some("b")))]
    #[case("=b", ("", Some("b")))]
    fn split_equals(#[case] token: &str, #[case] expected: (&str, Option<&str>)) {
        assert_eq!(split_equals_delimiter(token), expected);
    }
}
