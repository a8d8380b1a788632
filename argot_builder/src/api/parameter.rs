use std::str::FromStr;

use crate::api::capture::{AnonymousCapturable, Capture};
use crate::api::field::ValueParser;
use crate::model::{CommandId, HelpVisibility, OptionKind, WildcardExpansion};
use crate::prelude::CompletionSource;
use crate::schema::{OptionNode, ParameterNode};

/// An option to add to a command, via [`CommandLine::add_option`](crate::CommandLine::add_option).
///
/// Options are specified on the Cli via `-x` (short name) or `--name` (long name).
/// An option has one of three shapes:
/// * [`OptionSpec::flag`]: takes no value (ex: `--verbose`).
/// * [`OptionSpec::value`]: takes one value, where the latest occurrence wins (ex: `--count 3`).
/// * [`OptionSpec::values`]: takes one value per occurrence, collecting all of them in order (ex: `-I a -I b`).
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{CommandLine, OptionSpec};
///
/// let mut cli = CommandLine::new("program");
/// let root = cli.root();
/// let count = cli
///     .add_option(root, OptionSpec::<u32>::value("COUNT").short('c').long("count"))
///     .unwrap();
///
/// cli.execute(&["-c", "3"]).unwrap();
/// assert_eq!(cli.value(count), Some(&3));
/// ```
pub struct OptionSpec<T> {
    short: Option<char>,
    long: Option<String>,
    description: Option<String>,
    required: bool,
    inherited: bool,
    visibility: HelpVisibility,
    kind: OptionKind,
    parser: ValueParser<T>,
    fallback: Option<Box<dyn Fn() -> T>>,
    completions: Option<Box<dyn CompletionSource>>,
}

impl OptionSpec<bool> {
    /// Create an option which takes no value.
    /// Its value reads back as `true` once specified.
    pub fn flag() -> Self {
        Self::new(OptionKind::Flag, ValueParser::from_str()).fallback(|| true)
    }
}

impl<T: FromStr + 'static> OptionSpec<T> {
    /// Create an option which takes one value, converted via [`FromStr`].
    ///
    /// `parameter` names the value in the help message (ex: `COUNT` in `--count COUNT`).
    pub fn value(parameter: impl Into<String>) -> Self {
        Self::value_with(parameter, |token| T::from_str(token).ok())
    }

    /// Create a repeatable option which collects every value, converted via [`FromStr`].
    pub fn values(parameter: impl Into<String>) -> Self {
        Self::values_with(parameter, |token| T::from_str(token).ok())
    }
}

impl<T: 'static> OptionSpec<T> {
    fn new(kind: OptionKind, parser: ValueParser<T>) -> Self {
        Self {
            short: None,
            long: None,
            description: None,
            required: false,
            inherited: false,
            visibility: HelpVisibility::default(),
            kind,
            parser,
            fallback: None,
            completions: None,
        }
    }

    fn fallback(mut self, fallback: impl Fn() -> T + 'static) -> Self {
        self.fallback.replace(Box::new(fallback));
        self
    }

    /// Create an option which takes one value, converted via `parser` (`None` rejects the token).
    pub fn value_with(
        parameter: impl Into<String>,
        parser: impl Fn(&str) -> Option<T> + 'static,
    ) -> Self {
        Self::new(
            OptionKind::Monadic {
                parameter: parameter.into(),
                optional: false,
            },
            ValueParser::custom(parser),
        )
    }

    /// Create a repeatable option which collects every value, converted via `parser` (`None` rejects the token).
    pub fn values_with(
        parameter: impl Into<String>,
        parser: impl Fn(&str) -> Option<T> + 'static,
    ) -> Self {
        Self::new(
            OptionKind::Variadic {
                parameter: parameter.into(),
                optional: false,
            },
            ValueParser::custom(parser),
        )
    }

    /// Set the short name (ex: `-c`).
    pub fn short(mut self, short: char) -> Self {
        self.short.replace(short);
        self
    }

    /// Set the long name (ex: `--count`).
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long.replace(long.into());
        self
    }

    /// Document the option in the help message.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Fail the parse when the option is not specified.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Make the option available on every descendant of its command.
    pub fn inherited(mut self) -> Self {
        self.inherited = true;
        self
    }

    /// Choose when the option appears in the help message.
    pub fn visibility(mut self, visibility: HelpVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Allow the option to be specified without a value, in which case `default` is bound.
    ///
    /// A value must then be attached with `=` (ex: `--color=never`); the following argument is never taken.
    /// Has no effect on a flag.
    pub fn optional_value(mut self, default: T) -> Self
    where
        T: Clone,
    {
        if !self.kind.is_parameterized() {
            return self;
        }

        if let OptionKind::Monadic { optional, .. } | OptionKind::Variadic { optional, .. } =
            &mut self.kind
        {
            *optional = true;
        }

        self.fallback(move || default.clone())
    }

    /// Offer completion candidates for the option's value.
    pub fn completions(mut self, source: impl CompletionSource + 'static) -> Self {
        self.completions.replace(Box::new(source));
        self
    }

    pub(crate) fn consume(self, owner: CommandId) -> (OptionNode, Box<dyn AnonymousCapturable>) {
        let OptionSpec {
            short,
            long,
            description,
            required,
            inherited,
            visibility,
            kind,
            parser,
            fallback,
            completions,
        } = self;
        let mut capture = match &kind {
            OptionKind::Flag | OptionKind::Monadic { .. } => Capture::single(parser),
            OptionKind::Variadic { .. } => Capture::multiple(parser),
        };

        if let Some(fallback) = fallback {
            capture = capture.with_fallback(fallback);
        }

        (
            OptionNode {
                owner,
                short,
                long,
                description,
                required,
                inherited,
                visibility,
                kind,
                completions,
            },
            Box::new(capture),
        )
    }
}

impl<T> std::fmt::Debug for OptionSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short = match &self.short {
            Some(s) => format!(" -{s},"),
            None => "".to_string(),
        };
        let long = match &self.long {
            Some(l) => format!(" --{l},"),
            None => "".to_string(),
        };
        let description = if let Some(d) = &self.description {
            format!(", {d}")
        } else {
            "".to_string()
        };

        write!(
            f,
            "Opt[{t}, {kind},{short}{long} {description}]",
            t = std::any::type_name::<T>(),
            kind = self.kind,
        )
    }
}

/// A positional parameter to add to a command, via [`CommandLine::add_parameter`](crate::CommandLine::add_parameter).
///
/// Parameters bind in the order they are added.
/// Only the final parameter of a command may be variadic ([`ParameterSpec::values`]).
///
/// ### Example
/// ```
/// # use argot_builder as argot;
/// use argot::{CommandLine, ParameterSpec};
///
/// let mut cli = CommandLine::new("program");
/// let root = cli.root();
/// let source = cli.add_parameter(root, ParameterSpec::<String>::value("source")).unwrap();
/// let targets = cli.add_parameter(root, ParameterSpec::<String>::values("targets")).unwrap();
///
/// cli.execute(&["a", "b", "c"]).unwrap();
/// assert_eq!(cli.value(source), Some(&"a".to_string()));
/// assert_eq!(cli.values(targets), &["b".to_string(), "c".to_string()]);
/// ```
pub struct ParameterSpec<T> {
    name: String,
    description: Option<String>,
    optional: bool,
    variadic: bool,
    visibility: HelpVisibility,
    wildcards: WildcardExpansion,
    parser: ValueParser<T>,
    completions: Option<Box<dyn CompletionSource>>,
}

impl<T: FromStr + 'static> ParameterSpec<T> {
    /// Create a parameter which takes one value, converted via [`FromStr`].
    pub fn value(name: impl Into<String>) -> Self {
        Self::value_with(name, |token| T::from_str(token).ok())
    }

    /// Create a variadic parameter which collects every remaining value, converted via [`FromStr`].
    pub fn values(name: impl Into<String>) -> Self {
        Self::values_with(name, |token| T::from_str(token).ok())
    }
}

impl<T: 'static> ParameterSpec<T> {
    fn new(name: String, variadic: bool, parser: ValueParser<T>) -> Self {
        Self {
            name,
            description: None,
            optional: false,
            variadic,
            visibility: HelpVisibility::default(),
            wildcards: WildcardExpansion::default(),
            parser,
            completions: None,
        }
    }

    /// Create a parameter which takes one value, converted via `parser` (`None` rejects the token).
    pub fn value_with(name: impl Into<String>, parser: impl Fn(&str) -> Option<T> + 'static) -> Self {
        Self::new(name.into(), false, ValueParser::custom(parser))
    }

    /// Create a variadic parameter, converted via `parser` (`None` rejects the token).
    pub fn values_with(
        name: impl Into<String>,
        parser: impl Fn(&str) -> Option<T> + 'static,
    ) -> Self {
        Self::new(name.into(), true, ValueParser::custom(parser))
    }

    /// Document the parameter in the help message.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description.replace(description.into());
        self
    }

    /// Allow this parameter, and every parameter after it, to be absent.
    ///
    /// A later non-optional parameter is only enforced once this one receives a value.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Choose when the parameter appears in the help message.
    pub fn visibility(mut self, visibility: HelpVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Choose whether wildcards in the parameter's text are expanded against the file system.
    pub fn wildcards(mut self, wildcards: WildcardExpansion) -> Self {
        self.wildcards = wildcards;
        self
    }

    /// Offer completion candidates for the parameter's value.
    pub fn completions(mut self, source: impl CompletionSource + 'static) -> Self {
        self.completions.replace(Box::new(source));
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn consume(self) -> (ParameterNode, Box<dyn AnonymousCapturable>) {
        let ParameterSpec {
            name,
            description,
            optional,
            variadic,
            visibility,
            wildcards,
            parser,
            completions,
        } = self;
        let capture = if variadic {
            Capture::multiple(parser)
        } else {
            Capture::single(parser)
        };

        (
            ParameterNode {
                name,
                description,
                optional,
                variadic,
                visibility,
                wildcards,
                completions,
            },
            Box::new(capture),
        )
    }
}

impl<T> std::fmt::Debug for ParameterSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shape = if self.variadic { "Variadic" } else { "Monadic" };
        let optional = if self.optional { ", optional" } else { "" };

        write!(
            f,
            "Param[{t}, {shape}, {name}{optional}]",
            t = std::any::type_name::<T>(),
            name = self.name,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downcast<T: 'static>(capture: &dyn AnonymousCapturable) -> &Capture<T> {
        capture.as_any().downcast_ref::<Capture<T>>().unwrap()
    }

    #[test]
    fn option_flag() {
        let (node, mut capture) = OptionSpec::flag()
            .short('f')
            .long("flag")
            .description("a flag")
            .consume(CommandId(0));

        assert_eq!(node.short, Some('f'));
        assert_eq!(node.long.as_deref(), Some("flag"));
        assert_eq!(node.description.as_deref(), Some("a flag"));
        assert_eq!(node.kind, OptionKind::Flag);
        assert!(!node.required);
        assert!(!node.inherited);

        capture.matched();
        assert_eq!(downcast::<bool>(capture.as_ref()).value(), Some(&true));
    }

    #[test]
    fn option_value() {
        let (node, mut capture) = OptionSpec::<u32>::value("COUNT")
            .long("count")
            .required()
            .inherited()
            .visibility(HelpVisibility::Verbose)
            .consume(CommandId(2));

        assert_eq!(node.owner, CommandId(2));
        assert_eq!(
            node.kind,
            OptionKind::Monadic {
                parameter: "COUNT".to_string(),
                optional: false,
            }
        );
        assert!(node.required);
        assert!(node.inherited);
        assert_eq!(node.visibility, HelpVisibility::Verbose);

        capture.capture("3").unwrap();
        capture.capture("4").unwrap();
        assert_eq!(downcast::<u32>(capture.as_ref()).values(), &[4]);
    }

    #[test]
    fn option_values() {
        let (node, mut capture) = OptionSpec::<u32>::values("N").short('n').consume(CommandId(0));

        assert_matches!(node.kind, OptionKind::Variadic { optional: false, .. });

        capture.capture("3").unwrap();
        capture.capture("4").unwrap();
        assert_eq!(downcast::<u32>(capture.as_ref()).values(), &[3, 4]);
    }

    #[test]
    fn option_optional_value() {
        let (node, mut capture) = OptionSpec::<String>::value("WHEN")
            .long("color")
            .optional_value("always".to_string())
            .consume(CommandId(0));

        assert!(node.kind.is_value_optional());

        capture.matched();
        assert_eq!(
            downcast::<String>(capture.as_ref()).value(),
            Some(&"always".to_string())
        );
    }

    #[test]
    fn option_optional_value_on_flag() {
        let (node, _) = OptionSpec::flag()
            .short('f')
            .optional_value(false)
            .consume(CommandId(0));

        assert_eq!(node.kind, OptionKind::Flag);
    }

    #[test]
    fn option_value_with() {
        let (_, mut capture) = OptionSpec::value_with("HEX", |token| u8::from_str_radix(token, 16).ok())
            .short('x')
            .consume(CommandId(0));

        capture.capture("ff").unwrap();
        assert_eq!(downcast::<u8>(capture.as_ref()).value(), Some(&255));
        assert!(capture.capture("zz").is_err());
    }

    #[test]
    fn option_debug() {
        let option = OptionSpec::<u32>::value("COUNT")
            .short('c')
            .long("count")
            .description("how many");

        assert_eq!(
            format!("{option:?}"),
            "Opt[u32, Monadic(COUNT), -c, --count, , how many]"
        );
    }

    #[test]
    fn parameter_value() {
        let (node, mut capture) = ParameterSpec::<String>::value("source")
            .description("where from")
            .optional()
            .wildcards(WildcardExpansion::Always)
            .consume();

        assert_eq!(node.name, "source");
        assert_eq!(node.description.as_deref(), Some("where from"));
        assert!(node.optional);
        assert!(!node.variadic);
        assert_eq!(node.wildcards, WildcardExpansion::Always);

        capture.capture("a").unwrap();
        assert_eq!(
            downcast::<String>(capture.as_ref()).value(),
            Some(&"a".to_string())
        );
    }

    #[test]
    fn parameter_values() {
        let spec = ParameterSpec::<u32>::values("items");
        assert_eq!(spec.name(), "items");
        assert_eq!(format!("{spec:?}"), "Param[u32, Variadic, items]");

        let (node, mut capture) = spec.consume();
        assert!(node.variadic);

        capture.capture("1").unwrap();
        capture.capture("2").unwrap();
        assert_eq!(downcast::<u32>(capture.as_ref()).values(), &[1, 2]);
    }
}
