use std::marker::PhantomData;

/// Identifies a command in a [`CommandLine`](crate::CommandLine).
///
/// The root command is created along with the command line (see [`CommandLine::root`](crate::CommandLine::root)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct OptionKey(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ParameterKey(pub(crate) usize);

/// Where the bound values of an option or parameter live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[doc(hidden)]
pub enum SlotKey {
    Option(usize),
    Parameter(usize),
}

/// Typed handle to an option, returned by [`CommandLine::add_option`](crate::CommandLine::add_option).
pub struct OptionId<T> {
    pub(crate) key: OptionKey,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> OptionId<T> {
    pub(crate) fn new(key: OptionKey) -> Self {
        Self {
            key,
            _phantom: PhantomData,
        }
    }
}

/// Typed handle to a positional parameter, returned by [`CommandLine::add_parameter`](crate::CommandLine::add_parameter).
pub struct ParameterId<T> {
    pub(crate) key: ParameterKey,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> ParameterId<T> {
    pub(crate) fn new(key: ParameterKey) -> Self {
        Self {
            key,
            _phantom: PhantomData,
        }
    }
}

// Manual impls: derive would demand `T: Clone`.
impl<T> Clone for OptionId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for OptionId<T> {}

impl<T> Clone for ParameterId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ParameterId<T> {}

impl<T> std::fmt::Debug for OptionId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OptionId[{}, {}]", self.key.0, std::any::type_name::<T>())
    }
}

impl<T> std::fmt::Debug for ParameterId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ParameterId[{}, {}]",
            self.key.0,
            std::any::type_name::<T>()
        )
    }
}

/// A handle whose bound values may be read back with type `T`.
///
/// Implemented by [`OptionId`] and [`ParameterId`].
pub trait Slot<T> {
    #[doc(hidden)]
    fn slot_key(&self) -> SlotKey;
}

impl<T> Slot<T> for OptionId<T> {
    fn slot_key(&self) -> SlotKey {
        SlotKey::Option(self.key.0)
    }
}

impl<T> Slot<T> for ParameterId<T> {
    fn slot_key(&self) -> SlotKey {
        SlotKey::Parameter(self.key.0)
    }
}

/// When an option or parameter appears in the help output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HelpVisibility {
    /// Always listed.
    #[default]
    Always,
    /// Listed only in verbose help (see [`CommandLine::set_verbose_option`](crate::CommandLine::set_verbose_option)).
    Verbose,
    /// Never listed.
    Never,
}

impl HelpVisibility {
    pub(crate) fn shown(&self, verbose: bool) -> bool {
        match self {
            HelpVisibility::Always => true,
            HelpVisibility::Verbose => verbose,
            HelpVisibility::Never => false,
        }
    }
}

/// The shape of the values an option takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OptionKind {
    /// `--flag`: no value.
    Flag,
    /// `--name VALUE`: the latest value wins.
    Monadic { parameter: String, optional: bool },
    /// `--name VALUE`, repeatable: every value is collected in order.
    Variadic { parameter: String, optional: bool },
}

impl OptionKind {
    pub(crate) fn parameter(&self) -> Option<&str> {
        match self {
            OptionKind::Flag => None,
            OptionKind::Monadic { parameter, .. } | OptionKind::Variadic { parameter, .. } => {
                Some(parameter)
            }
        }
    }

    pub(crate) fn is_parameterized(&self) -> bool {
        !matches!(self, OptionKind::Flag)
    }

    /// Whether the option may be accepted without a value.
    pub(crate) fn is_value_optional(&self) -> bool {
        match self {
            OptionKind::Flag => false,
            OptionKind::Monadic { optional, .. } | OptionKind::Variadic { optional, .. } => {
                *optional
            }
        }
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionKind::Flag => write!(f, "Flag"),
            OptionKind::Monadic { parameter, .. } => write!(f, "Monadic({parameter})"),
            OptionKind::Variadic { parameter, .. } => write!(f, "Variadic({parameter})"),
        }
    }
}

/// Whether wildcards (`*` and `?`) in a positional parameter are expanded against the file system.
///
/// Unix shells expand wildcards before the program starts; the Windows shell does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WildcardExpansion {
    /// Bind the text as typed.
    #[default]
    Never,
    /// Expand only when compiled for Windows.
    Windows,
    /// Expand on every platform.
    Always,
}

impl WildcardExpansion {
    pub(crate) fn applies(&self) -> bool {
        match self {
            WildcardExpansion::Never => false,
            WildcardExpansion::Windows => cfg!(windows),
            WildcardExpansion::Always => true,
        }
    }
}
