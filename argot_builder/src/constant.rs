pub(crate) const OPTIONS_TERMINATOR: &str = "--";
pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: char = 'h';
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";
pub(crate) const VERBOSE_NAME: &str = "verbose";
pub(crate) const VERBOSE_SHORT: char = 'v';
pub(crate) const VERBOSE_MESSAGE: &str = "Include every option and parameter in the help message.";
pub(crate) const INVOKE_DEFAULT: i32 = -1;
pub(crate) const HELP_EXIT: i32 = 0;
pub(crate) const ERROR_EXIT: i32 = 1;
