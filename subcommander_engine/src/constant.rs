pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_ALTERNATE: &str = "?";
pub(crate) const HELP_COMMAND: &str = "help";
pub(crate) const HELP_MESSAGE: &str = "Show usage information for the application or a command.";
pub(crate) const HELP_TARGET: &str = "command";
pub(crate) const NO_DESCRIPTION: &str = "No description.";
pub(crate) const DEFAULT_FAILURE_EXIT_CODE: i32 = 1;
// Rust processes expose only the program path ahead of the user tokens.
pub(crate) const RUNTIME_PREFIX: usize = 1;
