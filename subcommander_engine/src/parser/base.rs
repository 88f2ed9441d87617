use std::collections::HashMap;
use thiserror::Error;

use crate::constant::*;
use crate::model::NamedValue;

/// An error in the configuration of the application, such as a repeated parameter name.
///
/// Configuration errors are discovered while commands are registered, never during dispatch.
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

/// A user-facing failure.
///
/// Raised for missing required arguments, excess positional arguments, unexpected named arguments and invalid invocations.
/// Handlers may return it (boxed) to fail with the same treatment.
///
/// ### Example
/// ```
/// # use subcommander_engine as subcommander;
/// use subcommander::UsageError;
///
/// let error = UsageError::new("The file 'x' does not exist.").with_exit_code(2);
/// assert_eq!(error.to_string(), "The file 'x' does not exist.");
/// assert_eq!(error.exit_code(), Some(2));
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct UsageError {
    message: String,
    usage: Option<String>,
    exit_code: Option<i32>,
}

impl UsageError {
    /// Create a usage error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            usage: None,
            exit_code: None,
        }
    }

    /// Set the process exit code to use for this failure.
    /// When unset, [`RunOptions::failure_exit_code`] applies.
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code.replace(exit_code);
        self
    }

    /// Attach usage instructions, printed after the message.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage.replace(usage.into());
        self
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The usage instructions, if any.
    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    /// The process exit code for this failure, if explicitly set.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }
}

/// The failures which `Application::run_with` may surface.
#[derive(Debug, Error)]
pub enum RunError {
    /// A user-facing failure.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// An invariant violation in the integration (a bug, not a user mistake).
    #[error("internal error - {0}")]
    Internal(String),

    /// A handler failed with an error of its own.
    #[error("command '{command}' failed")]
    Handler {
        /// The command whose handler failed.
        command: String,
        /// The handler's error.
        #[source]
        source: HandlerError,
    },
}

impl RunError {
    pub(crate) fn from_handler(command: &str, error: HandlerError) -> Self {
        match error.downcast::<UsageError>() {
            Ok(usage_error) => RunError::Usage(*usage_error),
            Err(source) => RunError::Handler {
                command: command.to_string(),
                source,
            },
        }
    }
}

/// The error type handlers may fail with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// The result of a command handler: optionally, an exit status.
pub type HandlerResult = Result<Option<i32>, HandlerError>;

/// Options controlling a single run of an `Application`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Exit the process as soon as a handler returns an exit status.
    pub exit_immediately: bool,
    /// Return failures to the caller instead of printing them.
    pub throw_errors: bool,
    /// The exit code for failures which do not carry their own.
    pub failure_exit_code: i32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            exit_immediately: false,
            throw_errors: false,
            failure_exit_code: DEFAULT_FAILURE_EXIT_CODE,
        }
    }
}

/// The fully resolved invocation handed to a command handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub(crate) command: String,
    pub(crate) positional: Vec<Option<String>>,
    pub(crate) named: HashMap<String, NamedValue>,
    pub(crate) unparsed: Vec<String>,
    pub(crate) runtime: Vec<String>,
    pub(crate) options: RunOptions,
}

impl Invocation {
    /// The canonical name of the invoked command.
    pub fn command_name(&self) -> &str {
        &self.command
    }

    /// The positional values, in declaration order.
    ///
    /// Optional slots that were not supplied (and have no default) are `None`.
    /// Excess values (beyond those declared) are retained at the end.
    pub fn positional(&self) -> &[Option<String>] {
        &self.positional
    }

    /// The positional value at `index`, if supplied or defaulted.
    pub fn positional_value(&self, index: usize) -> Option<&str> {
        self.positional.get(index).and_then(|value| value.as_deref())
    }

    /// The resolved named values, keyed by canonical name.
    pub fn named(&self) -> &HashMap<String, NamedValue> {
        &self.named
    }

    /// The resolved value of the named argument `name`.
    pub fn named_value(&self, name: &str) -> Option<&NamedValue> {
        self.named.get(name)
    }

    /// The string value of the named argument `name`, if it has one.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.named.get(name).and_then(NamedValue::as_str)
    }

    /// Whether the valueless argument `name` was present.
    pub fn flag(&self, name: &str) -> bool {
        self.named
            .get(name)
            .and_then(NamedValue::as_flag)
            .unwrap_or(false)
    }

    /// The raw tokens that followed the command name.
    pub fn unparsed(&self) -> &[String] {
        &self.unparsed
    }

    /// The runtime identification prefix of the argument vector (the program path).
    pub fn runtime(&self) -> &[String] {
        &self.runtime
    }

    /// The options of the run which produced this invocation.
    pub fn options(&self) -> RunOptions {
        self.options
    }
}
