/// The policy applied when a command receives more input than it declares.
///
/// Used for both excess positional values and unexpected named arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountCheck {
    /// Fail the invocation with a usage error.
    Error,
    /// Print a warning and continue.
    Warn,
    /// Continue silently.
    Ignore,
}

impl std::fmt::Display for CountCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountCheck::Error => write!(f, "error"),
            CountCheck::Warn => write!(f, "warn"),
            CountCheck::Ignore => write!(f, "ignore"),
        }
    }
}

/// The resolved value of a named argument, as handed to a command handler.
///
/// Optional arguments that were never mentioned (and carry no default) are absent from the
/// resolved map entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedValue {
    /// A raw string value, either supplied on the Cli or taken from the declared default.
    Text(String),
    /// The argument was mentioned without a value (ex: `--name` at the end of the input).
    Null,
    /// The resolved value of a valueless argument: `true` iff the flag was present.
    Flag(bool),
}

impl NamedValue {
    /// The string value, if this is a `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NamedValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The boolean value, if this is a `Flag`.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            NamedValue::Flag(value) => Some(*value),
            _ => None,
        }
    }
}

impl std::fmt::Display for NamedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamedValue::Text(value) => write!(f, "{value}"),
            NamedValue::Null => write!(f, "null"),
            NamedValue::Flag(value) => write!(f, "{value}"),
        }
    }
}
