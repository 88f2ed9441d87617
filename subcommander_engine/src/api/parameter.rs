use crate::schema::{ParameterClass, ParameterDeclaration};

/// A parameter of a command: either named (`--name ..`) or positional.
///
/// Parameters are required by default.
///
/// ### Example
/// ```
/// # use subcommander_engine as subcommander;
/// use subcommander::Parameter;
///
/// let verbose = Parameter::named("verbose")
///     .alias("v")
///     .valueless()
///     .optional()
///     .help("Print more details.");
/// let target = Parameter::positional("target")
///     .default("out")
///     .help("The target directory.");
/// ```
#[derive(Debug, Clone)]
pub struct Parameter {
    inner: ParameterDeclaration,
}

impl Parameter {
    /// Create a named parameter, given on the Cli as `--name value` or `--name=value` (or `-n value` for a single character name).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            inner: ParameterDeclaration::new(ParameterClass::Named, name),
        }
    }

    /// Create a positional parameter.
    ///
    /// The order in which positional parameters are added to a command is their order on the Cli.
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            inner: ParameterDeclaration::new(ParameterClass::Positional, name),
        }
    }

    /// Document the parameter.
    /// If repeated, only the final help message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.inner.help.replace(description.into());
        self
    }

    /// Make the parameter optional.
    pub fn optional(mut self) -> Self {
        self.inner.optional = true;
        self
    }

    /// Make the named parameter valueless: it never consumes a value, and resolves to a boolean.
    pub fn valueless(mut self) -> Self {
        self.inner.valueless = true;
        self
    }

    /// Provide a default value, which makes the parameter optional.
    ///
    /// A positional parameter may not be both explicitly optional and defaulted.
    pub fn default(mut self, value: impl Into<String>) -> Self {
        self.inner.default.replace(value.into());
        self
    }

    /// Add an alias for the named parameter.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.inner.aliases.push(alias.into());
        self
    }

    pub(crate) fn consume(self) -> ParameterDeclaration {
        self.inner
    }
}
