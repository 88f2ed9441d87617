use indexmap::IndexMap;
use std::collections::HashMap;

use crate::api::Parameter;
use crate::constant::*;
use crate::model::CountCheck;
use crate::parser::{
    Action, Application, ConfigError, ConsoleInterface, HandlerResult, Invocation, Printer,
    RegisteredCommand, UserInterface,
};
use crate::schema::{CommandDeclaration, CommandSchema};

/// A command of the application: a name, its parameters, and what to do with them.
///
/// ### Example
/// ```
/// # use subcommander_engine as subcommander;
/// use subcommander::{Command, CommandLineApplication, Parameter};
///
/// let mut copied: Vec<(String, String)> = Vec::default();
/// let mut application = CommandLineApplication::new("program")
///     .command(
///         Command::new("copy", |invocation| {
///             copied.push((
///                 invocation.value("from").unwrap_or_default().to_string(),
///                 invocation.positional_value(0).unwrap_or_default().to_string(),
///             ));
///             Ok(None)
///         })
///         .alias("cp")
///         .about("Copy a file.")
///         .add(Parameter::named("from").alias("f"))
///         .add(Parameter::positional("to")),
///     )
///     .build();
///
/// assert_eq!(application.run(&["program", "cp", "-f", "a.txt", "b.txt"]), 0);
/// drop(application);
/// assert_eq!(copied, vec![("a.txt".to_string(), "b.txt".to_string())]);
/// ```
pub struct Command<'a> {
    declaration: CommandDeclaration,
    aliases: Vec<String>,
    action: Action<'a>,
}

impl<'a> Command<'a> {
    /// Create a command which runs `handler` with the resolved [`Invocation`].
    ///
    /// The handler may return an exit status; `None` (or `Some(0)`) is success.
    /// A returned [`crate::UsageError`] fails the run as a user mistake; any other error is reported as unhandled.
    pub fn new(
        name: impl Into<String>,
        handler: impl FnMut(&Invocation) -> HandlerResult + 'a,
    ) -> Self {
        Self {
            declaration: CommandDeclaration::new(name),
            aliases: Vec::default(),
            action: Action::Handler(Box::new(handler)),
        }
    }

    /// Create a command which delegates to a nested application.
    ///
    /// The tokens following the command name are run by `nested`, as if it were invoked directly.
    /// The command itself accepts anything, and leaves `--help` to the nested application.
    ///
    /// ### Example
    /// ```
    /// # use subcommander_engine as subcommander;
    /// use subcommander::{Command, CommandLineApplication, Parameter};
    ///
    /// let mut added: Option<String> = None;
    /// let remote = CommandLineApplication::new("remote")
    ///     .command(
    ///         Command::new("add", |invocation| {
    ///             added = invocation.positional_value(0).map(str::to_string);
    ///             Ok(None)
    ///         })
    ///         .add(Parameter::positional("url")),
    ///     )
    ///     .build();
    /// let mut application = CommandLineApplication::new("program")
    ///     .command(Command::category("remote", remote))
    ///     .build();
    ///
    /// assert_eq!(application.run(&["program", "remote", "add", "https://example.com"]), 0);
    /// drop(application);
    /// assert_eq!(added, Some("https://example.com".to_string()));
    /// ```
    pub fn category(name: impl Into<String>, nested: Application<'a>) -> Self {
        Self {
            declaration: CommandDeclaration {
                positional_count_check: Some(CountCheck::Ignore),
                unexpected_named_check: Some(CountCheck::Ignore),
                allow_help_named: Some(false),
                ..CommandDeclaration::new(name)
            },
            aliases: Vec::default(),
            action: Action::Category(Box::new(nested)),
        }
    }

    /// Document the about message for this command.
    /// If repeated, only the final message will apply.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.declaration.about.replace(description.into());
        self
    }

    /// Add a parameter to the command.
    ///
    /// The order of positional parameters corresponds to their order on the Cli.
    /// The order of named parameters does not affect the command semantics.
    pub fn add(mut self, parameter: Parameter) -> Self {
        self.declaration.parameters.push(parameter.consume());
        self
    }

    /// Add an alternate name by which the command may be invoked.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add an alias for the named parameter `target`, equivalent to [`Parameter::alias`].
    pub fn named_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.declaration
            .named_aliases
            .push((alias.into(), target.into()));
        self
    }

    /// Set the policy for positional values beyond those declared (default: [`CountCheck::Ignore`]).
    /// Excess values are always retained in the invocation.
    pub fn positional_count_check(mut self, check: CountCheck) -> Self {
        self.declaration.positional_count_check.replace(check);
        self
    }

    /// Set the policy for named arguments which are not declared (default: [`CountCheck::Error`]).
    pub fn unexpected_named_check(mut self, check: CountCheck) -> Self {
        self.declaration.unexpected_named_check.replace(check);
        self
    }

    /// Set whether `--help` (or `--?`) shows this command's usage instead of running it (default: `true`).
    pub fn allow_help_named(mut self, allow: bool) -> Self {
        self.declaration.allow_help_named.replace(allow);
        self
    }

    /// Run this command when the first token names no command.
    /// Without a default command, the application help is shown.
    pub fn as_default(mut self) -> Self {
        self.declaration.is_default = true;
        self
    }
}

/// The command line application builder.
///
/// A `help` command is always registered: `program help` describes the application, and `program help <command>` describes a command.
///
/// ### Example
/// ```
/// # use subcommander_engine as subcommander;
/// use subcommander::CommandLineApplication;
///
/// let mut application = CommandLineApplication::new("program")
///     .about("My program that does awesome stuff.")
///     // Configure with CommandLineApplication::command.
///     .build();
///
/// assert_eq!(application.run(&["program", "help"]), 0);
/// ```
pub struct CommandLineApplication<'a> {
    name: String,
    about: Option<String>,
    commands: IndexMap<String, RegisteredCommand<'a>>,
    deferred_error: Option<ConfigError>,
}

impl<'a> CommandLineApplication<'a> {
    /// Create a command line application.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            commands: IndexMap::default(),
            deferred_error: None,
        }
    }

    /// Document the about message for this application.
    /// If repeated, only the final message will apply.
    ///
    /// We recommend allowing the application to format this field (ex: it is not recommended to use line breaks `'\n'`).
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Register a command.
    ///
    /// Configuration errors (ex: a repeated parameter name) are reported when the application is built.
    pub fn command(mut self, command: Command<'a>) -> Self {
        let Command {
            declaration,
            aliases,
            action,
        } = command;
        let name = declaration.name.clone();

        if name == HELP_COMMAND || self.commands.contains_key(&name) {
            self.defer(ConfigError(format!(
                "application '{program}' cannot duplicate the command '{name}'.",
                program = self.name
            )));
            return self;
        }

        match CommandSchema::build(declaration) {
            Ok(schema) => {
                self.commands.insert(
                    name,
                    RegisteredCommand {
                        schema,
                        aliases,
                        action,
                    },
                );
            }
            Err(error) => self.defer(error),
        }

        self
    }

    fn defer(&mut self, error: ConfigError) {
        if self.deferred_error.is_none() {
            self.deferred_error.replace(error);
        }
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<Application<'a>, ConfigError> {
        let CommandLineApplication {
            name: program,
            about,
            commands: registered,
            deferred_error,
        } = self;

        if let Some(error) = deferred_error {
            return Err(error);
        }

        let mut commands = IndexMap::default();
        commands.insert(
            HELP_COMMAND.to_string(),
            RegisteredCommand {
                schema: CommandSchema::build(CommandDeclaration::help())?,
                aliases: Vec::default(),
                action: Action::Help,
            },
        );
        commands.extend(registered);

        let mut aliases: HashMap<&str, &str> = HashMap::default();

        for (name, command) in commands.iter() {
            for alias in &command.aliases {
                if commands.contains_key(alias) {
                    return Err(ConfigError(format!(
                        "application '{program}' alias '{alias}' collides with the command '{alias}'."
                    )));
                }

                if let Some(existing) = aliases.insert(alias, name) {
                    return Err(ConfigError(format!(
                        "application '{program}' alias '{alias}' cannot refer to both '{existing}' and '{name}'."
                    )));
                }
            }
        }

        let defaults: Vec<&String> = commands
            .iter()
            .filter(|(_, command)| command.schema.is_default)
            .map(|(name, _)| name)
            .collect();
        let default_command = match defaults.as_slice() {
            [] => HELP_COMMAND.to_string(),
            [name] => name.to_string(),
            _ => {
                return Err(ConfigError(format!(
                    "application '{program}' cannot have multiple default commands: {}.",
                    defaults
                        .iter()
                        .map(|name| format!("'{name}'"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            }
        };

        for (name, command) in commands.iter_mut() {
            if let Action::Category(nested) = &mut command.action {
                nested.rename(format!("{program} {name}"));
            }
        }

        Ok(Application::new(
            program,
            about,
            commands,
            default_command,
            Printer::terminal(),
            user_interface,
        ))
    }

    /// Build the command line application as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    pub fn build_application(self) -> Result<Application<'a>, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line application.
    /// This finalizes the configuration and checks for errors (ex: a repeated parameter name).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> Application<'a> {
        match self.build_application() {
            Ok(application) => application,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}
