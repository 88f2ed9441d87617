use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::env;

use crate::constant::*;
use crate::parser::base::*;
use crate::parser::interface::UserInterface;
use crate::parser::printer::{CommandRow, Printer};
use crate::parser::resolver::Resolver;
use crate::schema::{is_help_name, CommandSchema};
use crate::tokens::tokenize;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// What a registered command does once its arguments are resolved.
pub(crate) enum Action<'a> {
    Handler(Box<dyn FnMut(&Invocation) -> HandlerResult + 'a>),
    Category(Box<Application<'a>>),
    Help,
}

pub(crate) struct RegisteredCommand<'a> {
    pub(crate) schema: CommandSchema,
    pub(crate) aliases: Vec<String>,
    pub(crate) action: Action<'a>,
}

/// The configured command line application.
/// Built via `CommandLineApplication::build`.
pub struct Application<'a> {
    name: String,
    about: Option<String>,
    commands: IndexMap<String, RegisteredCommand<'a>>,
    aliases: HashMap<String, String>,
    default_command: String,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl<'a> std::fmt::Debug for Application<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .field("default_command", &self.default_command)
            .finish()
    }
}

impl<'a> Application<'a> {
    pub(crate) fn new(
        name: impl Into<String>,
        about: Option<String>,
        commands: IndexMap<String, RegisteredCommand<'a>>,
        default_command: impl Into<String>,
        printer: Printer,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        let aliases = commands
            .iter()
            .flat_map(|(name, command)| {
                command
                    .aliases
                    .iter()
                    .map(move |alias| (alias.clone(), name.clone()))
            })
            .collect();

        Self {
            name: name.into(),
            about,
            commands,
            aliases,
            default_command: default_command.into(),
            printer,
            user_interface,
        }
    }

    /// The name the application is invoked by (as shown in usage instructions).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Run the application against the argument vector, using the default [`RunOptions`].
    ///
    /// The first token of `args` identifies the program (as `argv[0]` does); the rest are dispatched.
    /// Failures are printed, and their exit code returned.
    ///
    /// ### Example
    /// ```
    /// # use subcommander_engine as subcommander;
    /// use subcommander::{Command, CommandLineApplication};
    ///
    /// let mut greeted = None;
    /// let mut application = CommandLineApplication::new("program")
    ///     .command(Command::new("greet", |invocation| {
    ///         greeted = invocation.positional_value(0).map(str::to_string);
    ///         Ok(None)
    ///     }))
    ///     .build();
    ///
    /// assert_eq!(application.run(&["program", "greet", "world"]), 0);
    /// drop(application);
    /// assert_eq!(greeted, Some("world".to_string()));
    /// ```
    pub fn run(&mut self, args: &[&str]) -> i32 {
        let options = RunOptions::default();

        match self.run_with(args, options) {
            Ok(status) => status,
            Err(error) => self.settle(error, options),
        }
    }

    /// Run the application against the argument vector.
    ///
    /// The run proceeds as follows:
    /// 1. The program prefix is split off.
    /// 2. The first token selects the command (by name or alias); otherwise the default command applies.
    /// 3. A `--help` (or `--?`) argument redirects to the `help` command, unless the selected command disallows it.
    /// 4. The remaining tokens are resolved against the command's parameters.
    /// 5. The command's handler runs, and its returned status is interpreted.
    ///
    /// A non-zero handler status fails the run, unless [`RunOptions::exit_immediately`] is set, in which case the process exits with that status.
    ///
    /// Failures are printed and mapped to an exit code, unless [`RunOptions::throw_errors`] is set.
    pub fn run_with(&mut self, args: &[&str], options: RunOptions) -> Result<i32, RunError> {
        match self.dispatch(args, options) {
            Ok(status) => Ok(status),
            Err(error) if options.throw_errors => Err(error),
            Err(error) => Ok(self.settle(error, options)),
        }
    }

    /// Run the application against the Cli [`env::args`].
    ///
    /// If the run does not succeed, exits with its exit code (via [`std::process::exit`]).
    pub fn run_env(&mut self) {
        let args: Vec<String> = env::args().collect();
        let status = self.run(
            args.iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        );

        if status != 0 {
            std::process::exit(status);
        }
    }

    fn settle(&self, error: RunError, options: RunOptions) -> i32 {
        match error {
            RunError::Usage(usage_error) => {
                self.user_interface.print_error(&usage_error);
                usage_error
                    .exit_code()
                    .unwrap_or(options.failure_exit_code)
            }
            error => {
                self.user_interface.print_unhandled(&error);
                options.failure_exit_code
            }
        }
    }

    fn dispatch(&mut self, args: &[&str], options: RunOptions) -> Result<i32, RunError> {
        if args.len() < RUNTIME_PREFIX {
            return Err(RunError::Internal(format!(
                "the argument vector must start with {RUNTIME_PREFIX} program token(s), received {}.",
                args.len()
            )));
        }

        let (runtime, tokens) = args.split_at(RUNTIME_PREFIX);
        let provisional = tokenize(tokens, &HashSet::default());
        let mut remaining = tokens;
        let mut selected = self.default_command.clone();

        if let Some(name) = provisional
            .first_positional
            .as_deref()
            .and_then(|first| self.lookup(first))
        {
            selected = name.to_string();
            remaining = &tokens[1..];
        }

        let mut help_subject = None;

        if self.registered(&selected)?.schema.allow_help_named
            && provisional.named.keys().any(|key| is_help_name(key))
        {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Help requested, redirecting from '{selected}'.");
            }

            help_subject.replace(std::mem::replace(&mut selected, HELP_COMMAND.to_string()));
            remaining = tokens;
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Selected command '{selected}' with tokens {remaining:?}.");
        }

        let command = self.registered(&selected)?;
        let invocation = Resolver::new(&self.name, &command.schema).resolve(
            remaining,
            runtime,
            options,
            &*self.user_interface,
        )?;

        if let Action::Help = command.action {
            return self.help(invocation.positional_value(0), help_subject.as_deref());
        }

        let status = match &mut self.registered_mut(&selected)?.action {
            Action::Handler(handler) => {
                handler(&invocation).map_err(|error| RunError::from_handler(&selected, error))?
            }
            Action::Category(nested) => {
                let mut delegated: Vec<&str> = runtime.to_vec();
                delegated.extend(invocation.unparsed().iter().map(String::as_str));
                let nested_options = RunOptions {
                    throw_errors: true,
                    ..options
                };
                Some(nested.run_with(&delegated, nested_options)?)
            }
            Action::Help => {
                return Err(RunError::Internal(format!(
                    "command '{selected}' changed while dispatching."
                )));
            }
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Command '{selected}' returned {status:?}.");
        }

        match status {
            Some(status) if options.exit_immediately => std::process::exit(status),
            None | Some(0) => Ok(0),
            Some(status) => Err(UsageError::new(format!(
                "Command '{selected}' exited with status {status}."
            ))
            .with_exit_code(status)
            .into()),
        }
    }

    fn help(&self, target: Option<&str>, help_subject: Option<&str>) -> Result<i32, RunError> {
        match (target.and_then(|t| self.lookup(t)), help_subject, target) {
            (Some(name), _, _) | (None, Some(name), _) => self.print_command(name)?,
            (None, None, Some(unknown)) => {
                return Err(UsageError::new(format!("Unknown command '{unknown}'."))
                    .with_usage(format!(
                        "Run '{program} {HELP_COMMAND}' for usage instructions.",
                        program = self.name
                    ))
                    .into());
            }
            (None, None, None) => self.print_application(),
        };

        Ok(0)
    }

    fn print_command(&self, name: &str) -> Result<(), RunError> {
        let command = self.registered(name)?;

        match &command.action {
            Action::Category(nested) => nested.print_application(),
            _ => self
                .printer
                .print_command(&self.name, &command.schema, &*self.user_interface),
        }

        Ok(())
    }

    fn print_application(&self) {
        let rows = self
            .commands
            .values()
            .map(|command| CommandRow {
                schema: &command.schema,
                aliases: command.aliases.iter().map(String::as_str).collect(),
            })
            .collect();
        self.printer.print_application(
            &self.name,
            self.about.as_deref(),
            rows,
            &*self.user_interface,
        );
    }

    /// The canonical name of the command `token` names, if any.
    fn lookup(&self, token: &str) -> Option<&str> {
        match self.commands.get_key_value(token) {
            Some((name, _)) => Some(name),
            None => self.aliases.get(token).map(String::as_str),
        }
    }

    fn registered(&self, name: &str) -> Result<&RegisteredCommand<'a>, RunError> {
        self.commands
            .get(name)
            .ok_or_else(|| RunError::Internal(format!("command '{name}' is not registered.")))
    }

    fn registered_mut(&mut self, name: &str) -> Result<&mut RegisteredCommand<'a>, RunError> {
        self.commands
            .get_mut(name)
            .ok_or_else(|| RunError::Internal(format!("command '{name}' is not registered.")))
    }
}
