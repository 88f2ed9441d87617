//! `subcommander` is a sub-command parser and dispatcher for Rust.
//!
//! A `subcommander` application is a set of named *commands*, each declaring the named and positional parameters it accepts.
//! The application takes the raw Cli tokens, selects the command, resolves its parameters (aliases, defaults, required checks), and runs the command's handler.
//! Specifically, `subcommander` attempts to prioritize the following design concerns:
//! * *Familiar token grammar*:
//! `--name value`, `--name=value`, `-n value`, compound short flags (`-abc`), and the `--` separator all behave as Cli users expect.
//! * *Declarative schemas*:
//! Each command's parameters are declared once, normalized when the command is registered, and never inspected by hand afterwards.
//! Configuration mistakes (ex: a required positional parameter following an optional one) are rejected before anything runs.
//! * *String values*:
//! `subcommander` resolves the *presence* of arguments, never their format.
//! Handlers receive strings (and booleans, for valueless flags) and convert them as they see fit.
//! * *Detailed yet basic UX*:
//! Usage instructions are generated from the schemas (`program help`, `program help <command>`, or `program <command> --help`).
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/greeter.rs")]
//! ```
//!
//! ```console
//! $ greeter help greet
//! usage: greeter greet [--greeting GREETING] [--shout] [NAME]
//!
//! Greet someone.
//!
//! positional arguments:
//!  [NAME]                             Who to greet.
//!
//! named arguments:
//!  --greeting GREETING, -G GREETING   The word to greet with. (default: Hello)
//!  --shout, -s                        Greet loudly.
//!  --help, --?                        Show this usage information.
//!
//! $ greeter Ada
//! Hello, Ada.
//!
//! $ greeter g -s Ada
//! HELLO, ADA!
//!
//! $ greeter g --volume 11
//! Error: Unexpected named argument '--volume' for 'greet'.
//! Run 'greeter help greet' for usage instructions.
//! ```
//!
//! # Commands
//! Configure `subcommander` by starting with a [`CommandLineApplication`] and registering [`Command`]s.
//! A command pairs a name with a handler, which receives the resolved [`Invocation`].
//! * Commands may carry aliases ([`Command::alias`]).
//! * One command may be the default ([`Command::as_default`]), run when the first token names no command.
//! Otherwise, the built-in `help` command is the default.
//! * A command may delegate to a nested application ([`Command::category`]), which handles the remaining tokens as if invoked directly.
//!
//! Handlers return a [`HandlerResult`].
//! Returning `Ok(None)` (or `Ok(Some(0))`) succeeds.
//! Returning a non-zero status fails the run with that exit code, unless [`RunOptions::exit_immediately`] is set, which exits the process right away.
//! Returning a [`UsageError`] fails the run as a user mistake; any other error is reported as unhandled.
//!
//! # Parameters
//! There are two classes of parameters: [`Parameter::named`] and [`Parameter::positional`].
//! Both are required unless made [`Parameter::optional`] or given a [`Parameter::default`].
//! * Named parameters may be [`Parameter::valueless`], resolving to a boolean [`NamedValue::Flag`].
//! * Named parameters may carry aliases ([`Parameter::alias`] or [`Command::named_alias`]).
//! * Positional parameters are matched in declaration order.
//! A required positional parameter may not follow an optional one.
//!
//! Input beyond the declared parameters is governed per command by a [`CountCheck`]:
//! excess positional values are ignored by default (and always retained), while unexpected named arguments are an error by default.
//!
//! # Cli Semantics
//! `subcommander` tokenizes the Cli with the following rules, looking ahead at most one token.
//! * `--` ends named argument scanning; it and every following token are positional.
//! * `--name=value` assigns `value` (which may be empty) to `name`.
//! * `--name` takes the next token as its value, unless that token starts with `-` or `name` is valueless.
//! * `-abc` is equivalent to `-a -b -c`; only the final `c` may take a value.
//! * Anything else is positional.
//!
//! The first token selects the command, so named arguments belong after the command name.
//!
//! # Features
//! * `tracing_debug`: Emit `tracing` debug events while dispatching.
pub use subcommander_engine::*;
