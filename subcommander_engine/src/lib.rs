//! Engine module for `subcommander`.
//! See the `subcommander` crate root for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod model;
mod parser;
mod schema;
mod tokens;

pub use api::*;
pub use model::*;
pub use parser::{
    Application, ConfigError, HandlerError, HandlerResult, Invocation, RunError, RunOptions,
    UsageError,
};
pub use tokens::{tokenize, NamedAssignments, Tokenized, SEPARATOR};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
