mod base;
mod dispatcher;
mod interface;
mod printer;
mod resolver;

pub use base::*;
pub use dispatcher::Application;
pub(crate) use dispatcher::{Action, RegisteredCommand};
pub(crate) use interface::*;
pub(crate) use printer::Printer;
