//! Multi-command argument dispatcher built on a branching state machine
//!
//! Every registered command declares its grammar: literal subcommand path,
//! named options, positional slots, an optional rest or proxy capture. The
//! declarations compile into a single nondeterministic state machine, a run
//! advances a frontier of live branches over the argument vector, and the
//! best surviving branch picks the command, binds its fields and executes
//! it. The same frontier, stopped early, drives shell completion.
//!
//! ```
//! use switchyard::{command, Bindings, BindError, Cli, Command, Context, Failure};
//!
//! #[derive(Default)]
//! struct Add {
//!     tag: Option<String>,
//!     file: String,
//! }
//!
//! impl Command for Add {
//!     fn spec() -> switchyard::CommandSpec {
//!         command().path(["add"]).option(&["--tag"]).positional().build()
//!     }
//!
//!     fn bind(&mut self, args: &mut Bindings) -> Result<(), BindError> {
//!         self.tag = args.value(&["--tag"]).map(String::from);
//!         self.file = args.positional().ok_or("missing file")?;
//!         Ok(())
//!     }
//!
//!     fn execute(&mut self, _ctx: &mut Context) -> Result<i32, Failure> {
//!         Ok(0)
//!     }
//! }
//!
//! let mut cli = Cli::new();
//! cli.register::<Add>();
//! let mut ctx = Context::default();
//! assert_eq!(cli.run(["add", "--tag=v1", "file.txt"], &mut ctx), 0);
//! ```

mod bind;
mod cli;
mod complete;
mod error;
mod grammar;
mod machine;
mod matcher;
mod select;
mod token;

pub use crate::bind::Bindings;
pub use crate::cli::{Cli, Command, Context, Dispatch};
pub use crate::error::{BindError, Failure, ParseError, RunError};
pub use crate::grammar::{
    command, Arity, CommandBuilder, CommandSpec, OptionSpec, PositionalSpec, RestSpec,
};
pub use crate::machine::Machine;
pub use crate::select::HELP_INDEX;
pub use crate::token::Token;
