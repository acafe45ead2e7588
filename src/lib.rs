//! Minimal subcommand dispatch.
//!
//! A host program builds a [`Registry`], registers named subcommands (each
//! with its own [`FlagSet`], positional-argument declarations, and one-line
//! help) and environment-variable triggers, then calls
//! [`Registry::dispatch`] with `argv`. The result is a [`ParsedCommand`]:
//! a deferred unit of work the caller invokes explicitly, so execution can
//! be timed, logged, or wrapped in a top-level error handler.
//!
//! ```no_run
//! use anyhow::Result;
//! use subcmd::{Argument, Command, FlagSet, Registry, StringFlag};
//!
//! struct Hello {
//!     flags: FlagSet,
//!     greeting: StringFlag,
//!     args: Vec<Argument>,
//! }
//!
//! impl Hello {
//!     fn new() -> Self {
//!         let mut flags = FlagSet::new("hello");
//!         let greeting = flags.string_flag("greeting", "hello", "greeting `text` to use");
//!         Self {
//!             flags,
//!             greeting,
//!             args: vec![Argument::optional("who", "whom to greet", "world")],
//!         }
//!     }
//! }
//!
//! impl Command for Hello {
//!     fn flag_set(&self) -> &FlagSet {
//!         &self.flags
//!     }
//!     fn positional_arguments(&self) -> &[Argument] {
//!         &self.args
//!     }
//!     fn help(&self) -> &str {
//!         "print a friendly greeting"
//!     }
//!     fn run(&self, args: &[String]) -> Result<()> {
//!         let who = args.first().map(String::as_str).unwrap_or("world");
//!         println!("{}, {}!", self.greeting.get(), who);
//!         Ok(())
//!     }
//! }
//!
//! fn main() {
//!     let mut registry = Registry::new("greeter");
//!     registry.register_command("hello", Box::new(Hello::new()));
//!
//!     let args: Vec<String> = std::env::args().collect();
//!     match registry.dispatch(&args).and_then(|pc| pc.run()) {
//!         Ok(()) => {}
//!         Err(e) => {
//!             eprintln!("Error: {}", e);
//!             std::process::exit(e.exit_code());
//!         }
//!     }
//! }
//! ```

pub mod arg;
pub mod command;
pub mod dispatch;
pub mod env;
pub mod errors;
pub mod exitcode;
pub mod flag;
pub mod help;
pub mod registry;
pub mod util;

pub use arg::Argument;
pub use command::Command;
pub use dispatch::{Action, ParsedCommand};
pub use env::EnvVar;
pub use errors::{DispatchError, DispatchResult};
pub use flag::{BoolFlag, Flag, FlagError, FlagSet, IntFlag, StringFlag};
pub use registry::Registry;
