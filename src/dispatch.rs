//! Argument dispatch: resolve `argv` into a deferred, callable unit of work.

use std::fmt;

use tracing::debug;

use crate::command::Command;
use crate::errors::{DispatchError, DispatchResult};
use crate::help;
use crate::registry::Registry;

/// What a resolved command line will do when run.
pub enum Action<'r> {
    /// Print help, long-form when `full` is true.
    Help { full: bool },
    /// Run the matched subcommand.
    Run(&'r dyn Command),
    /// Report the unrecognized subcommand name.
    Unknown(String),
}

impl fmt::Debug for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Help { full } => f.debug_struct("Help").field("full", full).finish(),
            Action::Run(_) => f.write_str("Run(..)"),
            Action::Unknown(name) => f.debug_tuple("Unknown").field(name).finish(),
        }
    }
}

/// The post-parse state of a command line: the leftover positional tokens
/// plus the action they belong to. Dispatch returns this without invoking
/// it, so the caller can wrap execution in timing, logging, or a top-level
/// error handler before calling [`run`](ParsedCommand::run).
pub struct ParsedCommand<'r> {
    registry: &'r Registry,
    args: Vec<String>,
    action: Action<'r>,
}

impl fmt::Debug for ParsedCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedCommand")
            .field("args", &self.args)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

impl<'r> ParsedCommand<'r> {
    /// Leftover positional tokens, after global and subcommand flags.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn action(&self) -> &Action<'r> {
        &self.action
    }

    /// Executes the resolved action.
    ///
    /// Help prints to stdout and succeeds. An unknown subcommand returns
    /// [`DispatchError::UnknownCommand`] without printing help; whether to
    /// show help afterwards is the caller's call.
    pub fn run(&self) -> DispatchResult<()> {
        match &self.action {
            Action::Help { full } => {
                help::print(self.registry, *full);
                Ok(())
            }
            Action::Run(cmd) => cmd.run(&self.args).map_err(DispatchError::Command),
            Action::Unknown(name) => Err(DispatchError::UnknownCommand(name.clone())),
        }
    }
}

impl Registry {
    /// Parses a full command line (typically `std::env::args().collect()`;
    /// the first element is the program name and is skipped).
    ///
    /// Environment triggers fire first, then global flags are parsed up to
    /// the first non-flag token. That token, if any, selects the subcommand
    /// whose own flag set consumes the remaining flags; whatever is left
    /// becomes the positional argument list. Malformed flags, global or
    /// subcommand, are returned as [`DispatchError::Flag`] rather than
    /// terminating the process.
    pub fn dispatch(&self, args: &[String]) -> DispatchResult<ParsedCommand<'_>> {
        self.parse_environment();

        // Repeated dispatch must not observe flag values from a prior run.
        self.help_flag.set(false);
        self.long_help_flag.set(false);

        let rest = self.global_flags().parse(args.get(1..).unwrap_or(&[]))?;

        if self.long_help_flag.get() {
            debug!("long-form help requested");
            return Ok(ParsedCommand {
                registry: self,
                args: Vec::new(),
                action: Action::Help { full: true },
            });
        }
        if self.help_flag.get() || rest.is_empty() {
            debug!("short-form help requested");
            return Ok(ParsedCommand {
                registry: self,
                args: Vec::new(),
                action: Action::Help { full: false },
            });
        }

        let name = &rest[0];
        if let Some(cmd) = self.command(name) {
            let leftover = cmd.flag_set().parse(&rest[1..])?;
            debug!(subcommand = %name, positionals = leftover.len(), "subcommand matched");
            return Ok(ParsedCommand {
                registry: self,
                args: leftover,
                action: Action::Run(cmd),
            });
        }

        debug!(subcommand = %name, "unknown subcommand");
        Ok(ParsedCommand {
            registry: self,
            args: Vec::new(),
            action: Action::Unknown(name.clone()),
        })
    }
}
