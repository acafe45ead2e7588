//! The subcommand capability.

use anyhow::Result;

use crate::arg::Argument;
use crate::flag::FlagSet;

/// A named unit of work: its own flag set, positional-argument
/// declarations, one-line help text, and an execution action.
///
/// Implementations typically build their [`FlagSet`] at construction time
/// and keep the returned flag handles as fields, so `run` can read the
/// values bound during dispatch.
pub trait Command {
    /// The fully populated flag set for this subcommand.
    fn flag_set(&self) -> &FlagSet;

    /// Positional arguments in declaration order.
    fn positional_arguments(&self) -> &[Argument] {
        &[]
    }

    /// One-line description of what this command does.
    fn help(&self) -> &str;

    /// Performs the action tied to the command, called with the leftover
    /// tokens after this command's flags were parsed. Substituting defaults
    /// for omitted optional positionals is the command's responsibility.
    fn run(&self, args: &[String]) -> Result<()>;
}
