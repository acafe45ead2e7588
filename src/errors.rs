//! Top-level dispatch errors.

use thiserror::Error;

use crate::exitcode;
use crate::flag::FlagError;

/// Errors surfaced by dispatch and by running a parsed command.
/// These are what get displayed to the user; the library itself never
/// terminates the process.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("No such subcommand: {0}")]
    UnknownCommand(String),

    #[error("{0}")]
    Flag(#[from] FlagError),

    #[error(transparent)]
    Command(#[from] anyhow::Error),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    /// The appropriate process exit code for this error, for hosts that
    /// translate a returned error into a status at their top level.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::UnknownCommand(_) | DispatchError::Flag(_) => exitcode::USAGE,
            DispatchError::Command(_) => exitcode::SOFTWARE,
        }
    }
}
