//! Environment-variable trigger capability.

use anyhow::Result;

/// An action tied to an environment variable. When the variable is set in
/// the process environment, dispatch calls [`EnvVar::trigger`] once with
/// its value; unset variables never trigger.
pub trait EnvVar {
    /// Called with the value of the environment variable.
    fn trigger(&self, value: &str) -> Result<()>;

    /// One-line description of what this environment variable does.
    fn help(&self) -> &str;
}
