//! Positional argument descriptors.

use std::fmt;

/// Describes one positional argument of a subcommand: a display name, a
/// one-line description, an optional default, and whether the argument may
/// be omitted. Immutable after construction; read only by the help renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub description: String,
    pub default: String,
    pub optional: bool,
}

impl Argument {
    /// A required positional argument.
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default: String::new(),
            optional: false,
        }
    }

    /// An optional positional argument. An empty `default` means no default
    /// is shown in help output.
    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default: default.into(),
            optional: true,
        }
    }
}

impl fmt::Display for Argument {
    /// Optional arguments render bracketed, required ones bare.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "[{}]", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_required_argument_when_displayed_then_bare() {
        let arg = Argument::required("path", "file to read");
        assert_eq!(arg.to_string(), "path");
    }

    #[test]
    fn given_optional_argument_when_displayed_then_bracketed() {
        let arg = Argument::optional("who", "whom to greet", "world");
        assert_eq!(arg.to_string(), "[who]");
        assert_eq!(arg.default, "world");
    }
}
