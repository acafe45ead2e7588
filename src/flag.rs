//! Named, typed command-line flags bound to shared handles.
//!
//! A [`FlagSet`] keeps its flags in declaration order and parses arguments
//! front-to-back, stopping at the first token that is not a flag. Definition
//! methods return cheap cloneable handles so the defining command can keep
//! one and read the parsed value later from its `run`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FlagError {
    #[error("flag provided but not defined: -{0}")]
    Undefined(String),

    #[error("flag needs an argument: -{0}")]
    MissingValue(String),

    #[error("invalid value {value:?} for flag -{name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
}

pub type FlagResult<T> = Result<T, FlagError>;

/// Handle to a boolean flag's value.
#[derive(Debug, Clone, Default)]
pub struct BoolFlag(Rc<Cell<bool>>);

impl BoolFlag {
    pub fn get(&self) -> bool {
        self.0.get()
    }

    pub(crate) fn set(&self, value: bool) {
        self.0.set(value);
    }
}

/// Handle to a string flag's value.
#[derive(Debug, Clone, Default)]
pub struct StringFlag(Rc<RefCell<String>>);

impl StringFlag {
    pub fn get(&self) -> String {
        self.0.borrow().clone()
    }

    pub(crate) fn set(&self, value: &str) {
        *self.0.borrow_mut() = value.to_string();
    }
}

/// Handle to an integer flag's value.
#[derive(Debug, Clone, Default)]
pub struct IntFlag(Rc<Cell<i64>>);

impl IntFlag {
    pub fn get(&self) -> i64 {
        self.0.get()
    }

    pub(crate) fn set(&self, value: i64) {
        self.0.set(value);
    }
}

#[derive(Debug, Clone)]
enum Binding {
    Bool { handle: BoolFlag, default: bool },
    Str { handle: StringFlag, default: String },
    Int { handle: IntFlag, default: i64 },
}

/// A single defined flag: name, usage text, and its typed binding.
#[derive(Debug, Clone)]
pub struct Flag {
    name: String,
    usage: String,
    binding: Binding,
}

impl Flag {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Splits the usage string into a value hint and the cleaned usage text.
    ///
    /// A backquoted `` `word` `` inside the usage names the value and is
    /// shown without the backquotes; otherwise the hint falls back to the
    /// type name, and is empty for booleans.
    pub fn unquote_usage(&self) -> (String, String) {
        if let Some(start) = self.usage.find('`') {
            if let Some(len) = self.usage[start + 1..].find('`') {
                let hint = self.usage[start + 1..start + 1 + len].to_string();
                let cleaned = format!(
                    "{}{}{}",
                    &self.usage[..start],
                    hint,
                    &self.usage[start + 1 + len + 1..]
                );
                return (hint, cleaned);
            }
        }
        let hint = match self.binding {
            Binding::Bool { .. } => "",
            Binding::Str { .. } => "string",
            Binding::Int { .. } => "int",
        };
        (hint.to_string(), self.usage.clone())
    }

    fn is_bool(&self) -> bool {
        matches!(self.binding, Binding::Bool { .. })
    }

    /// True when the default is the type's zero value, in which case the
    /// defaults block omits the `(default ...)` annotation.
    fn default_is_zero(&self) -> bool {
        match &self.binding {
            Binding::Bool { default, .. } => !default,
            Binding::Str { default, .. } => default.is_empty(),
            Binding::Int { default, .. } => *default == 0,
        }
    }

    fn default_display(&self) -> String {
        match &self.binding {
            Binding::Bool { default, .. } => default.to_string(),
            Binding::Str { default, .. } => format!("{:?}", default),
            Binding::Int { default, .. } => default.to_string(),
        }
    }

    fn set_from(&self, value: &str) -> FlagResult<()> {
        match &self.binding {
            Binding::Bool { handle, .. } => {
                let parsed = value.parse::<bool>().map_err(|e| FlagError::InvalidValue {
                    name: self.name.clone(),
                    value: value.to_string(),
                    reason: e.to_string(),
                })?;
                handle.set(parsed);
            }
            Binding::Str { handle, .. } => handle.set(value),
            Binding::Int { handle, .. } => {
                let parsed = value.parse::<i64>().map_err(|e| FlagError::InvalidValue {
                    name: self.name.clone(),
                    value: value.to_string(),
                    reason: e.to_string(),
                })?;
                handle.set(parsed);
            }
        }
        Ok(())
    }

    fn reset(&self) {
        match &self.binding {
            Binding::Bool { handle, default } => handle.set(*default),
            Binding::Str { handle, default } => handle.set(default),
            Binding::Int { handle, default } => handle.set(*default),
        }
    }
}

/// An ordered collection of named, typed flags.
#[derive(Debug, Default)]
pub struct FlagSet {
    name: String,
    flags: Vec<Flag>,
}

impl FlagSet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Defined flags in declaration order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Defines a boolean flag and returns a handle to its value.
    /// Redefining an existing name replaces the previous flag.
    pub fn bool_flag(
        &mut self,
        name: impl Into<String>,
        default: bool,
        usage: impl Into<String>,
    ) -> BoolFlag {
        let handle = BoolFlag(Rc::new(Cell::new(default)));
        self.define(Flag {
            name: name.into(),
            usage: usage.into(),
            binding: Binding::Bool {
                handle: handle.clone(),
                default,
            },
        });
        handle
    }

    /// Defines a string flag and returns a handle to its value.
    pub fn string_flag(
        &mut self,
        name: impl Into<String>,
        default: impl Into<String>,
        usage: impl Into<String>,
    ) -> StringFlag {
        let default = default.into();
        let handle = StringFlag(Rc::new(RefCell::new(default.clone())));
        self.define(Flag {
            name: name.into(),
            usage: usage.into(),
            binding: Binding::Str {
                handle: handle.clone(),
                default,
            },
        });
        handle
    }

    /// Defines an integer flag and returns a handle to its value.
    pub fn int_flag(
        &mut self,
        name: impl Into<String>,
        default: i64,
        usage: impl Into<String>,
    ) -> IntFlag {
        let handle = IntFlag(Rc::new(Cell::new(default)));
        self.define(Flag {
            name: name.into(),
            usage: usage.into(),
            binding: Binding::Int {
                handle: handle.clone(),
                default,
            },
        });
        handle
    }

    fn define(&mut self, flag: Flag) {
        if let Some(existing) = self.flags.iter_mut().find(|f| f.name == flag.name) {
            *existing = flag;
        } else {
            self.flags.push(flag);
        }
    }

    fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Restores every flag to its default value.
    pub fn reset(&self) {
        for flag in &self.flags {
            flag.reset();
        }
    }

    /// Parses leading flag tokens out of `args`, stopping at the first token
    /// that is not a flag, and returns the unconsumed remainder.
    ///
    /// Accepted spellings: `-name`, `--name`, `-name=value`, and
    /// `-name value` for non-boolean flags. Boolean flags take an explicit
    /// value only via `=`. A bare `--` terminates flag parsing and is
    /// consumed.
    pub fn parse(&self, args: &[String]) -> FlagResult<Vec<String>> {
        let mut i = 0;
        while i < args.len() {
            let arg = &args[i];
            if arg.len() < 2 || !arg.starts_with('-') {
                break;
            }
            let mut body = &arg[1..];
            if let Some(stripped) = body.strip_prefix('-') {
                if stripped.is_empty() {
                    i += 1;
                    break;
                }
                body = stripped;
            }
            if body.starts_with('-') || body.starts_with('=') {
                return Err(FlagError::BadSyntax(arg.clone()));
            }

            let (name, inline_value) = match body.split_once('=') {
                Some((n, v)) => (n, Some(v)),
                None => (body, None),
            };
            let flag = self
                .lookup(name)
                .ok_or_else(|| FlagError::Undefined(name.to_string()))?;

            if flag.is_bool() {
                match inline_value {
                    Some(v) => flag.set_from(v)?,
                    None => flag.set_from("true")?,
                }
                i += 1;
            } else {
                match inline_value {
                    Some(v) => {
                        flag.set_from(v)?;
                        i += 1;
                    }
                    None => {
                        let value = args
                            .get(i + 1)
                            .ok_or_else(|| FlagError::MissingValue(name.to_string()))?;
                        flag.set_from(value)?;
                        i += 2;
                    }
                }
            }
        }
        debug!(
            flag_set = %self.name,
            consumed = i,
            remaining = args.len() - i,
            "parsed flags"
        );
        Ok(args[i..].to_vec())
    }

    /// Renders the defaults block: one entry per flag in declaration order.
    pub fn defaults(&self) -> String {
        let mut out = String::new();
        for flag in &self.flags {
            let (hint, usage) = flag.unquote_usage();
            let mut line = format!("  -{}", flag.name);
            if !hint.is_empty() {
                line.push(' ');
                line.push_str(&hint);
            }
            if line.len() <= 4 {
                line.push('\t');
            } else {
                line.push_str("\n    \t");
            }
            line.push_str(&usage);
            if !flag.default_is_zero() {
                line.push_str(&format!(" (default {})", flag.default_display()));
            }
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn given_mixed_flags_when_parse_then_stops_at_first_non_flag() {
        let mut fs = FlagSet::new("test");
        let verbose = fs.bool_flag("verbose", false, "enable verbose output");
        let name = fs.string_flag("name", "default", "a `name` to use");

        let rest = fs
            .parse(&args(&["-verbose", "--name", "alice", "positional", "-x"]))
            .unwrap();

        assert!(verbose.get());
        assert_eq!(name.get(), "alice");
        assert_eq!(rest, args(&["positional", "-x"]));
    }

    #[test]
    fn given_equals_syntax_when_parse_then_binds_inline_value() {
        let mut fs = FlagSet::new("test");
        let count = fs.int_flag("count", 1, "how many");
        let on = fs.bool_flag("on", false, "turn it on");

        let rest = fs.parse(&args(&["-count=7", "--on=true"])).unwrap();

        assert_eq!(count.get(), 7);
        assert!(on.get());
        assert!(rest.is_empty());
    }

    #[test]
    fn given_double_dash_when_parse_then_terminates_and_consumes_it() {
        let mut fs = FlagSet::new("test");
        let on = fs.bool_flag("on", false, "turn it on");

        let rest = fs.parse(&args(&["--", "-on"])).unwrap();

        assert!(!on.get());
        assert_eq!(rest, args(&["-on"]));
    }

    #[test]
    fn given_bool_flag_when_parse_then_next_token_is_not_consumed() {
        let mut fs = FlagSet::new("test");
        let on = fs.bool_flag("on", false, "turn it on");

        let rest = fs.parse(&args(&["-on", "value"])).unwrap();

        assert!(on.get());
        assert_eq!(rest, args(&["value"]));
    }

    #[test]
    fn given_undefined_flag_when_parse_then_errors() {
        let fs = FlagSet::new("test");
        let err = fs.parse(&args(&["-nope"])).unwrap_err();
        assert_eq!(err, FlagError::Undefined("nope".to_string()));
    }

    #[test]
    fn given_missing_value_when_parse_then_errors() {
        let mut fs = FlagSet::new("test");
        let _name = fs.string_flag("name", "", "a name");
        let err = fs.parse(&args(&["-name"])).unwrap_err();
        assert_eq!(err, FlagError::MissingValue("name".to_string()));
    }

    #[test]
    fn given_bad_int_when_parse_then_reports_value_and_flag() {
        let mut fs = FlagSet::new("test");
        let _count = fs.int_flag("count", 0, "how many");
        let err = fs.parse(&args(&["-count", "seven"])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("count"));
        assert!(msg.contains("seven"));
    }

    #[test]
    fn given_backquoted_usage_when_unquote_then_yields_hint_and_cleaned_text() {
        let mut fs = FlagSet::new("test");
        fs.string_flag("greeting", "hello", "the `text` to greet with");
        let (hint, usage) = fs.flags()[0].unquote_usage();
        assert_eq!(hint, "text");
        assert_eq!(usage, "the text to greet with");
    }

    #[test]
    fn given_defaults_when_rendered_then_non_zero_defaults_annotated() {
        let mut fs = FlagSet::new("test");
        fs.string_flag("greeting", "hello", "the `text` to greet with");
        fs.bool_flag("loud", false, "shout the greeting");
        fs.int_flag("times", 3, "repeat `n` times");

        let block = fs.defaults();
        assert_eq!(
            block,
            "  -greeting text\n    \tthe text to greet with (default \"hello\")\n\
             \x20 -loud\n    \tshout the greeting\n\
             \x20 -times n\n    \trepeat n times (default 3)\n"
        );
    }

    #[test]
    fn given_redefined_flag_when_parse_then_newest_binding_wins() {
        let mut fs = FlagSet::new("test");
        let old = fs.string_flag("name", "old", "old usage");
        let new = fs.string_flag("name", "new", "new usage");

        assert_eq!(fs.flags().len(), 1);
        fs.parse(&args(&["-name", "set"])).unwrap();
        assert_eq!(old.get(), "old");
        assert_eq!(new.get(), "set");
    }

    #[test]
    fn given_parsed_flags_when_reset_then_defaults_restored() {
        let mut fs = FlagSet::new("test");
        let on = fs.bool_flag("on", false, "turn it on");
        fs.parse(&args(&["-on"])).unwrap();
        assert!(on.get());
        fs.reset();
        assert!(!on.get());
    }
}
