//! Registries for subcommands and environment-variable triggers.

use std::collections::BTreeMap;
use std::env;

use tracing::{debug, warn};

use crate::command::Command;
use crate::env::EnvVar;
use crate::flag::{BoolFlag, FlagSet};

/// Holds everything dispatch needs: the global flag set, the subcommand
/// registry, and the environment-trigger registry.
///
/// A `Registry` is constructed once at process start, populated before
/// [`dispatch`](Registry::dispatch) runs, and treated as read-only
/// afterwards. Flag handles are `Rc`-backed, so the registry is
/// single-threaded by construction.
pub struct Registry {
    global: FlagSet,
    pub(crate) help_flag: BoolFlag,
    pub(crate) long_help_flag: BoolFlag,
    commands: BTreeMap<String, Box<dyn Command>>,
    variables: BTreeMap<String, Box<dyn EnvVar>>,
}

impl Registry {
    /// Creates a registry for the named program. The reserved `help` and
    /// `long-help` flags are defined on the global flag set up front so
    /// they always appear in its defaults block.
    pub fn new(prog: impl Into<String>) -> Self {
        let mut global = FlagSet::new(prog);
        let help_flag = global.bool_flag("help", false, "display this help and exit");
        let long_help_flag = global.bool_flag("long-help", false, "display long-form help and exit");
        Self {
            global,
            help_flag,
            long_help_flag,
            commands: BTreeMap::new(),
            variables: BTreeMap::new(),
        }
    }

    /// The global flag set, for host-defined flags. All definitions must
    /// happen before dispatch.
    pub fn global_flags_mut(&mut self) -> &mut FlagSet {
        &mut self.global
    }

    pub fn global_flags(&self) -> &FlagSet {
        &self.global
    }

    /// Registers a subcommand. Re-registering a name silently replaces the
    /// previous entry; the last registration wins.
    pub fn register_command(&mut self, name: impl Into<String>, cmd: Box<dyn Command>) {
        let name = name.into();
        debug!(%name, "registering command");
        self.commands.insert(name, cmd);
    }

    pub fn command(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    /// Registered subcommand names in ascending lexicographic order.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(|k| k.as_str()).collect()
    }

    /// Registered subcommands, in ascending name order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &dyn Command)> {
        self.commands.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Registers an environment-variable trigger. Same overwrite semantics
    /// as [`register_command`](Registry::register_command).
    pub fn register_variable(&mut self, name: impl Into<String>, var: Box<dyn EnvVar>) {
        let name = name.into();
        debug!(%name, "registering environment trigger");
        self.variables.insert(name, var);
    }

    pub fn variable(&self, name: &str) -> Option<&dyn EnvVar> {
        self.variables.get(name).map(|v| v.as_ref())
    }

    /// Registered environment-variable names in ascending lexicographic order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.keys().map(|k| k.as_str()).collect()
    }

    /// Registered environment triggers, in ascending name order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &dyn EnvVar)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }

    /// Walks the registered environment variables in ascending name order
    /// and fires the trigger of each one that is set in the environment.
    ///
    /// A failing trigger is logged at `warn` level and does not stop the
    /// walk; one misbehaving trigger cannot block the rest of dispatch.
    pub fn parse_environment(&self) {
        for (name, action) in &self.variables {
            if let Ok(value) = env::var(name) {
                debug!(%name, "environment trigger fired");
                if let Err(e) = action.trigger(&value) {
                    warn!(%name, error = %e, "environment trigger failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Noop {
        flags: FlagSet,
        help: String,
    }

    impl Noop {
        fn boxed(help: &str) -> Box<dyn Command> {
            Box::new(Self {
                flags: FlagSet::new("noop"),
                help: help.to_string(),
            })
        }
    }

    impl Command for Noop {
        fn flag_set(&self) -> &FlagSet {
            &self.flags
        }
        fn help(&self) -> &str {
            &self.help
        }
        fn run(&self, _args: &[String]) -> Result<()> {
            Ok(())
        }
    }

    struct Recorder {
        seen: Rc<RefCell<Vec<String>>>,
        label: String,
        fail: bool,
    }

    impl EnvVar for Recorder {
        fn trigger(&self, value: &str) -> Result<()> {
            self.seen.borrow_mut().push(format!("{}={}", self.label, value));
            if self.fail {
                return Err(anyhow!("trigger {} refused", self.label));
            }
            Ok(())
        }
        fn help(&self) -> &str {
            "records trigger invocations"
        }
    }

    #[test]
    fn given_unordered_registration_when_names_then_sorted() {
        let mut reg = Registry::new("prog");
        reg.register_command("zeta", Noop::boxed("z"));
        reg.register_command("alpha", Noop::boxed("a"));
        reg.register_command("mid", Noop::boxed("m"));
        assert_eq!(reg.command_names(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn given_reregistration_when_lookup_then_newest_entry_wins() {
        let mut reg = Registry::new("prog");
        reg.register_command("dup", Noop::boxed("first"));
        reg.register_command("dup", Noop::boxed("second"));
        assert_eq!(reg.command("dup").unwrap().help(), "second");
    }

    #[test]
    fn given_set_and_unset_variables_when_parse_environment_then_only_set_fire_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut reg = Registry::new("prog");
        for label in ["SUBCMD_TEST_REG_B", "SUBCMD_TEST_REG_A"] {
            reg.register_variable(
                label,
                Box::new(Recorder {
                    seen: Rc::clone(&seen),
                    label: label.to_string(),
                    fail: false,
                }),
            );
        }
        reg.register_variable(
            "SUBCMD_TEST_REG_UNSET",
            Box::new(Recorder {
                seen: Rc::clone(&seen),
                label: "SUBCMD_TEST_REG_UNSET".to_string(),
                fail: false,
            }),
        );
        std::env::set_var("SUBCMD_TEST_REG_A", "1");
        std::env::set_var("SUBCMD_TEST_REG_B", "2");
        std::env::remove_var("SUBCMD_TEST_REG_UNSET");

        reg.parse_environment();

        assert_eq!(
            *seen.borrow(),
            vec!["SUBCMD_TEST_REG_A=1", "SUBCMD_TEST_REG_B=2"]
        );
    }

    #[test]
    fn given_failing_trigger_when_parse_environment_then_remaining_triggers_still_fire() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut reg = Registry::new("prog");
        reg.register_variable(
            "SUBCMD_TEST_FAIL_A",
            Box::new(Recorder {
                seen: Rc::clone(&seen),
                label: "A".to_string(),
                fail: true,
            }),
        );
        reg.register_variable(
            "SUBCMD_TEST_FAIL_B",
            Box::new(Recorder {
                seen: Rc::clone(&seen),
                label: "B".to_string(),
                fail: false,
            }),
        );
        std::env::set_var("SUBCMD_TEST_FAIL_A", "x");
        std::env::set_var("SUBCMD_TEST_FAIL_B", "y");

        reg.parse_environment();

        assert_eq!(*seen.borrow(), vec!["A=x", "B=y"]);
    }
}
