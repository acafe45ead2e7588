//! Deterministic help rendering for registered subcommands and triggers.
//!
//! Output depends only on what is registered, never on registration order:
//! subcommands and environment variables are listed in ascending name order,
//! flags and positional arguments in their declaration order.

use std::fmt::Write as _;

use crate::registry::Registry;

/// Renders short-form (`full = false`) or long-form (`full = true`) help.
pub fn render(registry: &Registry, full: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Usage of {}:", registry.global_flags().name());
    out.push_str(&registry.global_flags().defaults());

    out.push_str("\nSubcommands:\n");
    for (name, cmd) in registry.commands() {
        if full {
            let _ = writeln!(out, "\n{} - {}", name, cmd.help());
            out.push_str(&cmd.flag_set().defaults());
            for arg in cmd.positional_arguments() {
                let mut line = format!("  {}", arg);
                if line.len() < 4 {
                    line.push('\t');
                } else {
                    line.push_str("\n    \t");
                }
                line.push_str(&arg.description);
                if !arg.optional || !arg.default.is_empty() {
                    line.push_str(" (");
                    if !arg.default.is_empty() {
                        line.push_str(&format!("default \"{}\"", arg.default));
                    }
                    if !arg.optional {
                        if !arg.default.is_empty() {
                            line.push_str(", ");
                        }
                        line.push_str("required");
                    }
                    line.push(')');
                }
                out.push_str(&line);
                out.push('\n');
            }
        } else {
            let mut line = format!("  {}", name);
            for flag in cmd.flag_set().flags() {
                line.push_str(&format!(" [-{}", flag.name()));
                let (hint, _) = flag.unquote_usage();
                if !hint.is_empty() {
                    line.push(' ');
                    line.push_str(&hint);
                }
                line.push(']');
            }
            for arg in cmd.positional_arguments() {
                line.push_str(&format!(" {}", arg));
            }
            line.push_str("\n    \t");
            line.push_str(cmd.help());
            out.push_str(&line);
            out.push('\n');
        }
    }

    if registry.has_variables() {
        out.push_str("\nEnvironment variables:");
        if full {
            out.push('\n');
        }
        for (name, var) in registry.variables() {
            let _ = write!(out, "\n  {}\n    \t{}", name, var.help());
        }
        out.push('\n');
    }

    out
}

/// Writes the rendered help to standard output.
pub fn print(registry: &Registry, full: bool) {
    print!("{}", render(registry, full));
}
