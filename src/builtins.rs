use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use log::debug;

use plaid_shell::{is_valid_var_name, Command};

use crate::io_helpers::open_output;
use crate::repl::Flow;

pub(crate) const AUTHOR: &str = "Niyomwungeri Parmenide ISHIMWE";

pub(crate) const BUILTIN_NAMES: &[&str] = &["author", "cd", "exit", "pwd", "quit", "setenv"];

pub(crate) fn is_builtin(name: Option<&str>) -> bool {
    name.is_some_and(|name| BUILTIN_NAMES.contains(&name))
}

/// Run a builtin. Diagnostics go to stderr and set a non-zero status; only
/// I/O failures on the output itself come back as errors.
pub(crate) fn execute_builtin(cmd: &Command, last_status: &mut i32) -> io::Result<Flow> {
    let args = cmd.args();
    let Some(name) = cmd.program() else {
        return Ok(Flow::Continue);
    };
    debug!("builtin {name} with {} args", args.len() - 1);
    *last_status = 0;
    match name {
        "exit" | "quit" => {
            if args.len() == 1 {
                return Ok(Flow::Exit(0));
            }
            eprintln!("{name}: takes no arguments");
            *last_status = 1;
        }
        "author" => {
            let mut out = open_output(cmd.output_redirect())?;
            writeln!(out, "{AUTHOR}")?;
            out.flush()?;
        }
        "pwd" => {
            let cwd = env::current_dir()?;
            let mut out = open_output(cmd.output_redirect())?;
            writeln!(out, "{}", cwd.display())?;
            out.flush()?;
        }
        "cd" => {
            if let Err(message) = change_directory(args) {
                eprintln!("{message}");
                *last_status = 1;
            }
        }
        "setenv" => {
            if let Err(message) = set_variable(args) {
                eprintln!("{message}");
                *last_status = 1;
            }
        }
        _ => {
            eprintln!("{name}: not a builtin");
            *last_status = 1;
        }
    }
    Ok(Flow::Continue)
}

fn change_directory(args: &[String]) -> Result<(), String> {
    let target = match args {
        [_] => env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| "cd: HOME not set".to_string())?,
        [_, dir] => PathBuf::from(dir),
        _ => return Err("cd: too many arguments".to_string()),
    };
    env::set_current_dir(&target).map_err(|err| format!("cd: {}: {err}", target.display()))
}

fn set_variable(args: &[String]) -> Result<(), String> {
    match args {
        [_, name, value] => {
            if !is_valid_var_name(name) {
                return Err(format!("Illegal variable name: '{name}'"));
            }
            env::set_var(name, value);
            Ok(())
        }
        [_] => Err("Illegal variable name: ''".to_string()),
        [_, name] => Err(format!("Illegal variable name: '{name}'")),
        _ => Err(format!("Invalid syntax for: '{}'", args[1..].join(" "))),
    }
}
