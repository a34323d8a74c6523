use rustyline::history::DefaultHistory;
use rustyline::{Config, EditMode, Editor};
use std::env;
use std::io;

use log::{debug, warn};

use plaid_shell::{parse_line_with, ExpansionContext, ShellConfig};

use crate::builtins::{execute_builtin, is_builtin};
use crate::completion::LineHelper;
use crate::execution::{run_foreground, status_from_error};
use crate::io_helpers::read_input_line;

/// What the loop does after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Exit(i32),
}

pub(crate) struct ShellState {
    pub(crate) editor: Editor<LineHelper, DefaultHistory>,
    pub(crate) config: ShellConfig,
    pub(crate) last_status: i32,
    pub(crate) interactive: bool,
    pub(crate) trace: bool,
}

pub(crate) fn init_state(
    config: ShellConfig,
    interactive: bool,
    trace: bool,
) -> io::Result<ShellState> {
    let edit_mode = match env::var("PLAIDSH_EDITMODE").ok().as_deref() {
        Some("vi") | Some("VI") => EditMode::Vi,
        _ => EditMode::Emacs,
    };
    let editor_config = Config::builder()
        .auto_add_history(true)
        .edit_mode(edit_mode)
        .build();
    let mut editor = Editor::with_config(editor_config).map_err(io::Error::other)?;
    editor.set_helper(Some(LineHelper::new()));

    if let Some(path) = &config.history_file {
        if let Err(err) = editor.load_history(path) {
            debug!("no history loaded from {}: {err}", path.display());
        }
    }

    Ok(ShellState {
        editor,
        config,
        last_status: 0,
        interactive,
        trace,
    })
}

impl ShellState {
    pub(crate) fn save_history(&mut self) {
        if !self.interactive {
            return;
        }
        if let Some(path) = &self.config.history_file {
            if let Err(err) = self.editor.save_history(path) {
                warn!("could not save history to {}: {err}", path.display());
            }
        }
    }
}

/// Read, parse and run one line.
pub(crate) fn run_once(state: &mut ShellState) -> io::Result<Flow> {
    let prompt = state.config.prompt.clone();
    let Some(line) = read_input_line(&mut state.editor, state.interactive, &prompt)? else {
        if state.interactive {
            println!();
        }
        return Ok(Flow::Exit(0));
    };
    if line.trim().is_empty() {
        return Ok(Flow::Continue);
    }

    let ctx = ExpansionContext::from_env();
    let cmd = match parse_line_with(&line, &state.config.parser, &ctx) {
        Ok(cmd) => cmd,
        Err(err) => {
            if state.interactive {
                eprintln!("{}", err.display_with_input(&line));
            } else {
                eprintln!("error: {err}");
            }
            state.last_status = 2;
            return Ok(Flow::Continue);
        }
    };
    if state.trace {
        eprintln!("+ parsed\n{cmd}");
    }
    if cmd.is_empty() {
        return Ok(Flow::Continue);
    }

    if is_builtin(cmd.program()) {
        return match execute_builtin(&cmd, &mut state.last_status) {
            Ok(flow) => Ok(flow),
            Err(err) => {
                eprintln!("error: {err}");
                state.last_status = 1;
                Ok(Flow::Continue)
            }
        };
    }

    match run_foreground(&cmd) {
        Ok(code) => state.last_status = code,
        Err(err) => {
            eprintln!("{err}");
            state.last_status = status_from_error(&err);
        }
    }
    Ok(Flow::Continue)
}
