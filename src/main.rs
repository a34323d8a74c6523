use std::env;
use std::process;

use plaid_shell::config::load_config;
use plaid_shell::ShellConfig;

mod builtins;
mod completion;
mod execution;
mod io_helpers;
mod repl;

use repl::{init_state, run_once, Flow};

fn main() {
    init_logging();
    let mut trace = false;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-x" => trace = true,
            "-h" | "--help" => {
                println!("usage: plaidsh [-x]");
                return;
            }
            other => {
                eprintln!("error: unknown option '{other}'");
                process::exit(2);
            }
        }
    }
    let interactive = unsafe { libc::isatty(libc::STDIN_FILENO) == 1 };
    let config = load_config().unwrap_or_else(|err| {
        eprintln!("config error: {err}");
        ShellConfig::default()
    });
    let mut state = match init_state(config, interactive, trace) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };

    println!("Welcome to Plaid Shell!");
    loop {
        match run_once(&mut state) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit(code)) => {
                state.save_history();
                process::exit(code);
            }
            Err(err) => eprintln!("error: {err}"),
        }
    }
}

fn init_logging() {
    let env = env_logger::Env::default().filter_or("PLAIDSH_LOG", "warn");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init();
}
