use std::fs::{self, OpenOptions};
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{Command as ProcessCommand, ExitStatus, Stdio};

use log::debug;

use plaid_shell::Command;

/// A process builder for `cmd` with its redirections attached.
///
/// The output file is created or truncated before the program starts, so a
/// failed lookup still leaves it behind, as a fork-then-exec shell would.
pub fn build_command(cmd: &Command) -> io::Result<ProcessCommand> {
    let program = cmd
        .program()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Missing command"))?;
    let mut command = ProcessCommand::new(program);
    command.args(&cmd.args()[1..]);

    if let Some(path) = cmd.input_redirect() {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|err| with_path(path, err))?;
        command.stdin(Stdio::from(file));
    }
    if let Some(path) = cmd.output_redirect() {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|err| with_path(path, err))?;
        command.stdout(Stdio::from(file));
    }

    Ok(command)
}

/// Run `cmd` to completion and return its exit code.
pub fn run_foreground(cmd: &Command) -> io::Result<i32> {
    let program = cmd.program().unwrap_or_default();
    let mut command = build_command(cmd)?;
    let mut child = command
        .spawn()
        .map_err(|err| wrap_spawn_error(program, err))?;
    debug!("spawned {program} as pid {}", child.id());
    let status = child.wait()?;
    let code = exit_status_code(status);
    if code != 0 {
        eprintln!("Child exited with status {code}");
    }
    Ok(code)
}

fn with_path(path: &str, err: io::Error) -> io::Error {
    io::Error::new(err.kind(), format!("{path}: {err}"))
}

pub fn wrap_spawn_error(program: &str, err: io::Error) -> io::Error {
    let message = match err.kind() {
        io::ErrorKind::NotFound => format!("Command not found: '{program}'"),
        io::ErrorKind::PermissionDenied => {
            if fs::metadata(program).map(|meta| meta.is_dir()).unwrap_or(false) {
                format!("Is a directory: '{program}'")
            } else {
                format!("Permission denied: '{program}'")
            }
        }
        _ => format!("{program}: {err}"),
    };
    io::Error::new(err.kind(), message)
}

pub fn status_from_error(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::NotFound => 127,
        io::ErrorKind::PermissionDenied => 126,
        _ => 1,
    }
}

pub fn exit_status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        code
    } else if let Some(sig) = status.signal() {
        128 + sig
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plaid_shell::parse_line;
    use tempfile::tempdir;

    fn command(argv: &[&str]) -> Command {
        let mut cmd = Command::new();
        for arg in argv {
            cmd.append_arg(*arg);
        }
        cmd
    }

    #[test]
    fn unknown_program_is_reported_by_name() {
        let cmd = command(&["plaid-no-such-program"]);
        let err = run_foreground(&cmd).unwrap_err();
        assert_eq!(err.to_string(), "Command not found: 'plaid-no-such-program'");
        assert_eq!(status_from_error(&err), 127);
    }

    #[test]
    fn output_redirect_captures_stdout() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let line = format!("echo hello   world > {}", out.display());
        let cmd = parse_line(&line).unwrap();
        assert_eq!(run_foreground(&cmd).unwrap(), 0);
        assert_eq!(fs::read_to_string(&out).unwrap(), "hello world\n");
    }

    #[test]
    fn input_redirect_feeds_stdin() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "from a file\n").unwrap();
        let mut cmd = command(&["cat"]);
        cmd.set_input(input.display().to_string()).unwrap();
        cmd.set_output(output.display().to_string()).unwrap();
        assert_eq!(run_foreground(&cmd).unwrap(), 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), "from a file\n");
    }

    #[test]
    fn missing_input_file_names_the_path() {
        let mut cmd = command(&["cat"]);
        cmd.set_input("/plaid/no/such/input").unwrap();
        let err = build_command(&cmd).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().starts_with("/plaid/no/such/input: "));
    }

    #[test]
    fn exit_codes_pass_through() {
        let cmd = command(&["sh", "-c", "exit 3"]);
        assert_eq!(run_foreground(&cmd).unwrap(), 3);
    }
}
