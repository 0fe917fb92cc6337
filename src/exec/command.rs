// src/exec/command.rs

//! Construction of the OS command that interprets a task's command line.

use std::process::Command;

/// Default shell used to interpret task commands on this platform.
pub fn default_shell() -> &'static str {
    if cfg!(windows) { "cmd" } else { "sh" }
}

/// Build a shell command appropriate for the platform.
///
/// `shell` overrides the interpreter program; the argument convention
/// (`/C` for `cmd`, `-c` for everything else) follows the program name.
pub fn shell_command(shell: Option<&str>, line: &str) -> Command {
    let program = shell.unwrap_or(default_shell());

    let flag = if is_cmd_exe(program) { "/C" } else { "-c" };

    let mut cmd = Command::new(program);
    cmd.arg(flag).arg(line);
    cmd
}

fn is_cmd_exe(program: &str) -> bool {
    let lower = program.to_ascii_lowercase();
    lower == "cmd" || lower == "cmd.exe" || lower.ends_with("\\cmd.exe")
}
