// src/shell/commands.rs

//! Parsing of tokenized shell input into typed commands.

/// One shell command with validated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    AddTask {
        id: String,
        cmd: String,
        time: i64,
        freq: u64,
    },
    AddDep {
        from: String,
        to: String,
    },
    Show(ShowTarget),
    /// `None` means the configured default worker count.
    Run(Option<usize>),
    Stop,
    Help,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTarget {
    Tasks,
    Deps,
    Order,
}

pub const HELP_TEXT: &str = "\
Available commands:
  add_task <id> \"<cmd>\" <time> <freq>  - Add a new task
  add_dep <from> <to>                   - Add a dependency
  show tasks                            - List tasks
  show deps                             - List dependencies
  show order                            - Show the topological order
  run [n_workers]                       - Start scheduler
  stop                                  - Stop the running scheduler
  help                                  - Show this help
  exit                                  - Quit
";

/// Parse tokens into a command. The error is the message shown to the user.
pub fn parse_command(tokens: &[String]) -> Result<ShellCommand, String> {
    let Some(name) = tokens.first() else {
        return Err("Empty command".to_string());
    };

    match name.as_str() {
        "add_task" => parse_add_task(tokens),
        "add_dep" => parse_add_dep(tokens),
        "show" => parse_show(tokens),
        "run" => parse_run(tokens),
        "stop" => Ok(ShellCommand::Stop),
        "help" => Ok(ShellCommand::Help),
        "exit" => Ok(ShellCommand::Exit),
        _ => Err("Unknown command (type 'help')".to_string()),
    }
}

fn parse_add_task(tokens: &[String]) -> Result<ShellCommand, String> {
    let [_, id, cmd, time, freq] = tokens else {
        return Err("Usage: add_task <id> \"<cmd>\" <time> <freq>".to_string());
    };

    let time = time
        .parse::<i64>()
        .ok()
        .filter(|t| *t >= 0)
        .ok_or_else(|| "Invalid time".to_string())?;
    let freq = freq
        .parse::<u64>()
        .map_err(|_| "Invalid freq".to_string())?;

    Ok(ShellCommand::AddTask {
        id: id.clone(),
        cmd: cmd.clone(),
        time,
        freq,
    })
}

fn parse_add_dep(tokens: &[String]) -> Result<ShellCommand, String> {
    let [_, from, to] = tokens else {
        return Err("Usage: add_dep <from> <to>".to_string());
    };
    Ok(ShellCommand::AddDep {
        from: from.clone(),
        to: to.clone(),
    })
}

fn parse_show(tokens: &[String]) -> Result<ShellCommand, String> {
    let [_, what] = tokens else {
        return Err("Usage: show tasks|deps|order".to_string());
    };
    match what.as_str() {
        "tasks" => Ok(ShellCommand::Show(ShowTarget::Tasks)),
        "deps" => Ok(ShellCommand::Show(ShowTarget::Deps)),
        "order" => Ok(ShellCommand::Show(ShowTarget::Order)),
        _ => Err("Unknown show option".to_string()),
    }
}

fn parse_run(tokens: &[String]) -> Result<ShellCommand, String> {
    match tokens {
        [_] => Ok(ShellCommand::Run(None)),
        [_, n] => match n.parse::<usize>() {
            Ok(n) if n > 0 => Ok(ShellCommand::Run(Some(n))),
            _ => Err("Invalid worker count".to_string()),
        },
        _ => Err("Usage: run [n_workers]".to_string()),
    }
}
