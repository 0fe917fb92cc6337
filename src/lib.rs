// src/lib.rs

pub mod board;
pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod shell;
pub mod types;

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::board::TaskBoard;
use crate::cli::CliArgs;
use crate::config::{ConfigFile, default_config_path, load_and_validate};
use crate::dag::TaskGraph;
use crate::engine::StopToken;
use crate::exec::ShellExecutor;
use crate::shell::{Shell, ShellFlow};

/// Worker count used when neither the CLI nor the config names one.
pub const DEFAULT_WORKERS: usize = 4;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - optional task-file loading
/// - task board + process executor
/// - the interactive shell on stdin
/// - Ctrl-C handling (graceful scheduler shutdown, then exit)
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;

    if args.dry_run {
        print_dry_run(cfg.as_ref())?;
        return Ok(());
    }

    let graph = match &cfg {
        Some(cfg) => cfg.build_graph()?,
        None => TaskGraph::new(),
    };

    let executor = match &cfg {
        Some(cfg) => ShellExecutor::from_config(&cfg.executor),
        None => ShellExecutor::new(),
    };

    let admission = args
        .admission
        .or(cfg.as_ref().map(|c| c.scheduler.admission))
        .unwrap_or_default();
    let workers = args
        .workers
        .or(cfg.as_ref().map(|c| c.scheduler.workers))
        .unwrap_or(DEFAULT_WORKERS);

    let board = TaskBoard::from_graph(graph, Arc::new(executor)).with_admission(admission);
    let mut shell = Shell::new(board, workers);

    if args.run {
        shell.run(None, &mut io::stdout().lock(), &mut io::stderr().lock())?;
    }

    // Ctrl-C → raise stop on the running scheduler, then graceful shutdown.
    let (token_tx, token_rx) = watch::channel(shell.board().stop_token());
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(forward_interrupt(
        tokio::signal::ctrl_c(),
        token_rx,
        shutdown_tx,
    ));

    let mut lines = spawn_stdin_reader();
    info!(workers, ?admission, "dagsched shell ready");

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line.transpose().context("reading stdin")? else {
                    debug!("stdin closed; exiting shell");
                    break;
                };
                let flow = tokio::task::block_in_place(|| {
                    let mut out = io::stdout().lock();
                    let mut err = io::stderr().lock();
                    let flow = shell.execute_line(&line, &mut out, &mut err);
                    out.flush()?;
                    flow
                })?;
                token_tx.send_replace(shell.board().stop_token());
                if flow == ShellFlow::Exit {
                    break;
                }
            }
            Some(()) = shutdown_rx.recv() => {
                eprintln!("\n^C received, exiting...");
                break;
            }
        }
    }

    tokio::task::block_in_place(|| shell.shutdown());
    info!("dagsched exiting");
    Ok(())
}

/// Wait for `interrupt`, raise the stop signal of the scheduler running at
/// that moment, then tell the shell loop to exit.
///
/// Raising stop here takes effect even while the shell loop is busy with a
/// command: workers stop re-admitting recurring tasks right away.
pub async fn forward_interrupt<F>(
    interrupt: F,
    tokens: watch::Receiver<Option<StopToken>>,
    shutdown: mpsc::Sender<()>,
) where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = interrupt.await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        return;
    }

    let token = tokens.borrow().clone();
    if let Some(token) = token {
        token.raise();
        info!("interrupt received; scheduler stop raised");
    }

    let _ = shutdown.send(()).await;
}

/// Read stdin lines on a plain thread and forward them to the shell loop.
///
/// Blocking reads live outside the runtime so that leaving the loop (exit,
/// Ctrl-C) never has to wait for a pending read.
fn spawn_stdin_reader() -> mpsc::Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Load `--config`, or `Dagsched.toml` when it exists.
fn load_config(args: &CliArgs) -> Result<Option<ConfigFile>> {
    let path = match &args.config {
        Some(path) => PathBuf::from(path),
        None => {
            let default = default_config_path();
            if !default.is_file() {
                return Ok(None);
            }
            default
        }
    };

    let cfg = load_and_validate(&path)
        .with_context(|| format!("loading task file {}", path.display()))?;
    info!(path = %path.display(), tasks = cfg.task.len(), "task file loaded");
    Ok(Some(cfg))
}

/// Print tasks, dependencies and the seeding order without running anything.
fn print_dry_run(cfg: Option<&ConfigFile>) -> Result<()> {
    let Some(cfg) = cfg else {
        println!("dagsched dry-run: no task file loaded");
        return Ok(());
    };

    let graph = cfg.build_graph()?;

    println!("dagsched dry-run");
    println!("  scheduler.workers = {}", cfg.scheduler.workers);
    println!("  scheduler.admission = {:?}", cfg.scheduler.admission);
    println!();

    println!("tasks ({}):", graph.len());
    for tc in &cfg.task {
        println!("  - {}", tc.id);
        println!("      cmd: {}", tc.cmd);
        println!("      time: {}  freq: {}", tc.time, tc.freq);
        if !tc.after.is_empty() {
            println!("      after: {:?}", tc.after);
        }
    }
    println!();

    let order: Vec<&str> = graph
        .topological_sort()?
        .into_iter()
        .filter_map(|i| graph.task(i).map(|t| t.id()))
        .collect();
    println!("topological order: {}", order.join(" -> "));

    debug!("dry-run complete (no execution)");
    Ok(())
}
