// src/engine/scheduler.rs

use std::fmt;
use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};

use crate::dag::{Task, TaskGraph};
use crate::engine::gate::AdmissionGate;
use crate::engine::queue::ReadyQueue;
use crate::errors::{DagschedError, Result};
use crate::exec::{ExitOutcome, ProcessExecutor};
use crate::types::{AdmissionPolicy, TaskStatus};

/// Lifecycle of a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Constructed; no threads exist yet.
    Created,
    Running,
    /// Stop raised; waiting for workers to drain and exit.
    Stopping,
    /// Terminal.
    Stopped,
}

/// Everything guarded by the queue mutex.
#[derive(Debug)]
struct QueueState {
    ready: ReadyQueue,
    stop: bool,
    gate: Option<AdmissionGate>,
}

/// Queue mutex plus the condition variable workers sleep on.
#[derive(Debug)]
struct Channel {
    state: Mutex<QueueState>,
    wake: Condvar,
}

impl Channel {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn raise_stop(&self) {
        let mut state = self.lock();
        state.stop = true;
        drop(state);
        self.wake.notify_all();
    }
}

/// Cloneable handle that raises a scheduler's stop signal from any thread.
///
/// Workers keep draining the ready queue after stop is raised and exit once
/// it is empty; recurring tasks are no longer re-admitted. Raising the
/// token does not join anything: the owner still calls
/// [`Scheduler::stop`].
#[derive(Debug, Clone)]
pub struct StopToken {
    channel: Arc<Channel>,
}

impl StopToken {
    pub fn raise(&self) {
        self.channel.raise_stop();
    }

    pub fn is_raised(&self) -> bool {
        self.channel.lock().stop
    }
}

/// Body of one worker thread, handed to a [`WorkerSpawner`].
pub type WorkerBody = Box<dyn FnOnce() + Send + 'static>;

/// Launches worker `index` from a pre-named thread builder.
pub type WorkerSpawner = fn(usize, thread::Builder, WorkerBody) -> io::Result<JoinHandle<()>>;

fn spawn_worker(
    _index: usize,
    builder: thread::Builder,
    body: WorkerBody,
) -> io::Result<JoinHandle<()>> {
    builder.spawn(body)
}

/// Shared by every worker thread of one scheduler.
struct WorkerContext {
    channel: Arc<Channel>,
    graph: Arc<TaskGraph>,
    executor: Arc<dyn ProcessExecutor>,
}

/// Fixed-size pool of worker threads executing the tasks of a [`TaskGraph`].
///
/// The scheduler:
/// - computes a topological order on [`start`](Scheduler::start) and seeds
///   the ready queue from it
/// - runs each dequeued task through a [`ProcessExecutor`] outside the lock
/// - records `Completed` / `Failed` on the task
/// - re-admits recurring tasks after advancing their scheduled time
///
/// A task index has exactly one owner at any time (the queue or one
/// worker), which is what makes lock-free status writes sound.
pub struct Scheduler {
    graph: Arc<TaskGraph>,
    executor: Arc<dyn ProcessExecutor>,
    worker_count: usize,
    admission: AdmissionPolicy,
    channel: Arc<Channel>,
    workers: Vec<JoinHandle<()>>,
    spawner: WorkerSpawner,
    order: Option<Vec<usize>>,
    state: SchedulerState,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("tasks", &self.graph.len())
            .field("worker_count", &self.worker_count)
            .field("admission", &self.admission)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Build a scheduler for `graph` with `worker_count` workers.
    ///
    /// Allocates the ready queue and worker handle storage up front; no
    /// threads are started.
    pub fn new(
        graph: Arc<TaskGraph>,
        worker_count: usize,
        executor: Arc<dyn ProcessExecutor>,
    ) -> Result<Self> {
        if worker_count == 0 {
            return Err(DagschedError::InvalidWorkerCount(worker_count));
        }

        let ready = ReadyQueue::with_capacity(graph.len())?;

        let mut workers = Vec::new();
        workers.try_reserve_exact(worker_count)?;

        let channel = Arc::new(Channel {
            state: Mutex::new(QueueState {
                ready,
                stop: false,
                gate: None,
            }),
            wake: Condvar::new(),
        });

        Ok(Self {
            graph,
            executor,
            worker_count,
            admission: AdmissionPolicy::default(),
            channel,
            workers,
            spawner: spawn_worker,
            order: None,
            state: SchedulerState::Created,
        })
    }

    pub fn with_admission(mut self, admission: AdmissionPolicy) -> Self {
        self.admission = admission;
        self
    }

    /// Replace how worker threads are launched.
    #[doc(hidden)]
    pub fn with_spawner(mut self, spawner: WorkerSpawner) -> Self {
        self.spawner = spawner;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn admission(&self) -> AdmissionPolicy {
        self.admission
    }

    pub fn graph(&self) -> &Arc<TaskGraph> {
        &self.graph
    }

    /// Topological order computed by the last successful `start`.
    pub fn order(&self) -> Option<&[usize]> {
        self.order.as_deref()
    }

    /// Number of indices currently waiting in the ready queue.
    pub fn queued(&self) -> usize {
        self.channel.lock().ready.len()
    }

    pub fn stop_token(&self) -> StopToken {
        StopToken {
            channel: Arc::clone(&self.channel),
        }
    }

    /// Seed the ready queue and launch the workers.
    ///
    /// A cyclic graph aborts the start and leaves the scheduler `Created`.
    /// If a worker thread cannot be launched, the ones already running are
    /// stopped and joined before `StartFailure` is returned.
    pub fn start(&mut self) -> Result<()> {
        if self.state != SchedulerState::Created {
            return Err(DagschedError::StartFailure(format!(
                "scheduler is {:?}, expected Created",
                self.state
            )));
        }

        let order = self.graph.topological_sort()?;

        for task in self.graph.tasks() {
            task.set_status(TaskStatus::Pending);
        }

        {
            let mut guard = self.channel.lock();
            let state = &mut *guard;

            let admitted = match self.admission {
                AdmissionPolicy::Bulk => order.clone(),
                AdmissionPolicy::Gated => {
                    let gate = AdmissionGate::new(&self.graph);
                    let ready = gate.initially_ready(&order);
                    state.gate = Some(gate);
                    ready
                }
            };

            for index in admitted {
                if let Err(index) = state.ready.push(index) {
                    error!(index, "ready queue full while seeding; task not admitted");
                }
            }

            debug!(
                queued = state.ready.len(),
                admission = ?self.admission,
                "ready queue seeded"
            );
        }

        self.order = Some(order);

        for worker in 0..self.worker_count {
            let ctx = WorkerContext {
                channel: Arc::clone(&self.channel),
                graph: Arc::clone(&self.graph),
                executor: Arc::clone(&self.executor),
            };

            let builder = thread::Builder::new().name(format!("dagsched-worker-{worker}"));
            let body: WorkerBody = Box::new(move || worker_loop(worker, ctx));
            let spawned = (self.spawner)(worker, builder, body);

            match spawned {
                Ok(handle) => self.workers.push(handle),
                Err(err) => {
                    error!(worker, error = %err, "failed to launch worker thread");
                    self.channel.raise_stop();
                    self.join_workers();
                    self.release();
                    self.state = SchedulerState::Stopped;
                    return Err(DagschedError::StartFailure(format!(
                        "worker {worker} failed to launch: {err}"
                    )));
                }
            }
        }

        self.state = SchedulerState::Running;
        info!(
            workers = self.worker_count,
            tasks = self.graph.len(),
            "scheduler started"
        );
        Ok(())
    }

    /// Raise stop, wake every worker and wait for all of them to exit.
    ///
    /// Tasks already in the ready queue are still executed; running
    /// processes are never interrupted. Calling `stop` again, or on a
    /// scheduler that never started, is a no-op.
    pub fn stop(&mut self) {
        match self.state {
            SchedulerState::Stopped => return,
            SchedulerState::Created => {
                self.release();
                self.state = SchedulerState::Stopped;
                return;
            }
            SchedulerState::Running | SchedulerState::Stopping => {}
        }

        self.state = SchedulerState::Stopping;
        info!(workers = self.workers.len(), "stopping scheduler");

        self.channel.raise_stop();
        self.join_workers();
        self.release();

        self.state = SchedulerState::Stopped;
        info!("scheduler stopped");
    }

    fn join_workers(&mut self) {
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("worker thread panicked");
            }
        }
    }

    fn release(&mut self) {
        self.order = None;
        self.workers = Vec::new();
        let mut state = self.channel.lock();
        state.ready.clear();
        state.gate = None;
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Body of every worker thread.
fn worker_loop(worker: usize, ctx: WorkerContext) {
    debug!(worker, "worker started");

    loop {
        let index = {
            let guard = ctx.channel.lock();
            let mut guard = ctx
                .channel
                .wake
                .wait_while(guard, |s| s.ready.is_empty() && !s.stop)
                .unwrap_or_else(PoisonError::into_inner);

            // Woken with an empty queue means stop was raised.
            match guard.ready.pop() {
                Some(index) => index,
                None => break,
            }
        };

        let Some(task) = ctx.graph.task(index) else {
            warn!(worker, index, "dequeued index has no task; skipping");
            continue;
        };

        task.set_status(TaskStatus::Running);
        debug!(worker, task = %task.id(), index, "running task");

        let outcome = ctx.executor.execute(task.command());
        record_outcome(worker, index, task, outcome);

        readmit(&ctx, index, task, outcome);
    }

    debug!(worker, "worker exiting");
}

fn record_outcome(worker: usize, index: usize, task: &Task, outcome: ExitOutcome) {
    if outcome.is_success() {
        task.set_status(TaskStatus::Completed);
        info!(worker, task = %task.id(), index, "task completed");
    } else {
        task.set_status(TaskStatus::Failed);
        warn!(
            worker,
            task = %task.id(),
            index,
            exit_code = outcome.exit_code(),
            "task failed"
        );
    }
}

/// Push follow-up work after one execution: dependents released by the
/// gate, and the task itself if it recurs. Nothing new is admitted once
/// stop has been raised.
fn readmit(ctx: &WorkerContext, index: usize, task: &Task, outcome: ExitOutcome) {
    let mut guard = ctx.channel.lock();
    let state = &mut *guard;
    let mut admitted = 0usize;

    if let Some(gate) = state.gate.as_mut() {
        let release = gate.settle(&ctx.graph, index, outcome.is_success());

        for blocked in release.failed {
            if let Some(t) = ctx.graph.task(blocked) {
                t.set_status(TaskStatus::Failed);
                warn!(task = %t.id(), failed_dependency = %task.id(), "task blocked by failed dependency");
            }
        }

        if !state.stop {
            for ready in release.ready {
                match state.ready.push(ready) {
                    Ok(()) => admitted += 1,
                    Err(ready) => error!(index = ready, "ready queue full; dependent not admitted"),
                }
            }
        }
    }

    if task.is_recurring() && !state.stop {
        let next = task.advance_schedule();
        match state.ready.push(index) {
            Ok(()) => {
                admitted += 1;
                debug!(task = %task.id(), index, scheduled_time = next, "recurring task re-admitted");
            }
            Err(_) => error!(task = %task.id(), index, "ready queue full; recurring task dropped"),
        }
    }

    drop(guard);

    match admitted {
        0 => {}
        1 => ctx.channel.wake.notify_one(),
        _ => ctx.channel.wake.notify_all(),
    }
}
