use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use dagsched::exec::{ExitOutcome, ProcessExecutor};

/// One observation made by [`FakeExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecEvent {
    Started(String),
    Finished(String),
}

/// A fake executor that:
/// - records when each command starts and finishes
/// - optionally sleeps to simulate work
/// - returns a scripted outcome per command (default `Success`)
#[derive(Debug, Default)]
pub struct FakeExecutor {
    outcomes: HashMap<String, ExitOutcome>,
    delay: Option<Duration>,
    events: Mutex<Vec<ExecEvent>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `outcome` whenever `command` is executed.
    pub fn with_outcome(mut self, command: &str, outcome: ExitOutcome) -> Self {
        self.outcomes.insert(command.to_string(), outcome);
        self
    }

    /// Make every execution take at least `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn events(&self) -> Vec<ExecEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Commands in the order they were started.
    pub fn executed(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ExecEvent::Started(cmd) => Some(cmd),
                ExecEvent::Finished(_) => None,
            })
            .collect()
    }

    pub fn count_of(&self, command: &str) -> usize {
        self.executed().iter().filter(|c| c.as_str() == command).count()
    }

    /// Position of an event in the log, if it happened.
    pub fn position_of(&self, event: &ExecEvent) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }
}

impl ProcessExecutor for FakeExecutor {
    fn execute(&self, command: &str) -> ExitOutcome {
        self.events
            .lock()
            .unwrap()
            .push(ExecEvent::Started(command.to_string()));

        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        let outcome = self
            .outcomes
            .get(command)
            .copied()
            .unwrap_or(ExitOutcome::Success);

        self.events
            .lock()
            .unwrap()
            .push(ExecEvent::Finished(command.to_string()));
        outcome
    }
}
