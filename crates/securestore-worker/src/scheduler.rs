//! Cooperative scheduler for periodic tasks.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::task::PeriodicTask;

/// Runs every registered task on its own interval loop.
///
/// All loops share one `watch` cancellation channel, so shutdown is a single
/// signal. A run in progress is allowed to finish; the loop exits before its
/// next tick.
pub struct TaskScheduler {
    /// Registered tasks, started by [`TaskScheduler::start`].
    tasks: Vec<Arc<dyn PeriodicTask>>,
    /// Sender half when the scheduler owns its channel.
    cancel_tx: Option<watch::Sender<bool>>,
    /// Cancellation signal shared by all loops.
    cancel_rx: watch::Receiver<bool>,
    /// Spawned loops.
    handles: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("tasks", &self.tasks.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field("running", &self.handles.len())
            .finish()
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScheduler {
    /// Create an empty scheduler that owns its cancellation channel.
    pub fn new() -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        Self {
            tasks: Vec::new(),
            cancel_tx: Some(cancel_tx),
            cancel_rx,
            handles: Vec::new(),
        }
    }

    /// Create an empty scheduler that stops when `shutdown` turns `true`.
    ///
    /// The process-wide shutdown channel is then the only signal;
    /// [`shutdown`](Self::shutdown) only waits for the loops, so call it after
    /// the signal has been sent.
    pub fn with_shutdown(shutdown: watch::Receiver<bool>) -> Self {
        Self {
            tasks: Vec::new(),
            cancel_tx: None,
            cancel_rx: shutdown,
            handles: Vec::new(),
        }
    }

    /// Register a task. Tasks registered after [`start`](Self::start) are
    /// not run.
    pub fn register(&mut self, task: Arc<dyn PeriodicTask>) {
        tracing::info!(
            task = task.name(),
            interval_secs = task.interval().as_secs(),
            "Registered periodic task"
        );
        self.tasks.push(task);
    }

    /// Number of registered tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Spawn one loop per registered task.
    pub fn start(&mut self) {
        for task in &self.tasks {
            let task = Arc::clone(task);
            let cancel = self.cancel_rx.clone();
            self.handles.push(tokio::spawn(run_loop(task, cancel)));
        }
        tracing::info!(tasks = self.handles.len(), "Task scheduler started");
    }

    /// Signal every loop to stop and wait for them to exit.
    pub async fn shutdown(self) {
        if let Some(tx) = &self.cancel_tx {
            let _ = tx.send(true);
        }
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Periodic task loop panicked");
            }
        }
        tracing::info!("Task scheduler shut down");
    }
}

async fn run_loop(task: Arc<dyn PeriodicTask>, mut cancel: watch::Receiver<bool>) {
    let period = task.interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !*cancel.borrow() {
        tokio::select! {
            biased;
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                tracing::debug!(task = task.name(), "Running periodic task");
                match task.run().await {
                    Ok(summary) => {
                        tracing::info!(task = task.name(), %summary, "Periodic task finished");
                    }
                    Err(e) => {
                        tracing::error!(task = task.name(), error = %e, "Periodic task failed");
                    }
                }
            }
        }
    }

    tracing::info!(task = task.name(), "Periodic task stopped");
}
