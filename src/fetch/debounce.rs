use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Trailing-edge debouncer
///
/// Values pushed faster than `delay` apart collapse into the last one,
/// which is emitted once `delay` has passed without a new push. Each push
/// restarts the timer.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: mpsc::UnboundedReceiver<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the timer task; must be called inside a tokio runtime
    pub fn new(delay: Duration) -> Self {
        let (input, mut pending_rx) = mpsc::unbounded_channel::<T>();
        let (ready_tx, output) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => match pending_rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(value) => {
                        tokio::select! {
                            next = pending_rx.recv() => match next {
                                Some(newer) => pending = Some(newer),
                                None => {
                                    let _ = ready_tx.send(value);
                                    break;
                                }
                            },
                            _ = tokio::time::sleep(delay) => {
                                if ready_tx.send(value).is_err() {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        });

        Self {
            input,
            output,
            task,
        }
    }

    /// Queue a value, superseding any value still waiting
    pub fn push(&self, value: T) {
        if self.input.send(value).is_err() {
            tracing::warn!("debouncer task has stopped");
        }
    }

    /// Wait for the next settled value
    pub async fn next(&mut self) -> Option<T> {
        self.output.recv().await
    }

    /// Settled value if one is ready, without waiting
    pub fn try_next(&mut self) -> Option<T> {
        self.output.try_recv().ok()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
