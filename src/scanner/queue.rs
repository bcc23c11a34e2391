//! Dispatch queue between the task source and the worker pool.
//!
//! A bounded tokio channel. The sending half blocks when the queue is full;
//! the receiving half is shared by every worker, so each task is handed to
//! exactly one of them. Dropping the sender closes the queue and workers
//! stop once it is drained.

use crate::scanner::task::ScanTask;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Create a dispatch queue holding at most `capacity` pending tasks.
pub fn dispatch_queue(capacity: usize) -> (TaskSender, TaskReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        TaskSender { tx },
        TaskReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producer half of the dispatch queue.
#[derive(Debug)]
pub struct TaskSender {
    tx: mpsc::Sender<ScanTask>,
}

impl TaskSender {
    /// Enqueue a task, waiting for space if the queue is full.
    ///
    /// Fails with the task handed back if every receiver is gone.
    pub async fn send(&self, task: ScanTask) -> Result<(), ScanTask> {
        self.tx.send(task).await.map_err(|e| e.0)
    }

    /// Close the queue. Workers finish the tasks still queued, then exit.
    pub fn close(self) {
        drop(self);
    }
}

/// Consumer half of the dispatch queue, cloned into every worker.
#[derive(Debug, Clone)]
pub struct TaskReceiver {
    rx: Arc<Mutex<mpsc::Receiver<ScanTask>>>,
}

impl TaskReceiver {
    /// Take the next task, or `None` once the queue is closed and empty.
    pub async fn next(&self) -> Option<ScanTask> {
        self.rx.lock().await.recv().await
    }
}
