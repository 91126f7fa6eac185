use std::sync::Mutex;

use tokio::task::JoinHandle;

/// Holder for at most one in-flight background task.
///
/// Arming the slot aborts whatever was armed before, so a reconnect timer
/// or deferred teardown can be superseded without leaking the old task.
/// The remaining task is aborted on drop.
pub(crate) struct TaskSlot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskSlot {
    pub(crate) fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Arm the slot with a new task, aborting any previous one.
    pub(crate) fn arm(&self, handle: JoinHandle<()>) {
        let mut guard = self.handle.lock().unwrap();
        if let Some(old) = guard.replace(handle) {
            old.abort();
        }
    }

    /// Discard the armed task without aborting it. Used by a task that is
    /// retiring its own slot: aborting here would kill the caller mid-run.
    pub(crate) fn disarm(&self) {
        self.handle.lock().unwrap().take();
    }

    /// Abort and discard the armed task, if any.
    pub(crate) fn cancel(&self) {
        if let Some(handle) = self.handle.lock().unwrap().take() {
            handle.abort();
        }
    }

    /// Whether a task is armed and still running.
    pub(crate) fn is_armed(&self) -> bool {
        self.handle
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
