//! Cancel-and-reschedule timer.
//!
//! A [`Debouncer`] owns one timer thread. Every [`Debouncer::call`]
//! replaces the pending action and restarts the quiet period, so only the
//! last action of a burst runs, `delay` after the burst ends.

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Delay used by the playground for both saving and compiling.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(750);

type Action = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct State {
    pending: Option<(Instant, Action)>,
    shutdown: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    wake: Condvar,
    /// Held while an action runs. Always taken with `state` held, so an
    /// action taken later cannot start before an earlier one finishes.
    running: Mutex<()>,
}

/// Runs the most recently scheduled action once the caller goes quiet.
pub struct Debouncer {
    delay: Duration,
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer that waits `delay` after the last call.
    pub fn new(delay: Duration) -> Self {
        let shared = Arc::new(Shared::default());
        let timer = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name("debounce".into())
            .spawn(move || run(&timer))
            .map_err(|e| tracing::error!(error = %e, "failed to spawn debounce timer"))
            .ok();
        Self {
            delay,
            shared,
            thread,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `action`, cancelling whatever was pending.
    pub fn call<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.thread.is_none() {
            // No timer to defer to.
            let _running = self.shared.running.lock();
            action();
            return;
        }
        let mut state = self.shared.state.lock();
        if state.pending.is_some() {
            tracing::trace!("debounce: replacing pending action");
        }
        state.pending = Some((Instant::now() + self.delay, Box::new(action)));
        self.shared.wake.notify_one();
    }

    /// Run the pending action now, on the calling thread.
    ///
    /// Waits for an action the timer is already running to finish first.
    /// Returns `false` if nothing was pending.
    pub fn flush(&self) -> bool {
        let mut state = self.shared.state.lock();
        let Some((_, action)) = state.pending.take() else {
            return false;
        };
        let _running = self.shared.running.lock();
        drop(state);
        action();
        true
    }

    /// Drop the pending action without running it.
    pub fn cancel(&self) -> bool {
        self.shared.state.lock().pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.shared.state.lock().pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
            state.pending = None;
        }
        self.shared.wake.notify_one();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("debounce timer thread panicked");
            }
        }
    }
}

fn run(shared: &Shared) {
    let mut state = shared.state.lock();
    loop {
        if state.shutdown {
            return;
        }
        let deadline = state.pending.as_ref().map(|(deadline, _)| *deadline);
        match deadline {
            None => shared.wake.wait(&mut state),
            Some(deadline) if Instant::now() >= deadline => {
                if let Some((_, action)) = state.pending.take() {
                    fire(&mut state, &shared.running, action);
                }
            }
            Some(deadline) => {
                shared.wake.wait_until(&mut state, deadline);
            }
        }
    }
}

fn fire(state: &mut MutexGuard<'_, State>, running: &Mutex<()>, action: Action) {
    let running = running.lock();
    MutexGuard::unlocked(state, move || {
        let _running = running;
        if panic::catch_unwind(AssertUnwindSafe(action)).is_err() {
            tracing::error!("debounced action panicked");
        }
    });
}
