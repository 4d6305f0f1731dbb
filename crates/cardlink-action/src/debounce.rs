//! Debounced invoker.
//!
//! Collapses bursts of calls into one invocation: the last call of a burst
//! after a quiet window (trailing), or the first call of a burst right away
//! (immediate). Each pending window is a spawned timer task; a generation
//! counter invalidates timers superseded by a newer call.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use cardlink_core::config::DebounceConfig;
use tokio::task::JoinHandle;

struct TimerState {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

struct Inner<A> {
    func: Box<dyn Fn(A) + Send + Sync>,
    wait: Duration,
    immediate: bool,
    state: Mutex<TimerState>,
}

impl<A> Inner<A> {
    fn state(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A function wrapped with debounce semantics.
///
/// One instance owns one timer. Independent call sites should each wrap
/// their own instance rather than share one.
pub struct Debouncer<A> {
    inner: Arc<Inner<A>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F>(func: F, wait: Duration, immediate: bool) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                func: Box::new(func),
                wait,
                immediate,
                state: Mutex::new(TimerState {
                    generation: 0,
                    pending: None,
                }),
            }),
        }
    }

    pub fn from_config<F>(func: F, config: &DebounceConfig) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self::new(func, config.wait(), config.immediate)
    }

    /// Register a call with `args`.
    ///
    /// Restarts the quiet window. In trailing mode `args` replace those of
    /// any earlier call in the burst; in immediate mode the function runs
    /// now if no window is open and `args` are otherwise dropped.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn call(&self, args: A) {
        let run_now = {
            let mut state = self.inner.state();
            let call_now = self.inner.immediate && state.pending.is_none();
            if let Some(timer) = state.pending.take() {
                timer.abort();
            }
            state.generation = state.generation.wrapping_add(1);
            let generation = state.generation;

            let (run_now, run_later) = if self.inner.immediate {
                (call_now.then_some(args), None)
            } else {
                (None, Some(args))
            };

            let inner = Arc::clone(&self.inner);
            state.pending = Some(tokio::spawn(async move {
                tokio::time::sleep(inner.wait).await;
                {
                    let mut state = inner.state();
                    if state.generation != generation {
                        return;
                    }
                    state.pending = None;
                }
                if let Some(args) = run_later {
                    (inner.func)(args);
                }
            }));
            run_now
        };

        if let Some(args) = run_now {
            (self.inner.func)(args);
        }
    }

    /// Whether a quiet window is currently open.
    pub fn is_pending(&self) -> bool {
        self.inner.state().pending.is_some()
    }

    /// Drop the open window, if any, without invoking.
    pub fn cancel(&self) {
        let mut state = self.inner.state();
        state.generation = state.generation.wrapping_add(1);
        if let Some(timer) = state.pending.take() {
            timer.abort();
        }
    }
}
