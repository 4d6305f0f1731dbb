//! Remote control facade over the home-automation backend.
//!
//! The dispatcher only needs three things from the backend: run a service
//! call, read an entity's current state, and know who the acting user is.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use cardlink_core::{EntityState, FrontendLocale, ServiceCall};
use tokio::sync::Notify;

use crate::error::RemoteError;

/// Backend capability injected into the dispatcher.
#[async_trait]
pub trait RemoteControl: Send + Sync {
    /// Run a service call. Failures are the backend's to report.
    async fn call_service(&self, call: ServiceCall) -> Result<(), RemoteError>;

    /// Current state of `entity_id`, if the backend knows it.
    fn state(&self, entity_id: &str) -> Option<EntityState>;

    /// Identifier of the acting user.
    fn user_id(&self) -> Option<String>;

    /// The user's locale profile, when the backend has one.
    fn locale(&self) -> Option<FrontendLocale> {
        None
    }

    /// Language tag used when there is no locale profile.
    fn language(&self) -> String {
        "en".to_string()
    }
}

/// In-process backend that keeps states in memory and records calls.
///
/// Calls do not change any state. While offline, calls are rejected with
/// [`RemoteError::Unavailable`] and not recorded.
#[derive(Default)]
pub struct MemoryRemote {
    states: Mutex<HashMap<String, EntityState>>,
    user_id: Option<String>,
    locale: Option<FrontendLocale>,
    offline: AtomicBool,
    calls: Mutex<Vec<ServiceCall>>,
    called: Notify,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_locale(mut self, locale: FrontendLocale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn with_state(self, entity_id: impl Into<String>, state: EntityState) -> Self {
        self.set_state(entity_id, state);
        self
    }

    pub fn with_states(self, states: HashMap<String, EntityState>) -> Self {
        lock(&self.states).extend(states);
        self
    }

    pub fn set_state(&self, entity_id: impl Into<String>, state: EntityState) {
        lock(&self.states).insert(entity_id.into(), state);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Every call received so far, oldest first.
    pub fn calls(&self) -> Vec<ServiceCall> {
        lock(&self.calls).clone()
    }

    /// Wait until at least `n` calls have arrived and return them.
    pub async fn wait_for_calls(&self, n: usize) -> Vec<ServiceCall> {
        loop {
            let notified = self.called.notified();
            {
                let calls = lock(&self.calls);
                if calls.len() >= n {
                    return calls.clone();
                }
            }
            notified.await;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl RemoteControl for MemoryRemote {
    async fn call_service(&self, call: ServiceCall) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable(format!("{} while offline", call)));
        }
        tracing::info!(service = %call, "Service called");
        lock(&self.calls).push(call);
        self.called.notify_waiters();
        Ok(())
    }

    fn state(&self, entity_id: &str) -> Option<EntityState> {
        lock(&self.states).get(entity_id).cloned()
    }

    fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    fn locale(&self) -> Option<FrontendLocale> {
        self.locale.clone()
    }
}
