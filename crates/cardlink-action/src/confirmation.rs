//! User confirmation flow for action execution.
//!
//! Actions may carry a confirmation policy. Unless the acting user is
//! exempt, dispatch suspends on a yes/no [`Prompt`] and resumes only when
//! the user affirms.

use std::sync::Arc;

use async_trait::async_trait;
use cardlink_core::config::ConfirmationConfig;

use crate::types::{ActionDescriptor, ConfirmationPolicy};

/// Host capability that asks the user a yes/no question.
///
/// A blocking host answers synchronously; a modal UI resolves the future
/// when the user responds.
#[async_trait]
pub trait Prompt: Send + Sync {
    async fn confirm(&self, text: &str) -> bool;
}

/// Gate that decides whether an action may run.
pub struct ConfirmationGate {
    prompt: Arc<dyn Prompt>,
    config: ConfirmationConfig,
}

impl ConfirmationGate {
    /// Create a new gate asking through `prompt`.
    pub fn new(prompt: Arc<dyn Prompt>, config: ConfirmationConfig) -> Self {
        Self { prompt, config }
    }

    /// Text shown for `descriptor`: the policy's own text, or the default
    /// template filled with the action kind.
    pub fn prompt_text(&self, descriptor: &ActionDescriptor, policy: &ConfirmationPolicy) -> String {
        match policy.text.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => self.config.default_text(&descriptor.kind().to_string()),
        }
    }

    /// Returns `true` if the action may proceed.
    ///
    /// Descriptors without a policy and exempt users pass without a prompt.
    pub async fn approve(&self, descriptor: &ActionDescriptor, user_id: Option<&str>) -> bool {
        let Some(policy) = descriptor.confirmation.as_ref() else {
            return true;
        };
        if policy.exempts(user_id) {
            tracing::debug!(action = %descriptor.kind(), "User exempt from confirmation");
            return true;
        }
        let text = self.prompt_text(descriptor, policy);
        let approved = self.prompt.confirm(&text).await;
        if !approved {
            tracing::debug!(action = %descriptor.kind(), "Confirmation declined");
        }
        approved
    }
}
