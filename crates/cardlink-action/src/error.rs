//! Error types for the action engine.
//!
//! Dispatch itself never fails. These errors describe malformed input that
//! dispatch turns into a skip, and failures the backend reports for its own
//! service calls.

/// Errors from interpreting an action descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Service must be '<domain>.<service>', got: {0}")]
    InvalidService(String),
}

/// Errors reported by a remote control backend.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Service call {domain}.{service} failed: {message}")]
    ServiceCall {
        domain: String,
        service: String,
        message: String,
    },
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let err = ActionError::InvalidService("invalidnoservice".to_string());
        assert_eq!(
            err.to_string(),
            "Service must be '<domain>.<service>', got: invalidnoservice"
        );
    }

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::ServiceCall {
            domain: "light".to_string(),
            service: "turn_on".to_string(),
            message: "entity not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Service call light.turn_on failed: entity not found"
        );

        let err = RemoteError::Unavailable("socket closed".to_string());
        assert_eq!(err.to_string(), "Backend unavailable: socket closed");
    }

    #[test]
    fn test_errors_implement_debug() {
        let dbg = format!("{:?}", ActionError::InvalidService(String::new()));
        assert!(dbg.contains("InvalidService"));
        let dbg = format!("{:?}", RemoteError::Unavailable(String::new()));
        assert!(dbg.contains("Unavailable"));
    }
}
