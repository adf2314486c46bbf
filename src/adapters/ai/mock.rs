//! Mock chat backend for testing.
//!
//! Configurable mock implementation of the ChatBackend port, letting tests
//! run the full pipeline without calling a real provider.
//!
//! # Features
//!
//! - Scripted replies, consumed in order
//! - Error injection for resilience testing
//! - Call capture for verification
//!
//! # Example
//!
//! ```ignore
//! let backend = MockChatBackend::new()
//!     .with_reply("Hello, how can I help?")
//!     .with_error(BackendError::network("down"));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{BackendError, BackendInfo, ChatBackend, CompletionRequest};

/// A scripted mock response.
#[derive(Debug)]
pub enum MockResponse {
    /// Return this reply text.
    Reply(String),
    /// Fail with this error.
    Error(BackendError),
}

/// Mock chat backend.
///
/// Clones share the same script queue and call log, so a test can keep a
/// handle for assertions while the pipeline owns another.
#[derive(Clone, Default)]
pub struct MockChatBackend {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockChatBackend {
    /// Creates a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_reply(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Reply(content.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: BackendError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(error));
        self
    }

    /// All completion requests received so far, in call order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of completion calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(request);

        match self.responses.lock().unwrap().pop_front() {
            Some(MockResponse::Reply(content)) => Ok(content),
            Some(MockResponse::Error(err)) => Err(err),
            // An exhausted script behaves like a model with nothing to say.
            None => Ok(String::new()),
        }
    }

    fn info(&self) -> BackendInfo {
        BackendInfo::new("mock", "mock-model")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MessageRole;

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let backend = MockChatBackend::new().with_reply("first").with_reply("second");

        let req = CompletionRequest::new().with_message(MessageRole::User, "x");
        assert_eq!(backend.complete(req.clone()).await.unwrap(), "first");
        assert_eq!(backend.complete(req).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn errors_are_injected() {
        let backend = MockChatBackend::new().with_error(BackendError::AuthenticationFailed);

        let req = CompletionRequest::new().with_message(MessageRole::User, "x");
        assert!(matches!(
            backend.complete(req).await,
            Err(BackendError::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    async fn calls_are_captured() {
        let backend = MockChatBackend::new().with_reply("ok");
        let clone = backend.clone();

        let req = CompletionRequest::new()
            .with_system_prompt("sys")
            .with_message(MessageRole::User, "captured");
        clone.complete(req).await.unwrap();

        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.calls()[0].messages[0].content, "captured");
    }

    #[tokio::test]
    async fn exhausted_script_returns_empty_reply() {
        let backend = MockChatBackend::new();
        let req = CompletionRequest::new().with_message(MessageRole::User, "x");
        assert_eq!(backend.complete(req).await.unwrap(), "");
    }
}
