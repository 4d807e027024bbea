//! Backend stream client placeholder
//!
//! The second variant satisfying the client capability set. Session
//! negotiation, live transport, and backend execution are out of scope;
//! every operation warns and returns. `simulate_error` still works so the
//! error path can be exercised against this variant too.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::warn;

use super::{MessageCallback, StreamClient};
use crate::error::DashError;
use crate::message::StreamMsg;
use crate::request::ExecuteRequest;
use crate::types::SessionId;

/// Placeholder for the real backend connection.
#[derive(Default)]
pub struct BackendClient {
    callback: Mutex<Option<MessageCallback>>,
    closed: AtomicBool,
}

impl BackendClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StreamClient for BackendClient {
    fn on_message(&self, cb: MessageCallback) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        *self.callback.lock().unwrap() = Some(cb);
    }

    async fn connect(&self) -> Result<(), DashError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DashError::ClientClosed);
        }
        warn!("BackendClient::connect - not implemented in POC");
        Ok(())
    }

    async fn execute(&self, request: ExecuteRequest) -> Result<(), DashError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DashError::ClientClosed);
        }
        warn!(template = %request.template_id, "BackendClient::execute - not implemented in POC");
        Ok(())
    }

    fn simulate_error(&self) {
        let cb = self.callback.lock().unwrap().clone();
        if let Some(cb) = cb {
            cb(StreamMsg::Error {
                message: "Real client not wired yet.".to_string(),
            });
        }
    }

    fn cancel(&self) {}

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        *self.callback.lock().unwrap() = None;
    }

    fn session_id(&self) -> Option<SessionId> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn placeholder_accepts_but_emits_nothing() {
        let client = BackendClient::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        {
            let received = Arc::clone(&received);
            client.on_message(Arc::new(move |msg| received.lock().unwrap().push(msg)));
        }

        client.connect().await.unwrap();
        let request = ExecuteRequest::new(crate::types::TemplateId::new("taxa_bar").unwrap());
        client.execute(request).await.unwrap();
        assert!(client.session_id().is_none());
        assert!(received.lock().unwrap().is_empty());

        client.simulate_error();
        let msgs = received.lock().unwrap();
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].is_error());
    }

    #[tokio::test]
    async fn close_detaches_the_callback() {
        let client = BackendClient::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        {
            let received = Arc::clone(&received);
            client.on_message(Arc::new(move |msg| received.lock().unwrap().push(msg)));
        }
        client.close();
        client.simulate_error();
        assert!(received.lock().unwrap().is_empty());
        assert!(matches!(client.connect().await, Err(DashError::ClientClosed)));
    }
}
