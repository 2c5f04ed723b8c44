//! External history notification.
//!
//! Every recorded history entry may be mirrored to a remote endpoint. The POST
//! is fire-and-forget: it runs as a detached tokio task, its outcome is only
//! logged, and it never affects the caller.

use reqwest::Client;
use tokio::runtime::Handle;

use crate::types::history::NotificationPayload;

/// Receives a projection of every accepted history entry.
pub trait HistoryNotifier {
    /// Dispatches the payload. Must not block and must not fail.
    fn notify(&self, payload: NotificationPayload);
}

/// Notifier that POSTs the payload as JSON to a configured endpoint.
///
/// Both the endpoint and the HTTP client are optional; when either one is
/// missing, [`HistoryNotifier::notify`] does nothing.
#[derive(Debug, Clone, Default)]
pub struct HttpNotifier {
    endpoint: Option<String>,
    client: Option<Client>,
}

impl HttpNotifier {
    pub fn new(endpoint: Option<String>, client: Option<Client>) -> Self {
        Self { endpoint, client }
    }

    /// Creates a notifier for `endpoint` with a default `reqwest` client.
    pub fn for_endpoint(endpoint: &str) -> Self {
        Self::new(Some(endpoint.to_string()), Some(Client::new()))
    }
}

impl HistoryNotifier for HttpNotifier {
    fn notify(&self, payload: NotificationPayload) {
        let (Some(endpoint), Some(client)) = (&self.endpoint, &self.client) else {
            return;
        };

        let Ok(handle) = Handle::try_current() else {
            tracing::debug!(endpoint = %endpoint, "no tokio runtime, skipping history notification");
            return;
        };

        let request = client.post(endpoint).json(&payload);
        let endpoint = endpoint.clone();
        handle.spawn(async move {
            match request.send().await {
                Ok(resp) => {
                    tracing::debug!(endpoint = %endpoint, status = %resp.status(), "history notification sent")
                }
                Err(e) => {
                    tracing::debug!(endpoint = %endpoint, error = %e, "history notification failed")
                }
            }
        });
    }
}
