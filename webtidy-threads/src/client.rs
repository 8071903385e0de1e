//! HTTP client for the discussion thread service.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use webtidy_types::ThreadId;

#[derive(Error, Debug)]
pub enum ThreadError {
    #[error("Thread request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to encode thread payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Body of a `createThread` request. Field order is the wire order.
#[derive(Serialize)]
struct CreateThreadPayload<'a> {
    content: &'a str,
    title: &'a str,
    #[serde(rename = "threadId")]
    thread_id: ThreadId,
}

/// Client for one thread service endpoint.
///
/// Requests are fire-and-forget: the response status is not inspected,
/// only transport failures surface as errors. Thread ids are handed out
/// from an internal counter; the counter has no default, the first id
/// must be supplied explicitly.
pub struct ThreadClient {
    http: reqwest::Client,
    base_url: String,
    next_thread_id: AtomicU64,
}

impl ThreadClient {
    pub fn new(base_url: impl Into<String>, first_thread_id: ThreadId) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            next_thread_id: AtomicU64::new(first_thread_id.as_u64()),
        }
    }

    /// Open a thread and return the id it was assigned.
    pub(crate) async fn create_thread(
        &self,
        title: &str,
        content: &str,
    ) -> Result<ThreadId, ThreadError> {
        let thread_id = ThreadId(self.next_thread_id.fetch_add(1, Ordering::SeqCst));
        let payload = serde_json::to_string(&CreateThreadPayload {
            content,
            title,
            thread_id,
        })?;
        debug!("Opening thread {} at {}", thread_id, self.base_url);
        self.http
            .post(format!("{}/createThread", self.base_url))
            .body(payload)
            .send()
            .await?;
        Ok(thread_id)
    }

    /// Close a thread. The body is the bare stringified id.
    pub(crate) async fn close_thread(&self, thread_id: ThreadId) -> Result<(), ThreadError> {
        debug!("Closing thread {} at {}", thread_id, self.base_url);
        self.http
            .post(format!("{}/closeThread", self.base_url))
            .body(thread_id.to_string())
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_wire_shape() {
        let payload = CreateThreadPayload {
            content: "hello world",
            title: "greeting",
            thread_id: ThreadId(41),
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"content":"hello world","title":"greeting","threadId":41}"#
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ThreadClient::new("http://localhost:9000/", ThreadId(1));
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
