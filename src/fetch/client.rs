// src/fetch/client.rs
// =============================================================================
// The HTTP client shared by every unit of work.
//
// Key functionality:
// - One reqwest Client for the whole run (connection pooling)
// - A timeout that covers the whole request, body included
// - A semaphore that caps how many requests are in flight at once
// - Non-2xx statuses and timeouts turned into GrabError values
//
// No retries: a failed request fails the unit that asked for it and nothing
// else.
//
// Rust concepts:
// - Arc: shared ownership of the semaphore between clones of the Fetcher
// - RAII permits: the slot is released when the permit is dropped
// =============================================================================

use crate::error::GrabError;
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::debug;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with a bounded number of in-flight requests.
///
/// Cloning is cheap: clones share the connection pool and the limit.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    slots: Arc<Semaphore>,
}

/// A held in-flight slot. Dropping it frees the slot.
pub type Permit<'a> = Option<SemaphorePermit<'a>>;

impl Fetcher {
    /// Builds the client.
    ///
    /// `timeout` applies to each request from connect to the last body byte.
    /// `max_in_flight` is clamped to at least 1.
    pub fn new(timeout: Duration, max_in_flight: usize) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            slots: Arc::new(Semaphore::new(max_in_flight.max(1))),
        })
    }

    /// Waits for a free in-flight slot.
    pub async fn permit(&self) -> Permit<'_> {
        // The semaphore is never closed, so acquire only fails in theory
        self.slots.acquire().await.ok()
    }

    /// Sends a GET and checks the status.
    ///
    /// The caller must hold a permit for as long as it reads the body.
    pub async fn get(&self, url: &str) -> Result<Response, GrabError> {
        debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GrabError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GrabError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Fetches a page and returns its body as text.
    pub async fn get_text(&self, url: &str) -> Result<String, GrabError> {
        let _permit = self.permit().await;

        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|e| GrabError::from_reqwest(url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_text_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5), 2).unwrap();
        let body = fetcher.get_text(&server.uri()).await.unwrap();
        assert_eq!(body, "<html>hi</html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_secs(5), 2).unwrap();
        let url = format!("{}/missing.html", server.uri());
        let err = fetcher.get_text(&url).await.unwrap_err();
        assert!(matches!(err, GrabError::HttpStatus { status: 404, .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_millis(200), 2).unwrap();
        let err = fetcher.get_text(&server.uri()).await.unwrap_err();
        assert!(matches!(err, GrabError::Timeout { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_permits_are_bounded() {
        let fetcher = Fetcher::new(Duration::from_secs(1), 1).unwrap();
        let first = fetcher.permit().await;
        assert!(first.is_some());
        assert_eq!(fetcher.slots.available_permits(), 0);
        drop(first);
        assert_eq!(fetcher.slots.available_permits(), 1);
    }
}
