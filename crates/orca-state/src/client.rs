//! Access to the trainer's application configuration store.
//!
//! The trainer exposes exactly two operations on application documents:
//! fetch the whole list, and upsert one document by `Name`. There is no
//! partial-update endpoint, so every mutation in this crate is a
//! fetch-whole → mutate → replace-whole cycle.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http::{Method, Request, Uri, header};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::types::Application;

/// Path of the trainer's application collection.
pub const APPLICATIONS_PATH: &str = "/state/config/applications";

/// Default per-request timeout for trainer round-trips.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Backing store for application documents.
///
/// Implementations must treat `put_application` as a full replace keyed by
/// `Name`. No implementation retries.
pub trait ConfigStore: Clone + Send + Sync + 'static {
    /// Fetch every application document.
    fn list_applications(&self) -> impl Future<Output = StateResult<Vec<Application>>> + Send;

    /// First application whose name matches exactly.
    fn get_application(
        &self,
        name: &str,
    ) -> impl Future<Output = StateResult<Option<Application>>> + Send {
        async move {
            Ok(self
                .list_applications()
                .await?
                .into_iter()
                .find(|app| app.name == name))
        }
    }

    /// Replace (or create) the document with `app.name`.
    fn put_application(&self, app: &Application) -> impl Future<Output = StateResult<()>> + Send;
}

// ── HTTP client ───────────────────────────────────────────────────

/// HTTP client for a trainer's configuration API.
///
/// The endpoint is fixed at construction. Cloning is cheap and shares the
/// underlying connection pool.
#[derive(Clone)]
pub struct TrainerClient {
    http: Client<HttpConnector, Full<Bytes>>,
    applications_uri: Uri,
    timeout: Duration,
}

impl TrainerClient {
    /// Build a client for the trainer at `base_url` (e.g. `http://localhost:5001`).
    pub fn new(base_url: &str, timeout: Duration) -> StateResult<Self> {
        let base = base_url.trim().trim_end_matches('/');
        let applications_uri = format!("{base}{APPLICATIONS_PATH}")
            .parse::<Uri>()
            .map_err(map_err!(Endpoint))?;

        if applications_uri.scheme_str() != Some("http") {
            return Err(StateError::Endpoint(format!(
                "{base_url}: only http:// endpoints are supported"
            )));
        }
        if applications_uri.authority().is_none() {
            return Err(StateError::Endpoint(format!("{base_url}: missing host")));
        }

        let http = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self {
            http,
            applications_uri,
            timeout,
        })
    }

    /// Full URI of the application collection.
    pub fn applications_uri(&self) -> &Uri {
        &self.applications_uri
    }

    /// Send one request and return the body of a 2xx response.
    async fn send(&self, request: Request<Full<Bytes>>) -> StateResult<Bytes> {
        let method = request.method().clone();
        let uri = &self.applications_uri;

        let exchange = async {
            let response = self.http.request(request).await.map_err(map_err!(Transport))?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(map_err!(Transport))?
                .to_bytes();
            Ok::<_, StateError>((status, body))
        };

        let (status, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                StateError::Transport(format!(
                    "{method} {uri} timed out after {:?}",
                    self.timeout
                ))
            })??;

        debug!(%method, %uri, %status, bytes = body.len(), "trainer round-trip");

        if !status.is_success() {
            return Err(StateError::Transport(format!(
                "{method} {uri} returned {status}"
            )));
        }
        Ok(body)
    }
}

impl ConfigStore for TrainerClient {
    async fn list_applications(&self) -> StateResult<Vec<Application>> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(self.applications_uri.clone())
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, "orcaweb/0.1")
            .body(Full::new(Bytes::new()))
            .map_err(map_err!(Transport))?;

        let body = self.send(request).await?;
        // The trainer answers `null` when it has no applications.
        let applications: Option<Vec<Application>> =
            serde_json::from_slice(&body).map_err(map_err!(Decode))?;
        Ok(applications.unwrap_or_default())
    }

    async fn put_application(&self, app: &Application) -> StateResult<()> {
        let payload = serde_json::to_vec(app).map_err(map_err!(Encode))?;
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.applications_uri.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, "orcaweb/0.1")
            .body(Full::new(Bytes::from(payload)))
            .map_err(map_err!(Transport))?;

        self.send(request).await?;
        debug!(name = %app.name, "application stored on trainer");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_collection_uri_from_base() {
        let client = TrainerClient::new("http://localhost:5001/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            client.applications_uri().to_string(),
            "http://localhost:5001/state/config/applications"
        );
    }

    #[test]
    fn rejects_non_http_endpoints() {
        let err = TrainerClient::new("https://trainer:5001", DEFAULT_TIMEOUT)
            .err()
            .unwrap();
        assert!(matches!(err, StateError::Endpoint(_)));

        let err = TrainerClient::new("not a url", DEFAULT_TIMEOUT).err().unwrap();
        assert!(matches!(err, StateError::Endpoint(_)));
    }
}
