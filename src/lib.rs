//! `reqres-rs` is a stateful Rust client for the [ReqRes](https://reqres.in) demo REST API.
//!
//! The crate is split into a thin HTTP adapter ([`ReqRes`]) that classifies
//! responses and injects the bearer credential, and two state containers
//! built on top of it: a [`SessionStore`] for the authentication lifecycle
//! and a [`CollectionStore`] for the currently loaded page of user records.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::error::Error;
//!
//! use reqres_rs::{CollectionStore, ReqRes, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let client = ReqRes::new("https://reqres.in/api");
//!
//!     let session = SessionStore::new(client.clone());
//!     session.restore();
//!     session.login("eve.holt@reqres.in", "cityslicka").await?;
//!
//!     let collection = CollectionStore::new(client);
//!     collection.load(1).await?;
//!     collection.set_filter("janet");
//!
//!     for user in collection.visible_records() {
//!         println!("{} <{}>", user.full_name(), user.email);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(dead_code)]

use std::sync::Arc;

pub use api::users::{UserPage, UserRecord, UserUpdate};
pub use cancel::CancelToken;
pub use error::RequestError;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::Value;
pub use storage::{AUTH_TOKEN_KEY, MemoryStorage, PROFILE_KEY, SessionStorage};
pub use store::collection::CollectionStore;
pub use store::session::{Profile, SessionState, SessionStore};

pub(crate) mod api;
pub(crate) mod cancel;
pub mod error;
pub(crate) mod storage;
pub(crate) mod store;

/// A classified, normalized response from the `ReqRes` API.
///
/// Produced by [`ReqRes::send`] for every non-error outcome. The payload is
/// always a JSON value; an empty or unparsable body is normalized to an
/// empty object rather than surfaced as a parse error.
#[derive(Debug, Clone)]
pub(crate) struct ApiResponse {
    /// HTTP status code of the response.
    pub(crate) status: u16,
    /// Parsed JSON body, `{}` when the body was empty or not JSON.
    pub(crate) payload: Value,
}

/// A `ReqRes` client for sending requests to the ReqRes demo API.
///
/// The client owns the persisted-storage capability that holds the bearer
/// credential and profile stub; cloning the client shares that capability,
/// which is how the [`SessionStore`] and [`CollectionStore`] end up reading
/// and writing the same session data.
///
/// The `Debug` implementation redacts the credential to prevent accidental
/// exposure in logs.
///
/// # Example
/// ```rust,ignore
/// use reqres_rs::{ReqRes, SessionStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ReqRes::new("https://reqres.in/api");
///
///     let session = SessionStore::new(client.clone());
///     session.login("eve.holt@reqres.in", "cityslicka").await?;
///
///     let page = client.list_users(2).await?;
///     println!("{} users on page 2", page.data.len());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ReqRes {
    pub(crate) base_url: String,
    pub(crate) storage: Arc<dyn SessionStorage>,
    pub(crate) http: reqwest::Client,
}

impl std::fmt::Debug for ReqRes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqRes")
            .field("base_url", &self.base_url)
            .field(
                "credential",
                &self.storage.get(AUTH_TOKEN_KEY).map(|_| "***REDACTED***"),
            )
            .field("http", &"Client")
            .finish()
    }
}

impl ReqRes {
    /// Creates a new client backed by an in-memory [`MemoryStorage`].
    ///
    /// # Example
    /// ```rust
    /// let client = reqres_rs::ReqRes::new("https://reqres.in/api");
    /// ```
    ///
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not a valid URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_storage(base_url, Arc::new(MemoryStorage::default()))
    }

    /// Creates a new client with an injected [`SessionStorage`].
    ///
    /// This is the single injection point for persisted session data: both
    /// stores and the bearer-credential attachment read and write through
    /// the capability given here, never through any ambient storage.
    ///
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not a valid URL.
    #[must_use]
    pub fn with_storage(base_url: &str, storage: Arc<dyn SessionStorage>) -> Self {
        // Create client with sensible defaults
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self::with_client(base_url, client, storage)
    }

    /// Creates a new client with a custom reqwest client and storage.
    ///
    /// # Example
    /// ```rust
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let reqwest_client = reqwest::Client::builder()
    ///     .timeout(Duration::from_secs(60))
    ///     .build()
    ///     .expect("Failed to build client");
    ///
    /// let client = reqres_rs::ReqRes::with_client(
    ///     "https://reqres.in/api",
    ///     reqwest_client,
    ///     Arc::new(reqres_rs::MemoryStorage::default()),
    /// );
    /// ```
    ///
    /// # Panics
    ///
    /// This method will panic if the provided `base_url` is not a valid URL.
    #[must_use]
    pub fn with_client(
        base_url: &str,
        client: reqwest::Client,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        // Validate URL format
        let trimmed_url = base_url.trim_end_matches('/');
        assert!(
            trimmed_url.starts_with("http://") || trimmed_url.starts_with("https://"),
            "Invalid base_url: must start with http:// or https://"
        );

        Self {
            base_url: trimmed_url.to_string(),
            storage,
            http: client,
        }
    }

    /// Retrieves the persisted bearer credential, if one is present.
    ///
    /// Presence of a credential is a weak, purely local signal; it is never
    /// verified against the remote service.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(AUTH_TOKEN_KEY)
    }

    /// Returns the base URL of the ReqRes API this client talks to.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_url.clone()
    }

    pub(crate) fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }
}

impl ReqRes {
    /// Adds an authorization token to the request, if available.
    ///
    /// Attaches a bearer authentication token to the provided
    /// `RequestBuilder` when the persisted storage holds a credential. If no
    /// credential is present, the request is returned unchanged.
    pub(crate) fn with_authorization_token(
        &self,
        request_builder: RequestBuilder,
    ) -> RequestBuilder {
        if let Some(token) = self.storage.get(AUTH_TOKEN_KEY) {
            request_builder.bearer_auth(token)
        } else {
            request_builder
        }
    }

    /// Creates a GET request builder for the specified path.
    ///
    /// Adds an `Accept` header for JSON responses, attaches query
    /// parameters if provided, and adds an authorization token if available.
    pub(crate) fn request_get(
        &self,
        path: &str,
        params: Option<Vec<(&str, &str)>>,
    ) -> RequestBuilder {
        let mut request_builder = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header("Accept", "application/json");

        if let Some(params) = params {
            request_builder = request_builder.query(&params);
        }

        self.with_authorization_token(request_builder)
    }

    /// Creates a POST request builder with JSON body for the specified path.
    pub(crate) fn request_post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> RequestBuilder {
        let request_builder = self.http.post(format!("{}{path}", self.base_url)).json(body);
        self.with_authorization_token(request_builder)
    }

    /// Creates a PUT request builder with JSON body for the specified path.
    pub(crate) fn request_put_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> RequestBuilder {
        let request_builder = self.http.put(format!("{}{path}", self.base_url)).json(body);
        self.with_authorization_token(request_builder)
    }

    /// Creates a DELETE request builder for the specified path.
    pub(crate) fn request_delete(&self, path: &str) -> RequestBuilder {
        let request_builder = self.http.delete(format!("{}{path}", self.base_url));
        self.with_authorization_token(request_builder)
    }

    /// Sends a prepared request and classifies the outcome.
    ///
    /// Classification:
    /// - no response at all → [`RequestError::NetworkError`];
    /// - 401 → clears the persisted credential and profile, then
    ///   [`RequestError::Unauthorized`];
    /// - 5xx → [`RequestError::ServerError`];
    /// - other 4xx → [`RequestError::ClientError`] with the body's `error`
    ///   field as message, except a 404 answering a DELETE, which is folded
    ///   into success (the delete endpoint reports success for arbitrary
    ///   ids, so a 404 there carries no usable signal);
    /// - anything else → success with the body parsed as JSON, an empty or
    ///   unparsable body normalized to `{}`.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<ApiResponse, RequestError> {
        let request = builder
            .build()
            .map_err(|error| RequestError::NetworkError(error.to_string()))?;
        let method = request.method().clone();

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| RequestError::NetworkError(error.to_string()))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.storage.remove(AUTH_TOKEN_KEY);
            self.storage.remove(PROFILE_KEY);
            return Err(RequestError::Unauthorized);
        }

        if status.is_server_error() {
            return Err(RequestError::ServerError);
        }

        if status.is_client_error() {
            if method == Method::DELETE && status == StatusCode::NOT_FOUND {
                return Ok(ApiResponse {
                    status: status.as_u16(),
                    payload: Value::Object(serde_json::Map::new()),
                });
            }

            let payload = json_or_empty(response).await;
            let message = payload
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("An error occurred")
                .to_owned();
            return Err(RequestError::ClientError(message));
        }

        let payload = json_or_empty(response).await;

        Ok(ApiResponse {
            status: status.as_u16(),
            payload,
        })
    }
}

/// Parses the response body as JSON, normalizing failures to `{}`.
async fn json_or_empty(response: reqwest::Response) -> Value {
    (response.json::<Value>().await).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}
