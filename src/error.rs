//! Various errors module.

use thiserror::Error;

/// Represents errors when interacting with the `ReqRes` API.
///
/// This enum provides a set of error types that may occur during
/// API requests, each indicating a specific issue encountered.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Communication with the `ReqRes` API was successful,
    /// but returned a [401 Unauthorized]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/401") HTTP error response.
    ///
    /// As a side effect, the persisted credential and profile have already
    /// been cleared; call [`SessionStore::restore`](crate::SessionStore::restore)
    /// to bring the session back to its anonymous state.
    #[error("Unauthorized: The session has expired. Please log in again.")]
    Unauthorized,
    /// Communication with the `ReqRes` API was successful,
    /// but returned a [5xx Server Error]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/500") HTTP error response.
    ///
    /// Existing local state is left untouched.
    #[error("Server Error: The service failed to process the request. Please try again later.")]
    ServerError,
    /// Communication with the `ReqRes` API was successful,
    /// but returned a [4xx Client Error]("https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/400") HTTP error response.
    ///
    /// Carries the human-readable message extracted from the response
    /// body's `error` field when present, or a generic message otherwise.
    #[error("{0}")]
    ClientError(String),
    /// The request could not be completed at the network level: no response
    /// was received at all (connection failure, DNS error, timeout, ...).
    #[error("Network Error: Could not reach the ReqRes API: {0}")]
    NetworkError(String),
    /// The response status was successful but its body did not contain the
    /// expected data (for example, a login response without a `token`
    /// field, or a record envelope that does not match the user schema).
    #[error("Unexpected Response: The ReqRes API returned a response this crate could not interpret.")]
    UnexpectedResponse,
    /// The same operation is already in flight on this store.
    ///
    /// Duplicate submissions are rejected rather than queued; retry once
    /// the pending operation has settled.
    #[error("In Flight: The same request is already pending. Wait for it to settle before retrying.")]
    InFlight,
    /// The operation's cancellation token was triggered.
    ///
    /// The network call ran to completion, but its result was discarded
    /// and no local state was mutated.
    #[error("Cancelled: The operation was cancelled before its result was applied.")]
    Cancelled,
}
