//! The login endpoint.

use serde::Serialize;
use serde_json::Value;

use crate::ReqRes;
use crate::error::RequestError;

#[derive(Clone, Default, Serialize)]
struct Credentials<'a> {
    pub(crate) email: &'a str,
    pub(crate) password: &'a str,
}

impl ReqRes {
    /// Exchanges an email/password pair for a bearer token.
    ///
    /// This is the raw wire operation; [`SessionStore::login`] layers
    /// credential persistence and session-state bookkeeping on top of it.
    /// A successful response without a `token` field is reported as
    /// [`RequestError::UnexpectedResponse`].
    ///
    /// [`SessionStore::login`]: crate::SessionStore::login
    pub(crate) async fn login_request(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, RequestError> {
        let credentials = Credentials { email, password };

        let response = self
            .send(self.request_post_json("/login", &credentials))
            .await?;

        response
            .payload
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(RequestError::UnexpectedResponse)
    }
}
