//! The session store: the client's belief about who is signed in.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ReqRes;
use crate::cancel::CancelToken;
use crate::error::RequestError;
use crate::storage::{AUTH_TOKEN_KEY, PROFILE_KEY};

/// The authentication lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Initial state, before [`SessionStore::restore`] has run.
    #[default]
    Unknown,
    /// No credential is present; the user is signed out.
    Anonymous,
    /// A login request is in flight.
    Authenticating,
    /// A credential is present in persisted storage.
    ///
    /// This is a weak guarantee: the credential is never verified against
    /// the remote service, its local presence alone is taken as proof.
    Authenticated,
}

/// The authenticated user's profile stub.
///
/// The login endpoint returns no profile data, so the stub is derived from
/// the submitted email with a placeholder display name, and persisted
/// alongside the credential.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The email the user signed in with.
    #[serde(default)]
    pub email: String,
    /// Display name. The placeholder `"User"` for fresh logins.
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default)]
struct SessionData {
    state: SessionState,
    user: Option<Profile>,
    last_error: Option<String>,
}

/// Holds the authentication status, the current user's profile stub, and an
/// in-flight flag.
///
/// `SessionStore` is a cheap-to-clone handle over shared state: clones
/// observe and drive the same session. State mutations are applied
/// atomically and never while a network call is in flight, so concurrent
/// independent operations interleave without tearing.
///
/// # Example
/// ```rust,ignore
/// use reqres_rs::{ReqRes, SessionStore};
///
/// let session = SessionStore::new(ReqRes::new("https://reqres.in/api"));
///
/// session.restore();
/// if !session.is_authenticated() {
///     session.login("eve.holt@reqres.in", "cityslicka").await?;
/// }
/// ```
#[derive(Clone, Debug)]
pub struct SessionStore {
    client: ReqRes,
    inner: Arc<Mutex<SessionData>>,
}

impl SessionStore {
    /// Creates a session store in the [`SessionState::Unknown`] state.
    ///
    /// The store reaches persisted storage only through the capability the
    /// given client was constructed with.
    #[must_use]
    pub fn new(client: ReqRes) -> Self {
        Self {
            client,
            inner: Arc::new(Mutex::new(SessionData::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionData> {
        self.inner.lock().expect("session state mutex poisoned")
    }

    /// Restores the session from persisted storage.
    ///
    /// A present credential yields [`SessionState::Authenticated`] with the
    /// persisted profile; a missing or malformed profile silently falls
    /// back to the default stub. No credential yields
    /// [`SessionState::Anonymous`]. Always terminates
    /// [`SessionState::Unknown`].
    ///
    /// This is also the documented reaction to
    /// [`RequestError::Unauthorized`] from any operation: the adapter has
    /// already cleared the persisted credential at that point, so a
    /// re-restore lands in [`SessionState::Anonymous`].
    pub fn restore(&self) {
        let storage = self.client.storage();
        let mut data = self.lock();

        if storage.get(AUTH_TOKEN_KEY).is_some() {
            let profile = storage
                .get(PROFILE_KEY)
                .and_then(|raw| serde_json::from_str(&raw).ok())
                .unwrap_or_default();

            data.state = SessionState::Authenticated;
            data.user = Some(profile);
            debug!("session restored from persisted credential");
        } else {
            data.state = SessionState::Anonymous;
            data.user = None;
            debug!("no persisted credential, session is anonymous");
        }
    }

    /// Attempts to sign in with the given credentials.
    ///
    /// Equivalent to [`login_with`](Self::login_with) with a token that is
    /// never cancelled.
    ///
    /// # Example
    /// ```rust,ignore
    /// session.login("eve.holt@reqres.in", "cityslicka").await?;
    ///
    /// assert!(session.is_authenticated());
    /// ```
    pub async fn login(&self, email: &str, password: &str) -> Result<(), RequestError> {
        self.login_with(email, password, &CancelToken::new()).await
    }

    /// Attempts to sign in with the given credentials, cancellable.
    ///
    /// Rejects with [`RequestError::InFlight`] while another login is
    /// pending. Otherwise transitions to [`SessionState::Authenticating`]
    /// and posts the credentials. On success the token and a derived
    /// profile stub are persisted and the session becomes
    /// [`SessionState::Authenticated`]; on any error the session falls
    /// back to [`SessionState::Anonymous`] with `last_error` set and
    /// nothing persisted.
    ///
    /// A cancelled token is honored after the network call settles: the
    /// result is discarded, nothing is persisted, and the session returns
    /// to [`SessionState::Anonymous`].
    pub async fn login_with(
        &self,
        email: &str,
        password: &str,
        cancel: &CancelToken,
    ) -> Result<(), RequestError> {
        {
            let mut data = self.lock();
            if data.state == SessionState::Authenticating {
                return Err(RequestError::InFlight);
            }
            data.state = SessionState::Authenticating;
            data.last_error = None;
        }

        let result = self.client.login_request(email, password).await;

        let mut data = self.lock();

        if cancel.is_cancelled() {
            data.state = SessionState::Anonymous;
            debug!("login settled after cancellation, result discarded");
            return Err(RequestError::Cancelled);
        }

        match result {
            Ok(token) => {
                // The login endpoint returns no profile, only the token;
                // the stub stands in for real profile data.
                let profile = Profile {
                    email: email.to_owned(),
                    name: "User".to_owned(),
                };

                let storage = self.client.storage();
                storage.set(AUTH_TOKEN_KEY, &token);
                if let Ok(raw) = serde_json::to_string(&profile) {
                    storage.set(PROFILE_KEY, &raw);
                }

                data.state = SessionState::Authenticated;
                data.user = Some(profile);
                data.last_error = None;
                debug!("login succeeded");

                Ok(())
            }
            Err(error) => {
                data.state = SessionState::Anonymous;
                data.user = None;
                data.last_error = Some(error.to_string());
                warn!(%error, "login failed");

                Err(error)
            }
        }
    }

    /// Signs out unconditionally.
    ///
    /// Removes the persisted credential and profile and transitions to
    /// [`SessionState::Anonymous`]. No network call is made.
    pub fn logout(&self) {
        let storage = self.client.storage();
        storage.remove(AUTH_TOKEN_KEY);
        storage.remove(PROFILE_KEY);

        let mut data = self.lock();
        data.state = SessionState::Anonymous;
        data.user = None;
        debug!("logged out, session cleared");
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Whether the session currently believes a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().state == SessionState::Authenticated
    }

    /// Whether a login request is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.lock().state == SessionState::Authenticating
    }

    /// The signed-in user's profile stub, if any.
    #[must_use]
    pub fn user(&self) -> Option<Profile> {
        self.lock().user.clone()
    }

    /// The message of the most recent failed login, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }
}
