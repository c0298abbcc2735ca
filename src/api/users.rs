//! The user model and the `/users` endpoints.

use serde::{Deserialize, Serialize};

use crate::ReqRes;
use crate::error::RequestError;

/// A single user record as served by the ReqRes API.
///
/// An immutable value type: the client replaces records wholesale on fetch
/// and never patches them in place after a server write (the backing
/// service does not echo authoritative updates).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Server-assigned unique id.
    pub id: i64,
    /// The user's email address.
    #[serde(default)]
    pub email: String,
    /// The user's first name.
    #[serde(default)]
    pub first_name: String,
    /// The user's last name.
    #[serde(default)]
    pub last_name: String,
    /// URL of the user's avatar image.
    #[serde(rename = "avatar", default)]
    pub avatar_url: String,
}

impl UserRecord {
    /// The user's first and last name joined with a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A paginated list of user records.
///
/// Mirrors the list envelope returned by `GET /users`. Field defaults are
/// chosen so that a normalized empty body decodes to an empty first page.
///
/// # Fields
/// - `page`: The page this listing covers (starting from 1).
/// - `per_page`: The max returned records per page.
/// - `total`: The total amount of records known to the service.
/// - `total_pages`: The total amount of pages available.
/// - `data`: The records for the given page.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    /// The page this listing covers *(starting from 1)*.
    #[serde(default = "default_page")]
    pub page: u32,
    /// The max returned records per page.
    #[serde(default)]
    pub per_page: u32,
    /// The total amount of records known to the service.
    #[serde(default)]
    pub total: u32,
    /// The total amount of pages available.
    #[serde(default = "default_page")]
    pub total_pages: u32,
    /// The records for the given page.
    #[serde(default)]
    pub data: Vec<UserRecord>,
}

const fn default_page() -> u32 {
    1
}

/// The writable subset of a user record accepted by `PUT /users/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    /// The user's first name.
    pub first_name: String,
    /// The user's last name.
    pub last_name: String,
    /// The user's email address.
    pub email: String,
}

impl ReqRes {
    /// Fetch one page of user records.
    ///
    /// # Example
    /// ```rust,ignore
    /// let page = client.list_users(2).await?;
    ///
    /// for user in page.data {
    ///     println!("{} <{}>", user.full_name(), user.email);
    /// }
    /// ```
    pub async fn list_users(&self, page: u32) -> Result<UserPage, RequestError> {
        let page = page.to_string();
        let params = vec![("page", page.as_str())];

        let response = self.send(self.request_get("/users", Some(params))).await?;

        serde_json::from_value(response.payload).map_err(|_| RequestError::UnexpectedResponse)
    }

    /// Fetch a single user record.
    ///
    /// The record is unwrapped from the `data` envelope the service places
    /// around single-record responses.
    ///
    /// # Example
    /// ```rust,ignore
    /// let user = client.get_user(2).await?;
    ///
    /// println!("{}", user.full_name());
    /// ```
    pub async fn get_user(&self, id: i64) -> Result<UserRecord, RequestError> {
        let response = self
            .send(self.request_get(&format!("/users/{id}"), None))
            .await?;

        response
            .payload
            .get("data")
            .cloned()
            .and_then(|data| serde_json::from_value(data).ok())
            .ok_or(RequestError::UnexpectedResponse)
    }

    /// Update a single user record.
    ///
    /// The service acknowledges writes without persisting them, so no
    /// response body is interpreted; a later fetch returns the original
    /// record.
    ///
    /// # Example
    /// ```rust,ignore
    /// let update = UserUpdate {
    ///     first_name: "Janet".into(),
    ///     last_name: "Weaver".into(),
    ///     email: "janet.weaver@reqres.in".into(),
    /// };
    ///
    /// client.update_user(2, &update).await?;
    /// ```
    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<(), RequestError> {
        self.send(self.request_put_json(&format!("/users/{id}"), update))
            .await?;

        Ok(())
    }

    /// Delete a single user record.
    ///
    /// The delete endpoint reports success for arbitrary ids, valid or not;
    /// a 404 from it is folded into success during classification.
    ///
    /// # Example
    /// ```rust,ignore
    /// client.delete_user(2).await?;
    /// ```
    pub async fn delete_user(&self, id: i64) -> Result<(), RequestError> {
        self.send(self.request_delete(&format!("/users/{id}")))
            .await?;

        Ok(())
    }
}
