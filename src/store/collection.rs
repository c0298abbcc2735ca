//! The collection store: the currently loaded page of user records.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::ReqRes;
use crate::api::users::UserRecord;
use crate::cancel::CancelToken;
use crate::error::RequestError;

#[derive(Debug)]
struct CollectionData {
    records: Vec<UserRecord>,
    current_page: u32,
    total_pages: u32,
    pending: bool,
    filter: String,
    last_error: Option<String>,
}

impl Default for CollectionData {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            current_page: 1,
            total_pages: 1,
            pending: false,
            filter: String::new(),
            last_error: None,
        }
    }
}

/// Holds the current page of user records, pagination metadata, an
/// in-flight flag, and a free-text filter.
///
/// `CollectionStore` is a cheap-to-clone handle over shared state, like
/// [`SessionStore`](crate::SessionStore). The records always reflect the
/// most recently loaded page only; there is no multi-page accumulation or
/// caching, and a failed load leaves the previous page in place.
///
/// # Example
/// ```rust,ignore
/// use reqres_rs::{CollectionStore, ReqRes};
///
/// let collection = CollectionStore::new(ReqRes::new("https://reqres.in/api"));
///
/// collection.load(1).await?;
/// collection.set_filter("janet");
///
/// for user in collection.visible_records() {
///     println!("{} <{}>", user.full_name(), user.email);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct CollectionStore {
    client: ReqRes,
    inner: Arc<Mutex<CollectionData>>,
}

impl CollectionStore {
    /// Creates an empty collection store on page 1 of 1.
    #[must_use]
    pub fn new(client: ReqRes) -> Self {
        Self {
            client,
            inner: Arc::new(Mutex::new(CollectionData::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CollectionData> {
        self.inner.lock().expect("collection state mutex poisoned")
    }

    /// Loads one page of user records, replacing the current page.
    ///
    /// Equivalent to [`load_with`](Self::load_with) with a token that is
    /// never cancelled.
    pub async fn load(&self, page: u32) -> Result<(), RequestError> {
        self.load_with(page, &CancelToken::new()).await
    }

    /// Loads one page of user records, cancellable.
    ///
    /// Rejects with [`RequestError::InFlight`] while another load is
    /// pending. On success the records are replaced wholesale and the
    /// pagination metadata updated; on failure the existing records, page
    /// and totals are left untouched and `last_error` is set. The pending
    /// flag always returns to `false` once the call settles, and a
    /// cancelled token discards the result without mutating anything else.
    ///
    /// Out-of-range pages are not clamped here; callers clamp to
    /// `1..=total_pages` before invoking. Failed loads are never retried
    /// automatically.
    pub async fn load_with(&self, page: u32, cancel: &CancelToken) -> Result<(), RequestError> {
        {
            let mut data = self.lock();
            if data.pending {
                return Err(RequestError::InFlight);
            }
            data.pending = true;
        }

        let result = self.client.list_users(page).await;

        let mut data = self.lock();
        data.pending = false;

        if cancel.is_cancelled() {
            debug!(page, "page load settled after cancellation, result discarded");
            return Err(RequestError::Cancelled);
        }

        match result {
            Ok(listing) => {
                data.records = listing.data;
                data.total_pages = listing.total_pages.max(1);
                data.current_page = page;
                data.last_error = None;
                debug!(page, records = data.records.len(), "page loaded");

                Ok(())
            }
            Err(error) => {
                data.last_error = Some(error.to_string());
                warn!(%error, page, "page load failed");

                Err(error)
            }
        }
    }

    /// Deletes a user record and removes it from the current page.
    ///
    /// Equivalent to [`remove_with`](Self::remove_with) with a token that
    /// is never cancelled.
    pub async fn remove(&self, id: i64) -> Result<(), RequestError> {
        self.remove_with(id, &CancelToken::new()).await
    }

    /// Deletes a user record and removes it from the current page,
    /// cancellable.
    ///
    /// The local removal happens once the delete call settles, whether it
    /// reported success or failure: the service answers success for
    /// arbitrary ids, so a server-confirmed deletion is unobservable and
    /// delete errors carry no signal worth surfacing. Removing an id that
    /// is not on the current page leaves the records unchanged.
    ///
    /// A cancelled token suppresses the local removal as well.
    pub async fn remove_with(&self, id: i64, cancel: &CancelToken) -> Result<(), RequestError> {
        let result = self.client.delete_user(id).await;

        let mut data = self.lock();

        if cancel.is_cancelled() {
            debug!(id, "delete settled after cancellation, result discarded");
            return Err(RequestError::Cancelled);
        }

        if let Err(error) = result {
            debug!(%error, id, "delete reported an error, removing locally regardless");
        }
        data.records.retain(|record| record.id != id);

        Ok(())
    }

    /// Stores the free-text filter verbatim. No trimming happens here;
    /// [`visible_records`](Self::visible_records) trims at match time.
    pub fn set_filter(&self, filter: &str) {
        self.lock().filter = filter.to_owned();
    }

    /// Stores the requested page number verbatim.
    ///
    /// Range clamping is the caller's responsibility before
    /// [`load`](Self::load).
    pub fn set_page(&self, page: u32) {
        self.lock().current_page = page;
    }

    /// The filtered, display-ready record list.
    ///
    /// A pure projection over the current records and filter, recomputed on
    /// every read: a record is visible when its lowercase full name or
    /// lowercase email contains the lowercase trimmed filter as a
    /// substring. An empty trimmed filter yields all records in order.
    #[must_use]
    pub fn visible_records(&self) -> Vec<UserRecord> {
        let data = self.lock();
        filter_records(&data.records, &data.filter)
    }

    /// The records of the most recently loaded page, unfiltered.
    #[must_use]
    pub fn records(&self) -> Vec<UserRecord> {
        self.lock().records.clone()
    }

    /// The page the records were loaded from.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.lock().current_page
    }

    /// The total number of pages reported by the most recent load.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.lock().total_pages
    }

    /// Whether a page load is in flight.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.lock().pending
    }

    /// The current free-text filter, verbatim as set.
    #[must_use]
    pub fn filter(&self) -> String {
        self.lock().filter.clone()
    }

    /// The message of the most recent failed load, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }
}

fn filter_records(records: &[UserRecord], filter: &str) -> Vec<UserRecord> {
    let query = filter.trim().to_lowercase();
    if query.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| {
            record.full_name().to_lowercase().contains(&query)
                || record.email.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::filter_records;
    use crate::api::users::UserRecord;

    fn record(id: i64, first: &str, last: &str, email: &str) -> UserRecord {
        UserRecord {
            id,
            email: email.to_owned(),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            avatar_url: String::new(),
        }
    }

    #[test]
    fn empty_filter_returns_all_records_in_order() {
        let records = vec![
            record(1, "A", "B", "x@y.com"),
            record(2, "C", "D", "z@y.com"),
        ];

        let visible = filter_records(&records, "");
        assert_eq!(visible, records);
    }

    #[test]
    fn whitespace_only_filter_returns_all_records() {
        let records = vec![record(1, "A", "B", "x@y.com")];

        assert_eq!(filter_records(&records, "   "), records);
    }

    #[test]
    fn filter_matches_full_name_case_insensitively() {
        let records = vec![
            record(1, "A", "B", "x@y.com"),
            record(2, "C", "D", "z@y.com"),
        ];

        let visible = filter_records(&records, "a");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn filter_matches_across_the_name_space() {
        let records = vec![record(7, "Janet", "Weaver", "janet.weaver@reqres.in")];

        assert_eq!(filter_records(&records, "t w").len(), 1);
        assert!(filter_records(&records, "tw").is_empty());
    }

    #[test]
    fn filter_matches_email() {
        let records = vec![
            record(1, "A", "B", "x@y.com"),
            record(2, "C", "D", "z@y.com"),
        ];

        let visible = filter_records(&records, "Z@Y");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }

    #[test]
    fn filter_trims_surrounding_whitespace() {
        let records = vec![record(1, "Janet", "Weaver", "janet.weaver@reqres.in")];

        assert_eq!(filter_records(&records, "  janet  ").len(), 1);
    }
}
