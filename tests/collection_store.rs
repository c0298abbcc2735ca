//! Collection lifecycle: page loads, deletes, filter and pagination state.

use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use reqres_rs::{CancelToken, CollectionStore, MemoryStorage, ReqRes, RequestError};
use serde_json::{Value, json};

fn collection(server: &MockServer) -> CollectionStore {
    let storage = Arc::new(MemoryStorage::default());
    CollectionStore::new(ReqRes::with_storage(&server.base_url(), storage))
}

fn page_one() -> Value {
    json!({
        "page": 1,
        "per_page": 6,
        "total": 2,
        "total_pages": 2,
        "data": [
            {
                "id": 1,
                "email": "george.bluth@reqres.in",
                "first_name": "George",
                "last_name": "Bluth",
                "avatar": "https://reqres.in/img/faces/1-image.jpg"
            },
            {
                "id": 2,
                "email": "janet.weaver@reqres.in",
                "first_name": "Janet",
                "last_name": "Weaver",
                "avatar": "https://reqres.in/img/faces/2-image.jpg"
            }
        ]
    })
}

async fn mock_page_one(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users").query_param("page", "1");
            then.status(200).json_body(page_one());
        })
        .await;
}

#[tokio::test]
async fn load_replaces_records_and_pagination_metadata() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    mock_page_one(&server).await;

    assert!(!store.pending());
    store.load(1).await.expect("load should succeed");

    let records = store.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, 1);
    assert_eq!(records[1].full_name(), "Janet Weaver");
    assert_eq!(store.current_page(), 1);
    assert_eq!(store.total_pages(), 2);
    assert!(!store.pending());
    assert_eq!(store.last_error(), None);
}

#[tokio::test]
async fn failed_load_keeps_the_previous_page() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    mock_page_one(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users").query_param("page", "2");
            then.status(500);
        })
        .await;

    store.load(1).await.expect("first load should succeed");

    let error = store.load(2).await.expect_err("second load should fail");
    assert!(matches!(error, RequestError::ServerError));

    assert_eq!(store.records().len(), 2);
    assert_eq!(store.current_page(), 1);
    assert_eq!(store.total_pages(), 2);
    assert!(!store.pending());
    assert!(store.last_error().is_some());
}

#[tokio::test]
async fn successful_load_clears_a_previous_error() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/users").query_param("page", "2");
            then.status(500);
        })
        .await;
    mock_page_one(&server).await;

    store.load(2).await.expect_err("page 2 is broken");
    assert!(store.last_error().is_some());

    store.load(1).await.expect("page 1 is fine");
    assert_eq!(store.last_error(), None);
}

#[tokio::test]
async fn remove_drops_the_record_locally_on_success() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    mock_page_one(&server).await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/1");
            then.status(204);
        })
        .await;

    store.load(1).await.expect("load should succeed");
    store.remove(1).await.expect("remove should succeed");

    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 2);
}

#[tokio::test]
async fn remove_drops_the_record_locally_on_not_found() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    mock_page_one(&server).await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/1");
            then.status(404);
        })
        .await;

    store.load(1).await.expect("load should succeed");
    store.remove(1).await.expect("remove settles as success");

    assert_eq!(store.records().len(), 1);
}

#[tokio::test]
async fn remove_drops_the_record_locally_on_server_error() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    mock_page_one(&server).await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/2");
            then.status(500);
        })
        .await;

    store.load(1).await.expect("load should succeed");

    // Server-confirmed deletion is unobservable on this service; the
    // record goes away locally either way.
    store.remove(2).await.expect("delete errors are suppressed");

    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, 1);
}

#[tokio::test]
async fn remove_is_idempotent_for_absent_ids() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    mock_page_one(&server).await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/1");
            then.status(204);
        })
        .await;

    store.load(1).await.expect("load should succeed");
    store.remove(1).await.expect("first remove succeeds");
    let after_first = store.records();

    store.remove(1).await.expect("second remove settles too");
    assert_eq!(store.records(), after_first);
}

#[tokio::test]
async fn duplicate_load_submission_is_rejected() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/users").query_param("page", "1");
            then.status(200)
                .delay(Duration::from_millis(50))
                .json_body(page_one());
        })
        .await;

    let (first, second) = tokio::join!(store.load(1), store.load(1));

    first.expect("the first submission wins");
    assert!(matches!(second, Err(RequestError::InFlight)));
    assert_eq!(store.records().len(), 2);
    assert!(!store.pending());
}

#[tokio::test]
async fn cancelled_load_leaves_the_store_untouched() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    mock_page_one(&server).await;

    let token = CancelToken::new();
    let load = store.load_with(1, &token);
    token.cancel();

    let result = load.await;
    assert!(matches!(result, Err(RequestError::Cancelled)));

    assert!(store.records().is_empty());
    assert_eq!(store.current_page(), 1);
    assert_eq!(store.total_pages(), 1);
    assert!(!store.pending());
    assert_eq!(store.last_error(), None);
}

#[tokio::test]
async fn cancelled_remove_keeps_the_record() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    mock_page_one(&server).await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/users/1");
            then.status(204);
        })
        .await;

    store.load(1).await.expect("load should succeed");

    let token = CancelToken::new();
    let remove = store.remove_with(1, &token);
    token.cancel();

    let result = remove.await;
    assert!(matches!(result, Err(RequestError::Cancelled)));
    assert_eq!(store.records().len(), 2);
}

#[tokio::test]
async fn filter_and_page_are_stored_verbatim() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    store.set_filter("  Janet ");
    assert_eq!(store.filter(), "  Janet ");

    store.set_page(99);
    assert_eq!(store.current_page(), 99);
}

#[tokio::test]
async fn visible_records_filters_by_name_or_email() {
    let server = MockServer::start_async().await;
    let store = collection(&server);

    server
        .mock_async(|when, then| {
            when.method(GET).path("/users").query_param("page", "1");
            then.status(200).json_body(json!({
                "page": 1,
                "per_page": 6,
                "total": 2,
                "total_pages": 1,
                "data": [
                    { "id": 1, "email": "x@y.com", "first_name": "A", "last_name": "B", "avatar": "" },
                    { "id": 2, "email": "z@y.com", "first_name": "C", "last_name": "D", "avatar": "" }
                ]
            }));
        })
        .await;

    store.load(1).await.expect("load should succeed");

    store.set_filter("a");
    let visible = store.visible_records();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, 1);

    store.set_filter("z@y");
    let visible = store.visible_records();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, 2);

    store.set_filter("");
    let visible = store.visible_records();
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[0].id, 1);
    assert_eq!(visible[1].id, 2);
}
