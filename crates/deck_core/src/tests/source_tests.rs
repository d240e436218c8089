use super::*;
use crate::deck::DeckOrigin;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use tokio::net::TcpListener;

#[derive(Clone, Copy)]
enum Behaviour {
    Healthy,
    FailOnRequest(usize),
    Malformed,
    RelativeUrls,
}

#[derive(Clone)]
struct CatServerState {
    behaviour: Behaviour,
    requests: Arc<AtomicUsize>,
    saw_json_flag: Arc<Mutex<Vec<bool>>>,
}

async fn random_cat(
    State(state): State<CatServerState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let n = state.requests.fetch_add(1, Ordering::SeqCst);
    state
        .saw_json_flag
        .lock()
        .expect("lock")
        .push(query.get("json").map(String::as_str) == Some("true"));

    match state.behaviour {
        Behaviour::FailOnRequest(k) if n == k => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Behaviour::Malformed => (StatusCode::OK, "<html>not json</html>").into_response(),
        Behaviour::RelativeUrls => Json(serde_json::json!({
            "_id": format!("cat-{n}"),
            "url": format!("/cat/cat-{n}"),
            "mimetype": "image/jpeg",
        }))
        .into_response(),
        _ => Json(serde_json::json!({
            "id": format!("cat-{n}"),
            "url": format!("https://cataas.com/cat/cat-{n}"),
            "tags": ["tabby"],
            "createdAt": "2023-05-01T12:00:00Z",
            "mimeType": "image/jpeg",
        }))
        .into_response(),
    }
}

async fn cat_bytes() -> Vec<u8> {
    b"\x89PNG-not-really".to_vec()
}

async fn spawn_cat_server(behaviour: Behaviour) -> (String, CatServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = CatServerState {
        behaviour,
        requests: Arc::new(AtomicUsize::new(0)),
        saw_json_flag: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/cat", get(random_cat))
        .route("/bytes/one.png", get(cat_bytes))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

fn source_for(base: &str) -> HttpImageSource {
    HttpImageSource::new(&format!("{base}/cat"), Duration::from_secs(5)).expect("source")
}

#[tokio::test]
async fn healthy_endpoint_fills_deck_in_fetch_order() {
    let (base, state) = spawn_cat_server(Behaviour::Healthy).await;
    let deck = load_deck(&source_for(&base), 5).await;

    assert_eq!(deck.origin(), DeckOrigin::Fetched);
    assert_eq!(deck.len(), 5);
    let ids: Vec<_> = deck.items().iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["cat-0", "cat-1", "cat-2", "cat-3", "cat-4"]);
    assert_eq!(deck.items()[2].tags, vec!["tabby"]);
    assert_eq!(deck.items()[2].media_type, "image/jpeg");
    assert_eq!(state.requests.load(Ordering::SeqCst), 5);
    assert!(state.saw_json_flag.lock().expect("lock").iter().all(|flag| *flag));
}

#[tokio::test]
async fn late_failure_discards_everything_and_uses_placeholders() {
    let (base, state) = spawn_cat_server(Behaviour::FailOnRequest(14)).await;
    let deck = load_deck(&source_for(&base), 15).await;

    assert_eq!(state.requests.load(Ordering::SeqCst), 15);
    assert_eq!(deck.origin(), DeckOrigin::Placeholder);
    assert_eq!(deck.len(), 15);
    for (i, item) in deck.items().iter().enumerate() {
        assert_eq!(item.id.as_str(), format!("mock-cat-{i}"));
        assert!(item.image_url.contains(&(i + 1).to_string()));
        assert!(item.tags.is_empty());
        assert_eq!(item.created_at, "");
    }
}

#[tokio::test]
async fn early_failure_stops_fetching() {
    let (base, state) = spawn_cat_server(Behaviour::FailOnRequest(1)).await;
    let err = fetch_items(&source_for(&base), 6)
        .await
        .expect_err("second request fails");

    assert!(matches!(err, FetchError::Status { status: 500 }));
    assert_eq!(state.requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn malformed_payload_falls_back() {
    let (base, _state) = spawn_cat_server(Behaviour::Malformed).await;
    let source = source_for(&base);

    assert!(matches!(
        source.fetch_one().await,
        Err(FetchError::Decode(_))
    ));
    let deck = load_deck(&source, 4).await;
    assert_eq!(deck.origin(), DeckOrigin::Placeholder);
    assert_eq!(deck.len(), 4);
}

#[tokio::test]
async fn unreachable_endpoint_falls_back() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let source = HttpImageSource::new(&format!("http://{addr}/cat"), Duration::from_secs(2))
        .expect("source");
    let deck = load_deck(&source, 3).await;
    assert_eq!(deck.origin(), DeckOrigin::Placeholder);
    assert_eq!(deck.items()[0].id.as_str(), "mock-cat-0");
}

#[tokio::test]
async fn relative_image_urls_resolve_against_endpoint() {
    let (base, _state) = spawn_cat_server(Behaviour::RelativeUrls).await;
    let descriptor = source_for(&base).fetch_one().await.expect("descriptor");

    assert_eq!(descriptor.id, "cat-0");
    assert_eq!(descriptor.url, format!("{base}/cat/cat-0"));
    assert_eq!(descriptor.mime_type, "image/jpeg");
}

#[tokio::test]
async fn downloads_image_bytes() {
    let (base, _state) = spawn_cat_server(Behaviour::Healthy).await;
    let bytes = fetch_image_bytes(&Client::new(), &format!("{base}/bytes/one.png"))
        .await
        .expect("bytes");
    assert_eq!(bytes, b"\x89PNG-not-really".to_vec());

    let missing = fetch_image_bytes(&Client::new(), &format!("{base}/bytes/missing.png")).await;
    assert!(matches!(missing, Err(FetchError::Status { status: 404 })));
}

#[test]
fn rejects_unparseable_endpoint() {
    assert!(matches!(
        HttpImageSource::new("::nope::", Duration::from_secs(1)),
        Err(FetchError::InvalidUrl { .. })
    ));
}

#[tokio::test]
async fn endpoint_requests_structured_response() {
    let source = HttpImageSource::new("https://cataas.com/cat", Duration::from_secs(1))
        .expect("source");
    assert_eq!(source.endpoint().as_str(), "https://cataas.com/cat?json=true");
}

struct Down;

#[async_trait]
impl ImageSource for Down {
    async fn fetch_one(&self) -> Result<CatDescriptor, FetchError> {
        Err(FetchError::transport("connection refused"))
    }
}

#[tokio::test]
async fn huge_counts_do_not_preallocate_or_overflow() {
    let err = fetch_items(&Down, 100_000_000_000_000_000)
        .await
        .expect_err("source is down");
    assert!(matches!(err, FetchError::Transport(_)));

    let deck = load_deck(&Down, usize::MAX).await;
    assert_eq!(deck.origin(), DeckOrigin::Placeholder);
    assert_eq!(deck.len(), MAX_DECK_SIZE);
}
