//! In-process fake servers shared by the network tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

pub const HELLO_ENTRY: &str = r#"[{"word":"hello","phonetic":"/həˈloʊ/","phonetics":[{"text":"/həˈloʊ/","audio":"https://example.test/hello.mp3"}],"meanings":[{"partOfSpeech":"exclamation","definitions":[{"definition":"used as a greeting"}],"synonyms":["hi","greetings"],"antonyms":["bye"]}]}]"#;

const QUICK_ENTRY: &str = r#"[{"word":"quick","phonetics":[{"text":"/kwɪk/"}],"meanings":[{"partOfSpeech":"adjective","definitions":[{"definition":"moving fast"}]}]}]"#;

/// Words requested from the fake upstream, in arrival order
pub type Requests = Arc<Mutex<Vec<String>>>;

/// Fake dictionary API mounted at `/api/v2/entries/en/{word}`.
///
/// - `hello`, `quick`: 200 with an entry array
/// - `broken`: 200 with a body that is not JSON
/// - `empty`: 200 with an empty array
/// - `garbled`: 503 with a plain-text body
/// - anything else: 404 `{"message":"No Definitions Found"}`
pub fn fake_upstream() -> (Router, Requests) {
    let requests: Requests = Arc::new(Mutex::new(Vec::new()));

    let router = Router::new()
        .route("/api/v2/entries/en/{word}", get(entry))
        .with_state(requests.clone());

    (router, requests)
}

async fn entry(State(requests): State<Requests>, Path(word): Path<String>) -> Response {
    requests.lock().unwrap().push(word.clone());

    let json = [(axum::http::header::CONTENT_TYPE, "application/json")];
    match word.to_lowercase().as_str() {
        "hello" => (StatusCode::OK, json, HELLO_ENTRY).into_response(),
        "quick" => (StatusCode::OK, json, QUICK_ENTRY).into_response(),
        "broken" => (StatusCode::OK, json, "<html>oops</html>").into_response(),
        "empty" => (StatusCode::OK, json, "[]").into_response(),
        "garbled" => (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            json,
            r#"{"title":"No Definitions Found","message":"No Definitions Found"}"#,
        )
            .into_response(),
    }
}

/// Serve `router` on an ephemeral local port
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

/// Fake upstream plus the real proxy in front of it.
/// Returns the proxy's lookup endpoint URL.
pub async fn proxy_endpoint() -> (String, Requests) {
    let (upstream, requests) = fake_upstream();
    let upstream_addr = spawn(upstream).await;

    let dictionary = crate::upstream::UpstreamDictionary::new(format!(
        "http://{}/api/v2/entries/en",
        upstream_addr
    ));
    let proxy_addr = spawn(crate::proxy::create_router(dictionary)).await;

    (
        format!("http://{}{}", proxy_addr, crate::consts::LOOKUP_ROUTE),
        requests,
    )
}
