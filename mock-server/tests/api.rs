use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

/// Build a write request the way the real client sends it: with the
/// non-standard `Content-Type: JSON` wire value.
fn write_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "JSON")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

const SCIENCE_PAYLOAD: &str =
    r#"{"known":[[0,32],[32,64]],"active":[[0,16]],"metadata":{"comment":"science"}}"#;

// --- reads against an empty store ---

#[tokio::test]
async fn unknown_ifo_returns_404() {
    let resp = app().oneshot(get_request("/dq/H1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_flag_returns_404() {
    let resp = app()
        .oneshot(get_request("/dq/H1/DMT-SCIENCE"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_version_returns_404() {
    let resp = app()
        .oneshot(get_request("/dq/H1/DMT-SCIENCE/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- writes ---

#[tokio::test]
async fn put_accepts_nonstandard_content_type() {
    let resp = app()
        .oneshot(write_request("PUT", "/dq/H1/DMT-SCIENCE/1", SCIENCE_PAYLOAD))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn put_malformed_json_returns_400() {
    let resp = app()
        .oneshot(write_request("PUT", "/dq/H1/DMT-SCIENCE/1", "not json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_to_version_token_returns_400() {
    let resp = app()
        .oneshot(write_request(
            "PUT",
            "/dq/H1/DMT-SCIENCE/active",
            SCIENCE_PAYLOAD,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_missing_version_returns_404() {
    let resp = app()
        .oneshot(write_request(
            "PATCH",
            "/dq/H1/DMT-SCIENCE/1",
            SCIENCE_PAYLOAD,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full resource lifecycle ---

#[tokio::test]
async fn segment_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // insert two versions of one flag
    for version in 1..=2 {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(write_request(
                "PUT",
                &format!("/dq/H1/DMT-SCIENCE/{version}"),
                SCIENCE_PAYLOAD,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_bytes(resp).await;
        assert!(body.is_empty());
    }

    // flag listing
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/dq/H1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["results"], serde_json::json!(["DMT-SCIENCE"]));

    // version listing
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/dq/H1/DMT-SCIENCE"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["results"], serde_json::json!([1, 2]));

    // detail with include filter
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/dq/H1/DMT-SCIENCE/1?include=known"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["known"], serde_json::json!([[0, 32], [32, 64]]));
    assert!(body.get("active").is_none());

    // windowed detail
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(
            "/dq/H1/DMT-SCIENCE/1?s=0&e=32&include=known,active",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["known"], serde_json::json!([[0, 32]]));
    assert_eq!(body["active"], serde_json::json!([[0, 16]]));

    // the active token resolves to the highest version
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/dq/H1/DMT-SCIENCE/active"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["version"], 2);

    // patch extends version 1
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(write_request(
            "PATCH",
            "/dq/H1/DMT-SCIENCE/1",
            r#"{"known":[[64,96]]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/dq/H1/DMT-SCIENCE/1?include=known"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(
        body["known"],
        serde_json::json!([[0, 32], [32, 64], [64, 96]])
    );
}
