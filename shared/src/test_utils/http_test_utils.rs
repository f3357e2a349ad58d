use axum::body::Body;
use http_body_util::BodyExt;
use serde_json::Value;

/// Helper function to extract JSON from an Axum response
///
/// This is useful in tests to easily parse and assert on JSON responses.
pub async fn response_to_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Builds a request, adding a JSON content type when a body is given
pub fn create_test_request(
    method: &str,
    path: &str,
    body: Option<Value>,
) -> http::Request<Body> {
    let mut builder = http::Request::builder().method(method).uri(path);

    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }

    match body {
        Some(json_body) => builder.body(Body::from(json_body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Builds a request with a raw body and no content type
pub fn create_raw_request(method: &str, path: &str, body: &'static str) -> http::Request<Body> {
    http::Request::builder()
        .method(method)
        .uri(path)
        .body(Body::from(body))
        .unwrap()
}
