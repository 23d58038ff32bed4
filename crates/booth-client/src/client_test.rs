use super::*;

fn test_client(base_url: &str) -> StorefrontClient {
    StorefrontClient::with_base_url(base_url, 30).expect("client construction should not fail")
}

#[test]
fn api_url_appends_segments_below_base_path() {
    let client = test_client("https://shop.example.com/api/v1");
    let url = client.api_url(&["product", "all"]).unwrap();
    assert_eq!(url.as_str(), "https://shop.example.com/api/v1/product/all");
}

#[test]
fn api_url_strips_trailing_slash() {
    let client = test_client("https://shop.example.com/api/v1///");
    let url = client.api_url(&["order", "track", "66a1f"]).unwrap();
    assert_eq!(url.as_str(), "https://shop.example.com/api/v1/order/track/66a1f");
}

#[test]
fn api_url_encodes_segments() {
    let client = test_client("https://shop.example.com");
    let url = client.api_url(&["product", "rose & oud/mist"]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://shop.example.com/product/rose%20&%20oud%2Fmist"
    );
}

#[test]
fn asset_url_can_differ_from_api() {
    let client = test_client("https://api.example.com")
        .with_asset_url("https://www.example.com")
        .unwrap();
    let url = client.asset_url(&["data", "bd-divisions.json"]).unwrap();
    assert_eq!(url.as_str(), "https://www.example.com/data/bd-divisions.json");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = StorefrontClient::with_base_url("not a url", 30).unwrap_err();
    assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
}

#[test]
fn envelope_failure_becomes_api_error() {
    let body = serde_json::json!({ "success": false, "message": "Coupon expired" });
    let err = StorefrontClient::decode::<Value>(body, "test").unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 200);
            assert_eq!(message, "Coupon expired");
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[test]
fn envelope_decodes_data_and_meta() {
    let body = serde_json::json!({
        "success": true,
        "data": [1, 2, 3],
        "meta": { "page": 1, "limit": 3, "total": 7 }
    });
    let envelope = StorefrontClient::decode::<Vec<u32>>(body, "test").unwrap();
    assert_eq!(envelope.data, vec![1, 2, 3]);
    assert_eq!(envelope.meta.map(|m| m.total_pages()), Some(3));
}

#[test]
fn error_message_reads_message_field() {
    assert_eq!(
        error_message(r#"{"message":"Out of stock"}"#).as_deref(),
        Some("Out of stock")
    );
    assert_eq!(error_message(r#"{"message":"  "}"#), None);
    assert_eq!(error_message("<html>Bad gateway</html>"), None);
}
