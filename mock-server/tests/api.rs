use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, seeded_app, ACCESS_TOKEN, SEED_LICENSE_KEY, SEED_PRODUCT_ID, SEED_SALE_ID};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Append the mock's access token to `path`.
fn authed(path: &str) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{path}{sep}access_token={ACCESS_TOKEN}")
}

fn request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(authed(uri))
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(authed(uri))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401_envelope() {
    let resp = app()
        .oneshot(Request::builder().uri("/user").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "The access token is missing.");
}

#[tokio::test]
async fn wrong_token_returns_401_envelope() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/user?access_token=nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "The access token is invalid.");
}

// --- products ---

#[tokio::test]
async fn list_products_empty() {
    let resp = app().oneshot(request("GET", "/products")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["products"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn get_seeded_product() {
    let resp = seeded_app()
        .oneshot(request("GET", &format!("/products/{SEED_PRODUCT_ID}")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["product"]["id"], SEED_PRODUCT_ID);
    assert_eq!(body["product"]["published"], true);
}

#[tokio::test]
async fn get_product_not_found() {
    let resp = app()
        .oneshot(request("GET", "/products/missing"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "The product was not found.");
}

#[tokio::test]
async fn disable_then_enable_product() {
    use tower::Service;

    let mut app = seeded_app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("PUT", &format!("/products/{SEED_PRODUCT_ID}/disable")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["product"]["published"], false);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("PUT", &format!("/products/{SEED_PRODUCT_ID}/enable")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["product"]["published"], true);
}

// --- custom fields ---

#[tokio::test]
async fn create_custom_field_without_name_returns_400() {
    let resp = seeded_app()
        .oneshot(json_request(
            "POST",
            &format!("/products/{SEED_PRODUCT_ID}/custom_fields"),
            r#"{"required":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "name is required");
}

#[tokio::test]
async fn duplicate_custom_field_is_a_business_error() {
    use tower::Service;

    let mut app = seeded_app().into_service();
    let uri = format!("/products/{SEED_PRODUCT_ID}/custom_fields");

    for expected_success in [true, false] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", &uri, r#"{"name":"Shirt size"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["success"], expected_success);
    }
}

// --- sales ---

#[tokio::test]
async fn list_sales_filters_by_email() {
    use tower::Service;

    let mut app = seeded_app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/sales?email=buyer@example.com"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["sales"].as_array().unwrap().len(), 1);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", "/sales?email=nobody@example.com"))
        .await
        .unwrap();
    assert!(body_json(resp).await["sales"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn partial_refund_marks_partially_refunded() {
    let resp = seeded_app()
        .oneshot(request(
            "PUT",
            &format!("/sales/{SEED_SALE_ID}/refund?amount_cents=100"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["sale"]["partially_refunded"], true);
    assert_eq!(body["sale"]["refunded"], false);
}

// --- licenses ---

#[tokio::test]
async fn verify_license_increments_uses() {
    let uri = format!(
        "/licenses/verify?product_id={SEED_PRODUCT_ID}&license_key={SEED_LICENSE_KEY}"
    );
    let resp = seeded_app()
        .oneshot(request("POST", &uri))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["uses"], 1);
    assert_eq!(body["purchase"]["sale_id"], SEED_SALE_ID);
}

#[tokio::test]
async fn unknown_license_is_reported_on_200() {
    let resp = seeded_app()
        .oneshot(request(
            "POST",
            &format!("/licenses/verify?product_id={SEED_PRODUCT_ID}&license_key=BOGUS"),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "That license does not exist for the provided product."
    );
}

// --- variant lifecycle ---

#[tokio::test]
async fn variant_category_and_variant_lifecycle() {
    use tower::Service;

    let mut app = seeded_app().into_service();
    let categories = format!("/products/{SEED_PRODUCT_ID}/variant_categories");

    // create category
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", &categories, r#"{"title":"Size"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let category_id = body_json(resp).await["variant_category"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // create variant in it
    let variants = format!("{categories}/{category_id}/variants");
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &variants,
            r#"{"name":"Large","price_difference_cents":500}"#,
        ))
        .await
        .unwrap();
    let variant = body_json(resp).await["variant"].clone();
    assert_eq!(variant["name"], "Large");
    assert_eq!(variant["price_difference_cents"], 500);
    let variant_id = variant["id"].as_str().unwrap().to_string();

    // delete the variant
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", &format!("{variants}/{variant_id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await["message"],
        "The variant was deleted successfully."
    );

    // list is empty again
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("GET", &variants))
        .await
        .unwrap();
    assert!(body_json(resp).await["variants"].as_array().unwrap().is_empty());
}

// --- offer codes ---

#[tokio::test]
async fn update_offer_code_applies_every_field() {
    use tower::Service;

    let mut app = seeded_app().into_service();
    let codes = format!("/products/{SEED_PRODUCT_ID}/offer_codes");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", &codes, r#"{"name":"FLAT","amount_off":200}"#))
        .await
        .unwrap();
    let code = body_json(resp).await["offer_code"].clone();
    assert_eq!(code["amount_cents"], 200);
    assert_eq!(code["universal"], false);
    let code_id = code["id"].as_str().unwrap().to_string();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("{codes}/{code_id}"),
            r#"{"amount_off":25,"offer_type":"percent","universal":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let code = body_json(resp).await["offer_code"].clone();
    assert_eq!(code["percent_off"], 25);
    assert!(code.get("amount_cents").is_none());
    assert_eq!(code["universal"], true);

    // Changing only the amount keeps the percent type.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PUT", &format!("{codes}/{code_id}"), r#"{"amount_off":30}"#))
        .await
        .unwrap();
    let code = body_json(resp).await["offer_code"].clone();
    assert_eq!(code["percent_off"], 30);
    assert_eq!(code["name"], "FLAT");
}

#[tokio::test]
async fn reads_on_unknown_product_return_404() {
    for uri in [
        "/products/missing/offer_codes",
        "/products/missing/custom_fields",
        "/products/missing/variant_categories/vc/variants",
    ] {
        let resp = seeded_app().oneshot(request("GET", uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_json(resp).await["message"], "The product was not found.");
    }
}
