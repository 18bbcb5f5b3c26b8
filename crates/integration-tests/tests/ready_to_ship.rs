//! End-to-end tests for the ready-to-ship aggregation endpoint.

use reqwest::StatusCode;
use shipready_integration_tests::{Fixtures, TestContext, order_json};

const PATH: &str = "/api/orders/ready-to-ship";

#[tokio::test]
async fn test_on_hand_accumulates_committed_across_orders() {
    let fixtures = Fixtures::default()
        .order(order_json(1, "2024-01-01T09:00:00Z", &[(Some(7), Some(70), 3)]))
        .order(order_json(2, "2024-01-02T09:00:00Z", &[(Some(7), Some(70), 2)]))
        .stock(7, &[Some(5)])
        .product(70, "Misty Meadow Tee");
    let ctx = TestContext::new(fixtures).await;

    let (status, body) = ctx.get_json(PATH).await;

    assert_eq!(status, StatusCode::OK);
    let first = &body[0]["line_items"][0];
    let second = &body[1]["line_items"][0];
    assert_eq!(first["available_Stock"], 5);
    assert_eq!(first["committed_Stock"], 3);
    assert_eq!(first["onHand_Stock"], 8);
    assert_eq!(second["committed_Stock"], 2);
    assert_eq!(second["onHand_Stock"], 10);
    assert_eq!(first["product_title"], "Misty Meadow Tee");

    // Every order carries the batch-final maximum
    assert_eq!(body[0]["maxOnHandStockMap"]["7"], 10);
    assert_eq!(body[1]["maxOnHandStockMap"]["7"], 10);
}

#[tokio::test]
async fn test_order_wire_fields() {
    let fixtures = Fixtures::default()
        .order(order_json(1, "2024-01-01T09:00:00+05:30", &[(Some(7), None, 1)]))
        .stock(7, &[Some(1)]);
    let ctx = TestContext::new(fixtures).await;

    let (_, body) = ctx.get_json(PATH).await;
    let order = &body[0];

    assert_eq!(order["orderId"], 1);
    assert_eq!(order["orderNumber"], "#1001");
    assert_eq!(order["total_price"], "25.00");
    assert_eq!(order["financial_status"], "paid");
    assert_eq!(order["customer"]["first_name"], "Ada");
    assert!(order["orderDate"].as_str().is_some_and(|d| d.starts_with("2024-01-01")));
}

#[tokio::test]
async fn test_available_is_summed_across_locations() {
    let fixtures = Fixtures::default()
        .order(order_json(1, "2024-01-01T09:00:00Z", &[(Some(7), None, 1)]))
        .stock(7, &[Some(4), None, Some(-1)]);
    let ctx = TestContext::new(fixtures).await;

    let (_, body) = ctx.get_json(PATH).await;

    assert_eq!(body[0]["line_items"][0]["available_Stock"], 3);
    assert_eq!(body[0]["line_items"][0]["onHand_Stock"], 4);
}

#[tokio::test]
async fn test_failed_variant_lookup_degrades_to_committed() {
    let mut fixtures = Fixtures::default()
        .order(order_json(
            1,
            "2024-01-01T09:00:00Z",
            &[(Some(7), None, 4), (Some(8), None, 2)],
        ))
        .stock(8, &[Some(6)]);
    fixtures.failing_variants.insert(7);
    let ctx = TestContext::new(fixtures).await;

    let (status, body) = ctx.get_json(PATH).await;

    assert_eq!(status, StatusCode::OK);
    let failed = &body[0]["line_items"][0];
    assert_eq!(failed["available_Stock"], 0);
    assert_eq!(failed["committed_Stock"], 4);
    assert_eq!(failed["onHand_Stock"], 4);

    let ok = &body[0]["line_items"][1];
    assert_eq!(ok["available_Stock"], 6);
    assert_eq!(ok["onHand_Stock"], 8);
}

#[tokio::test]
async fn test_custom_items_without_variant_pass_through() {
    let fixtures = Fixtures::default().order(order_json(
        1,
        "2024-01-01T09:00:00Z",
        &[(None, None, 2)],
    ));
    let ctx = TestContext::new(fixtures).await;

    let (status, body) = ctx.get_json(PATH).await;

    assert_eq!(status, StatusCode::OK);
    let item = &body[0]["line_items"][0];
    assert!(item["variant_id"].is_null());
    assert_eq!(item["onHand_Stock"], 2);
    assert_eq!(body[0]["maxOnHandStockMap"], serde_json::json!({}));
}

#[tokio::test]
async fn test_each_variant_is_looked_up_once() {
    let fixtures = Fixtures::default()
        .order(order_json(1, "2024-01-01T09:00:00Z", &[(Some(7), None, 1)]))
        .order(order_json(2, "2024-01-02T09:00:00Z", &[(Some(7), None, 1), (Some(8), None, 1)]))
        .order(order_json(3, "2024-01-03T09:00:00Z", &[(Some(7), None, 1)]))
        .stock(7, &[Some(2)])
        .stock(8, &[Some(2)]);
    let ctx = TestContext::new(fixtures).await;

    let (status, _) = ctx.get_json(PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.upstream.variant_hits(7), 1);
    assert_eq!(ctx.upstream.variant_hits(8), 1);
}

#[tokio::test]
async fn test_empty_batch_is_empty_list() {
    let ctx = TestContext::new(Fixtures::default()).await;

    let (status, body) = ctx.get_json(PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_order_fetch_failure_is_500() {
    let fixtures = Fixtures {
        fail_orders: true,
        ..Fixtures::default()
    };
    let ctx = TestContext::new(fixtures).await;

    let (status, body) = ctx.get_json(PATH).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch orders from Shopify");
    assert_eq!(body["code"], "upstream_error");
}

#[tokio::test]
async fn test_upstream_rate_limit_is_503_with_retry_after() {
    let fixtures = Fixtures {
        rate_limited: true,
        ..Fixtures::default()
    };
    let ctx = TestContext::new(fixtures).await;

    let response = ctx.get(PATH).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok()),
        Some("3")
    );
}

#[tokio::test]
async fn test_failed_levels_lookup_degrades_to_committed() {
    let fixtures = Fixtures {
        fail_levels: true,
        ..Fixtures::default()
    }
    .order(order_json(1, "2024-01-01T09:00:00Z", &[(Some(7), None, 3)]))
    .stock(7, &[Some(5)]);
    let ctx = TestContext::new(fixtures).await;

    let (status, body) = ctx.get_json(PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.upstream.variant_hits(7), 1);
    let item = &body[0]["line_items"][0];
    assert_eq!(item["available_Stock"], 0);
    assert_eq!(item["committed_Stock"], 3);
    assert_eq!(item["onHand_Stock"], 3);
}

#[tokio::test]
async fn test_title_fetch_failure_aborts_request() {
    let fixtures = Fixtures {
        fail_products: true,
        ..Fixtures::default()
    }
    .order(order_json(1, "2024-01-01T09:00:00Z", &[(Some(7), Some(70), 1)]))
    .stock(7, &[Some(5)]);
    let ctx = TestContext::new(fixtures).await;

    let (status, body) = ctx.get_json(PATH).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch product titles from Shopify");
    assert_eq!(body["code"], "upstream_error");
    assert!(!body.to_string().contains("secret upstream detail"));
}

#[tokio::test]
async fn test_product_titles_are_fetched_in_chunks_of_250() {
    let items: Vec<(Option<i64>, Option<i64>, i64)> =
        (1..=251).map(|id| (None, Some(id), 1)).collect();
    let fixtures = (1..=251).fold(
        Fixtures::default().order(order_json(1, "2024-01-01T09:00:00Z", &items)),
        |fixtures, id| fixtures.product(id, &format!("Product {id}")),
    );
    let ctx = TestContext::new(fixtures).await;

    let (status, body) = ctx.get_json(PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.upstream.product_requests(), 2);

    let line_items = body[0]["line_items"].as_array().cloned().unwrap_or_default();
    assert_eq!(line_items.len(), 251);
    for (idx, item) in line_items.iter().enumerate() {
        assert_eq!(item["product_title"], format!("Product {}", idx + 1));
    }
}
