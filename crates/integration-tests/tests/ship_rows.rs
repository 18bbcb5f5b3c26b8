//! End-to-end tests for the table rows endpoint.

use reqwest::StatusCode;
use shipready_integration_tests::{Fixtures, TestContext, order_json};

const PATH: &str = "/api/orders/ready-to-ship/rows";

#[tokio::test]
async fn test_oversold_variant_keeps_earliest_order() {
    // Available -4 with three orders of 2: on-hand runs -2, 0, 2, so every
    // item has committed == max on-hand and negative stock.
    let fixtures = Fixtures::default()
        .order(order_json(1, "2024-01-03T09:00:00Z", &[(Some(7), None, 2)]))
        .order(order_json(2, "2024-01-01T09:00:00Z", &[(Some(7), None, 2)]))
        .order(order_json(
            3,
            "2024-01-02T09:00:00Z",
            &[(Some(7), None, 2), (Some(8), None, 1)],
        ))
        .stock(7, &[Some(-4)])
        .stock(8, &[Some(5)]);
    let ctx = TestContext::new(fixtures).await;

    let (status, body) = ctx.get_json(PATH).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let rows = body["rows"].as_array().cloned().unwrap_or_default();
    let picked: Vec<(i64, i64)> = rows
        .iter()
        .filter_map(|r| Some((r["order_id"].as_i64()?, r["variant_id"].as_i64()?)))
        .collect();
    assert_eq!(picked, vec![(2, 7), (3, 8)]);
}

#[tokio::test]
async fn test_row_labels_use_batch_maximum() {
    let fixtures = Fixtures::default()
        .order(order_json(1, "2024-01-01T09:00:00Z", &[(Some(7), None, 3)]))
        .order(order_json(2, "2024-01-02T09:00:00Z", &[(Some(7), None, 2)]))
        .stock(7, &[Some(5)]);
    let ctx = TestContext::new(fixtures).await;

    let (_, body) = ctx.get_json(PATH).await;
    let first = &body["rows"][0];

    assert_eq!(body["total"], 2);
    assert_eq!(first["on_hand_stock"], 10);
    assert_eq!(first["inventory_label"], "10 in Stock");
    assert_eq!(first["committed_label"], "3 items");
    assert_eq!(first["customer"], "Ada Lovelace");
    assert_eq!(first["total"], "Rs 25.00");
    assert_eq!(first["fulfillment_status"], "Unfulfilled");
}
