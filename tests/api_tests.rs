//! API integration tests
//!
//! These run against a live server with a fresh database:
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000/api/v1";

/// Register a fresh admin account and return its bearer token
async fn get_admin_token(client: &Client) -> String {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": "admin",
            "email": format!("admin-{}@example.org", suffix),
            "password": "admin-password",
            "role": "admin"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    let body: Value = response.json().await.expect("Failed to parse register response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Create a category and an item with the given stock, returning the item id
async fn create_item_with_stock(client: &Client, token: &str, stock: i64) -> i64 {
    let response = client
        .post(format!("{}/categories", BASE_URL))
        .bearer_auth(token)
        .json(&json!({"name": "Office supplies", "description": "Pens and paper"}))
        .send()
        .await
        .expect("Failed to create category");
    let category: Value = response.json().await.expect("Failed to parse category");

    let response = client
        .post(format!("{}/items", BASE_URL))
        .bearer_auth(token)
        .json(&json!({
            "name": "Stapler",
            "category_id": category["id"],
            "stock": stock
        }))
        .send()
        .await
        .expect("Failed to create item");
    let item: Value = response.json().await.expect("Failed to parse item");
    item["id"].as_i64().expect("No item id")
}

async fn get_stock(client: &Client, token: &str, item_id: i64) -> i64 {
    let response = client
        .get(format!("{}/items/{}", BASE_URL, item_id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to get item");
    let item: Value = response.json().await.expect("Failed to parse item");
    item["stock"].as_i64().expect("No stock field")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "nobody@example.org",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_mutations_require_admin() {
    let client = Client::new();

    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": "plain",
            "email": format!("plain-{}@example.org", suffix),
            "password": "plain-password",
            "role": "user"
        }))
        .send()
        .await
        .expect("Failed to register");
    let body: Value = response.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().expect("No token");

    let response = client
        .post(format!("{}/categories", BASE_URL))
        .bearer_auth(token)
        .json(&json!({"name": "Not allowed"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore]
async fn test_checkout_reserves_stock() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let item_id = create_item_with_stock(&client, &token, 10).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "item_id": item_id,
            "borrower_name": "Alice Martin",
            "quantity": 4,
            "status": "borrowed"
        }))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);

    assert_eq!(get_stock(&client, &token, item_id).await, 6);
}

#[tokio::test]
#[ignore]
async fn test_checkout_rejects_insufficient_stock() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let item_id = create_item_with_stock(&client, &token, 3).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "item_id": item_id,
            "borrower_name": "Bob Durand",
            "quantity": 5,
            "status": "borrowed"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Nothing was reserved
    assert_eq!(get_stock(&client, &token, item_id).await, 3);
}

#[tokio::test]
#[ignore]
async fn test_return_releases_stock() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let item_id = create_item_with_stock(&client, &token, 10).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "item_id": item_id,
            "borrower_name": "Alice Martin",
            "quantity": 4,
            "status": "borrowed"
        }))
        .send()
        .await
        .expect("Failed to create loan");
    let loan: Value = response.json().await.expect("Failed to parse loan");

    let response = client
        .put(format!("{}/loans/{}/status", BASE_URL, loan["id"]))
        .bearer_auth(&token)
        .json(&json!({"status": "returned"}))
        .send()
        .await
        .expect("Failed to update status");
    assert!(response.status().is_success());

    assert_eq!(get_stock(&client, &token, item_id).await, 10);

    // Returning again is idempotent
    let response = client
        .put(format!("{}/loans/{}/status", BASE_URL, loan["id"]))
        .bearer_auth(&token)
        .json(&json!({"status": "returned"}))
        .send()
        .await
        .expect("Failed to update status");
    assert!(response.status().is_success());

    assert_eq!(get_stock(&client, &token, item_id).await, 10);
}

#[tokio::test]
#[ignore]
async fn test_quantity_amendment_moves_difference() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let item_id = create_item_with_stock(&client, &token, 10).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "item_id": item_id,
            "borrower_name": "Alice Martin",
            "quantity": 4,
            "status": "borrowed"
        }))
        .send()
        .await
        .expect("Failed to create loan");
    let loan: Value = response.json().await.expect("Failed to parse loan");

    // 4 -> 6 reserves two more
    let response = client
        .put(format!("{}/loans/{}/quantity", BASE_URL, loan["id"]))
        .bearer_auth(&token)
        .json(&json!({"quantity": 6}))
        .send()
        .await
        .expect("Failed to update quantity");
    assert!(response.status().is_success());
    assert_eq!(get_stock(&client, &token, item_id).await, 4);

    // 6 -> 1 releases five
    let response = client
        .put(format!("{}/loans/{}/quantity", BASE_URL, loan["id"]))
        .bearer_auth(&token)
        .json(&json!({"quantity": 1}))
        .send()
        .await
        .expect("Failed to update quantity");
    assert!(response.status().is_success());
    assert_eq!(get_stock(&client, &token, item_id).await, 9);
}

#[tokio::test]
#[ignore]
async fn test_delete_borrowed_loan_releases_stock() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let item_id = create_item_with_stock(&client, &token, 5).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "item_id": item_id,
            "borrower_name": "Alice Martin",
            "quantity": 5,
            "status": "borrowed"
        }))
        .send()
        .await
        .expect("Failed to create loan");
    let loan: Value = response.json().await.expect("Failed to parse loan");
    assert_eq!(get_stock(&client, &token, item_id).await, 0);

    let response = client
        .delete(format!("{}/loans/{}", BASE_URL, loan["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete loan");
    assert_eq!(response.status(), 204);

    assert_eq!(get_stock(&client, &token, item_id).await, 5);
}

/// Fire concurrent checkouts at one item and check the books still balance:
/// exactly `stock` units can be won, and the counter ends at zero or above.
#[tokio::test]
#[ignore]
async fn test_concurrent_checkouts_never_oversell() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let item_id = create_item_with_stock(&client, &token, 5).await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let client = client.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            let response = client
                .post(format!("{}/loans", BASE_URL))
                .bearer_auth(&token)
                .json(&json!({
                    "item_id": item_id,
                    "borrower_name": format!("Racer {}", i),
                    "quantity": 1,
                    "status": "borrowed"
                }))
                .send()
                .await
                .expect("Failed to send request");
            response.status().as_u16()
        }));
    }

    let mut won = 0;
    for handle in handles {
        if handle.await.unwrap() == 201 {
            won += 1;
        }
    }

    assert_eq!(won, 5);
    assert_eq!(get_stock(&client, &token, item_id).await, 0);
}

#[tokio::test]
#[ignore]
async fn test_loan_search_is_exact_and_case_insensitive() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let item_id = create_item_with_stock(&client, &token, 10).await;

    for name in ["Charlie Petit", "Charlie"] {
        let response = client
            .post(format!("{}/loans", BASE_URL))
            .bearer_auth(&token)
            .json(&json!({
                "item_id": item_id,
                "borrower_name": name,
                "quantity": 1,
                "status": "borrowed"
            }))
            .send()
            .await
            .expect("Failed to create loan");
        assert_eq!(response.status(), 201);
    }

    let response = client
        .get(format!("{}/loans?search=charlie", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list loans");
    let loans: Value = response.json().await.expect("Failed to parse loans");
    let loans = loans.as_array().expect("Expected array");

    assert!(loans
        .iter()
        .all(|l| l["borrower_name"].as_str() == Some("Charlie")));
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_empty_search_returns_all_loans() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let item_id = create_item_with_stock(&client, &token, 10).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "item_id": item_id,
            "borrower_name": "Denise Leroy",
            "quantity": 1,
            "status": "borrowed"
        }))
        .send()
        .await
        .expect("Failed to create loan");
    assert_eq!(response.status(), 201);

    // An empty search parameter means no filter, same as omitting it
    let response = client
        .get(format!("{}/loans?search=", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list loans");
    let loans: Value = response.json().await.expect("Failed to parse loans");
    let loans = loans.as_array().expect("Expected array");

    assert!(loans
        .iter()
        .any(|l| l["borrower_name"].as_str() == Some("Denise Leroy")));
}

#[tokio::test]
#[ignore]
async fn test_category_delete_refused_while_items_reference_it() {
    let client = Client::new();
    let token = get_admin_token(&client).await;

    let response = client
        .post(format!("{}/categories", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({"name": "Electronics"}))
        .send()
        .await
        .expect("Failed to create category");
    let category: Value = response.json().await.expect("Failed to parse category");

    let response = client
        .post(format!("{}/items", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Projector",
            "category_id": category["id"],
            "stock": 2
        }))
        .send()
        .await
        .expect("Failed to create item");
    let item: Value = response.json().await.expect("Failed to parse item");

    let response = client
        .delete(format!("{}/categories/{}", BASE_URL, category["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status(), 409);

    // Once the item is gone the category can be deleted
    let response = client
        .delete(format!("{}/items/{}", BASE_URL, item["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete item");
    assert_eq!(response.status(), 204);

    let response = client
        .delete(format!("{}/categories/{}", BASE_URL, category["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete category");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_item_delete_refused_with_outstanding_loans() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let item_id = create_item_with_stock(&client, &token, 5).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "item_id": item_id,
            "borrower_name": "Eve Moreau",
            "quantity": 2,
            "status": "borrowed"
        }))
        .send()
        .await
        .expect("Failed to create loan");
    let loan: Value = response.json().await.expect("Failed to parse loan");

    let response = client
        .delete(format!("{}/items/{}", BASE_URL, item_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status(), 409);

    // After the loan is returned the item can be deleted
    let response = client
        .put(format!("{}/loans/{}/status", BASE_URL, loan["id"]))
        .bearer_auth(&token)
        .json(&json!({"status": "returned"}))
        .send()
        .await
        .expect("Failed to return loan");
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/items/{}", BASE_URL, item_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete item");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_quantity_amendment_rejected_on_returned_loan() {
    let client = Client::new();
    let token = get_admin_token(&client).await;
    let item_id = create_item_with_stock(&client, &token, 5).await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "item_id": item_id,
            "borrower_name": "Frank Dubois",
            "quantity": 2,
            "status": "returned"
        }))
        .send()
        .await
        .expect("Failed to create loan");
    let loan: Value = response.json().await.expect("Failed to parse loan");

    let response = client
        .put(format!("{}/loans/{}/quantity", BASE_URL, loan["id"]))
        .bearer_auth(&token)
        .json(&json!({"quantity": 3}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // No stock moved for a returned loan
    assert_eq!(get_stock(&client, &token, item_id).await, 5);
}
