use reqwest::Client;
use serde_json::json;

mod common;
use common::utils::{spawn_app, register_user, TEST_PASSWORD};

#[tokio::test]
async fn register_user_working() {
    let test_app = spawn_app().await;
    let client = Client::new();
    let username = format!("newuser{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);

    let response = client
        .post(&format!("{}/register_user", &test_app.address))
        .json(&json!({
            "username": username,
            "password": TEST_PASSWORD,
            "confirm_password": TEST_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], username.as_str());
    assert_eq!(body["data"]["payment_status"], "pending");
    assert_eq!(body["data"]["total_points"], 0);
    assert!(body["data"].get("password_hash").is_none());

    let (status, points): (String, i32) =
        sqlx::query_as("SELECT payment_status, total_points FROM users WHERE username = $1")
            .bind(&username)
            .fetch_one(&test_app.db_pool)
            .await
            .expect("Failed to fetch saved user.");
    assert_eq!(status, "pending");
    assert_eq!(points, 0);
}

#[tokio::test]
async fn register_user_rejects_invalid_forms() {
    let test_app = spawn_app().await;
    let client = Client::new();

    let test_cases = vec![
        (json!({"username": "", "password": "secret1", "confirm_password": "secret1"}), "empty username"),
        (json!({"username": "shorty", "password": "abc", "confirm_password": "abc"}), "password too short"),
        (json!({"username": "mismatch", "password": "secret1", "confirm_password": "secret2"}), "passwords differ"),
    ];

    for (body, description) in test_cases {
        let response = client
            .post(&format!("{}/register_user", &test_app.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
    }
}

#[tokio::test]
async fn register_user_rejects_duplicate_username() {
    let test_app = spawn_app().await;
    let username = register_user(&test_app.address, "dup").await;

    let response = Client::new()
        .post(&format!("{}/register_user", &test_app.address))
        .json(&json!({
            "username": username,
            "password": TEST_PASSWORD,
            "confirm_password": TEST_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(409, response.status().as_u16());
}
