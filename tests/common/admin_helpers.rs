use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde_json::json;
use uuid::Uuid;

use crate::common::utils::{
    TestApp,
    UserRegLoginResponse,
    create_test_user_and_login,
    login,
    make_authenticated_request,
};

/// Helper function to create an admin user and get auth token
pub async fn create_admin_user_and_login(app: &TestApp) -> UserRegLoginResponse {
    let user = create_test_user_and_login(app).await;

    // Promote user to admin using direct database access
    sqlx::query("UPDATE users SET is_admin = TRUE WHERE id = $1")
        .bind(user.user_id)
        .execute(&app.db_pool)
        .await
        .expect("Failed to promote user to admin");

    // The admin flag travels in the token, so log in again
    let login_response = login(&app.address, &user.username).await;
    assert_eq!(200, login_response.status().as_u16());
    let login_body: serde_json::Value = login_response
        .json()
        .await
        .expect("Failed to parse login response");
    assert_eq!(Some(true), login_body["is_admin"].as_bool());

    UserRegLoginResponse {
        token: login_body["token"].as_str().unwrap().to_string(),
        user_id: user.user_id,
        username: user.username,
    }
}

pub fn kickoff_in(minutes: i64) -> DateTime<Utc> {
    Utc::now() + Duration::minutes(minutes)
}

/// Creates an upcoming match and returns its id.
pub async fn create_match(
    app: &TestApp,
    admin_token: &str,
    start_time: DateTime<Utc>,
) -> Uuid {
    let response = make_authenticated_request(
        &Client::new(),
        reqwest::Method::POST,
        &format!("{}/admin/matches", app.address),
        admin_token,
        Some(json!({
            "team1": "Brazil",
            "team2": "Argentina",
            "start_time": start_time
        })),
    )
    .await;
    assert_eq!(201, response.status().as_u16());

    let body: serde_json::Value = response.json().await.expect("Failed to parse match response");
    body["data"]["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("No match id in response")
}

/// Saves a result for the match. Returns the raw response for status checks.
pub async fn set_match_result(
    app: &TestApp,
    admin_token: &str,
    match_id: Uuid,
    start_time: DateTime<Utc>,
    status: &str,
    scores: Option<(i32, i32)>,
) -> reqwest::Response {
    let (team1_score, team2_score) = match scores {
        Some((t1, t2)) => (json!(t1), json!(t2)),
        None => (serde_json::Value::Null, serde_json::Value::Null),
    };

    make_authenticated_request(
        &Client::new(),
        reqwest::Method::PUT,
        &format!("{}/admin/matches/{}", app.address, match_id),
        admin_token,
        Some(json!({
            "team1": "Brazil",
            "team2": "Argentina",
            "start_time": start_time,
            "status": status,
            "team1_score": team1_score,
            "team2_score": team2_score
        })),
    )
    .await
}
