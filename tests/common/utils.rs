use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::{PgPool, PgConnection, Connection, Executor};
use std::net::TcpListener;
use uuid::Uuid;
use once_cell::sync::Lazy;
use reqwest::Client;

use scoreboard_backend::run;
use scoreboard_backend::config::settings::{get_config, DatabaseSettings, get_jwt_settings};
use scoreboard_backend::telemetry::{get_subscriber, init_subscriber};

pub const TEST_PASSWORD: &str = "password123";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

pub struct UserRegLoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    // A per-test database needs the connection string built from its parts
    configuration.database.db_url = None;
    let connection_pool = configure_db(&configuration.database)
        .await;
    let jwt_settings = get_jwt_settings(&configuration);
    let server = run(
        listener,
        connection_pool.clone(),
        jwt_settings,
        configuration.predictions,
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    // tokio::spawn returns a handle to the spawned future,
    // but we have no use for it here, hence the non-binding let
    let _ = tokio::spawn(server);
    TestApp {
        address,
        db_pool: connection_pool
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(
            &config.connection_string_without_db()
        )
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(&config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Registers a fresh user and returns its username.
pub async fn register_user(app_address: &str, prefix: &str) -> String {
    let client = Client::new();
    let username = format!("{}{}", prefix, &Uuid::new_v4().simple().to_string()[..12]);

    let response = client
        .post(&format!("{}/register_user", app_address))
        .json(&json!({
            "username": username,
            "password": TEST_PASSWORD,
            "confirm_password": TEST_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to register user.");
    assert_eq!(201, response.status().as_u16());

    username
}

pub async fn mark_paid(pool: &PgPool, username: &str) {
    sqlx::query("UPDATE users SET payment_status = 'paid' WHERE username = $1")
        .bind(username)
        .execute(pool)
        .await
        .expect("Failed to mark user as paid");
}

pub async fn login(app_address: &str, username: &str) -> reqwest::Response {
    Client::new()
        .post(&format!("{}/login", app_address))
        .json(&json!({
            "username": username,
            "password": TEST_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to execute login request.")
}

/// Registers a user, marks them as paid and logs in.
pub async fn create_test_user_and_login(app: &TestApp) -> UserRegLoginResponse {
    let username = register_user(&app.address, "player").await;
    mark_paid(&app.db_pool, &username).await;

    let login_response = login(&app.address, &username).await;
    assert_eq!(200, login_response.status().as_u16());

    let body: serde_json::Value = login_response.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("No token in response").to_string();
    let user_id = body["user_id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("No user_id in response");

    UserRegLoginResponse {
        token,
        user_id,
        username
    }
}

pub async fn make_authenticated_request(
    client: &Client,
    method: reqwest::Method,
    url: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> reqwest::Response {
    let mut request = client
        .request(method, url)
        .header("Authorization", format!("Bearer {}", token));

    if let Some(body) = body {
        request = request.json(&body);
    }

    request.send().await.expect("Failed to execute request")
}

pub async fn submit_prediction(
    app: &TestApp,
    token: &str,
    match_id: Uuid,
    team1_score: serde_json::Value,
    team2_score: serde_json::Value,
    boost_active: bool,
) -> reqwest::Response {
    make_authenticated_request(
        &Client::new(),
        reqwest::Method::POST,
        &format!("{}/predictions", app.address),
        token,
        Some(json!({
            "match_id": match_id,
            "team1_score": team1_score,
            "team2_score": team2_score,
            "boost_active": boost_active
        })),
    )
    .await
}

pub async fn user_total_points(pool: &PgPool, user_id: Uuid) -> i32 {
    sqlx::query_scalar::<_, i32>("SELECT total_points FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read total points")
}
