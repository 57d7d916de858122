use reqwest::Client;
use serde_json::json;

mod common;
use common::utils::{spawn_app, create_test_user_and_login, submit_prediction, user_total_points};
use common::admin_helpers::{create_admin_user_and_login, create_match, kickoff_in, set_match_result};

#[tokio::test]
async fn finishing_a_match_awards_points() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let exact = create_test_user_and_login(&test_app).await;
    let boosted = create_test_user_and_login(&test_app).await;
    let wrong = create_test_user_and_login(&test_app).await;
    let kickoff = kickoff_in(60);
    let match_id = create_match(&test_app, &admin.token, kickoff).await;

    submit_prediction(&test_app, &exact.token, match_id, json!(2), json!(1), false).await;
    submit_prediction(&test_app, &boosted.token, match_id, json!(3), json!(1), true).await;
    submit_prediction(&test_app, &wrong.token, match_id, json!(0), json!(2), false).await;

    let response = set_match_result(&test_app, &admin.token, match_id, kickoff, "finished", Some((2, 1))).await;
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["match"]["status"], "finished");
    assert_eq!(body["data"]["sweep"]["predictions_scored"], 3);
    assert_eq!(body["data"]["sweep"]["predictions_changed"], 2);
    assert_eq!(body["data"]["sweep"]["total_delta"], 17);

    assert_eq!(user_total_points(&test_app.db_pool, exact.user_id).await, 7);
    // 3-1 shares the away score: 5, doubled by the boost
    assert_eq!(user_total_points(&test_app.db_pool, boosted.user_id).await, 10);
    assert_eq!(user_total_points(&test_app.db_pool, wrong.user_id).await, 0);
}

#[tokio::test]
async fn saving_the_same_result_twice_changes_nothing() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let user = create_test_user_and_login(&test_app).await;
    let kickoff = kickoff_in(60);
    let match_id = create_match(&test_app, &admin.token, kickoff).await;
    submit_prediction(&test_app, &user.token, match_id, json!(1), json!(1), false).await;

    set_match_result(&test_app, &admin.token, match_id, kickoff, "finished", Some((1, 1))).await;
    let response = set_match_result(&test_app, &admin.token, match_id, kickoff, "finished", Some((1, 1))).await;
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");

    assert_eq!(body["data"]["sweep"]["predictions_changed"], 0);
    assert_eq!(user_total_points(&test_app.db_pool, user.user_id).await, 7);
}

#[tokio::test]
async fn correcting_a_result_moves_totals_by_the_difference() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let user = create_test_user_and_login(&test_app).await;
    let kickoff = kickoff_in(60);
    let match_id = create_match(&test_app, &admin.token, kickoff).await;
    submit_prediction(&test_app, &user.token, match_id, json!(2), json!(0), false).await;

    set_match_result(&test_app, &admin.token, match_id, kickoff, "finished", Some((2, 0))).await;
    assert_eq!(user_total_points(&test_app.db_pool, user.user_id).await, 7);

    // Corrected to 3-1: right winner only
    set_match_result(&test_app, &admin.token, match_id, kickoff, "finished", Some((3, 1))).await;
    assert_eq!(user_total_points(&test_app.db_pool, user.user_id).await, 2);

    // Corrected again to 0-3: nothing left
    set_match_result(&test_app, &admin.token, match_id, kickoff, "finished", Some((0, 3))).await;
    assert_eq!(user_total_points(&test_app.db_pool, user.user_id).await, 0);

    // Back to live without a result leaves points where they were
    let response = set_match_result(&test_app, &admin.token, match_id, kickoff, "live", None).await;
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["sweep"]["predictions_scored"], 0);

    let sum: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(points_earned), 0) FROM predictions WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to sum points");
    assert_eq!(sum, 0);
}

#[tokio::test]
async fn totals_accumulate_across_matches_and_feed_the_leaderboard() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let leader = create_test_user_and_login(&test_app).await;
    let chaser = create_test_user_and_login(&test_app).await;
    let kickoff = kickoff_in(60);
    let first = create_match(&test_app, &admin.token, kickoff).await;
    let second = create_match(&test_app, &admin.token, kickoff).await;

    submit_prediction(&test_app, &leader.token, first, json!(2), json!(1), false).await;
    submit_prediction(&test_app, &leader.token, second, json!(0), json!(0), true).await;
    submit_prediction(&test_app, &chaser.token, first, json!(1), json!(0), false).await;

    set_match_result(&test_app, &admin.token, first, kickoff, "finished", Some((2, 1))).await;
    set_match_result(&test_app, &admin.token, second, kickoff, "finished", Some((0, 0))).await;

    assert_eq!(user_total_points(&test_app.db_pool, leader.user_id).await, 21);
    assert_eq!(user_total_points(&test_app.db_pool, chaser.user_id).await, 2);

    let response = Client::new()
        .get(&format!("{}/leaderboard", test_app.address))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let entries = body["data"].as_array().expect("data is not an array");
    assert_eq!(entries[0]["username"], leader.username.as_str());
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["total_points"], 21);
    assert_eq!(entries[1]["username"], chaser.username.as_str());
}

#[tokio::test]
async fn deleting_a_finished_match_takes_its_points_back() {
    let test_app = spawn_app().await;
    let admin = create_admin_user_and_login(&test_app).await;
    let user = create_test_user_and_login(&test_app).await;
    let kickoff = kickoff_in(60);
    let match_id = create_match(&test_app, &admin.token, kickoff).await;
    submit_prediction(&test_app, &user.token, match_id, json!(3), json!(0), false).await;
    set_match_result(&test_app, &admin.token, match_id, kickoff, "finished", Some((3, 0))).await;
    assert_eq!(user_total_points(&test_app.db_pool, user.user_id).await, 7);

    let response = Client::new()
        .delete(&format!("{}/admin/matches/{}", test_app.address, match_id))
        .header("Authorization", format!("Bearer {}", admin.token))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    assert_eq!(user_total_points(&test_app.db_pool, user.user_id).await, 0);
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM predictions WHERE match_id = $1")
        .bind(match_id)
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Failed to count predictions");
    assert_eq!(remaining, 0);
}
