use actix_web::{web, HttpResponse, Result};
use sqlx::PgPool;

use crate::db::helpers::db_result;
use crate::db::users;
use crate::models::common::ApiResponse;
use crate::models::user::LeaderboardEntry;
use crate::ok_or_return;

/// GET /leaderboard - everyone ranked by total points
pub async fn get_leaderboard(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let ranked = ok_or_return!(db_result(users::leaderboard(&pool).await));

    let entries: Vec<LeaderboardEntry> = ranked
        .into_iter()
        .enumerate()
        .map(|(index, user)| LeaderboardEntry {
            rank: index + 1,
            user_id: user.id,
            username: user.username,
            total_points: user.total_points,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success("Leaderboard", entries)))
}
