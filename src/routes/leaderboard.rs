use actix_web::{get, web, HttpResponse, Result};
use sqlx::PgPool;

use crate::handlers::leaderboard_handler::get_leaderboard;

#[get("/leaderboard")]
async fn leaderboard(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    get_leaderboard(pool).await
}
