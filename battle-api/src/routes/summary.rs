use crate::immut_database::ImmutableBattleDatabase;
use actix_web::{HttpResponse, web};

#[tracing::instrument(name = "Requesting the leaderboard summary", skip(database))]
pub async fn request_summary(database: web::Data<ImmutableBattleDatabase>) -> HttpResponse {
    HttpResponse::Ok().json(database.summary())
}
