use super::ApiError;
use crate::immut_database::ImmutableBattleDatabase;
use actix_web::{HttpResponse, web};
use guess_battle::data_processing::parse_week;

#[derive(serde::Deserialize)]
pub struct FormData {
    date: String,
}

#[tracing::instrument(
    name = "Requesting the standings of one week",
    skip(form, database),
    fields(date = %form.date)
)]
pub async fn request_week(
    form: web::Form<FormData>,
    database: web::Data<ImmutableBattleDatabase>,
) -> Result<HttpResponse, ApiError> {
    let date = parse_week(&form.0.date).map_err(|e| ApiError::ValidationError(e.to_string()))?;
    let standing = database.week(date).ok_or(ApiError::UnknownWeek(date))?;

    Ok(HttpResponse::Ok().json(standing))
}
