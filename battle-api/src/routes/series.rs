use super::ApiError;
use crate::domain::{ParticipantName, SeriesPoint};
use crate::immut_database::ImmutableBattleDatabase;
use actix_web::{HttpResponse, web};

#[derive(serde::Deserialize)]
pub struct FormData {
    participant: String,
}

#[tracing::instrument(
    name = "Requesting a participant's score series",
    skip(form, database),
    fields(participant = %form.participant)
)]
pub async fn request_series(
    form: web::Form<FormData>,
    database: web::Data<ImmutableBattleDatabase>,
) -> Result<HttpResponse, ApiError> {
    let participant = ParticipantName::parse(form.0.participant).map_err(ApiError::ValidationError)?;
    let points = series_from_database(&participant, &database)?;

    Ok(HttpResponse::Ok().json(points))
}

#[tracing::instrument(name = "Reading the series from the database", skip(database))]
pub fn series_from_database(
    participant: &ParticipantName,
    database: &ImmutableBattleDatabase,
) -> Result<Vec<SeriesPoint>, ApiError> {
    let series = database
        .series_of(participant)
        .ok_or_else(|| ApiError::UnknownParticipant {
            name: participant.as_ref().to_owned(),
            known: database.participants().collect::<Vec<_>>().join(", "),
        })?;
    Ok(series.points().collect())
}
