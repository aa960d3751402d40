mod health_check;
mod series;
mod summary;
mod week;

pub use health_check::health_check;
pub use series::request_series;
pub use summary::request_summary;
pub use week::request_week;

use actix_web::ResponseError;
use actix_web::http::StatusCode;
use chrono::NaiveDate;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{name} is not in this battle. Participants: {known}")]
    UnknownParticipant { name: String, known: String },
    #[error("No rankings were published for {0}")]
    UnknownWeek(NaiveDate),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}
