mod health_check;
mod helpers;
mod series;
mod summary;
mod week;
