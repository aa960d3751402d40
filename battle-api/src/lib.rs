pub mod configuration;
pub mod domain;
pub mod immut_database;
pub mod routes;
pub mod startup;
pub mod telemetry;
