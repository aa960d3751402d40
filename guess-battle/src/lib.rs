pub mod battle_config;
pub mod data_processing;
pub mod domain;
pub mod error;
pub mod scoring;
pub mod series;
pub mod summary;

pub use error::{BattleError, Result};
