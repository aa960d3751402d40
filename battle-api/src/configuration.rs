use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub data: DataSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

/// Where the guess battle and its cached rankings live on disk.
#[derive(Deserialize, Clone, Debug)]
pub struct DataSettings {
    pub battle_config: PathBuf,
    pub rankings: PathBuf,
}

/// Reads `configuration.yaml`, then lets `APP__SECTION__KEY` variables override it,
/// e.g. `APP__APPLICATION__PORT=5001`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    config::Config::builder()
        .add_source(config::File::from(base_path.join("configuration.yaml")))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
