use anyhow::Context;
use battle_api::configuration::get_configuration;
use battle_api::startup::Application;
use battle_api::telemetry::{get_subscriber, init_subscriber};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Set up tracing telemetry.
    let app_name = format!("{}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let subscriber = get_subscriber(app_name, "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let configuration = get_configuration().context("Failed to read configuration.")?;

    // Score everything up front; the server only reads afterwards
    let application = Application::build(&configuration)
        .context("Failed to load the battle data")?;
    tracing::info!("Listening on port {}", application.port());
    application.run_until_stopped().await?;
    Ok(())
}
