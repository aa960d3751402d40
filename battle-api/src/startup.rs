use crate::configuration::Settings;
use crate::immut_database::ImmutableBattleDatabase;
use crate::routes::{health_check, request_series, request_summary, request_week};
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub fn build(configuration: &Settings) -> anyhow::Result<Self> {
        let database = ImmutableBattleDatabase::new(
            &configuration.data.battle_config,
            &configuration.data.rankings,
        )?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, database)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    database: ImmutableBattleDatabase,
) -> Result<Server, std::io::Error> {
    let database_ptr = web::Data::new(database);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health_check", web::get().to(health_check))
            .route("/summary", web::get().to(request_summary))
            .route("/series", web::post().to(request_series))
            .route("/week", web::post().to(request_week))
            .app_data(database_ptr.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}
