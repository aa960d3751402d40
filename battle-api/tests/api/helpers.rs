use battle_api::configuration::get_configuration;
use battle_api::startup::Application;
use battle_api::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use std::path::PathBuf;

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to set subscriber");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to set subscriber");
    };
});

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub struct TestApp {
    address: String,
    client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // `TRACING` is only executed the first time `initialize` is invoked.
        Lazy::force(&TRACING);

        // Point at the fixture battle and let the OS pick a port
        let configuration = {
            let mut c = get_configuration().expect("Failed to read configuration.");
            c.application.port = 0;
            c.data.battle_config = fixture("battle.json5");
            c.data.rankings = fixture("rankings.json");
            c
        };

        // Launch the application as a background task
        let application = Application::build(&configuration).expect("Failed to build application.");
        let address = format!("http://127.0.0.1:{}", application.port());
        let _ = tokio::spawn(application.run_until_stopped());

        Self {
            address,
            client: reqwest::Client::new(),
        }
    }

    pub async fn get(&self, method: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/{}", &self.address, method))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post(&self, method: &str, body: String) -> reqwest::Response {
        self.client
            .post(format!("{}/{}", &self.address, method))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_health_check(&self) -> reqwest::Response {
        self.get("health_check").await
    }

    pub async fn get_summary(&self) -> reqwest::Response {
        self.get("summary").await
    }

    pub async fn post_series(&self, body: String) -> reqwest::Response {
        self.post("series", body).await
    }

    pub async fn post_week(&self, body: String) -> reqwest::Response {
        self.post("week", body).await
    }
}
