use backend_service::config::{BackendConfig, PostgresConfig, RootMode};
use backend_service::startup::Application;
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::time::Duration;

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

fn base_config(mode: RootMode, postgres: Option<PostgresConfig>) -> BackendConfig {
    BackendConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        service_name: "backend-service-test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        metrics_port: None,
        mode,
        postgres,
    }
}

/// Settings pointing at a port nothing listens on.
pub fn unreachable_postgres() -> PostgresConfig {
    PostgresConfig {
        user: "test".to_string(),
        host: "127.0.0.1".to_string(),
        database: "test".to_string(),
        password: Secret::new("test".to_string()),
        port: 1,
        max_connections: 1,
        acquire_timeout: Duration::from_secs(1),
    }
}

impl TestApp {
    pub async fn spawn_greeting() -> Self {
        Self::spawn(base_config(RootMode::Greeting, None)).await
    }

    pub async fn spawn_database(postgres: PostgresConfig) -> Self {
        Self::spawn(base_config(RootMode::Database, Some(postgres))).await
    }

    async fn spawn(config: BackendConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp { address, port }
    }

    pub async fn get_root(&self) -> reqwest::Response {
        reqwest::Client::new()
            .get(format!("{}/", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
