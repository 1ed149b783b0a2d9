use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use serde_json::Value;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::SocketAddr;
use subtally::{
    configuration::{get_configuration, DatabaseSettings},
    startup::{get_connection_pool, Application},
    telemetry::{get_subscriber, init_subscriber},
};
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let name = "test";
    let default_env_filter = "info";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::sink);
        init_subscriber(subscriber);
    }
});

static FAILED_TO_EXECUTE_REQUEST: &str = "Failed to execute request";

pub struct TestApp {
    pub address: SocketAddr,
    pub db_pool: PgPool,
    client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Failed to read configuration");
        config.database.database_name = Uuid::new_v4().to_string();
        config.application.port = 0;

        let db_pool = configure_database(&config.database).await;

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = app.local_addr();

        tokio::spawn(app.run_until_stopped());

        Self {
            address,
            db_pool,
            client: Client::new(),
        }
    }

    pub async fn get_health_check(&self) -> Response {
        self.client
            .get(self.url("/health_check"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_subscription(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/api/v1/subscriptions"))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_subscription_raw(&self, body: String) -> Response {
        self.client
            .post(self.url("/api/v1/subscriptions"))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn put_subscription(&self, body: &Value) -> Response {
        self.client
            .put(self.url("/api/v1/subscriptions"))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_subscription(&self, user_id: &str, service_name: &str) -> Response {
        self.client
            .get(self.url("/api/v1/subscriptions"))
            .query(&[("user_id", user_id), ("service_name", service_name)])
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn delete_subscription(&self, user_id: &str, service_name: &str) -> Response {
        self.client
            .delete(self.url("/api/v1/subscriptions"))
            .query(&[("user_id", user_id), ("service_name", service_name)])
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn list_subscriptions(&self, user_id: &str) -> Response {
        self.client
            .get(self.url(&format!("/api/v1/subscriptions/{user_id}")))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn get_summary(&self, query: &[(&str, &str)]) -> Response {
        self.client
            .get(self.url("/api/v1/subscriptions/summary"))
            .query(query)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("http://{}{endpoint}", self.address)
    }
}

pub fn subscription_body(
    user_id: &str,
    service_name: &str,
    price: i64,
    start_date: &str,
    end_date: Option<&str>,
) -> Value {
    let mut body = serde_json::json!({
        "user_id": user_id,
        "service_name": service_name,
        "price": price,
        "start_date": start_date,
    });
    if let Some(end_date) = end_date {
        body["end_date"] = Value::String(end_date.to_string());
    }
    body
}

async fn configure_database(configuration: &DatabaseSettings) -> PgPool {
    let mut conn = PgConnection::connect_with(&configuration.without_db())
        .await
        .expect("Failed to connect to Postgres");

    conn.execute(format!(r#"CREATE DATABASE "{}";"#, configuration.database_name).as_str())
        .await
        .expect("Failed to create database");

    let pool = get_connection_pool(configuration);

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}
