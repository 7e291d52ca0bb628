//! Common test utilities for order-service integration tests.
//!
//! Each test app runs against its own Postgres schema on `TEST_DATABASE_URL`.

#![allow(dead_code)]

use order_service::config::{DatabaseConfig, HttpConfig, OrderConfig};
use order_service::services::Database;
use order_service::startup::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CommonConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, Executor, PgConnection};
use std::sync::Once;

pub const ADMIN_PASSWORD: &str = "admin-senha-123";

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,order_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    database_url: String,
    schema: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        init_tracing();

        let database_url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must be set to run integration tests");
        let schema = format!("order_test_{}", uuid::Uuid::new_v4().simple());

        let mut conn = PgConnection::connect(&database_url)
            .await
            .expect("Failed to connect to Postgres");
        conn.execute(format!(r#"CREATE SCHEMA "{}""#, schema).as_str())
            .await
            .expect("Failed to create test schema");
        conn.close().await.ok();

        let search_path = format!(r#"SET search_path TO "{}""#, schema);
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    conn.execute(search_path.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&database_url)
            .await
            .expect("Failed to connect test pool");

        let config = OrderConfig {
            common: CommonConfig { port: 0 },
            service_name: "order-service-test".to_string(),
            service_version: "test".to_string(),
            log_level: "debug".to_string(),
            otlp_endpoint: None,
            database: DatabaseConfig {
                url: Secret::new(database_url.clone()),
                max_connections: 4,
                min_connections: 1,
                run_migrations: true,
            },
            http: HttpConfig {
                allowed_origins: vec![],
                max_body_bytes: 50 * 1024 * 1024,
            },
            admin_bootstrap_password: Some(Secret::new(ADMIN_PASSWORD.to_string())),
        };

        let app = Application::build_with_database(config, Database::from_pool(pool))
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/health", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            client,
            database_url,
            schema,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_client(&self, name: &str) -> Value {
        let response = self
            .client
            .post(self.url("/api/clientes"))
            .json(&json!({ "nome": name, "telefone": "11 90000-0000" }))
            .send()
            .await
            .expect("Failed to create client");
        assert_eq!(response.status(), 201);
        response.json().await.expect("Invalid client body")
    }

    /// Order with two items totalling 15.50 and 5.00 paid.
    pub async fn create_order(&self, client_id: &str) -> Value {
        let response = self
            .client
            .post(self.url("/api/pedidos"))
            .json(&json!({
                "clienteId": client_id,
                "descricao": "Ajustes",
                "itens": [
                    { "descricao": "Barra", "preco": 10.0 },
                    { "descricao": "Ajuste", "preco": 5.5 }
                ],
                "dataEntrega": "2025-04-02",
                "statusPagamento": "PARCIAL",
                "valorTotal": 15.5,
                "valorPago": 5,
                "formaPagamento": "Pix"
            }))
            .send()
            .await
            .expect("Failed to create order");
        assert_eq!(response.status(), 201);
        response.json().await.expect("Invalid order body")
    }

    /// Drop the test schema.
    pub async fn cleanup(&self) {
        let mut conn = PgConnection::connect(&self.database_url)
            .await
            .expect("Failed to connect to Postgres");
        conn.execute(format!(r#"DROP SCHEMA "{}" CASCADE"#, self.schema).as_str())
            .await
            .expect("Failed to drop test schema");
    }
}
