//! Database service for order-service.

use crate::models::{
    CatalogService, Client, CreateCatalogService, CreateUser, Order, User, WriteClient, WriteOrder,
};
use crate::services::metrics::QueryTimer;
use chrono::{DateTime, Utc};
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const ORDER_COLUMNS: &str = "order_id, client_id, description, items, created_utc, delivery_date, \
     service_status, payment_status, total, amount_paid, payment_method, photos";

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "order-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Pool that connects on first use. Lets routers be exercised without a server.
    pub fn connect_lazy(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(2))
            .connect_lazy(database_url)
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Invalid database url: {}", e)))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Current database time.
    #[instrument(skip(self))]
    pub async fn now(&self) -> Result<DateTime<Utc>, AppError> {
        sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Time probe failed: {}", e)))
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Client Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        let timer = QueryTimer::start("list_clients");

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT client_id, name, phone, cpf, created_utc
            FROM clients
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list clients: {}", e)))?;

        timer.observe_duration();
        Ok(clients)
    }

    #[instrument(skip(self), fields(client_id = %client_id))]
    pub async fn get_client(&self, client_id: Uuid) -> Result<Option<Client>, AppError> {
        let timer = QueryTimer::start("get_client");

        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT client_id, name, phone, cpf, created_utc
            FROM clients
            WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get client: {}", e)))?;

        timer.observe_duration();
        Ok(client)
    }

    #[instrument(skip(self, input))]
    pub async fn create_client(&self, input: &WriteClient) -> Result<Client, AppError> {
        let timer = QueryTimer::start("create_client");

        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (client_id, name, phone, cpf)
            VALUES ($1, $2, $3, $4)
            RETURNING client_id, name, phone, cpf, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.cpf)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create client: {}", e)))?;

        timer.observe_duration();
        info!(client_id = %client.client_id, "Client created");
        Ok(client)
    }

    /// Replace a client's fields. `None` when the id does not exist.
    #[instrument(skip(self, input), fields(client_id = %client_id))]
    pub async fn update_client(
        &self,
        client_id: Uuid,
        input: &WriteClient,
    ) -> Result<Option<Client>, AppError> {
        let timer = QueryTimer::start("update_client");

        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = $2, phone = $3, cpf = $4
            WHERE client_id = $1
            RETURNING client_id, name, phone, cpf, created_utc
            "#,
        )
        .bind(client_id)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.cpf)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update client: {}", e)))?;

        timer.observe_duration();
        Ok(client)
    }

    #[instrument(skip(self), fields(client_id = %client_id))]
    pub async fn count_orders_for_client(&self, client_id: Uuid) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE client_id = $1")
            .bind(client_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count orders: {}", e)))
    }

    /// Delete a client that has no orders.
    ///
    /// Refused with `Conflict` when any order references the client, either
    /// found by the check or raised by the foreign key on a racing insert.
    /// Deleting an unknown id is a no-op.
    #[instrument(skip(self), fields(client_id = %client_id))]
    pub async fn delete_client(&self, client_id: Uuid) -> Result<(), AppError> {
        let timer = QueryTimer::start("delete_client");

        let linked = self.count_orders_for_client(client_id).await?;
        if linked > 0 {
            warn!(linked_orders = linked, "Refusing to delete client with orders");
            return Err(linked_orders_error());
        }

        sqlx::query("DELETE FROM clients WHERE client_id = $1")
            .bind(client_id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    linked_orders_error()
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to delete client: {}", e)),
            })?;

        timer.observe_duration();
        info!("Client deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Service Catalog Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_services(&self) -> Result<Vec<CatalogService>, AppError> {
        let timer = QueryTimer::start("list_services");

        let services = sqlx::query_as::<_, CatalogService>(
            r#"
            SELECT service_id, name, price, created_utc
            FROM catalog_services
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list services: {}", e)))?;

        timer.observe_duration();
        Ok(services)
    }

    #[instrument(skip(self, input))]
    pub async fn create_service(
        &self,
        input: &CreateCatalogService,
    ) -> Result<CatalogService, AppError> {
        let timer = QueryTimer::start("create_service");

        let service = sqlx::query_as::<_, CatalogService>(
            r#"
            INSERT INTO catalog_services (service_id, name, price)
            VALUES ($1, $2, $3)
            RETURNING service_id, name, price, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create service: {}", e)))?;

        timer.observe_duration();
        info!(service_id = %service.service_id, "Catalog service created");
        Ok(service)
    }

    /// Catalog entries are copied into line items, so deletion is unconditional.
    #[instrument(skip(self), fields(service_id = %service_id))]
    pub async fn delete_service(&self, service_id: Uuid) -> Result<(), AppError> {
        let timer = QueryTimer::start("delete_service");

        sqlx::query("DELETE FROM catalog_services WHERE service_id = $1")
            .bind(service_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete service: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Order Operations
    // -------------------------------------------------------------------------

    /// All orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        let timer = QueryTimer::start("list_orders");

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders ORDER BY created_utc DESC",
            ORDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list orders: {}", e)))?;

        timer.observe_duration();
        Ok(orders)
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, AppError> {
        let timer = QueryTimer::start("get_order");

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE order_id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get order: {}", e)))?;

        timer.observe_duration();
        Ok(order)
    }

    /// Persist a new order exactly as submitted.
    #[instrument(skip(self, input), fields(client_id = %input.client_id))]
    pub async fn create_order(&self, input: &WriteOrder) -> Result<Order, AppError> {
        let timer = QueryTimer::start("create_order");

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (order_id, client_id, description, items, delivery_date,
                service_status, payment_status, total, amount_paid, payment_method, photos)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(input.client_id)
        .bind(&input.description)
        .bind(Json(&input.items))
        .bind(input.delivery_date)
        .bind(input.service_status.as_str())
        .bind(input.payment_status.as_str())
        .bind(input.total)
        .bind(input.amount_paid)
        .bind(&input.payment_method)
        .bind(&input.photos)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| order_write_error(e, input.client_id, "create"))?;

        timer.observe_duration();
        info!(
            order_id = %order.order_id,
            payment_status = %order.payment_status,
            "Order created"
        );
        Ok(order)
    }

    /// Full-record replacement, last write wins. `None` when the id does not exist.
    #[instrument(skip(self, input), fields(order_id = %order_id))]
    pub async fn replace_order(
        &self,
        order_id: Uuid,
        input: &WriteOrder,
    ) -> Result<Option<Order>, AppError> {
        let timer = QueryTimer::start("replace_order");

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET client_id = $2, description = $3, items = $4, delivery_date = $5,
                service_status = $6, payment_status = $7, total = $8, amount_paid = $9,
                payment_method = $10, photos = $11
            WHERE order_id = $1
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .bind(input.client_id)
        .bind(&input.description)
        .bind(Json(&input.items))
        .bind(input.delivery_date)
        .bind(input.service_status.as_str())
        .bind(input.payment_status.as_str())
        .bind(input.total)
        .bind(input.amount_paid)
        .bind(&input.payment_method)
        .bind(&input.photos)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| order_write_error(e, input.client_id, "update"))?;

        timer.observe_duration();
        Ok(order)
    }

    /// Set the service status to `RETIRADO`. Idempotent.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn mark_withdrawn(&self, order_id: Uuid) -> Result<Option<Order>, AppError> {
        let timer = QueryTimer::start("mark_withdrawn");

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET service_status = 'RETIRADO' WHERE order_id = $1 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to mark withdrawn: {}", e)))?;

        timer.observe_duration();
        Ok(order)
    }

    /// Set `PAGO` and `amount_paid = total` regardless of amounts. Idempotent.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn mark_paid(&self, order_id: Uuid) -> Result<Option<Order>, AppError> {
        let timer = QueryTimer::start("mark_paid");

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET payment_status = 'PAGO', amount_paid = total
            WHERE order_id = $1
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to mark paid: {}", e)))?;

        timer.observe_duration();
        Ok(order)
    }

    // -------------------------------------------------------------------------
    // User Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let timer = QueryTimer::start("list_users");

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, password_hash, name, role, created_utc
            FROM users
            ORDER BY username ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list users: {}", e)))?;

        timer.observe_duration();
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let timer = QueryTimer::start("get_user_by_username");

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, username, password_hash, name, role, created_utc
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get user: {}", e)))?;

        timer.observe_duration();
        Ok(user)
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: &CreateUser) -> Result<User, AppError> {
        let timer = QueryTimer::start("create_user");

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, username, password_hash, name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id, username, password_hash, name, role, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(&input.name)
        .bind(input.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "User '{}' already exists",
                    input.username
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create user: {}", e)),
        })?;

        timer.observe_duration();
        info!(user_id = %user.user_id, role = %user.role, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, username: &str) -> Result<(), AppError> {
        let timer = QueryTimer::start("delete_user");

        sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete user: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }

    /// Returns false when no such user exists.
    #[instrument(skip(self, password_hash))]
    pub async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let timer = QueryTimer::start("update_password");

        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE username = $1")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update password: {}", e)))?;

        timer.observe_duration();
        Ok(result.rows_affected() > 0)
    }

    /// Insert the user unless the username is taken. Returns whether a row was added.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user_if_missing(&self, input: &CreateUser) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (user_id, username, password_hash, name, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (username) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(&input.name)
        .bind(input.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to bootstrap user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Settings Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_settings(&self) -> Result<Vec<(String, String)>, AppError> {
        let timer = QueryTimer::start("list_settings");

        let rows = sqlx::query_as::<_, (String, String)>("SELECT key, value FROM settings")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list settings: {}", e)))?;

        timer.observe_duration();
        Ok(rows)
    }

    /// Upsert one key. Bulk writes call this per key without a transaction.
    #[instrument(skip(self, value))]
    pub async fn upsert_setting(&self, key: &str, value: &str) -> Result<(), AppError> {
        let timer = QueryTimer::start("upsert_setting");

        sqlx::query(
            r#"
            INSERT INTO settings (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to save setting: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }
}

fn linked_orders_error() -> AppError {
    AppError::Conflict(anyhow::anyhow!(
        "Não é possível excluir cliente com pedidos vinculados."
    ))
}

fn order_write_error(e: sqlx::Error, client_id: Uuid, action: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::BadRequest(anyhow::anyhow!("Client {} does not exist", client_id))
        }
        _ => AppError::DatabaseError(anyhow::anyhow!("Failed to {} order: {}", action, e)),
    }
}
