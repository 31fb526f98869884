use async_trait::async_trait;
use common::{Email, Isbn, OrderId};
use domain::{Money, NewOrder, Order};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    Result, StoreError,
    store::OrderStore,
};

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url).await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: PgRow) -> Result<Order> {
        Ok(Order {
            id: OrderId::new(row.try_get("id")?),
            email: Email::new(row.try_get::<String, _>("email")?),
            isbn: Isbn::new(row.try_get::<String, _>("isbn")?),
            quantity: row.try_get::<i32, _>("quantity")? as u32,
            price: Money::from_cents(row.try_get("price_cents")?),
            completed: row.try_get("completed")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

const ORDER_COLUMNS: &str = "id, email, isbn, quantity, price_cents, completed, created_at";

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO orders (email, isbn, quantity, price_cents, completed)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(order.email.as_str())
        .bind(order.isbn.as_str())
        .bind(order.quantity as i32)
        .bind(order.price.cents())
        .bind(order.completed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Unique (email, isbn) violation
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some("orders_email_isbn_key")
            {
                return StoreError::DuplicateOrder {
                    email: order.email.clone(),
                    isbn: order.isbn.clone(),
                };
            }
            StoreError::Database(e)
        })?;

        Self::row_to_order(row)
    }

    async fn update(&self, order: &Order) -> Result<Order> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE orders
            SET email = $2, isbn = $3, quantity = $4, price_cents = $5, completed = $6
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(order.id.as_i64())
        .bind(order.email.as_str())
        .bind(order.isbn.as_str())
        .bind(order.quantity as i32)
        .bind(order.price.cents())
        .bind(order.completed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::OrderNotFound(order.id))?;

        Self::row_to_order(row)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE email = $1 ORDER BY id"
        ))
        .bind(email.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE isbn = $1 ORDER BY id"
        ))
        .bind(isbn.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn find_by_email_and_isbn(&self, email: &Email, isbn: &Isbn) -> Result<Option<Order>> {
        let row = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE email = $1 AND isbn = $2"
        ))
        .bind(email.as_str())
        .bind(isbn.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE completed = $1 ORDER BY id"
        ))
        .bind(completed)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY email ASC, created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn delete(&self, id: OrderId) -> Result<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::OrderNotFound(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        sqlx::query("DELETE FROM orders").execute(&self.pool).await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
