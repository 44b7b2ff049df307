//! Postgres access to the `finance` table

use crate::error::Result;
use agent_utils::mask_secret;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use tracing::{debug, info};

/// Access classification of rows visible to row-restricted users
pub const RESTRICTED: &str = "restricted";
/// Access classification of every other row
pub const PUBLIC: &str = "public";

const CREATE_TABLE: &str = "CREATE TABLE finance (
    id SERIAL PRIMARY KEY,
    company TEXT NOT NULL,
    revenue REAL NOT NULL,
    profit REAL NOT NULL,
    stock_price REAL NOT NULL,
    user_role TEXT NOT NULL
)";

/// A row of the finance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FinanceRecord {
    pub id: i32,
    pub company: String,
    #[serde(serialize_with = "serialize_real")]
    pub revenue: f32,
    #[serde(serialize_with = "serialize_real")]
    pub profit: f32,
    #[serde(serialize_with = "serialize_real")]
    pub stock_price: f32,
    /// Access classification, `restricted` or `public`
    pub user_role: String,
}

/// The company / stock price projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LimitedFinanceRecord {
    pub company: String,
    #[serde(serialize_with = "serialize_real")]
    pub stock_price: f32,
}

/// Write a `REAL` as the shortest decimal that reads back as the same `f32`
///
/// Widening to `f64` directly would expose the binary expansion
/// (`2801.12` becomes `2801.1201171875`).
fn serialize_real<S>(value: &f32, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let decimal = value
        .to_string()
        .parse::<f64>()
        .unwrap_or_else(|_| f64::from(*value));
    serializer.serialize_f64(decimal)
}

/// A row to insert when seeding
#[derive(Debug, Clone, PartialEq)]
pub struct NewFinanceRecord {
    pub company: &'static str,
    pub revenue: f32,
    pub profit: f32,
    pub stock_price: f32,
    pub user_role: &'static str,
}

impl NewFinanceRecord {
    const fn new(
        company: &'static str,
        revenue: f32,
        profit: f32,
        stock_price: f32,
        user_role: &'static str,
    ) -> Self {
        Self {
            company,
            revenue,
            profit,
            stock_price,
            user_role,
        }
    }
}

/// The ten sample companies written by `seed`
pub fn sample_records() -> Vec<NewFinanceRecord> {
    vec![
        NewFinanceRecord::new("IBM", 75000.0, 5000.0, 145.32, RESTRICTED),
        NewFinanceRecord::new("Apple", 394_000.0, 99900.0, 179.95, RESTRICTED),
        NewFinanceRecord::new("Microsoft", 211_000.0, 72000.0, 314.10, RESTRICTED),
        NewFinanceRecord::new("Google", 280_000.0, 76000.0, 2801.12, RESTRICTED),
        NewFinanceRecord::new("Amazon", 502_000.0, 33000.0, 142.92, RESTRICTED),
        NewFinanceRecord::new("Meta", 117_000.0, 39000.0, 302.56, RESTRICTED),
        NewFinanceRecord::new("Tesla", 123_000.0, 15500.0, 199.35, PUBLIC),
        NewFinanceRecord::new("Netflix", 35000.0, 5400.0, 412.75, PUBLIC),
        NewFinanceRecord::new("Nvidia", 26000.0, 9600.0, 450.99, PUBLIC),
        NewFinanceRecord::new("Samsung", 244_000.0, 41000.0, 70.10, PUBLIC),
    ]
}

/// Finance queries over a shared connection pool
#[derive(Debug, Clone)]
pub struct FinanceStore {
    pool: PgPool,
}

impl FinanceStore {
    /// Create a store whose pool connects on first use
    pub fn connect_lazy(database_url: &str, acquire_timeout: Duration) -> Result<Self> {
        info!(database = %mask_secret(database_url), "Configuring finance database pool");

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(acquire_timeout)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Every column of every row
    pub async fn fetch_all(&self) -> Result<Vec<FinanceRecord>> {
        let rows = sqlx::query_as::<_, FinanceRecord>("SELECT * FROM finance ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        debug!(rows = rows.len(), "Fetched full finance data");
        Ok(rows)
    }

    /// Company and stock price of every row
    pub async fn fetch_limited(&self) -> Result<Vec<LimitedFinanceRecord>> {
        let rows = sqlx::query_as::<_, LimitedFinanceRecord>(
            "SELECT company, stock_price FROM finance ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        debug!(rows = rows.len(), "Fetched limited finance data");
        Ok(rows)
    }

    /// Every column of the rows with the given access classification
    pub async fn fetch_row_restricted(&self, user_role: &str) -> Result<Vec<FinanceRecord>> {
        let rows = sqlx::query_as::<_, FinanceRecord>(
            "SELECT * FROM finance WHERE user_role = $1 ORDER BY id",
        )
        .bind(user_role)
        .fetch_all(&self.pool)
        .await?;
        debug!(rows = rows.len(), user_role, "Fetched row restricted finance data");
        Ok(rows)
    }

    /// Every column of one company's rows
    pub async fn fetch_company(&self, company: &str) -> Result<Vec<FinanceRecord>> {
        let rows = sqlx::query_as::<_, FinanceRecord>(
            "SELECT * FROM finance WHERE company = $1 ORDER BY id",
        )
        .bind(company)
        .fetch_all(&self.pool)
        .await?;
        debug!(rows = rows.len(), company, "Fetched company finance data");
        Ok(rows)
    }

    /// Drop, recreate and populate the table in one transaction
    ///
    /// Returns the number of rows inserted.
    pub async fn seed(&self, records: &[NewFinanceRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DROP TABLE IF EXISTS finance")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;

        let inserted = if records.is_empty() {
            0
        } else {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO finance (company, revenue, profit, stock_price, user_role) ",
            );
            builder.push_values(records, |mut row, record| {
                row.push_bind(record.company)
                    .push_bind(record.revenue)
                    .push_bind(record.profit)
                    .push_bind(record.stock_price)
                    .push_bind(record.user_role);
            });
            builder.build().execute(&mut *tx).await?.rows_affected()
        };

        tx.commit().await?;
        info!(rows = inserted, "Finance table seeded");
        Ok(inserted)
    }
}
