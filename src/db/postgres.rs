//! PostgreSQL backend for the [`ClientStore`] trait.
//!
//! Built on `deadpool-postgres` + `tokio-postgres`. Every operation is a
//! single parameterized statement; values are always bound, never
//! interpolated.

use std::str::FromStr;

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::{ClientAttributes, ClientRecord, ClientStore};
use crate::error::DatabaseError;

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// PostgreSQL-backed client info store.
pub struct PgBackend {
    pool: Pool,
}

impl PgBackend {
    /// Build the connection pool from configuration. No connection is
    /// established until the first statement runs.
    pub fn new(config: &AppConfig) -> Result<Self, DatabaseError> {
        let pg_config = tokio_postgres::Config::from_str(&config.database_url)
            .map_err(|e| DatabaseError::Pool(format!("invalid DATABASE_URL: {e}")))?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );
        let pool = Pool::builder(manager)
            .max_size(config.pool_size)
            .build()
            .map_err(|e| DatabaseError::Pool(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Run the embedded schema migrations. Called once at startup.
    pub async fn run_migrations(&self) -> Result<(), DatabaseError> {
        let mut conn = self.conn().await?;
        embedded::migrations::runner()
            .run_async(&mut **conn)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;
        Ok(())
    }

    async fn conn(&self) -> Result<deadpool_postgres::Object, DatabaseError> {
        self.pool
            .get()
            .await
            .map_err(|e| DatabaseError::Pool(e.to_string()))
    }
}

fn row_to_client_record(row: &tokio_postgres::Row) -> ClientRecord {
    ClientRecord {
        id: row.get("id"),
        name: row.get("name"),
        age: row.get("age"),
        occupation: row.get("occupation"),
        income: row.get("income"),
        marital_status: row.get("marital_status"),
        dependencies: row.get("dependencies"),
        financial_goal: row.get("financial_goal"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ClientStore for PgBackend {
    async fn insert_client_info(
        &self,
        name: &str,
        attrs: &ClientAttributes,
    ) -> Result<Uuid, DatabaseError> {
        let conn = self.conn().await?;
        let row = conn
            .query_one(
                "INSERT INTO client_info \
                 (id, name, age, occupation, income, marital_status, dependencies, financial_goal) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 RETURNING id",
                &[
                    &Uuid::new_v4(),
                    &name,
                    &attrs.age,
                    &attrs.occupation,
                    &attrs.income,
                    &attrs.marital_status,
                    &attrs.dependencies,
                    &attrs.financial_goal,
                ],
            )
            .await?;
        Ok(row.get(0))
    }

    async fn update_client_info(
        &self,
        name: &str,
        attrs: &ClientAttributes,
    ) -> Result<u64, DatabaseError> {
        let conn = self.conn().await?;
        let updated = conn
            .execute(
                "UPDATE client_info SET \
                    age = $2, \
                    occupation = $3, \
                    income = $4, \
                    marital_status = $5, \
                    dependencies = $6, \
                    financial_goal = $7, \
                    updated_at = NOW() \
                 WHERE name = $1",
                &[
                    &name,
                    &attrs.age,
                    &attrs.occupation,
                    &attrs.income,
                    &attrs.marital_status,
                    &attrs.dependencies,
                    &attrs.financial_goal,
                ],
            )
            .await?;
        Ok(updated)
    }

    async fn delete_client_info(&self, name: &str) -> Result<u64, DatabaseError> {
        let conn = self.conn().await?;
        let deleted = conn
            .execute("DELETE FROM client_info WHERE name = $1", &[&name])
            .await?;
        Ok(deleted)
    }

    async fn find_client_info(&self, name: &str) -> Result<Option<ClientRecord>, DatabaseError> {
        let conn = self.conn().await?;
        let row = conn
            .query_opt(
                "SELECT id, name, age, occupation, income, marital_status, dependencies, financial_goal, created_at, updated_at \
                 FROM client_info \
                 WHERE name = $1 \
                 ORDER BY created_at, id \
                 LIMIT 1",
                &[&name],
            )
            .await?;
        Ok(row.as_ref().map(row_to_client_record))
    }
}
