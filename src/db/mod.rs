//! Storage layer for client info records.
//!
//! Exposes a backend-agnostic [`ClientStore`] trait with one method per SQL
//! statement. The PostgreSQL implementation lives in [`postgres`]; tests
//! substitute in-memory implementations. Handlers receive the store as
//! `Arc<dyn ClientStore>` so nothing reaches a module-level singleton.

pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::DatabaseError;

/// Create the PostgreSQL backend from configuration, run migrations, and
/// return it behind the trait object handlers consume.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn ClientStore>, DatabaseError> {
    let backend = postgres::PgBackend::new(config)?;
    backend.run_migrations().await?;
    Ok(Arc::new(backend))
}

/// A stored `client_info` row.
///
/// `name` holds the canonical (trimmed, lowercased) form; `id` is generated
/// at insertion and never leaves the process.
#[derive(Debug, Clone)]
pub struct ClientRecord {
    pub id: Uuid,
    pub name: String,
    pub age: Option<i32>,
    pub occupation: Option<String>,
    pub income: Option<Decimal>,
    pub marital_status: Option<String>,
    pub dependencies: Option<i32>,
    pub financial_goal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The six non-key attributes bound by the INSERT and UPDATE statements.
///
/// `None` binds as SQL NULL. Update overwrites all six unconditionally, so a
/// field omitted from the request becomes NULL rather than staying at its
/// prior value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientAttributes {
    pub age: Option<i32>,
    pub occupation: Option<String>,
    pub income: Option<Decimal>,
    pub marital_status: Option<String>,
    pub dependencies: Option<i32>,
    pub financial_goal: Option<String>,
}

/// Persistence operations for client info records.
///
/// Every method executes exactly one parameterized statement. The `name`
/// arguments are canonical keys; callers normalize before invoking. Zero
/// matched rows is a normal outcome (the count / `None` return), never an
/// error.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Insert a new record and return the generated id.
    async fn insert_client_info(
        &self,
        name: &str,
        attrs: &ClientAttributes,
    ) -> Result<Uuid, DatabaseError>;

    /// Overwrite the six attributes of every record matching `name`.
    /// Returns the number of rows updated.
    async fn update_client_info(
        &self,
        name: &str,
        attrs: &ClientAttributes,
    ) -> Result<u64, DatabaseError>;

    /// Delete every record matching `name`. Returns the number of rows
    /// deleted.
    async fn delete_client_info(&self, name: &str) -> Result<u64, DatabaseError>;

    /// Fetch the earliest-created record matching `name`, if any.
    async fn find_client_info(&self, name: &str) -> Result<Option<ClientRecord>, DatabaseError>;
}

/// Canonical lookup key for a client name: trimmed and lowercased.
///
/// Applied to the name before every statement that inserts or matches one,
/// so lookup is insensitive to casing and to leading/trailing whitespace.
/// Idempotent.
pub fn normalize_client_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Presentation form of a stored canonical name: the first letter of each
/// whitespace-delimited word uppercased, every other character lowercased.
/// Interior whitespace is kept as stored. Idempotent.
pub fn display_client_name(stored: &str) -> String {
    let mut out = String::with_capacity(stored.len());
    let mut at_word_start = true;

    for ch in stored.chars() {
        if ch.is_whitespace() {
            out.push(ch);
            at_word_start = true;
        } else if at_word_start {
            out.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_client_name("  Jane Doe  "), "jane doe");
        assert_eq!(normalize_client_name("JANE DOE"), "jane doe");
        assert_eq!(normalize_client_name("jane doe"), "jane doe");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["  Jane Doe  ", "ÁGUEDA LÓPEZ", "o'brien-smith", "x"] {
            let once = normalize_client_name(raw);
            assert_eq!(normalize_client_name(&once), once);
        }
    }

    #[test]
    fn normalize_keeps_interior_whitespace() {
        assert_eq!(normalize_client_name(" Jane  Doe "), "jane  doe");
    }

    #[test]
    fn display_capitalizes_each_word() {
        assert_eq!(display_client_name("jane doe"), "Jane Doe");
        assert_eq!(
            display_client_name("jean-luc de la cruz"),
            "Jean-luc De La Cruz"
        );
    }

    #[test]
    fn display_is_stable_on_canonical_input() {
        for stored in ["jane doe", "a b c", "o'brien", "águeda lópez"] {
            let once = display_client_name(stored);
            assert_eq!(display_client_name(&once), once);
        }
    }

    #[test]
    fn display_preserves_whitespace_shape() {
        assert_eq!(display_client_name("jane  doe"), "Jane  Doe");
        assert_eq!(display_client_name(""), "");
    }

    #[test]
    fn round_trip_submitted_name_displays_title_case() {
        let stored = normalize_client_name("  Jane Doe  ");
        assert_eq!(stored, normalize_client_name("JANE DOE"));
        assert_eq!(display_client_name(&stored), "Jane Doe");
    }
}
