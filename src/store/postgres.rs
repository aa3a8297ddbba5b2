//! PostgreSQL cart store.
//!
//! Columns are `BIGINT`, so ids and quantities travel as `i64`. An add whose values
//! do not fit is refused before any statement runs. Deletes and reads for a key
//! outside that range touch nothing: no such row can exist.

use super::{CartStore, StoreError};
use crate::model::{CartLine, SkuId, UserId};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{query, Row};
use tracing::{debug, instrument};

const CREATE_TABLE_SQL: &str = include_str!("sql/create_table.sql");
const ADD_ITEM_SQL: &str = include_str!("sql/add_item.sql");
const DELETE_ITEM_SQL: &str = include_str!("sql/delete_item.sql");
const CLEAR_CART_SQL: &str = include_str!("sql/clear_cart.sql");
const GET_CART_SQL: &str = include_str!("sql/get_cart.sql");

#[derive(Debug, Clone)]
pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool for `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(map_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `cart` table when it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;
        Ok(())
    }
}

fn map_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(e.to_string())
        }
        other => StoreError::Backend(other.to_string()),
    }
}

fn to_sql(value: u64, what: &str) -> Result<i64, StoreError> {
    i64::try_from(value).map_err(|_| StoreError::Rejected(format!("{what} {value} out of range")))
}

/// `None` when `value` cannot be a stored key.
fn key_to_sql(value: u64) -> Option<i64> {
    i64::try_from(value).ok()
}

fn from_sql(value: i64, what: &str) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::Backend(format!("negative {what} {value} in store")))
}

fn line_from_row(row: &PgRow) -> Result<CartLine, StoreError> {
    let sku_id: i64 = row.try_get("sku_id").map_err(map_error)?;
    let count: i64 = row.try_get("count").map_err(map_error)?;
    Ok(CartLine::new(
        SkuId(from_sql(sku_id, "sku_id")?),
        from_sql(count, "count")?,
    ))
}

#[async_trait]
impl CartStore for PgCartStore {
    #[instrument(skip(self))]
    async fn add_item(&self, user_id: UserId, sku_id: SkuId, count: u64) -> Result<(), StoreError> {
        if count == 0 {
            return Err(StoreError::Rejected(format!("Invalid quantity 0 for {sku_id}")));
        }
        // Overflow past BIGINT surfaces as a numeric-range error from the database.
        query(ADD_ITEM_SQL)
            .bind(to_sql(user_id.0, "user_id")?)
            .bind(to_sql(sku_id.0, "sku_id")?)
            .bind(to_sql(count, "count")?)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_item(&self, user_id: UserId, sku_id: SkuId) -> Result<(), StoreError> {
        let (Some(user), Some(sku)) = (key_to_sql(user_id.0), key_to_sql(sku_id.0)) else {
            debug!("Key outside BIGINT range, nothing to delete");
            return Ok(());
        };
        let rows_affected = query(DELETE_ITEM_SQL)
            .bind(user)
            .bind(sku)
            .execute(&self.pool)
            .await
            .map_err(map_error)?
            .rows_affected();
        debug!(rows_affected, "Item deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self, user_id: UserId) -> Result<(), StoreError> {
        let Some(user) = key_to_sql(user_id.0) else {
            return Ok(());
        };
        let rows_affected = query(CLEAR_CART_SQL)
            .bind(user)
            .execute(&self.pool)
            .await
            .map_err(map_error)?
            .rows_affected();
        debug!(rows_affected, "Cart cleared");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartLine>, StoreError> {
        let Some(user) = key_to_sql(user_id.0) else {
            return Ok(Vec::new());
        };
        let rows = query(GET_CART_SQL)
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .map_err(map_error)?;
        rows.iter().map(line_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bigint_conversions() {
        assert_eq!(to_sql(42, "user_id"), Ok(42));
        assert!(matches!(to_sql(u64::MAX, "count"), Err(StoreError::Rejected(_))));
        assert_eq!(from_sql(7, "count"), Ok(7));
        assert!(matches!(from_sql(-1, "count"), Err(StoreError::Backend(_))));
    }

    /// A pool that would fail on first use; the calls below must never reach it.
    fn unreachable_store() -> PgCartStore {
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(50))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        PgCartStore::new(pool)
    }

    #[tokio::test]
    async fn test_out_of_range_keys_hold_nothing() {
        let store = unreachable_store();
        let big = 1u64 << 63;

        assert_eq!(store.clear_cart(UserId(big)).await, Ok(()));
        assert_eq!(store.delete_item(UserId(1), SkuId(big)).await, Ok(()));
        assert_eq!(store.delete_item(UserId(big), SkuId(1)).await, Ok(()));
        assert_eq!(store.get_cart(UserId(big)).await, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_out_of_range_add_is_rejected() {
        let store = unreachable_store();
        let result = store.add_item(UserId(1 << 63), SkuId(1), 1).await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));
    }

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(map_error(sqlx::Error::PoolTimedOut), StoreError::Unavailable(_)));
        assert!(matches!(map_error(sqlx::Error::RowNotFound), StoreError::Backend(_)));
    }
}
