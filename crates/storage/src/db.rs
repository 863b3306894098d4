use chrono::NaiveDateTime;
use paysnap_core::ExtractionResult;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;

pub type DbPool = Pool<Sqlite>;

/// A stored extraction. Sentinel values are stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PaymentRecord {
    pub id: i64,
    pub amount: String,
    pub upi_id: String,
    pub date: String,
    pub raw_text: String,
    pub image_hash: Option<String>,
    pub created_at: NaiveDateTime,
}

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;
    tracing::debug!(path = %path.display(), "database ready");

    Ok(pool)
}

/// Private in-memory database, for tests and throwaway runs.
pub async fn create_memory_db() -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS payments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount TEXT NOT NULL,
            upi_id TEXT NOT NULL,
            date TEXT NOT NULL,
            raw_text TEXT NOT NULL,
            image_hash TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_payments_image_hash ON payments(image_hash)")
        .execute(pool)
        .await?;

    Ok(())
}

const SELECT_PAYMENT: &str =
    "SELECT id, amount, upi_id, date, raw_text, image_hash, created_at FROM payments";

pub async fn insert_payment(
    pool: &DbPool,
    result: &ExtractionResult,
    image_hash: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "INSERT INTO payments (amount, upi_id, date, raw_text, image_hash) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&result.amount)
    .bind(&result.upi_id)
    .bind(&result.date)
    .bind(&result.raw_text)
    .bind(image_hash)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

pub async fn get_payment_by_id(pool: &DbPool, id: i64) -> Result<Option<PaymentRecord>, sqlx::Error> {
    let sql = format!("{SELECT_PAYMENT} WHERE id = ?");
    sqlx::query_as::<_, PaymentRecord>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// All payments, oldest first.
pub async fn get_all_payments(pool: &DbPool) -> Result<Vec<PaymentRecord>, sqlx::Error> {
    let sql = format!("{SELECT_PAYMENT} ORDER BY id");
    sqlx::query_as::<_, PaymentRecord>(&sql)
        .fetch_all(pool)
        .await
}

/// Earliest payment stored for the same image, if any.
pub async fn find_payment_by_hash(
    pool: &DbPool,
    image_hash: &str,
) -> Result<Option<PaymentRecord>, sqlx::Error> {
    let sql = format!("{SELECT_PAYMENT} WHERE image_hash = ? ORDER BY id LIMIT 1");
    sqlx::query_as::<_, PaymentRecord>(&sql)
        .bind(image_hash)
        .fetch_optional(pool)
        .await
}

/// Returns whether a row was deleted.
pub async fn delete_payment(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
    let done = sqlx::query("DELETE FROM payments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(done.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paysnap_core::NOT_FOUND;

    fn result(amount: Option<&str>, upi: Option<&str>) -> ExtractionResult {
        ExtractionResult::new(
            amount.map(String::from),
            upi.map(String::from),
            None,
            "₹500 ravi@okaxis".to_string(),
        )
    }

    #[tokio::test]
    async fn insert_and_fetch_roundtrip() {
        let pool = create_memory_db().await.unwrap();
        let id = insert_payment(&pool, &result(Some("500"), Some("ravi@okaxis")), Some("abc"))
            .await
            .unwrap();

        let record = get_payment_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(record.amount, "500");
        assert_eq!(record.upi_id, "ravi@okaxis");
        assert_eq!(record.date, NOT_FOUND);
        assert_eq!(record.raw_text, "₹500 ravi@okaxis");
        assert_eq!(record.image_hash.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        let pool = create_memory_db().await.unwrap();
        assert!(get_payment_by_id(&pool, 42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn history_is_oldest_first() {
        let pool = create_memory_db().await.unwrap();
        let first = insert_payment(&pool, &result(Some("10"), None), None).await.unwrap();
        let second = insert_payment(&pool, &result(Some("20"), None), None).await.unwrap();

        let all = get_all_payments(&pool).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(all[1].amount, "20");
    }

    #[tokio::test]
    async fn find_by_hash_returns_earliest() {
        let pool = create_memory_db().await.unwrap();
        let first = insert_payment(&pool, &result(Some("10"), None), Some("h1")).await.unwrap();
        insert_payment(&pool, &result(Some("10"), None), Some("h1")).await.unwrap();
        insert_payment(&pool, &result(None, None), None).await.unwrap();

        let found = find_payment_by_hash(&pool, "h1").await.unwrap().unwrap();
        assert_eq!(found.id, first);
        assert!(find_payment_by_hash(&pool, "h2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let pool = create_memory_db().await.unwrap();
        let id = insert_payment(&pool, &result(None, None), None).await.unwrap();
        assert!(delete_payment(&pool, id).await.unwrap());
        assert!(!delete_payment(&pool, id).await.unwrap());
        assert!(get_all_payments(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_database_persists_across_pools() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payments.db");

        let pool = create_db(&path).await.unwrap();
        insert_payment(&pool, &result(Some("77"), None), None).await.unwrap();
        pool.close().await;

        let pool = create_db(&path).await.unwrap();
        let all = get_all_payments(&pool).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, "77");
    }
}
