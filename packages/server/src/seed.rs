use sea_orm::*;
use tracing::info;

/// Byte-wise index on the search key. Matches the `COLLATE "C"` used by
/// catalog queries, so it serves both `LIKE 'prefix%'` and the name ordering.
pub(crate) const NAME_INDEX_SQL: &str = r#"CREATE INDEX IF NOT EXISTS idx_pizza_normalized_name_c ON "pizza" ("normalized_name" COLLATE "C")"#;

/// Create secondary indexes that schema sync does not manage.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // SELECT ... FROM pizza WHERE normalized_name COLLATE "C" LIKE 'cal%'
    // ORDER BY normalized_name COLLATE "C"
    match db.execute_unprepared(NAME_INDEX_SQL).await {
        Ok(_) => {
            info!("Ensured index idx_pizza_normalized_name_c exists");
        }
        Err(e) => {
            tracing::warn!("Failed to create index idx_pizza_normalized_name_c: {}", e);
        }
    }

    Ok(())
}
