//! Name-keyed resolution of reference rows inside a write transaction.
//!
//! Responsibles and secretaries are upserted by exact (case-sensitive) name.
//! Statuses are looked up only; an unknown status name resolves to `None`.

use sqlx::PgConnection;

/// Reference tables that accept lazily-created rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertTable {
    Responsibles,
    Secretaries,
}

impl UpsertTable {
    fn table_name(self) -> &'static str {
        match self {
            UpsertTable::Responsibles => "responsibles",
            UpsertTable::Secretaries => "secretaries",
        }
    }
}

/// Lookup-or-insert by name, returning the row id either way
pub async fn upsert_by_name(
    conn: &mut PgConnection,
    table: UpsertTable,
    name: &str,
) -> Result<i32, sqlx::Error> {
    let select = format!("SELECT id FROM {} WHERE name = $1", table.table_name());
    if let Some(id) = sqlx::query_scalar::<_, i32>(&select)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?
    {
        return Ok(id);
    }

    // A concurrent writer may have inserted the same name since the lookup.
    let insert = format!(
        "INSERT INTO {} (name) VALUES ($1) \
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name \
         RETURNING id",
        table.table_name()
    );
    let id = sqlx::query_scalar::<_, i32>(&insert)
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    tracing::debug!("Created {} row '{}' with id {}", table.table_name(), name, id);
    Ok(id)
}

pub async fn find_status_id(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT id FROM status WHERE name = $1")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
}
