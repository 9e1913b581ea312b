use sqlx::{self, postgres::PgRow, FromRow, PgPool};

/// Read-only accessor for a whole table, returned in a fixed order.
pub struct Repository<T> {
    table_name: &'static str,
    order_by: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    /// Table and column names are compile-time constants, never user input.
    pub fn new(table_name: &'static str, order_by: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            order_by,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn select_sql(&self) -> String {
        format!(
            "SELECT * FROM \"{}\" ORDER BY \"{}\"",
            self.table_name, self.order_by
        )
    }

    pub async fn select_all(&self) -> Result<Vec<T>, sqlx::Error> {
        sqlx::query_as::<_, T>(&self.select_sql())
            .fetch_all(&self.pool)
            .await
    }
}
