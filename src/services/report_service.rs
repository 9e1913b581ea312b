use sqlx::PgPool;

use super::{begin_snapshot, ServiceError};
use crate::database::models::{
    CountByModality, CountByMonth, CountByResponsible, CountBySecretary, StatusCount, Summary,
};

// Left joins keep zero-count reference rows in every breakdown.
const STATUS_BREAKDOWN_SQL: &str = "SELECT s.name AS status, COUNT(p.id) AS total \
     FROM status s \
     LEFT JOIN processes p ON s.id = p.status_id \
     GROUP BY s.id, s.name, s.order_num \
     ORDER BY s.order_num, s.id";

const TOTAL_SQL: &str = "SELECT COUNT(*) FROM processes";

const BY_RESPONSIBLE_SQL: &str = "SELECT r.name AS responsible, COUNT(p.id) AS total \
     FROM responsibles r \
     LEFT JOIN processes p ON r.id = p.responsible_id \
     GROUP BY r.id, r.name \
     ORDER BY total DESC, r.name";

const BY_MODALITY_SQL: &str = "SELECT modality, COUNT(*) AS total \
     FROM processes \
     WHERE modality IS NOT NULL \
     GROUP BY modality \
     ORDER BY total DESC, modality";

const BY_MONTH_SQL: &str = "SELECT TO_CHAR(opening_date, 'YYYY-MM') AS month, COUNT(*) AS total \
     FROM processes \
     GROUP BY month \
     ORDER BY month";

// DISTINCT: a process joined twice to one secretary counts once.
const BY_SECRETARY_SQL: &str = "SELECT s.name AS secretary, COUNT(DISTINCT ps.process_id) AS total \
     FROM secretaries s \
     LEFT JOIN participating_secretaries ps ON s.id = ps.secretary_id \
     GROUP BY s.id, s.name \
     ORDER BY total DESC, s.name";

/// Read-only aggregates over processes
#[derive(Clone)]
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One entry per status, in workflow order, including empty statuses
    pub async fn status_breakdown(&self) -> Result<Vec<StatusCount>, ServiceError> {
        let rows = sqlx::query_as::<_, StatusCount>(STATUS_BREAKDOWN_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// All summary queries read from the same snapshot
    pub async fn summary(&self) -> Result<Summary, ServiceError> {
        let mut tx = begin_snapshot(&self.pool).await?;

        let total = sqlx::query_scalar::<_, i64>(TOTAL_SQL)
            .fetch_one(&mut *tx)
            .await?;
        let by_responsible = sqlx::query_as::<_, CountByResponsible>(BY_RESPONSIBLE_SQL)
            .fetch_all(&mut *tx)
            .await?;
        let by_modality = sqlx::query_as::<_, CountByModality>(BY_MODALITY_SQL)
            .fetch_all(&mut *tx)
            .await?;
        let by_month = sqlx::query_as::<_, CountByMonth>(BY_MONTH_SQL)
            .fetch_all(&mut *tx)
            .await?;
        let by_secretary = sqlx::query_as::<_, CountBySecretary>(BY_SECRETARY_SQL)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Summary {
            total,
            by_responsible,
            by_modality,
            by_month,
            by_secretary,
        })
    }
}
