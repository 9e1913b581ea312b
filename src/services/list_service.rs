use sqlx::PgPool;

use super::ServiceError;
use crate::database::models::{Responsible, Secretary, Status};
use crate::database::Repository;

/// Unfiltered reads of the reference tables
#[derive(Clone)]
pub struct ListService {
    pool: PgPool,
}

impl ListService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn statuses(&self) -> Result<Vec<Status>, ServiceError> {
        Ok(Repository::<Status>::new("status", "order_num", self.pool.clone())
            .select_all()
            .await?)
    }

    pub async fn responsibles(&self) -> Result<Vec<Responsible>, ServiceError> {
        Ok(Repository::<Responsible>::new("responsibles", "name", self.pool.clone())
            .select_all()
            .await?)
    }

    pub async fn secretaries(&self) -> Result<Vec<Secretary>, ServiceError> {
        Ok(Repository::<Secretary>::new("secretaries", "name", self.pool.clone())
            .select_all()
            .await?)
    }
}
