//! Process records and their multi-table writes.
//!
//! A process owns two detail sets: participating secretaries (join rows to
//! `secretaries`) and contract supervisors (plain names). Writes touching
//! more than one table run in a single transaction that is explicitly rolled
//! back on any failure.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::info;

use super::{begin_snapshot, rollback, ServiceError};
use crate::database::models::{Process, ProcessRow};
use crate::database::reference::{find_status_id, upsert_by_name, UpsertTable};

const PROCESS_SELECT: &str = "SELECT p.id, p.sd_number, p.opening_date, p.simplified_object, \
     p.modality, p.responsible_id, p.status_id, p.observations, p.created_at, p.updated_at, \
     r.name AS responsible_name, s.name AS status_name \
     FROM processes p \
     LEFT JOIN responsibles r ON p.responsible_id = r.id \
     LEFT JOIN status s ON p.status_id = s.id";

const PROCESS_NOT_FOUND: &str = "Process not found";

/// Create/update payload. Everything is optional on the wire; required
/// fields are checked per operation before any store access.
///
/// For the two lists, an absent (or `null`) value leaves existing rows alone
/// on update while an empty list clears them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessInput {
    pub sd_number: Option<String>,
    pub opening_date: Option<String>,
    pub simplified_object: Option<String>,
    pub modality: Option<String>,
    pub responsible: Option<String>,
    pub participating_secretaries: Option<Vec<String>>,
    pub contract_supervisors: Option<Vec<String>>,
    pub observations: Option<String>,
    pub status: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl ProcessInput {
    /// Both `simplified_object` and `opening_date` must be present.
    pub fn validate_for_create(&self) -> Result<NaiveDate, ServiceError> {
        if non_empty(&self.simplified_object).is_none() || non_empty(&self.opening_date).is_none() {
            return Err(ServiceError::validation(
                "Simplified object and opening date are required",
            ));
        }
        self.opening_date()?
            .ok_or_else(|| ServiceError::validation("Opening date is required"))
    }

    /// Accepts `YYYY-MM-DD`, or a date-time whose first ten characters are one.
    pub fn opening_date(&self) -> Result<Option<NaiveDate>, ServiceError> {
        let Some(raw) = non_empty(&self.opening_date) else {
            return Ok(None);
        };
        raw.get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .map(Some)
            .ok_or_else(|| ServiceError::validation(format!("Invalid opening date: {}", raw)))
    }

    pub fn responsible_name(&self) -> Option<&str> {
        non_empty(&self.responsible)
    }

    pub fn status_name(&self) -> Option<&str> {
        non_empty(&self.status)
    }
}

/// Optional equality filters for `list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessFilter {
    pub status_id: Option<i32>,
    pub responsible_id: Option<i32>,
}

impl ProcessFilter {
    /// Parse raw query values; empty strings count as absent.
    pub fn parse(status: Option<&str>, responsible: Option<&str>) -> Result<Self, ServiceError> {
        fn id(name: &str, value: Option<&str>) -> Result<Option<i32>, ServiceError> {
            match value.filter(|v| !v.is_empty()) {
                None => Ok(None),
                Some(v) => v
                    .parse::<i32>()
                    .map(Some)
                    .map_err(|_| ServiceError::validation(format!("Invalid {} filter: {}", name, v))),
            }
        }

        Ok(Self {
            status_id: id("status", status)?,
            responsible_id: id("responsible", responsible)?,
        })
    }
}

#[derive(Clone)]
pub struct ProcessService {
    pool: PgPool,
}

impl ProcessService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Newest first, with secretaries and supervisors attached
    pub async fn list(&self, filter: ProcessFilter) -> Result<Vec<Process>, ServiceError> {
        let mut query = QueryBuilder::<Postgres>::new(PROCESS_SELECT);
        let mut separator = " WHERE ";
        if let Some(status_id) = filter.status_id {
            query.push(separator).push("p.status_id = ").push_bind(status_id);
            separator = " AND ";
        }
        if let Some(responsible_id) = filter.responsible_id {
            query.push(separator).push("p.responsible_id = ").push_bind(responsible_id);
        }
        query.push(" ORDER BY p.opening_date DESC, p.id DESC");

        let mut tx = begin_snapshot(&self.pool).await?;
        let rows = query
            .build_query_as::<ProcessRow>()
            .fetch_all(&mut *tx)
            .await?;
        let processes = Self::attach_details(&mut tx, rows).await?;
        tx.commit().await?;

        Ok(processes)
    }

    pub async fn get(&self, id: i32) -> Result<Process, ServiceError> {
        let mut tx = begin_snapshot(&self.pool).await?;
        let row = sqlx::query_as::<_, ProcessRow>(&format!("{} WHERE p.id = $1", PROCESS_SELECT))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ServiceError::not_found(PROCESS_NOT_FOUND))?;

        let mut processes = Self::attach_details(&mut tx, vec![row]).await?;
        tx.commit().await?;

        processes
            .pop()
            .ok_or_else(|| ServiceError::not_found(PROCESS_NOT_FOUND))
    }

    /// Insert a process with its details; returns the new id
    pub async fn create(&self, input: ProcessInput) -> Result<i32, ServiceError> {
        let opening_date = input.validate_for_create()?;

        let mut tx = self.pool.begin().await?;
        match Self::insert_process(&mut tx, &input, opening_date).await {
            Ok(id) => {
                tx.commit().await?;
                info!("Created process {}", id);
                Ok(id)
            }
            Err(err) => {
                rollback(tx).await;
                Err(err)
            }
        }
    }

    /// Overwrite all scalar fields; replace each detail list only if supplied
    pub async fn update(&self, id: i32, input: ProcessInput) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;
        match Self::update_process(&mut tx, id, &input).await {
            Ok(()) => {
                tx.commit().await?;
                info!("Updated process {}", id);
                Ok(())
            }
            Err(err) => {
                rollback(tx).await;
                Err(err)
            }
        }
    }

    /// Move a process to a known status, touching only `status_id` and `updated_at`
    pub async fn update_status(&self, id: i32, status: Option<&str>) -> Result<(), ServiceError> {
        let status = status
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::validation("Status is required"))?;

        let mut conn = self.pool.acquire().await?;
        if !Self::exists(&mut conn, id).await? {
            return Err(ServiceError::not_found(PROCESS_NOT_FOUND));
        }

        let status_id = find_status_id(&mut conn, status)
            .await?
            .ok_or_else(|| ServiceError::validation("Invalid status"))?;

        sqlx::query(
            "UPDATE processes SET status_id = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
        )
        .bind(status_id)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        info!("Process {} moved to status '{}'", id, status);
        Ok(())
    }

    async fn exists(conn: &mut PgConnection, id: i32) -> Result<bool, sqlx::Error> {
        let found = sqlx::query_scalar::<_, i32>("SELECT id FROM processes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(found.is_some())
    }

    /// Responsible is upserted by name; status is lookup-only and an
    /// unknown name silently resolves to no status.
    async fn resolve_references(
        conn: &mut PgConnection,
        input: &ProcessInput,
    ) -> Result<(Option<i32>, Option<i32>), sqlx::Error> {
        let responsible_id = match input.responsible_name() {
            Some(name) => Some(upsert_by_name(conn, UpsertTable::Responsibles, name).await?),
            None => None,
        };

        let status_id = match input.status_name() {
            Some(name) => {
                let found = find_status_id(conn, name).await?;
                if found.is_none() {
                    tracing::debug!("Unknown status '{}' stored as no status", name);
                }
                found
            }
            None => None,
        };

        Ok((responsible_id, status_id))
    }

    async fn insert_process(
        conn: &mut PgConnection,
        input: &ProcessInput,
        opening_date: NaiveDate,
    ) -> Result<i32, ServiceError> {
        let (responsible_id, status_id) = Self::resolve_references(conn, input).await?;

        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO processes \
             (sd_number, opening_date, simplified_object, modality, responsible_id, observations, status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id",
        )
        .bind(&input.sd_number)
        .bind(opening_date)
        .bind(&input.simplified_object)
        .bind(&input.modality)
        .bind(responsible_id)
        .bind(&input.observations)
        .bind(status_id)
        .fetch_one(&mut *conn)
        .await?;

        if let Some(secretaries) = &input.participating_secretaries {
            Self::insert_secretaries(conn, id, secretaries).await?;
        }
        if let Some(supervisors) = &input.contract_supervisors {
            Self::insert_supervisors(conn, id, supervisors).await?;
        }

        Ok(id)
    }

    async fn update_process(
        conn: &mut PgConnection,
        id: i32,
        input: &ProcessInput,
    ) -> Result<(), ServiceError> {
        let locked = sqlx::query_scalar::<_, i32>("SELECT id FROM processes WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        if locked.is_none() {
            return Err(ServiceError::not_found(PROCESS_NOT_FOUND));
        }

        // A missing process wins over a malformed date
        let opening_date = input.opening_date()?;

        let (responsible_id, status_id) = Self::resolve_references(conn, input).await?;

        sqlx::query(
            "UPDATE processes \
             SET sd_number = $1, \
                 opening_date = $2, \
                 simplified_object = $3, \
                 modality = $4, \
                 responsible_id = $5, \
                 observations = $6, \
                 status_id = $7, \
                 updated_at = CURRENT_TIMESTAMP \
             WHERE id = $8",
        )
        .bind(&input.sd_number)
        .bind(opening_date)
        .bind(&input.simplified_object)
        .bind(&input.modality)
        .bind(responsible_id)
        .bind(&input.observations)
        .bind(status_id)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        if let Some(secretaries) = &input.participating_secretaries {
            sqlx::query("DELETE FROM participating_secretaries WHERE process_id = $1")
                .bind(id)
                .execute(&mut *conn)
                .await?;
            Self::insert_secretaries(conn, id, secretaries).await?;
        }

        if let Some(supervisors) = &input.contract_supervisors {
            sqlx::query("DELETE FROM contract_supervisors WHERE process_id = $1")
                .bind(id)
                .execute(&mut *conn)
                .await?;
            Self::insert_supervisors(conn, id, supervisors).await?;
        }

        Ok(())
    }

    async fn insert_secretaries(
        conn: &mut PgConnection,
        process_id: i32,
        names: &[String],
    ) -> Result<(), sqlx::Error> {
        for name in names {
            let secretary_id = upsert_by_name(conn, UpsertTable::Secretaries, name).await?;
            sqlx::query(
                "INSERT INTO participating_secretaries (process_id, secretary_id) VALUES ($1, $2)",
            )
            .bind(process_id)
            .bind(secretary_id)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    async fn insert_supervisors(
        conn: &mut PgConnection,
        process_id: i32,
        names: &[String],
    ) -> Result<(), sqlx::Error> {
        for name in names {
            sqlx::query("INSERT INTO contract_supervisors (process_id, name) VALUES ($1, $2)")
                .bind(process_id)
                .bind(name)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Fetch both detail sets for all rows in two queries, keeping insertion order
    async fn attach_details(
        conn: &mut PgConnection,
        rows: Vec<ProcessRow>,
    ) -> Result<Vec<Process>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();

        let secretaries = sqlx::query_as::<_, (i32, String)>(
            "SELECT ps.process_id, s.name FROM participating_secretaries ps \
             JOIN secretaries s ON ps.secretary_id = s.id \
             WHERE ps.process_id = ANY($1) \
             ORDER BY ps.id",
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        let supervisors = sqlx::query_as::<_, (i32, String)>(
            "SELECT process_id, name FROM contract_supervisors \
             WHERE process_id = ANY($1) \
             ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        let mut secretaries = group_by_process(secretaries);
        let mut supervisors = group_by_process(supervisors);

        Ok(rows
            .into_iter()
            .map(|row| Process {
                participating_secretaries: secretaries.remove(&row.id).unwrap_or_default(),
                contract_supervisors: supervisors.remove(&row.id).unwrap_or_default(),
                row,
            })
            .collect())
    }
}

fn group_by_process(pairs: Vec<(i32, String)>) -> HashMap<i32, Vec<String>> {
    let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
    for (process_id, name) in pairs {
        grouped.entry(process_id).or_default().push(name);
    }
    grouped
}
