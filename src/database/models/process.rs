use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `processes` row joined with its responsible and status names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessRow {
    pub id: i32,
    pub sd_number: Option<String>,
    pub opening_date: NaiveDate,
    pub simplified_object: String,
    pub modality: Option<String>,
    pub responsible_id: Option<i32>,
    pub status_id: Option<i32>,
    pub observations: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub responsible_name: Option<String>,
    pub status_name: Option<String>,
}

/// Process as returned to clients, with its multi-valued details attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    #[serde(flatten)]
    pub row: ProcessRow,
    pub participating_secretaries: Vec<String>,
    pub contract_supervisors: Vec<String>,
}
