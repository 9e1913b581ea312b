use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct CountByResponsible {
    pub responsible: String,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct CountByModality {
    pub modality: String,
    pub total: i64,
}

/// `month` is formatted `YYYY-MM`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct CountByMonth {
    pub month: String,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct CountBySecretary {
    pub secretary: String,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: i64,
    pub by_responsible: Vec<CountByResponsible>,
    pub by_modality: Vec<CountByModality>,
    pub by_month: Vec<CountByMonth>,
    pub by_secretary: Vec<CountBySecretary>,
}
