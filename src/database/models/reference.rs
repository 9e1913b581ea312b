use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Ordered workflow stage
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Status {
    pub id: i32,
    pub name: String,
    pub order_num: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Responsible {
    pub id: i32,
    pub name: String,
}

/// Organizational department
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Secretary {
    pub id: i32,
    pub name: String,
}
