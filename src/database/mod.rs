pub mod manager;
pub mod models;
pub mod reference;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::Repository;
