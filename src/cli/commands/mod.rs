pub mod lists;
pub mod migrate;
pub mod report;
pub mod token;
