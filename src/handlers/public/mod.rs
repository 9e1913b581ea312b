// handlers/public/mod.rs - Endpoints that do not require a token
pub mod auth;
