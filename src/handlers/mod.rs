// handlers/mod.rs - Handlers by security tier
//
// Public (no token): /auth/*, /health
// Protected (bearer token, checked by the gateway or the `all` router): processes, reports, lists
pub mod health;
pub mod protected;
pub mod public;
