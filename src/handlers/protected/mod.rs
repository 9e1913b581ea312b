// handlers/protected/mod.rs - Endpoints behind the bearer-token gate
//
// Services mount these at their own root; the gateway (or the `all` router)
// authenticates and strips the /api/<prefix> part before they are reached.
pub mod lists;
pub mod processes;
pub mod reports;
