// handlers/protected/processes/mod.rs - Process record endpoints
//
// GET    /             list (optional ?status=<id>&responsible=<id>)
// POST   /             create
// GET    /:id          show
// PUT    /:id          full update
// PATCH  /:id/status   status-only update
pub mod process_get;
pub mod process_post;
pub mod process_put;
pub mod status_patch;

pub use process_get::{process_get, process_list};
pub use process_post::process_post;
pub use process_put::process_put;
pub use status_patch::status_patch;

use crate::error::ApiError;

/// Path ids are integers; anything else cannot name an existing process.
pub(crate) fn parse_process_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::not_found("Process not found"))
}
