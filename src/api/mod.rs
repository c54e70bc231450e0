//! REST API module.
//!
//! Contains the tank and profile routes and their handlers.

mod profile;
mod tanks;

pub use profile::*;
pub use tanks::*;

use crate::errors::AppError;
use crate::models::DocumentId;

/// Handler result; errors render through [`AppError`]'s `IntoResponse`.
pub type ApiResult<T> = Result<T, AppError>;

/// Parse a path identifier. Anything that is not a valid id cannot match a stored
/// document, so it is reported the same way as an unknown one.
fn parse_id(raw: &str, not_found: &str) -> ApiResult<DocumentId> {
    raw.parse().map_err(|_| {
        tracing::debug!("Rejecting malformed id '{}'", raw);
        AppError::NotFound(not_found.to_string())
    })
}
