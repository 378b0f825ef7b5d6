//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Page-number pagination parameters (`?page=&limit=`).
///
/// Kept as raw text so malformed values fall back to defaults instead of
/// rejecting the request. Coercion happens in
/// [`heroes_core::pagination::PageRequest::from_query`].
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}
