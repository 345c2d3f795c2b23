//! Success envelope shared by every JSON endpoint.
//!
//! ```json
//! { "success": true,
//!   "data": ...,
//!   "metadata": { "timestamp": "...", "version": "0.1.0",
//!                 "pagination": { "total": 12, "limit": 50, "offset": 0 } } }
//! ```
//!
//! `pagination` is only present on list responses.

use axum::Json;
use dailies_core::types::Timestamp;
use dailies_db::filter::Page;
use serde::Serialize;

/// API version reported in every envelope.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub timestamp: Timestamp,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            metadata: Metadata {
                timestamp: chrono::Utc::now(),
                version: API_VERSION,
                pagination: None,
            },
        }
    }

    pub fn paginated(data: T, total: i64, page: &Page) -> Self {
        Self::with_pagination(
            data,
            Pagination {
                total,
                limit: page.limit,
                offset: page.offset,
            },
        )
    }

    pub fn with_pagination(data: T, pagination: Pagination) -> Self {
        let mut response = Self::new(data);
        response.metadata.pagination = Some(pagination);
        response
    }
}

/// Wrap `data` in the envelope as a JSON body.
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::new(data))
}

/// Wrap one page of a list in the envelope as a JSON body.
pub fn paged<T: Serialize>(data: Vec<T>, total: i64, page: &Page) -> Json<ApiResponse<Vec<T>>> {
    Json(ApiResponse::paginated(data, total, page))
}
