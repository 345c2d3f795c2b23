//! Shared query parameter types for list endpoints.

use dailies_db::filter::Page;
use serde::Deserialize;

use crate::error::AppResult;

/// `?limit=&offset=&sort=&order=` accepted by every list endpoint.
///
/// Entity-specific filters (`status_id`, `search`, ...) are read by a second
/// `Query` extractor into the entity's filter struct.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ListParams {
    /// Clamp the window and check sort/order against the allow-lists.
    pub fn page(&self) -> AppResult<Page> {
        Ok(Page::from_params(
            self.limit,
            self.offset,
            self.sort.as_deref(),
            self.order.as_deref(),
        )?)
    }
}
