//! List query helpers: pagination bounds, sorting allow-list, search patterns.

use crate::error::CoreError;

/// Default page size for list endpoints.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum page size for list endpoints.
pub const MAX_LIST_LIMIT: i64 = 200;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Sort direction of a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        match value {
            None => Ok(SortOrder::default()),
            Some(v) if v.eq_ignore_ascii_case("asc") => Ok(SortOrder::Asc),
            Some(v) if v.eq_ignore_ascii_case("desc") => Ok(SortOrder::Desc),
            Some(v) => Err(CoreError::Validation(format!(
                "Invalid sort order '{v}'. Must be 'asc' or 'desc'"
            ))),
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Columns every list endpoint can sort by.
const SORTABLE_COLUMNS: &[&str] = &["code", "name", "created_at", "updated_at"];

/// Resolve a requested sort column against the allow-list.
///
/// The returned `&'static str` is safe to interpolate into SQL.
pub fn sort_column(requested: Option<&str>) -> Result<&'static str, CoreError> {
    match requested {
        None => Ok("created_at"),
        Some(col) => SORTABLE_COLUMNS
            .iter()
            .copied()
            .find(|c| *c == col)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Cannot sort by '{col}'. Must be one of: {}",
                    SORTABLE_COLUMNS.join(", ")
                ))
            }),
    }
}

/// Build an `ILIKE` pattern matching `search` anywhere, with `%`, `_` and
/// `\` escaped so they match literally.
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Normalise a search parameter: trimmed, `None` when blank.
pub fn normalize_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
