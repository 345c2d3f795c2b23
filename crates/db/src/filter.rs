//! Dynamic list queries.
//!
//! [`Filter`] accumulates `WHERE` conditions with numbered bind parameters;
//! [`Page`] carries the validated sort column, direction and window. The
//! `fetch_page` helper runs the matching `SELECT` and `COUNT(*)` pair.

use dailies_core::query::{
    clamp_limit, clamp_offset, like_pattern, normalize_search, sort_column, SortOrder,
    DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use dailies_core::error::CoreError;
use dailies_core::types::{DbId, Timestamp};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{FromRow, PgPool, Postgres};

/// Typed bind value for dynamically-built list queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(i64),
    Bool(bool),
    Text(String),
    Timestamp(Timestamp),
}

/// Accumulated `WHERE` conditions.
#[derive(Debug, Default, Clone)]
pub struct Filter {
    conditions: Vec<String>,
    binds: Vec<BindValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_placeholder(&self) -> usize {
        self.binds.len() + 1
    }

    /// `column = $n`.
    pub fn eq_id(mut self, column: &'static str, value: DbId) -> Self {
        let n = self.next_placeholder();
        self.conditions.push(format!("{column} = ${n}"));
        self.binds.push(BindValue::BigInt(value));
        self
    }

    /// `column = $n` when `value` is set.
    pub fn opt_eq_id(self, column: &'static str, value: Option<DbId>) -> Self {
        match value {
            Some(v) => self.eq_id(column, v),
            None => self,
        }
    }

    /// `column = $n` when `value` is set.
    pub fn opt_eq_text(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(v) = value {
            let n = self.next_placeholder();
            self.conditions.push(format!("{column} = ${n}"));
            self.binds.push(BindValue::Text(v.to_string()));
        }
        self
    }

    /// `column = $n` when `value` is set.
    pub fn opt_eq_bool(mut self, column: &'static str, value: Option<bool>) -> Self {
        if let Some(v) = value {
            let n = self.next_placeholder();
            self.conditions.push(format!("{column} = ${n}"));
            self.binds.push(BindValue::Bool(v));
        }
        self
    }

    /// `column >= $n` when `value` is set.
    pub fn opt_since(mut self, column: &'static str, value: Option<Timestamp>) -> Self {
        if let Some(v) = value {
            let n = self.next_placeholder();
            self.conditions.push(format!("{column} >= ${n}"));
            self.binds.push(BindValue::Timestamp(v));
        }
        self
    }

    /// `column <= $n` when `value` is set.
    pub fn opt_until(mut self, column: &'static str, value: Option<Timestamp>) -> Self {
        if let Some(v) = value {
            let n = self.next_placeholder();
            self.conditions.push(format!("{column} <= ${n}"));
            self.binds.push(BindValue::Timestamp(v));
        }
        self
    }

    /// Array `column` is empty or contains `value`, when `value` is set.
    pub fn opt_empty_or_contains(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(v) = value {
            let n = self.next_placeholder();
            self.conditions
                .push(format!("(cardinality({column}) = 0 OR ${n} = ANY({column}))"));
            self.binds.push(BindValue::Text(v.to_string()));
        }
        self
    }

    /// Restrict projects to those `user_id` is a member of, when set.
    pub fn opt_member_of(mut self, user_id: Option<DbId>) -> Self {
        if let Some(v) = user_id {
            let n = self.next_placeholder();
            self.conditions.push(format!(
                "id IN (SELECT project_id FROM project_members WHERE user_id = ${n})"
            ));
            self.binds.push(BindValue::BigInt(v));
        }
        self
    }

    /// Case-insensitive substring match over any of `columns`.
    pub fn search(mut self, columns: &[&'static str], search: Option<&str>) -> Self {
        if let Some(term) = normalize_search(search) {
            let n = self.next_placeholder();
            let ors: Vec<String> = columns
                .iter()
                .map(|c| format!("{c} ILIKE ${n}"))
                .collect();
            self.conditions.push(format!("({})", ors.join(" OR ")));
            self.binds.push(BindValue::Text(like_pattern(&term)));
        }
        self
    }

    /// Empty when there are no conditions, otherwise starts with `WHERE `.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub fn bind_count(&self) -> usize {
        self.binds.len()
    }

    pub fn bind_as<'q, O>(
        &'q self,
        mut q: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for val in &self.binds {
            match val {
                BindValue::BigInt(v) => q = q.bind(*v),
                BindValue::Bool(v) => q = q.bind(*v),
                BindValue::Text(v) => q = q.bind(v.as_str()),
                BindValue::Timestamp(v) => q = q.bind(*v),
            }
        }
        q
    }

    pub fn bind_scalar<'q>(
        &'q self,
        mut q: QueryScalar<'q, Postgres, i64, PgArguments>,
    ) -> QueryScalar<'q, Postgres, i64, PgArguments> {
        for val in &self.binds {
            match val {
                BindValue::BigInt(v) => q = q.bind(*v),
                BindValue::Bool(v) => q = q.bind(*v),
                BindValue::Text(v) => q = q.bind(v.as_str()),
                BindValue::Timestamp(v) => q = q.bind(*v),
            }
        }
        q
    }
}

/// Validated sort and pagination window of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
    pub sort: &'static str,
    pub order: SortOrder,
}

impl Page {
    /// Same window with `code`/`name` sorting redirected to other columns,
    /// for tables that have no such columns.
    pub fn remap_sort(self, code: &'static str, name: &'static str) -> Self {
        let sort = match self.sort {
            "code" => code,
            "name" => name,
            other => other,
        };
        Self { sort, ..self }
    }

    /// Validate raw query-string values.
    pub fn from_params(
        limit: Option<i64>,
        offset: Option<i64>,
        sort: Option<&str>,
        order: Option<&str>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            limit: clamp_limit(limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT),
            offset: clamp_offset(offset),
            sort: sort_column(sort)?,
            order: SortOrder::parse(order)?,
        })
    }

    /// `ORDER BY` + `LIMIT`/`OFFSET` tail, with placeholders after `first_bind`.
    pub fn tail(&self, first_bind: usize) -> String {
        let order = self.order.as_sql();
        format!(
            "ORDER BY {sort} {order}, id {order} LIMIT ${first_bind} OFFSET ${}",
            first_bind + 1,
            sort = self.sort,
        )
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
            sort: "created_at",
            order: SortOrder::Desc,
        }
    }
}

/// Run a filtered, sorted, paginated `SELECT` and its `COUNT(*)`.
///
/// `table` and `columns` must be compile-time constants.
pub async fn fetch_page<T>(
    pool: &PgPool,
    table: &'static str,
    columns: &'static str,
    filter: &Filter,
    page: &Page,
) -> Result<(Vec<T>, i64), sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let where_clause = filter.where_clause();
    let query = format!(
        "SELECT {columns} FROM {table} {where_clause} {}",
        page.tail(filter.bind_count() + 1)
    );
    let rows = filter
        .bind_as(sqlx::query_as::<_, T>(&query))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await?;

    let count_query = format!("SELECT COUNT(*)::BIGINT FROM {table} {where_clause}");
    let total = filter
        .bind_scalar(sqlx::query_scalar::<_, i64>(&count_query))
        .fetch_one(pool)
        .await?;

    Ok((rows, total))
}
