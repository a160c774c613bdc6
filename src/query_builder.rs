//! Translation of a [`FilterSpec`] into a parameterized SQL predicate.
//!
//! Every value coming from a request ends up in [`WhereClause::params`] and
//! is bound by the driver; the SQL text only ever contains `?` placeholders
//! and column expressions. Column expressions are `&'static str` so they can
//! only come from repository code.

use chrono::NaiveDateTime;
use diesel::query_builder::{BoxedSqlQuery, SqlQuery};
use diesel::sql_types::{BigInt, Bool, Text};
use diesel::sqlite::Sqlite;

use crate::db::UNICODE_LOWER;
use crate::domain::filter::{FilterSpec, StatusEnum, StatusFilter, TimeWindow};
use crate::domain::types::SearchTerm;

/// A value bound to one `?` placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

/// ANDed predicates with their bound values, in placeholder order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WhereClause {
    predicates: Vec<String>,
    params: Vec<SqlValue>,
}

impl WhereClause {
    /// `true` when the clause matches every row.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Predicates joined with `AND`, without the `WHERE` keyword.
    pub fn condition(&self) -> String {
        self.predicates.join(" AND ")
    }

    /// `WHERE ...` ready to splice after `FROM`, or an empty string.
    pub fn to_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.condition())
        }
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}

/// Chainable builder for [`WhereClause`].
#[derive(Debug, Default)]
pub struct QueryBuilder {
    clause: WhereClause,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = ?` when a status is selected.
    pub fn status<S: StatusEnum>(self, column: &'static str, filter: &StatusFilter<S>) -> Self {
        match filter {
            StatusFilter::All => self,
            StatusFilter::Only(status) => self.equals(column, status.as_str()),
        }
    }

    /// `column = ?` with the given value.
    pub fn equals(mut self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.clause.predicates.push(format!("{column} = ?"));
        self.clause.params.push(value.into());
        self
    }

    /// `column >= ? [AND column < ?]`; timestamps are bound in SQLite's text form.
    pub fn within(mut self, column: &'static str, window: Option<TimeWindow>) -> Self {
        let Some(window) = window else {
            return self;
        };
        self.clause.predicates.push(format!("{column} >= ?"));
        self.clause.params.push(timestamp(window.start));
        if let Some(end) = window.end {
            self.clause.predicates.push(format!("{column} < ?"));
            self.clause.params.push(timestamp(end));
        }
        self
    }

    /// Case-insensitive substring match of `term` against any of `columns`.
    pub fn search(mut self, columns: &[&'static str], term: Option<&SearchTerm>) -> Self {
        let Some(term) = term else {
            return self;
        };
        if columns.is_empty() {
            return self;
        }

        let pattern = like_pattern(term.as_str());
        let group = columns
            .iter()
            .map(|column| format!("{UNICODE_LOWER}({column}) LIKE ? ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");

        self.clause.predicates.push(format!("({group})"));
        self.clause
            .params
            .extend(columns.iter().map(|_| SqlValue::Text(pattern.clone())));
        self
    }

    pub fn build(self) -> WhereClause {
        self.clause
    }
}

/// Builds the status and search predicates of a filter spec.
pub fn build<S: StatusEnum>(
    spec: &FilterSpec<S>,
    searchable_columns: &[&'static str],
    status_column: &'static str,
) -> WhereClause {
    QueryBuilder::new()
        .status(status_column, &spec.status)
        .search(searchable_columns, spec.search.as_ref())
        .build()
}

fn timestamp(value: NaiveDateTime) -> SqlValue {
    SqlValue::Text(value.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// `%term%` with LIKE wildcards in the term escaped so they match literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Binds the clause parameters, in order, onto a boxed raw query.
pub fn bind_params<'f>(
    mut query: BoxedSqlQuery<'f, Sqlite, SqlQuery>,
    params: &[SqlValue],
) -> BoxedSqlQuery<'f, Sqlite, SqlQuery> {
    for param in params {
        query = match param {
            SqlValue::Text(value) => query.bind::<Text, _>(value.clone()),
            SqlValue::Integer(value) => query.bind::<BigInt, _>(*value),
            SqlValue::Bool(value) => query.bind::<Bool, _>(*value),
        };
    }
    query
}
