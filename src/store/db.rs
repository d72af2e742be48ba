//! Thin data access helper over the SQLite pool.
//!
//! Statements are plain SQL strings with `?` placeholders and a slice of
//! [`SqlParam`] values, so handlers can build filters and partial updates
//! dynamically while every value still goes through parameter binding.

use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqliteRow};
use sqlx::{Executor, FromRow, Sqlite};

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Integer(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        SqlParam::Real(value)
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<&String> for SqlParam {
    fn from(value: &String) -> Self {
        SqlParam::Text(value.clone())
    }
}

impl<T: Into<SqlParam>> From<Option<T>> for SqlParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(SqlParam::Null, Into::into)
    }
}

/// Outcome of a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub changes: u64,
    pub last_insert_rowid: i64,
}

macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                SqlParam::Null => query.bind(None::<String>),
                SqlParam::Integer(value) => query.bind(*value),
                SqlParam::Real(value) => query.bind(*value),
                SqlParam::Text(value) => query.bind(value.clone()),
            };
        }
        query
    }};
}

/// Fetches every row of `sql` from any SQLite executor.
pub async fn fetch_all<'c, T, E>(executor: E, sql: &str, params: &[SqlParam]) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    E: Executor<'c, Database = Sqlite>,
{
    let rows = bind_params!(sqlx::query_as::<_, T>(sql), params)
        .fetch_all(executor)
        .await?;
    Ok(rows)
}

/// Fetches the first row of `sql`, if any.
pub async fn fetch_optional<'c, T, E>(
    executor: E,
    sql: &str,
    params: &[SqlParam],
) -> Result<Option<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    E: Executor<'c, Database = Sqlite>,
{
    let row = bind_params!(sqlx::query_as::<_, T>(sql), params)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Executes a write statement.
pub async fn execute<'c, E>(executor: E, sql: &str, params: &[SqlParam]) -> Result<RunResult>
where
    E: Executor<'c, Database = Sqlite>,
{
    let result = bind_params!(sqlx::query(sql), params)
        .execute(executor)
        .await?;
    Ok(RunResult {
        changes: result.rows_affected(),
        last_insert_rowid: result.last_insert_rowid(),
    })
}

/// Future returned by a [`Db::transaction`] body.
pub type TxFuture<'t, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 't>>;

#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All rows of a query.
    pub async fn query<T>(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        fetch_all(&self.pool, sql, params)
            .await
            .with_context(|| format!("Query failed: {}", first_line(sql)))
    }

    /// The first row of a query.
    pub async fn get<T>(&self, sql: &str, params: &[SqlParam]) -> Result<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        fetch_optional(&self.pool, sql, params)
            .await
            .with_context(|| format!("Get failed: {}", first_line(sql)))
    }

    /// A single write statement.
    pub async fn run(&self, sql: &str, params: &[SqlParam]) -> Result<RunResult> {
        execute(&self.pool, sql, params)
            .await
            .with_context(|| format!("Run failed: {}", first_line(sql)))
    }

    /// Whether `sql` yields at least one row.
    pub async fn exists(&self, sql: &str, params: &[SqlParam]) -> Result<bool> {
        Ok(self.get::<(i64,)>(sql, params).await?.is_some())
    }

    /// Runs `body` inside a transaction: committed when it returns `Ok`,
    /// rolled back otherwise.
    pub async fn transaction<T, F>(&self, body: F) -> Result<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t mut SqliteConnection) -> TxFuture<'t, T> + Send,
    {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        match body(&mut *tx).await {
            Ok(value) => {
                tx.commit().await.context("Failed to commit transaction")?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e.context("Transaction error"))
            }
        }
    }
}

fn first_line(sql: &str) -> &str {
    sql.trim().lines().next().unwrap_or_default()
}

/// Column assignments of a partial `UPDATE`, collected one field at a time.
#[derive(Debug, Default)]
pub struct UpdateSet {
    assignments: Vec<&'static str>,
    params: Vec<SqlParam>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &'static str, value: impl Into<SqlParam>) -> &mut Self {
        self.assignments.push(column);
        self.params.push(value.into());
        self
    }

    /// Adds the assignment only when a value was supplied.
    pub fn set_if<T: Into<SqlParam>>(&mut self, column: &'static str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(column, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Builds `UPDATE <table> SET ..., updated_at = CURRENT_TIMESTAMP WHERE id = ?`.
    pub fn into_statement(self, table: &'static str, id: i64) -> (String, Vec<SqlParam>) {
        let mut columns: Vec<String> = self
            .assignments
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect();
        columns.push("updated_at = CURRENT_TIMESTAMP".to_string());

        let sql = format!("UPDATE {} SET {} WHERE id = ?", table, columns.join(", "));
        let mut params = self.params;
        params.push(SqlParam::Integer(id));
        (sql, params)
    }
}

/// `WHERE` conditions of a filtered listing.
#[derive(Debug, Default)]
pub struct Conditions {
    clauses: Vec<&'static str>,
    params: Vec<SqlParam>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clause: &'static str, params: impl IntoIterator<Item = SqlParam>) -> &mut Self {
        self.clauses.push(clause);
        self.params.extend(params);
        self
    }

    /// Appends ` WHERE a AND b` to `sql` when there is at least one clause.
    pub fn apply(self, sql: &mut String) -> Vec<SqlParam> {
        if !self.clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.clauses.join(" AND "));
        }
        self.params
    }
}

/// `%term%` for a `LIKE` comparison; `None` for a blank term.
pub fn like_pattern(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("%{}%", t))
}
