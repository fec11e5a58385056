//! PostgreSQL store. The table is created on startup if missing.

use super::ExampleStore;
use crate::entity::{Example, ExampleDraft, DEFAULT_AVERAGE_RATING, DEFAULT_RATING_COUNT, TYPE_MAX_LENGTH};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

pub const EXAMPLE_TABLE: &str = "example";

/// NUMERIC is read back as float8 so it decodes into `f64`.
const RETURNING_COLUMNS: &str =
    r#"id, "type", setup, punchline, "averageRating"::float8 AS "averageRating", "ratingCount""#;

#[derive(Clone)]
pub struct PgExampleStore {
    pool: PgPool,
}

impl PgExampleStore {
    pub fn new(pool: PgPool) -> Self {
        PgExampleStore { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `CREATE TABLE IF NOT EXISTS` with the same bounds the validator enforces.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        let ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id SERIAL PRIMARY KEY,
                "type" VARCHAR({type_len}),
                setup TEXT NOT NULL CHECK (setup <> ''),
                punchline TEXT NOT NULL CHECK (punchline <> ''),
                "averageRating" NUMERIC NOT NULL DEFAULT {rating}
                    CHECK ("averageRating" BETWEEN 1.0 AND 5.0),
                "ratingCount" INTEGER NOT NULL DEFAULT {count}
                    CHECK ("ratingCount" >= 1)
            )
            "#,
            table = quote_ident(EXAMPLE_TABLE),
            type_len = TYPE_MAX_LENGTH,
            rating = format!("{:.1}", DEFAULT_AVERAGE_RATING),
            count = DEFAULT_RATING_COUNT,
        );
        sqlx::query(&ddl).execute(&self.pool).await?;
        tracing::debug!(table = EXAMPLE_TABLE, "schema ensured");
        Ok(())
    }
}

#[async_trait]
impl ExampleStore for PgExampleStore {
    async fn list(&self, limit: u32, offset: u32) -> Result<Vec<Example>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id LIMIT $1 OFFSET $2",
            RETURNING_COLUMNS,
            quote_ident(EXAMPLE_TABLE)
        );
        tracing::debug!(sql = %sql, limit, offset, "query");
        let rows = sqlx::query_as::<_, Example>(&sql)
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> Result<Option<Example>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            RETURNING_COLUMNS,
            quote_ident(EXAMPLE_TABLE)
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Example>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, draft: ExampleDraft) -> Result<Example, AppError> {
        let sql = format!(
            r#"INSERT INTO {} ("type", setup, punchline, "averageRating", "ratingCount")
               VALUES ($1, $2, $3, $4::numeric, $5) RETURNING {}"#,
            quote_ident(EXAMPLE_TABLE),
            RETURNING_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query_as::<_, Example>(&sql)
            .bind(draft.kind)
            .bind(draft.setup)
            .bind(draft.punchline)
            .bind(draft.average_rating.unwrap_or(DEFAULT_AVERAGE_RATING))
            .bind(draft.rating_count.unwrap_or(DEFAULT_RATING_COUNT))
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn replace(&self, id: i32, draft: ExampleDraft) -> Result<Option<Example>, AppError> {
        let sql = format!(
            r#"UPDATE {} SET "type" = $2, setup = $3, punchline = $4,
                   "averageRating" = COALESCE($5::numeric, "averageRating"),
                   "ratingCount" = COALESCE($6, "ratingCount")
               WHERE id = $1 RETURNING {}"#,
            quote_ident(EXAMPLE_TABLE),
            RETURNING_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Example>(&sql)
            .bind(id)
            .bind(draft.kind)
            .bind(draft.setup)
            .bind(draft.punchline)
            .bind(draft.average_rating)
            .bind(draft.rating_count)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> Result<Option<Example>, AppError> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 RETURNING {}",
            quote_ident(EXAMPLE_TABLE),
            RETURNING_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Example>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Connects to the server's `postgres` database and creates the target database if absent.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_database_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Returns (url pointing at the `postgres` database, target database name).
fn split_database_url(url: &str) -> Result<(String, String), AppError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| AppError::internal("DATABASE_URL has no database name"))?;
    let (base, rest) = url.split_at(path_start);
    let (db_name, query) = match rest.split_once('?') {
        Some((name, q)) => (name, Some(q)),
        None => (rest, None),
    };
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.trim().to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name_from_url() {
        let (admin, name) = split_database_url("postgres://u:p@localhost:5432/jokes").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres");
        assert_eq!(name, "jokes");
    }

    #[test]
    fn keeps_query_parameters_on_admin_url() {
        let (admin, name) = split_database_url("postgres://localhost/jokes?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres?sslmode=disable");
        assert_eq!(name, "jokes");
    }

    #[test]
    fn url_without_path_is_an_error() {
        assert!(split_database_url("postgres://localhost").is_err());
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("example"), "\"example\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
