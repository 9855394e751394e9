//! MySqlStore: relational accessor
//!
//! Every call checks a connection out of the pool for the duration of one
//! query; the connection goes back to the pool when the guard drops, on the
//! success path and on every error path alike.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row, TypeInfo};
use tracing::{debug, info};

use super::{RelationalAccess, StoreError, StoreResult, Table};
use crate::config::MySqlConfig;
use crate::models::{
    InterestFaculty, InterestUniversity, ResearchArea, UniversityCitations,
    UniversityPublications,
};

const UNIVERSITY_NAMES: &str = "SELECT DISTINCT name FROM university";

const KEYWORD_NAMES: &str = "SELECT DISTINCT name FROM keyword";

const UNIVERSITY_COUNT: &str = "SELECT COUNT(DISTINCT name) AS count FROM university";

const TOP_BY_PUBLICATIONS: &str = r#"
    SELECT university.name AS university_name,
           COUNT(DISTINCT publication.id) AS total_publications
    FROM university
    JOIN faculty ON university.id = faculty.university_id
    JOIN faculty_publication fp ON faculty.id = fp.faculty_Id
    JOIN publication ON publication.id = fp.publication_Id
    GROUP BY university.name
    ORDER BY total_publications DESC
    LIMIT ? OFFSET ?
"#;

const TOP_BY_CITATIONS: &str = r#"
    SELECT university.name,
           CAST(COALESCE(SUM(publication.num_citations), 0) AS SIGNED) AS total_citations
    FROM university
    JOIN faculty ON university.id = faculty.university_id
    JOIN faculty_publication fp ON faculty.id = fp.faculty_Id
    JOIN publication ON publication.id = fp.publication_Id
    GROUP BY university.name
    ORDER BY total_citations DESC
    LIMIT ? OFFSET ?
"#;

const RESEARCH_AREAS: &str = r#"
    SELECT k.name AS research_area,
           COUNT(DISTINCT fp.publication_Id) AS publication_count
    FROM university
    JOIN faculty ON university.id = faculty.university_id
    JOIN faculty_publication fp ON faculty.id = fp.faculty_Id
    JOIN publication ON publication.id = fp.publication_Id
    JOIN Publication_Keyword pk ON publication.id = pk.publication_id
    JOIN keyword k ON k.id = pk.keyword_id
    WHERE university.name = ?
    GROUP BY k.name
    ORDER BY publication_count DESC
    LIMIT 10
"#;

const INTEREST_UNIVERSITIES: &str = r#"
    SELECT university.name,
           COUNT(DISTINCT faculty.id) AS num_faculty,
           COUNT(DISTINCT publication.id) AS num_publications
    FROM university
    JOIN faculty ON university.id = faculty.university_id
    JOIN faculty_publication fp ON faculty.id = fp.faculty_Id
    JOIN publication ON publication.id = fp.publication_Id
    JOIN Publication_Keyword pk ON publication.id = pk.publication_id
    JOIN keyword k ON k.id = pk.keyword_id
    WHERE k.name = ?
    GROUP BY university.name
    ORDER BY num_publications DESC, num_faculty DESC
    LIMIT 10
"#;

const INTEREST_FACULTY: &str = r#"
    SELECT faculty.name,
           COUNT(DISTINCT publication.id) AS num_publications,
           CAST(COALESCE(SUM(publication.num_citations), 0) AS SIGNED) AS num_citations
    FROM faculty
    JOIN faculty_publication fp ON faculty.id = fp.faculty_Id
    JOIN publication ON publication.id = fp.publication_Id
    JOIN Publication_Keyword pk ON publication.id = pk.publication_id
    JOIN keyword k ON k.id = pk.keyword_id
    WHERE k.name = ?
    GROUP BY faculty.name
    ORDER BY num_publications DESC, num_citations DESC
    LIMIT 10
"#;

const FACULTY_INTERESTS: &str = r#"
    SELECT DISTINCT k.name AS interest
    FROM faculty
    JOIN faculty_publication fp ON faculty.id = fp.faculty_Id
    JOIN publication ON publication.id = fp.publication_Id
    JOIN Publication_Keyword pk ON publication.id = pk.publication_id
    JOIN keyword k ON k.id = pk.keyword_id
    WHERE faculty.name = ?
"#;

/// Positional parameter bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<u32> for SqlParam {
    fn from(v: u32) -> Self {
        SqlParam::Int(i64::from(v))
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StoreError::Connection(e.to_string()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. } => StoreError::Decode(e.to_string()),
            _ => StoreError::Query(e.to_string()),
        }
    }
}

/// Relational accessor backed by a MySQL connection pool
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Build the pool. Connections open on first use, so an unreachable
    /// server surfaces as a per-query `StoreError::Connection`.
    pub fn new(config: &MySqlConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy_with(options);

        info!(
            "MySQL pool configured for {}:{}/{}",
            config.host, config.port, config.database
        );
        Self { pool }
    }

    /// Wrap an existing pool
    pub fn with_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Run one query with positional parameters and return the full result set
    pub async fn fetch(&self, sql: &str, params: &[SqlParam]) -> StoreResult<Table> {
        let statement = sql.split_whitespace().collect::<Vec<_>>().join(" ");
        debug!("mysql: {} ({} params)", statement, params.len());

        let mut conn = self.pool.acquire().await?;

        let mut query = sqlx::query(sql);
        for param in params {
            query = match param {
                SqlParam::Int(v) => query.bind(*v),
                SqlParam::Text(s) => query.bind(s.clone()),
            };
        }

        let rows = query.fetch_all(&mut *conn).await?;
        rows_to_table(&rows)
    }
}

fn rows_to_table(rows: &[MySqlRow]) -> StoreResult<Table> {
    let columns = match rows.first() {
        Some(row) => row.columns().iter().map(|c| c.name().to_string()).collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(columns);
    for row in rows {
        let mut cells = Vec::with_capacity(row.len());
        for idx in 0..row.len() {
            cells.push(decode_cell(row, idx)?);
        }
        table.records.push(cells);
    }
    Ok(table)
}

fn decode_cell(row: &MySqlRow, idx: usize) -> StoreResult<serde_json::Value> {
    let type_name = row.columns()[idx].type_info().name().to_string();

    let value = match type_name.as_str() {
        "NULL" => None,
        "BOOLEAN" => row.try_get::<Option<bool>, _>(idx)?.map(serde_json::Value::from),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            row.try_get::<Option<i64>, _>(idx)?.map(serde_json::Value::from)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row.try_get::<Option<u64>, _>(idx)?.map(serde_json::Value::from),
        "FLOAT" | "DOUBLE" => row.try_get::<Option<f64>, _>(idx)?.map(serde_json::Value::from),
        _ => row.try_get::<Option<String>, _>(idx)?.map(serde_json::Value::from),
    };

    Ok(value.unwrap_or(serde_json::Value::Null))
}

#[async_trait]
impl RelationalAccess for MySqlStore {
    async fn university_names(&self) -> StoreResult<Vec<String>> {
        self.fetch(UNIVERSITY_NAMES, &[]).await?.strings("name")
    }

    async fn keyword_names(&self) -> StoreResult<Vec<String>> {
        self.fetch(KEYWORD_NAMES, &[]).await?.strings("name")
    }

    async fn university_count(&self) -> StoreResult<i64> {
        let table = self.fetch(UNIVERSITY_COUNT, &[]).await?;
        let idx = table
            .column("count")
            .ok_or_else(|| StoreError::Decode("missing column `count`".to_string()))?;
        Ok(table
            .records
            .first()
            .and_then(|row| row.get(idx))
            .and_then(|v| v.as_i64())
            .unwrap_or(0))
    }

    async fn top_universities_by_publications(
        &self,
        limit: u32,
        offset: u32,
    ) -> StoreResult<Vec<UniversityPublications>> {
        self.fetch(TOP_BY_PUBLICATIONS, &[limit.into(), offset.into()])
            .await?
            .rows_as()
    }

    async fn top_universities_by_citations(
        &self,
        limit: u32,
        offset: u32,
    ) -> StoreResult<Vec<UniversityCitations>> {
        self.fetch(TOP_BY_CITATIONS, &[limit.into(), offset.into()])
            .await?
            .rows_as()
    }

    async fn top_research_areas(&self, university: &str) -> StoreResult<Vec<ResearchArea>> {
        self.fetch(RESEARCH_AREAS, &[university.into()]).await?.rows_as()
    }

    async fn top_universities_for_keyword(
        &self,
        keyword: &str,
    ) -> StoreResult<Vec<InterestUniversity>> {
        self.fetch(INTEREST_UNIVERSITIES, &[keyword.into()])
            .await?
            .rows_as()
    }

    async fn top_faculty_for_keyword(&self, keyword: &str) -> StoreResult<Vec<InterestFaculty>> {
        self.fetch(INTEREST_FACULTY, &[keyword.into()]).await?.rows_as()
    }

    async fn faculty_interests(&self, faculty: &str) -> StoreResult<Vec<String>> {
        self.fetch(FACULTY_INTERESTS, &[faculty.into()])
            .await?
            .strings("interest")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_conversions() {
        assert_eq!(SqlParam::from(10u32), SqlParam::Int(10));
        assert_eq!(SqlParam::from(-3i64), SqlParam::Int(-3));
        assert_eq!(SqlParam::from("MIT"), SqlParam::Text("MIT".to_string()));
    }

    #[test]
    fn test_placeholder_counts_match_bound_params() {
        assert_eq!(TOP_BY_PUBLICATIONS.matches('?').count(), 2);
        assert_eq!(TOP_BY_CITATIONS.matches('?').count(), 2);
        for sql in [RESEARCH_AREAS, INTEREST_UNIVERSITIES, INTEREST_FACULTY, FACULTY_INTERESTS] {
            assert_eq!(sql.matches('?').count(), 1);
        }
    }

    #[test]
    fn test_pool_errors_classify_as_connection() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Connection(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::ColumnNotFound("count".to_string())),
            StoreError::Decode(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_reports_connection_error() {
        let config = MySqlConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            ..Default::default()
        };
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(std::time::Duration::from_millis(500))
            .connect_lazy_with(
                MySqlConnectOptions::new()
                    .host(&config.host)
                    .port(config.port)
                    .username(&config.user),
            );
        let store = MySqlStore::with_pool(pool);

        let err = store.university_names().await.unwrap_err();
        assert!(matches!(err, StoreError::Connection(_)));
    }
}
