//! Store accessors
//!
//! The dashboard reads from three independently managed databases:
//!
//! - a relational store (universities, faculty, publications, keywords)
//! - a graph store (Faculty and Institute nodes, AFFILIATION_WITH edges)
//! - a document store (faculty and publication documents with embedded keywords)
//!
//! Each store is reached through an async domain trait. The native backends
//! ([`MySqlStore`], [`Neo4jStore`], [`MongoStore`]) implement them by issuing
//! queries; [`EmbeddedStore`] implements all three in-process over an in-memory
//! dataset. Every accessor reports failures the same way, as a [`StoreError`];
//! the view layer decides whether a failure degrades or propagates.

pub mod embedded;
pub mod mongo;
pub mod mysql;
pub mod neo4j;

pub use embedded::{AcademicWorld, EmbeddedStore};
pub use mongo::MongoStore;
pub use mysql::{MySqlStore, SqlParam};
pub use neo4j::{GraphRecord, Neo4jStore};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    ContactField, ContactUpdate, FacultyContact, InterestFaculty, InterestUniversity,
    PublicationCitations, ResearchArea, UniversityCitations, UniversityPublications,
};

/// Row cap of the research-area and research-interest rankings
pub const TOP_RANKED: usize = 10;

/// Row cap of the publications-by-keyword list
pub const TOP_PUBLICATIONS: usize = 5;

/// Errors raised by any store accessor
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store unreachable or authentication rejected
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query rejected or failed during execution
    #[error("Query error: {0}")]
    Query(String),

    /// Response did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Tabular result set: ordered columns and ordered rows of JSON cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column names, in select order
    pub columns: Vec<String>,
    /// Rows, each with one cell per column
    pub records: Vec<Vec<serde_json::Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a named column
    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All string cells of one column, skipping nulls
    pub fn strings(&self, name: &str) -> StoreResult<Vec<String>> {
        if self.records.is_empty() {
            return Ok(Vec::new());
        }
        let idx = self
            .column(name)
            .ok_or_else(|| StoreError::Decode(format!("missing column `{}`", name)))?;
        Ok(self
            .records
            .iter()
            .filter_map(|row| row.get(idx).and_then(|v| v.as_str()).map(str::to_string))
            .collect())
    }

    /// Decode every row into `T`, matching struct fields to column names
    pub fn rows_as<T: DeserializeOwned>(&self) -> StoreResult<Vec<T>> {
        self.records
            .iter()
            .map(|row| {
                let object: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                serde_json::from_value(serde_json::Value::Object(object))
                    .map_err(|e| StoreError::Decode(e.to_string()))
            })
            .collect()
    }
}

/// Relational store operations used by the view layer
#[async_trait]
pub trait RelationalAccess: Send + Sync {
    /// Distinct university names
    async fn university_names(&self) -> StoreResult<Vec<String>>;

    /// Distinct keyword names
    async fn keyword_names(&self) -> StoreResult<Vec<String>>;

    /// Number of distinct universities
    async fn university_count(&self) -> StoreResult<i64>;

    /// Universities by total publications, descending, sliced by limit/offset
    async fn top_universities_by_publications(
        &self,
        limit: u32,
        offset: u32,
    ) -> StoreResult<Vec<UniversityPublications>>;

    /// Universities by summed citations, descending, sliced by limit/offset
    async fn top_universities_by_citations(
        &self,
        limit: u32,
        offset: u32,
    ) -> StoreResult<Vec<UniversityCitations>>;

    /// Top keywords of one university by distinct publication count
    async fn top_research_areas(&self, university: &str) -> StoreResult<Vec<ResearchArea>>;

    /// Top universities for a keyword by (publications, faculty), descending
    async fn top_universities_for_keyword(
        &self,
        keyword: &str,
    ) -> StoreResult<Vec<InterestUniversity>>;

    /// Top faculty for a keyword by (publications, citations), descending
    async fn top_faculty_for_keyword(&self, keyword: &str) -> StoreResult<Vec<InterestFaculty>>;

    /// Distinct keywords of one faculty member's publications
    async fn faculty_interests(&self, faculty: &str) -> StoreResult<Vec<String>>;
}

/// Graph store operations used by the view layer
#[async_trait]
pub trait GraphAccess: Send + Sync {
    /// Names of all Faculty nodes
    async fn faculty_names(&self) -> StoreResult<Vec<String>>;

    /// Contact details and institute of the first Faculty node with this name.
    /// `None` when no affiliated node matches.
    async fn faculty_contact(&self, name: &str) -> StoreResult<Option<FacultyContact>>;

    /// Set one contact attribute on every Faculty node with this name.
    /// `None` when no node matches.
    async fn update_contact(
        &self,
        name: &str,
        field: ContactField,
        value: &str,
    ) -> StoreResult<Option<ContactUpdate>>;
}

/// Document store operations used by the view layer
#[async_trait]
pub trait DocumentAccess: Send + Sync {
    /// Titles of all publication documents
    async fn publication_titles(&self) -> StoreResult<Vec<String>>;

    /// Names of all faculty documents
    async fn faculty_names(&self) -> StoreResult<Vec<String>>;

    /// Distinct keyword names embedded in publications
    async fn keyword_names(&self) -> StoreResult<Vec<String>>;

    /// Most cited publications tagged with a keyword
    async fn top_publications_for_keyword(
        &self,
        keyword: &str,
        limit: usize,
    ) -> StoreResult<Vec<PublicationCitations>>;
}
