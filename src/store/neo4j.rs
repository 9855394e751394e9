//! Neo4jStore: graph accessor
//!
//! Wraps a `neo4rs::Graph`, whose internal pool hands each query a Bolt
//! session that is returned when the row stream drops. The driver is built on
//! first use so an unreachable server fails the query, not the process.

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph};
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::{GraphAccess, StoreError, StoreResult};
use crate::config::Neo4jConfig;
use crate::models::{ContactField, ContactUpdate, FacultyContact};

const FACULTY_NAMES: &str = "MATCH (f:Faculty) RETURN f.name AS name";

const FACULTY_CONTACT: &str = r#"
    MATCH (f:Faculty {name: $name})-[:AFFILIATION_WITH]->(i:Institute)
    RETURN f.name AS name, f.email AS email, f.phone AS phone, i.name AS institute
"#;

const UPDATE_EMAIL: &str = r#"
    MATCH (f:Faculty {name: $name})
    SET f.email = $email
    RETURN f.name AS name, f.email AS email
"#;

const UPDATE_PHONE: &str = r#"
    MATCH (f:Faculty {name: $name})
    SET f.phone = $phone
    RETURN f.name AS name, f.phone AS phone
"#;

/// One flat result record: column name to string value (null when absent)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphRecord(BTreeMap<String, Option<String>>);

impl GraphRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.0.insert(key.into(), value);
    }

    /// Non-null value of a column
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    /// Non-null value of a column, or a decode error naming it
    pub fn require(&self, key: &str) -> StoreResult<String> {
        self.get(key)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Decode(format!("record has no `{}`", key)))
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for GraphRecord {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<neo4rs::Error> for StoreError {
    fn from(e: neo4rs::Error) -> Self {
        StoreError::Query(e.to_string())
    }
}

/// Graph accessor backed by a pooled Bolt driver
pub struct Neo4jStore {
    config: Neo4jConfig,
    graph: OnceCell<Graph>,
}

impl Neo4jStore {
    pub fn new(config: Neo4jConfig) -> Self {
        Self {
            config,
            graph: OnceCell::new(),
        }
    }

    async fn graph(&self) -> StoreResult<&Graph> {
        self.graph
            .get_or_try_init(|| async {
                let config = ConfigBuilder::default()
                    .uri(self.config.uri.as_str())
                    .user(self.config.user.as_str())
                    .password(self.config.password.as_str())
                    .db(self.config.database.as_str())
                    .max_connections(self.config.max_connections)
                    .build()
                    .map_err(|e| StoreError::Connection(e.to_string()))?;

                let graph = Graph::connect(config)
                    .await
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
                info!("Connected to Neo4j at {}", self.config.uri);
                Ok(graph)
            })
            .await
    }

    /// Run a pattern query with named string parameters and read back the
    /// listed columns of every record
    pub async fn run(
        &self,
        cypher: &str,
        params: &[(&str, &str)],
        columns: &[&str],
    ) -> StoreResult<Vec<GraphRecord>> {
        debug!("neo4j: {}", cypher.split_whitespace().collect::<Vec<_>>().join(" "));

        let graph = self.graph().await?;

        let mut q = query(cypher);
        for (key, value) in params {
            q = q.param(key, *value);
        }

        let mut stream = graph.execute(q).await?;
        let mut records = Vec::new();
        while let Some(row) = stream.next().await? {
            let mut record = GraphRecord::new();
            for column in columns {
                let value: Option<String> = row
                    .get(column)
                    .map_err(|e| StoreError::Decode(format!("{}: {}", column, e)))?;
                record.insert(*column, value);
            }
            records.push(record);
        }
        Ok(records)
    }
}

#[async_trait]
impl GraphAccess for Neo4jStore {
    async fn faculty_names(&self) -> StoreResult<Vec<String>> {
        let records = self.run(FACULTY_NAMES, &[], &["name"]).await?;
        Ok(records
            .iter()
            .filter_map(|r| r.get("name").map(str::to_string))
            .collect())
    }

    async fn faculty_contact(&self, name: &str) -> StoreResult<Option<FacultyContact>> {
        let records = self
            .run(
                FACULTY_CONTACT,
                &[("name", name)],
                &["name", "email", "phone", "institute"],
            )
            .await?;

        let Some(record) = records.into_iter().next() else {
            return Ok(None);
        };
        Ok(Some(FacultyContact {
            name: record.require("name")?,
            email: record.get("email").map(str::to_string),
            phone: record.get("phone").map(str::to_string),
            institute: record.require("institute")?,
        }))
    }

    async fn update_contact(
        &self,
        name: &str,
        field: ContactField,
        value: &str,
    ) -> StoreResult<Option<ContactUpdate>> {
        let cypher = match field {
            ContactField::Email => UPDATE_EMAIL,
            ContactField::Phone => UPDATE_PHONE,
        };
        let records = self
            .run(
                cypher,
                &[("name", name), (field.as_str(), value)],
                &["name", field.as_str()],
            )
            .await?;

        let Some(record) = records.into_iter().next() else {
            return Ok(None);
        };
        Ok(Some(ContactUpdate {
            name: record.require("name")?,
            value: record.require(field.as_str())?,
        }))
    }
}
