//! MongoStore: document accessor
//!
//! Holds the one long-lived client handle of the process; the driver
//! multiplexes every operation over its own pool.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::ErrorKind;
use mongodb::options::FindOptions;
use mongodb::{Client, Database};
use tracing::{debug, info};

use super::{DocumentAccess, StoreError, StoreResult};
use crate::config::MongoConfig;
use crate::models::PublicationCitations;

/// Collection of publication documents (keywords embedded as sub-documents)
pub const PUBLICATIONS: &str = "publications";

/// Collection of faculty documents
pub const FACULTY: &str = "faculty";

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        match e.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::Authentication { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::ConnectionPoolCleared { .. } => StoreError::Connection(e.to_string()),
            _ => StoreError::Query(e.to_string()),
        }
    }
}

impl From<mongodb::bson::de::Error> for StoreError {
    fn from(e: mongodb::bson::de::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

/// Pipeline selecting the most cited publications tagged with `keyword`
pub fn top_publications_pipeline(keyword: &str, limit: usize) -> Vec<Document> {
    vec![
        doc! { "$match": { "keywords.name": keyword } },
        doc! { "$unwind": "$keywords" },
        doc! { "$match": { "keywords.name": keyword } },
        doc! { "$sort": { "numCitations": -1 } },
        doc! { "$limit": limit as i64 },
        doc! { "$project": { "title": 1, "numCitations": 1 } },
    ]
}

/// Pipeline listing every distinct embedded keyword name as `_id`
pub fn keyword_names_pipeline() -> Vec<Document> {
    vec![
        doc! { "$unwind": "$keywords" },
        doc! { "$group": { "_id": "$keywords.name" } },
    ]
}

/// Document accessor over one database of a MongoDB deployment
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Parse the URI and build the client. The driver connects lazily, so
    /// only a malformed URI fails here.
    pub async fn connect(config: &MongoConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let database = client.database(&config.database);
        info!("MongoDB client ready for database {}", config.database);
        Ok(Self { client, database })
    }

    /// The shared client handle
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Filter a collection, optionally projecting fields
    pub async fn find(
        &self,
        collection: &str,
        filter: Document,
        projection: Option<Document>,
    ) -> StoreResult<Vec<Document>> {
        debug!("mongo find {}: {}", collection, filter);
        let options = FindOptions::builder().projection(projection).build();
        let cursor = self
            .database
            .collection::<Document>(collection)
            .find(filter, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Run an aggregation pipeline over a collection
    pub async fn aggregate(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> StoreResult<Vec<Document>> {
        debug!("mongo aggregate {}: {} stages", collection, pipeline.len());
        let cursor = self
            .database
            .collection::<Document>(collection)
            .aggregate(pipeline, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn project_strings(&self, collection: &str, field: &str) -> StoreResult<Vec<String>> {
        let mut projection = doc! { "_id": 0 };
        projection.insert(field, 1);
        let docs = self.find(collection, doc! {}, Some(projection)).await?;
        docs.iter()
            .map(|d| {
                d.get_str(field)
                    .map(str::to_string)
                    .map_err(|e| StoreError::Decode(format!("{}.{}: {}", collection, field, e)))
            })
            .collect()
    }
}

#[async_trait]
impl DocumentAccess for MongoStore {
    async fn publication_titles(&self) -> StoreResult<Vec<String>> {
        self.project_strings(PUBLICATIONS, "title").await
    }

    async fn faculty_names(&self) -> StoreResult<Vec<String>> {
        self.project_strings(FACULTY, "name").await
    }

    async fn keyword_names(&self) -> StoreResult<Vec<String>> {
        let docs = self.aggregate(PUBLICATIONS, keyword_names_pipeline()).await?;
        Ok(docs
            .iter()
            .filter_map(|d| d.get_str("_id").ok().map(str::to_string))
            .collect())
    }

    async fn top_publications_for_keyword(
        &self,
        keyword: &str,
        limit: usize,
    ) -> StoreResult<Vec<PublicationCitations>> {
        let docs = self
            .aggregate(PUBLICATIONS, top_publications_pipeline(keyword, limit))
            .await?;
        docs.into_iter()
            .map(|d| Ok(mongodb::bson::from_document(d)?))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_pipeline_stages() {
        let pipeline = top_publications_pipeline("Databases", 5);
        let stages: Vec<&str> = pipeline
            .iter()
            .map(|stage| stage.keys().next().map(String::as_str).unwrap_or(""))
            .collect();
        assert_eq!(
            stages,
            vec!["$match", "$unwind", "$match", "$sort", "$limit", "$project"]
        );

        let sort = pipeline[3].get_document("$sort").unwrap();
        assert_eq!(sort.get_i32("numCitations").unwrap(), -1);
        assert_eq!(pipeline[4].get_i64("$limit").unwrap(), 5);
        let filter = pipeline[0].get_document("$match").unwrap();
        assert_eq!(filter.get_str("keywords.name").unwrap(), "Databases");
    }

    #[test]
    fn test_keyword_names_pipeline_groups_by_name() {
        let pipeline = keyword_names_pipeline();
        assert_eq!(pipeline.len(), 2);
        let group = pipeline[1].get_document("$group").unwrap();
        assert_eq!(group.get_str("_id").unwrap(), "$keywords.name");
    }

    #[test]
    fn test_publication_document_decodes() {
        let d = doc! { "_id": 7, "title": "Query Optimization", "numCitations": 42 };
        let row: PublicationCitations = mongodb::bson::from_document(d).unwrap();
        assert_eq!(row.title, "Query Optimization");
        assert_eq!(row.num_citations, 42);
    }

    #[tokio::test]
    async fn test_malformed_uri_is_a_connection_error() {
        let config = MongoConfig {
            uri: "not-a-mongo-uri".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            MongoStore::connect(&config).await,
            Err(StoreError::Connection(_))
        ));
    }
}
