//! Dashboard views
//!
//! Each view composes one or more accessor calls and shapes the rows into a
//! display-ready value. Views hold no state between invocations.
//!
//! Failure policy: relational and graph failures are logged and degrade to an
//! empty or neutral result, so a dead store blanks its panels without taking
//! the page down. Document store failures propagate as [`ViewError::Store`].

pub mod charts;
pub mod panels;
pub mod range;

pub use charts::{BarChart, Datum, PieChart, RankingCharts};
pub use panels::{ContactView, InterestTables, PublicationsView, UpdateStatus};
pub use range::RankRange;

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::ContactField;
use crate::store::{
    DocumentAccess, EmbeddedStore, GraphAccess, RelationalAccess, StoreError, StoreResult,
    TOP_PUBLICATIONS,
};

/// Errors surfaced by a view
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type ViewResult<T> = Result<T, ViewError>;

/// Log a failed degradable accessor call and fall back to the neutral value
fn degrade<T: Default>(store: &str, operation: &str, result: StoreResult<T>) -> T {
    result.unwrap_or_else(|e| {
        error!("{} store: {} failed: {}", store, operation, e);
        T::default()
    })
}

/// A search or update button fires once it has been pressed and every input is filled
fn armed(panel: &str, n_clicks: u64, inputs: &[&str]) -> bool {
    if n_clicks == 0 {
        debug!("{}: not triggered yet", panel);
        return false;
    }
    if inputs.iter().any(|s| s.is_empty()) {
        warn!("{}: triggered with an empty input", panel);
        return false;
    }
    true
}

/// The analytical views over the three stores
#[derive(Clone)]
pub struct Dashboard {
    relational: Arc<dyn RelationalAccess>,
    graph: Arc<dyn GraphAccess>,
    documents: Arc<dyn DocumentAccess>,
}

impl Dashboard {
    pub fn new(
        relational: Arc<dyn RelationalAccess>,
        graph: Arc<dyn GraphAccess>,
        documents: Arc<dyn DocumentAccess>,
    ) -> Self {
        Self {
            relational,
            graph,
            documents,
        }
    }

    /// All three stores served by one in-memory dataset
    pub fn embedded(store: EmbeddedStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store)
    }

    // ---- selector options ----

    pub async fn universities(&self) -> Vec<String> {
        degrade("relational", "university names", self.relational.university_names().await)
    }

    pub async fn research_interests(&self) -> Vec<String> {
        degrade("relational", "keyword names", self.relational.keyword_names().await)
    }

    pub async fn university_count(&self) -> i64 {
        degrade("relational", "university count", self.relational.university_count().await)
    }

    pub async fn faculty_names(&self) -> Vec<String> {
        degrade("graph", "faculty names", self.graph.faculty_names().await)
    }

    /// Keywords of one faculty member's publications
    pub async fn faculty_interests(&self, name: &str) -> Vec<String> {
        if name.is_empty() {
            return Vec::new();
        }
        degrade(
            "relational",
            "faculty interests",
            self.relational.faculty_interests(name).await,
        )
    }

    pub async fn document_faculty_names(&self) -> ViewResult<Vec<String>> {
        Ok(self.documents.faculty_names().await?)
    }

    pub async fn publication_titles(&self) -> ViewResult<Vec<String>> {
        Ok(self.documents.publication_titles().await?)
    }

    pub async fn keywords(&self) -> ViewResult<Vec<String>> {
        Ok(self.documents.keyword_names().await?)
    }

    // ---- charts ----

    /// Both university rankings over one rank range
    pub async fn top_universities(&self, range: RankRange) -> RankingCharts {
        let (limit, offset) = (range.limit(), range.offset());
        let (publications, citations) = tokio::join!(
            self.relational.top_universities_by_publications(limit, offset),
            self.relational.top_universities_by_citations(limit, offset),
        );
        let publications = degrade("relational", "publication ranking", publications);
        let citations = degrade("relational", "citation ranking", citations);
        debug!(
            "rankings {}: {} by publications, {} by citations",
            range,
            publications.len(),
            citations.len()
        );
        RankingCharts {
            publications: BarChart::publications(&publications),
            citations: BarChart::citations(&citations),
        }
    }

    /// Research-area pie for a university; the first listed one when none is given
    pub async fn research_areas(&self, university: &str) -> PieChart {
        let university = if university.is_empty() {
            self.universities().await.into_iter().next()
        } else {
            Some(university.to_string())
        };
        let Some(university) = university else {
            return PieChart::research_areas("", &[]);
        };
        let rows = degrade(
            "relational",
            "research areas",
            self.relational.top_research_areas(&university).await,
        );
        PieChart::research_areas(&university, &rows)
    }

    // ---- triggered panels ----

    /// Top universities and faculty for a research interest
    pub async fn research_interest(&self, n_clicks: u64, keyword: &str) -> InterestTables {
        if !armed("research interest", n_clicks, &[keyword]) {
            return InterestTables::default();
        }
        let (universities, faculty) = tokio::join!(
            self.relational.top_universities_for_keyword(keyword),
            self.relational.top_faculty_for_keyword(keyword),
        );
        InterestTables {
            universities: degrade("relational", "interest universities", universities),
            faculty: degrade("relational", "interest faculty", faculty),
        }
    }

    pub async fn faculty_contact(&self, n_clicks: u64, name: &str) -> ContactView {
        if !armed("faculty contact", n_clicks, &[name]) {
            return ContactView::Hidden;
        }
        match degrade("graph", "contact lookup", self.graph.faculty_contact(name).await) {
            Some(contact) => ContactView::Found { contact },
            None => ContactView::not_found(),
        }
    }

    pub async fn update_email(&self, n_clicks: u64, name: &str, value: &str) -> UpdateStatus {
        self.update_contact(n_clicks, name, ContactField::Email, value).await
    }

    pub async fn update_phone(&self, n_clicks: u64, name: &str, value: &str) -> UpdateStatus {
        self.update_contact(n_clicks, name, ContactField::Phone, value).await
    }

    async fn update_contact(
        &self,
        n_clicks: u64,
        name: &str,
        field: ContactField,
        value: &str,
    ) -> UpdateStatus {
        if !armed("contact update", n_clicks, &[name, value]) {
            return UpdateStatus::Hidden;
        }
        let updated = degrade(
            "graph",
            "contact update",
            self.graph.update_contact(name, field, value).await,
        );
        match updated {
            Some(update) => {
                info!("Updated {} of {}", field, update.name);
                UpdateStatus::updated(field, &update.name, &update.value)
            }
            None => UpdateStatus::failed(field),
        }
    }

    /// Most cited publications for a keyword
    pub async fn top_publications(
        &self,
        n_clicks: u64,
        keyword: &str,
    ) -> ViewResult<PublicationsView> {
        if !armed("top publications", n_clicks, &[keyword]) {
            return Ok(PublicationsView::Hidden);
        }
        let rows = self
            .documents
            .top_publications_for_keyword(keyword, TOP_PUBLICATIONS)
            .await?;
        Ok(PublicationsView::from_rows(rows))
    }
}
