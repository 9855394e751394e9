//! Scholarboard
//!
//! Analytical views over an academic dataset split across three stores:
//! universities, faculty, publications and keywords in a relational store;
//! faculty contact details and institute affiliations in a graph store;
//! faculty and publication documents in a document store.
//!
//! # Architecture
//!
//! - [`store`]: one async accessor trait per store, with MySQL, Neo4j and
//!   MongoDB backends plus an in-memory [`EmbeddedStore`] serving all three
//! - [`views`]: the [`Dashboard`], composing accessor calls into charts,
//!   tables and status panels
//! - [`refresh`]: periodic re-query of the ranking charts
//! - [`http`]: JSON API over the dashboard, consumed by the CLI
//!
//! ## Example Usage
//!
//! ```rust
//! use scholarboard::{AcademicWorld, Dashboard, EmbeddedStore, RankRange};
//!
//! let mut world = AcademicWorld::new();
//! let mit = world.add_university("MIT");
//! let ada = world.add_faculty("Ada Lovelace", Some(mit));
//! let paper = world.add_publication("Analytical Engines", 12, &["Computing"]);
//! world.author(ada, paper);
//!
//! let dashboard = Dashboard::embedded(EmbeddedStore::new(world));
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let charts = runtime.block_on(dashboard.top_universities(RankRange::default()));
//! assert_eq!(charts.publications.labels(), vec!["MIT"]);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod http;
pub mod models;
pub mod refresh;
pub mod store;
pub mod views;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, DashboardConfig};

pub use models::{
    ContactField, ContactUpdate, FacultyContact, InterestFaculty, InterestUniversity,
    PublicationCitations, ResearchArea, UniversityCitations, UniversityPublications,
};

pub use store::{
    AcademicWorld, DocumentAccess, EmbeddedStore, GraphAccess, MongoStore, MySqlStore,
    Neo4jStore, RelationalAccess, StoreError, StoreResult, Table,
};

pub use views::{
    BarChart, ContactView, Dashboard, InterestTables, PieChart, PublicationsView, RankRange,
    RankingCharts, UpdateStatus, ViewError, ViewResult,
};

pub use refresh::{RankingSnapshot, RefreshTask};

pub use http::HttpServer;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
