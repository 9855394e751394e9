//! HTTP server for the dashboard API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use super::handler::*;
use crate::config::ServerConfig;
use crate::refresh::RefreshTask;
use crate::views::Dashboard;

/// Build the API router over a dashboard and an optional refresh task
pub fn router(dashboard: Dashboard, refresh: Option<Arc<RefreshTask>>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/options/universities", get(universities_handler))
        .route("/api/options/university-count", get(university_count_handler))
        .route("/api/options/interests", get(interests_handler))
        .route("/api/options/faculty", get(faculty_handler))
        .route("/api/options/document-faculty", get(document_faculty_handler))
        .route("/api/options/keywords", get(keywords_handler))
        .route("/api/options/titles", get(titles_handler))
        .route("/api/rankings", get(rankings_handler))
        .route("/api/rankings/latest", get(latest_rankings_handler))
        .route("/api/research-areas", get(research_areas_handler))
        .route("/api/interest", get(interest_handler))
        .route("/api/faculty/contact", get(contact_handler))
        .route("/api/faculty/interests", get(faculty_interests_handler))
        .route("/api/faculty/email", post(update_email_handler))
        .route("/api/faculty/phone", post(update_phone_handler))
        .route("/api/publications", get(publications_handler))
        .layer(CorsLayer::permissive())
        .with_state(AppState { dashboard, refresh })
}

/// HTTP server exposing the dashboard views
pub struct HttpServer {
    dashboard: Dashboard,
    refresh: Option<Arc<RefreshTask>>,
    config: ServerConfig,
}

impl HttpServer {
    pub fn new(
        dashboard: Dashboard,
        refresh: Option<Arc<RefreshTask>>,
        config: ServerConfig,
    ) -> Self {
        Self {
            dashboard,
            refresh,
            config,
        }
    }

    /// Bind and serve until the listener fails
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let app = router(self.dashboard.clone(), self.refresh.clone());

        let addr = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Dashboard API available at http://{}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
