use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use f1stats::{
    data::Snapshot,
    shared::AppState,
    stats::{handlers, DataSource, StatsBackend, StatsService, StatsServiceFactory},
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

/// The same data served by both backends
pub struct BackendPair {
    pub query: Arc<dyn StatsService>,
    pub views: Arc<dyn StatsService>,
}

impl BackendPair {
    pub fn new(snapshot: Snapshot) -> Self {
        let source = DataSource::InMemory(Arc::new(snapshot));
        Self {
            query: StatsServiceFactory::create(StatsBackend::Query, &source),
            views: StatsServiceFactory::create(StatsBackend::Views, &source),
        }
    }
}

/// Router wired the way the server wires it
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(backend: StatsBackend, snapshot: Snapshot) -> Self {
        let source = DataSource::InMemory(Arc::new(snapshot));
        let service = StatsServiceFactory::create(backend, &source);
        Self {
            router: handlers::router().with_state(AppState::new(service)),
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }
}
