//! Shared application state for the taskgate gateway.
//!
//! Holds the subject resolver, resource store, policy guard, and metrics.
//! Cheap to clone; everything lives behind `Arc`.

use std::sync::Arc;

use axum::http::HeaderMap;
use taskgate_core::error::Result;
use taskgate_core::Subject;

use crate::config::GatewayConfig;
use crate::context::{bearer_ticket, StaticSubjectResolver, SubjectResolver};
use crate::obs::metrics::GatewayMetrics;
use crate::policy::Guard;
use crate::store::{MemoryStore, ResourceStore};

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<dyn SubjectResolver>,
    store: Arc<dyn ResourceStore>,
    guard: Guard,
    metrics: Arc<GatewayMetrics>,
}

impl AppState {
    /// Build state from a validated config: static resolver + seeded memory store.
    pub fn new(cfg: &GatewayConfig) -> Self {
        let resolver = Arc::new(StaticSubjectResolver::new(&cfg.subjects));
        let store = Arc::new(MemoryStore::seeded(&cfg.seed));
        tracing::info!(
            subjects = cfg.subjects.len(),
            seed_tasks = cfg.seed.tasks.len(),
            seed_comments = cfg.seed.comments.len(),
            "app state ready"
        );
        Self::with_parts(resolver, store)
    }

    /// Build state around custom collaborators.
    pub fn with_parts(resolver: Arc<dyn SubjectResolver>, store: Arc<dyn ResourceStore>) -> Self {
        let metrics = Arc::new(GatewayMetrics::default());
        Self {
            resolver,
            store,
            guard: Guard::new(Arc::clone(&metrics)),
            metrics,
        }
    }

    /// Resolve the acting subject from request headers.
    pub fn subject(&self, headers: &HeaderMap) -> Result<Subject> {
        let resolved = bearer_ticket(headers).and_then(|ticket| self.resolver.resolve(ticket));
        if let Err(e) = &resolved {
            self.metrics.auth_failures.inc(&[("reason", e.client_code().as_str())]);
        }
        resolved
    }

    pub fn resolver(&self) -> &dyn SubjectResolver {
        self.resolver.as_ref()
    }

    pub fn store(&self) -> &dyn ResourceStore {
        self.store.as_ref()
    }

    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }
}
