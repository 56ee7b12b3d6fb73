//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction. Every field is
//! either an `Arc` or internally reference counted, so cloning per
//! request is cheap.

use crate::config::AppConfig;
use crate::repositories::Repositories;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage behind the services
    pub repos: Repositories,
    /// Pool used by the readiness probe; `None` with the memory backend
    pub db: Option<PgPool>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Prometheus render handle, absent when no recorder was installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// State over a Postgres pool
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self {
            repos: Repositories::postgres(db.clone()),
            db: Some(db),
            config: Arc::new(config),
            metrics: None,
        }
    }

    /// State over a fresh in-memory store
    pub fn in_memory(config: AppConfig) -> Self {
        Self {
            repos: Repositories::in_memory(),
            db: None,
            config: Arc::new(config),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn repos(&self) -> &Repositories {
        &self.repos
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
