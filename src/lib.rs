pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod templates;

use std::sync::Arc;

use config::{AppConfig, ColorTable};
use services::summary::SummaryLoader;
use services::users::PrincipalStore;
use templates::TemplateRegistry;

/// Shared application state passed to all Axum handlers.
///
/// Everything here is read-only after startup; collaborators are trait
/// objects so tests can swap in in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub colors: Arc<ColorTable>,
    pub templates: Arc<TemplateRegistry>,
    pub summaries: Arc<dyn SummaryLoader>,
    pub principals: Arc<dyn PrincipalStore>,
}
