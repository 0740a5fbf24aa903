use std::sync::Arc;

use axum::extract::FromRef;
use printshop_auth::{SecretStore, SessionManager};
use printshop_config::{CorsConfig, SecurityConfig, ServerConfig};
use printshop_observability::PrometheusHandle;
use sqlx::PgPool;

use crate::middleware::auth::AuthGate;
use crate::modules::users::PgUserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub sessions: Arc<SessionManager>,
    pub gate: AuthGate,
    pub cors_config: CorsConfig,
    pub server_config: ServerConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl FromRef<AppState> for AuthGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

/// Session manager over the Postgres user directory and the given secret store.
pub fn build_sessions(
    db: PgPool,
    store: Arc<dyn SecretStore>,
    security: &SecurityConfig,
) -> Arc<SessionManager> {
    let directory = Arc::new(PgUserDirectory::new(db));
    Arc::new(SessionManager::from_config(directory, store, security))
}
