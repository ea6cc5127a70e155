mod auth_routes;
mod backend;
pub mod config;
mod register_route;
pub mod session;

use std::sync::OnceLock;

use axum::Router;
use axum::http::HeaderMap;
use dioxus::fullstack::FullstackContext;
use tracing_subscriber::{EnvFilter, fmt};
use types::{Result, Section, err};

use crate::{
    auth_routes::{RouteState, auth_router},
    config::Config,
    register_route::register_router,
};
pub use crate::backend::BackendClient;
pub use crate::session::UserSession;

static BACKEND: OnceLock<BackendClient> = OnceLock::new();

/// Install the tracing subscriber. `RUST_LOG` overrides the default `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Load configuration, build the backend client and return the console's
/// own axum routes.
pub async fn init() -> Result<Router> {
    let config = config::init()?;
    let backend = BackendClient::new(config)?;
    let backend = BACKEND.get_or_init(|| backend);

    tracing::info!(backend_url = %config.backend_url, "console server initialised");

    Ok(routes(config, backend.clone()))
}

/// The console's own axum routes: login/logout and the multipart
/// registration upload.
pub fn routes(config: &'static Config, backend: BackendClient) -> Router {
    let state = RouteState { config, backend };
    auth_router(state.clone()).merge(register_router(state))
}

pub fn backend() -> Result<&'static BackendClient> {
    BACKEND
        .get()
        .ok_or_else(|| err!("backend client has not been initialised"))
}

/// Extract and verify the session from the request's cookies.
pub async fn get_session_from_cookie() -> Result<UserSession> {
    let headers: HeaderMap = FullstackContext::extract()
        .await
        .map_err(|e| err!("failed to read request headers: {e}"))?;

    UserSession::from_headers(&headers, &config::get()?.signing_secret)
}

/// Require a session whose role may use `section`.
pub async fn require_section(section: Section) -> Result<UserSession> {
    let session = get_session_from_cookie().await?;
    session.require(section)?;
    Ok(session)
}
