pub mod auth;
mod catalog;
pub mod error;
pub mod extract;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

use axum::{
    http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Router,
};
use sea_orm::DbConn;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use auth::{AuthProvider, JwtAuth};
use base::setting::{Settings, User};

#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub auth: Arc<dyn AuthProvider>,
    pub users: Arc<Vec<User>>,
}

impl AppState {
    pub fn new(db: DbConn, settings: &Settings) -> Self {
        Self {
            db,
            auth: Arc::new(JwtAuth::new(&settings.auth)),
            users: Arc::new(settings.auth.users.to_owned()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(AllowOrigin::mirror_request())
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);
    let tracing = TraceLayer::new_for_http();
    Router::new()
        .nest("/api", catalog::router(&state))
        .layer(cors)
        .layer(tracing)
        .with_state(state)
}
