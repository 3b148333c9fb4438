use argon2::{Algorithm, Argon2, Params, Version};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use password_hash::{PasswordHasher, SaltString};
use sea_orm::{ConnectOptions, Database, DbConn};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use super::{
    auth::{AuthProvider, JwtAuth},
    router, AppState,
};
use crate::repository::Repository;
use base::setting;

pub const SECRET: &str = "test-secret";
pub const PASSWORD: &str = "hunter2";

/// Fresh in-memory database with every migration applied.
pub async fn database() -> DbConn {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    db
}

/// A configured user with a cheap argon2 hash of `password`.
pub fn user(username: &str, password: &str) -> setting::User {
    let params = Params::new(64, 1, 1, None).unwrap();
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::from_b64("c2FsdHNhbHRzYWx0").unwrap();
    let hash = argon.hash_password(password.as_bytes(), &salt).unwrap();
    setting::User {
        username: username.to_string(),
        password: hash.to_string(),
        first_name: Some("Admin".to_string()),
        last_name: None,
    }
}

pub fn settings() -> setting::Settings {
    let mut settings = setting::Settings {
        db: "sqlite::memory:".to_string(),
        ..Default::default()
    };
    settings.auth.jwt_secret = SECRET.to_string();
    settings.auth.users = vec![user("admin", PASSWORD)];
    settings
}

pub async fn app() -> (Router, AppState) {
    let state = AppState::new(database().await, &settings());
    (router(state.clone()), state)
}

pub fn token() -> String {
    JwtAuth::new(&settings().auth)
        .issue("admin")
        .unwrap()
        .value
}

pub async fn seed_artist(db: &DbConn, name: &'static str) -> i32 {
    Repository::<_, entity::ArtistEntity>::new(db)
        .insert::<entity::ArtistActive>(vec![
            ("name", name.into()),
            ("nationality", "British".into()),
            ("description", "Seeded".into()),
            ("is_band", "yes".into()),
        ])
        .await
        .unwrap()
        .id
}

pub async fn seed_album(db: &DbConn, artist_id: i32) -> i32 {
    Repository::<_, entity::AlbumEntity>::new(db)
        .insert::<entity::AlbumActive>(vec![
            ("name", "Seeded".into()),
            ("year", 1970.into()),
            ("genre", "Rock".into()),
            ("artist_id", artist_id.into()),
        ])
        .await
        .unwrap()
        .id
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    match body {
        Some(body) => {
            send_raw(app, method, uri, token, Some("application/json"), body.to_string()).await
        }
        None => send_raw(app, method, uri, token, None, String::new()).await,
    }
}

/// Sends `body` verbatim with the given content type.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: String,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    let request = request.body(Body::from(body)).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Drives the router with a valid bearer token.
pub async fn authed(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send(app, method, uri, Some(token().as_str()), body).await
}
