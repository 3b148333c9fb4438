mod albums;
mod artists;
mod members;
mod songs;
mod users;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, IntoActiveModel, PrimaryKeyTrait,
    TransactionTrait,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::{
    auth,
    error::Error,
    extract::{Json, Path},
    validation::{validate, Mode, Rule},
    AppState,
};
use crate::repository::Repository;

/// A catalog entity exposed through the generic list/create/update/destroy
/// handlers.
pub trait Catalog: EntityTrait + 'static {
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send + Sync;

    /// Capitalized name used in response messages
    const LABEL: &'static str;
    /// Path segment of the mutating routes
    const SINGULAR: &'static str;
    /// Path segment of the listing route and key of its envelope
    const PLURAL: &'static str;
    const RULES: &'static [Rule];
}

#[derive(Serialize)]
pub struct Product<M> {
    pub product: M,
}

#[derive(Serialize)]
pub struct Deleted {
    pub message: String,
    pub id: i32,
}

pub async fn list<E>(
    State(state): State<AppState>,
) -> Result<Json<HashMap<&'static str, Vec<E::Model>>>, Error>
where
    E: Catalog,
    E::Model: Serialize,
{
    let records = Repository::<_, E>::new(&state.db).all().await?;
    Ok(Json([(E::PLURAL, records)].into()))
}

pub async fn create<E>(
    State(state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Product<E::Model>>), Error>
where
    E: Catalog,
    E::Model: Serialize + IntoActiveModel<E::Active>,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
{
    let tx = state.db.begin().await?;
    let values = validate(&tx, E::RULES, &payload, Mode::Create).await?;
    let record = Repository::<_, E>::new(&tx)
        .insert::<E::Active>(values)
        .await?;
    tx.commit().await?;
    tracing::info!(resource = E::SINGULAR, "Created record");
    Ok((StatusCode::CREATED, Json(Product { product: record })))
}

pub async fn update<E>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<Product<E::Model>>, Error>
where
    E: Catalog,
    E::Model: Serialize + IntoActiveModel<E::Active>,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
{
    let tx = state.db.begin().await?;
    let values = validate(&tx, E::RULES, &payload, Mode::Update).await?;
    let record = Repository::<_, E>::new(&tx)
        .update::<E::Active>(id, values)
        .await?
        .ok_or(Error::NotFound)?;
    tx.commit().await?;
    tracing::info!(resource = E::SINGULAR, id, "Updated record");
    Ok(Json(Product { product: record }))
}

pub async fn destroy<E>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Deleted>, Error>
where
    E: Catalog,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
{
    if !Repository::<_, E>::new(&state.db).delete(id).await? {
        return Err(Error::NotFound);
    }
    tracing::info!(resource = E::SINGULAR, id, "Deleted record");
    Ok(Json(Deleted {
        message: format!("{} deleted successfully", E::LABEL),
        id,
    }))
}

fn mutations<E>(router: Router<AppState>) -> Router<AppState>
where
    E: Catalog,
    E::Model: Serialize + IntoActiveModel<E::Active>,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
{
    router
        .route(&format!("/{}", E::SINGULAR), post(create::<E>))
        .route(
            &format!("/{}/:id", E::SINGULAR),
            patch(update::<E>).delete(destroy::<E>),
        )
}

fn listing<E>(router: Router<AppState>) -> Router<AppState>
where
    E: Catalog,
    E::Model: Serialize,
{
    router.route(&format!("/{}", E::PLURAL), get(list::<E>))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let mut router = Router::new();
    router = mutations::<entity::ArtistEntity>(router);
    router = mutations::<entity::MemberEntity>(router);
    router = mutations::<entity::AlbumEntity>(router);
    router = mutations::<entity::SongEntity>(router);
    router = router
        .route("/users", get(users::users))
        .route_layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    router = listing::<entity::ArtistEntity>(router);
    router = listing::<entity::MemberEntity>(router);
    router = listing::<entity::AlbumEntity>(router);
    router = listing::<entity::SongEntity>(router);
    router.route("/user/login", post(auth::login))
}
