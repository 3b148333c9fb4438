use axum::extract::State;
use sea_orm::EntityTrait;
use serde::Serialize;

use crate::api::{error::Error, extract::Json, AppState};

#[derive(Serialize)]
pub struct Users {
    users: Vec<entity::User>,
}

pub async fn users(State(state): State<AppState>) -> Result<Json<Users>, Error> {
    let users = entity::UserEntity::find().all(&state.db).await?;
    Ok(Json(Users { users }))
}
