use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use thiserror::Error;

use super::setting::Settings;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database url is empty, run the settings through generate_default first")]
    MissingUrl,

    #[error("Error while connecting to the database: {0}")]
    Database(#[from] DbErr),
}

pub async fn open_database(settings: &Settings) -> Result<DatabaseConnection, DatabaseError> {
    let url = &settings.db;
    if url.is_empty() {
        return Err(DatabaseError::MissingUrl);
    }
    tracing::trace! {%url, "Connecting to database"};
    let mut opt = ConnectOptions::new(url.to_owned());
    opt.max_connections(settings.db_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true);
    Database::connect(opt)
        .await
        .map_err(DatabaseError::Database)
}
