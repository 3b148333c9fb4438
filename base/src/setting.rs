use directories::ProjectDirs;
use rand::distributions::{Alphanumeric, DistString};
use serde_derive::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use super::{util, CLI_NAME};

static DEFAULT_DB_FILE: &str = "catalog.db";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not locate program directories")]
    NoProjectDirs,

    #[error("Could not parse the config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not prepare the data directory: {0}")]
    DataDir(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    Path(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub db: String,
    #[serde(default = "default_db_connections")]
    pub db_connections: u32,

    #[serde(default)]
    pub auth: Auth,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db: String::new(),
            db_connections: default_db_connections(),
            auth: Auth::default(),
        }
    }
}

fn default_db_connections() -> u32 {
    16
}

fn default_token_days() -> i64 {
    7
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Auth {
    #[serde(default)]
    pub jwt_secret: String,
    /// Lifetime of issued bearer tokens, in days
    #[serde(default = "default_token_days")]
    pub token_days: i64,

    #[serde(default)]
    pub users: Vec<User>,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_days: default_token_days(),
            users: Vec::new(),
        }
    }
}

/// A locally configured account. `password` holds a PHC string as printed by
/// the `hash-password` command.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

fn project_dirs() -> Result<ProjectDirs, SettingsError> {
    ProjectDirs::from("com", "github", CLI_NAME).ok_or(SettingsError::NoProjectDirs)
}

pub fn load(path: Option<PathBuf>) -> Result<Settings, SettingsError> {
    let path = match path {
        Some(path) => path,
        None => project_dirs()?
            .config_dir()
            .join(PathBuf::from("config.toml")),
    };
    tracing::info! {?path, "Loading config file"};
    let content = fs::read_to_string(path).unwrap_or_else(|_| "".to_string());
    let mut set: Settings = toml::from_str(content.as_str())?;
    set = generate_default(set)?;
    tracing::trace! {db = %set.db, users = set.auth.users.len(), "Loaded settings"};
    Ok(set)
}

pub fn generate_default(mut set: Settings) -> Result<Settings, SettingsError> {
    if set.db == String::default() {
        let data_dir = project_dirs()?.data_dir().to_path_buf();
        util::mkdirp(&data_dir)?;
        set.db = format!(
            "sqlite://{}?mode=rwc",
            util::path_to_str(&data_dir.join(DEFAULT_DB_FILE))?
        );
    }
    if set.auth.jwt_secret == String::default() {
        set.auth.jwt_secret = Alphanumeric.sample_string(&mut rand::thread_rng(), 32);
        tracing::warn!("Using random JWT secret. Please define one in the config to make authentication persistant across restarts");
    }
    Ok(set)
}
