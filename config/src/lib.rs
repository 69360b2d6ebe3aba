use std::fs::File;

use anyhow::Result;
use api::ApiConfig;
use app::AppConfig;
use db::DbConfig;
use log::LogConfig;
use serde::Deserialize;
use storage::StorageConfig;
use token::TokenConfig;

pub mod api;
pub mod app;
pub mod db;
pub mod log;
pub mod storage;
pub mod token;

#[derive(Deserialize)]
pub struct Config {
    app: AppConfig,
    log: LogConfig,
    db: DbConfig,
    storage: StorageConfig,
    token: TokenConfig,
    api: ApiConfig,
}

impl Config {
    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn log(&self) -> &LogConfig {
        &self.log
    }

    pub fn db(&self) -> &DbConfig {
        &self.db
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn token(&self) -> &TokenConfig {
        &self.token
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }
}

pub fn from_path(path: &str) -> Result<Config> {
    let file = File::open(path)?;
    Ok(serde_yaml::from_reader::<_, Config>(file)?)
}

pub fn from_str(yaml: &str) -> Result<Config> {
    Ok(serde_yaml::from_str::<Config>(yaml)?)
}
