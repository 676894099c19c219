//! Configuration for the shop API

use core_config::{AppInfo, FromEnv, app_info, env_or_default, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use std::path::PathBuf;

pub use core_config::Environment;

/// Application configuration
///
/// | variable | default |
/// |---|---|
/// | `DATABASE_URL` | required |
/// | `ASSETS_DIR` | `assets` |
/// | `RUN_MIGRATIONS` | `true` |
/// | `SEED_DEMO_DATA` | `false` |
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Root holding `images/tshirts/{id}.jpg`
    pub assets_dir: PathBuf,
    pub run_migrations: bool,
    pub seed_demo_data: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            environment,
            assets_dir: PathBuf::from(env_or_default("ASSETS_DIR", "assets")),
            run_migrations: env_parse("RUN_MIGRATIONS", "true")?,
            seed_demo_data: env_parse("SEED_DEMO_DATA", "false")?,
        })
    }
}
