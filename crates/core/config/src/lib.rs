#[macro_use]
extern crate log;

use cached::proc_macro::cached;
use config::{Config, File, FileFormat};
use evently_result::{create_error, Result};
use futures_locks::RwLock;
use once_cell::sync::Lazy;
use serde::Deserialize;

/// Environment variable holding the MongoDB connection string
pub const MONGODB_URI: &str = "MONGODB_URI";

/// Environment variable overriding the database name
pub const MONGODB_DATABASE: &str = "MONGODB_DATABASE";

static CONFIG_BUILDER: Lazy<RwLock<Config>> = Lazy::new(|| {
    RwLock::new({
        let mut builder = Config::builder().add_source(File::from_str(
            include_str!("../Evently.toml"),
            FileFormat::Toml,
        ));

        if std::path::Path::new("Evently.toml").exists() {
            builder = builder.add_source(File::new("Evently.toml", FileFormat::Toml));
        }

        builder
            .set_override_option("database.mongodb", std::env::var(MONGODB_URI).ok())
            .and_then(|builder| {
                builder.set_override_option("database.name", std::env::var(MONGODB_DATABASE).ok())
            })
            .and_then(|builder| builder.build())
            .expect("Failed to build configuration.")
    })
});

#[derive(Deserialize, Debug, Clone)]
pub struct Database {
    pub mongodb: String,
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub database: Database,
}

impl Settings {
    /// Get the MongoDB connection string, failing if it was never configured
    pub fn require_mongodb(&self) -> Result<String> {
        required(&self.database.mongodb, MONGODB_URI)
    }
}

fn required(value: &str, key: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(create_error!(MissingConfiguration {
            key: key.to_string()
        }))
    } else {
        Ok(value.to_string())
    }
}

/// Load configuration and make sure everything required is present
///
/// Call this at process start, it panics if the connection string is missing.
pub async fn init() {
    let settings = config().await;

    if let Err(error) = settings.require_mongodb() {
        panic!("{error}");
    }

    info!(
        "Loaded configuration, using database `{}`.",
        settings.database.name
    );
}

/// Configure logging and common Rust variables
pub fn setup_logging() {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    pretty_env_logger::try_init().ok();
}

pub async fn read() -> Config {
    CONFIG_BUILDER.read().await.clone()
}

#[cached(time = 30)]
pub async fn config() -> Settings {
    read()
        .await
        .try_deserialize::<Settings>()
        .expect("Configuration does not match the expected layout.")
}
