use mongodb::{error::Error as DbError, Client, Database};
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::mongodb::ensure_indexes_exist;

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_latest_questions")]
    latest_questions: u32,
}

impl Config {
    /// How many questions the index page lists.
    /// Configured via `LATEST_QUESTIONS`.
    pub fn latest_questions(&self) -> u32 {
        self.latest_questions
    }
}

fn default_latest_questions() -> u32 {
    5
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        if config.latest_questions == 0 {
            error!("`latest_questions` must be at least 1");
            return Err(rocket);
        }

        Ok(rocket.manage(config))
    }
}

/// Configuration for the database.
#[derive(Debug, Deserialize)]
pub struct DbConfig {
    // secrets
    db_uri: String,
    // non-secrets
    #[serde(default = "default_db_name")]
    db_name: String,
}

impl DbConfig {
    /// MongoDB connection string.
    pub fn db_uri(&self) -> &str {
        &self.db_uri
    }

    /// Name of the database holding the polls.
    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    /// Connect and return both the client and the configured database.
    pub async fn connect(&self) -> Result<(Client, Database), DbError> {
        let client = Client::with_uri_str(&self.db_uri).await?;
        let db = client.database(&self.db_name);
        Ok((client, db))
    }
}

fn default_db_name() -> String {
    "polls".to_string()
}

/// A fairing that loads the MongoDB config, connects to the database,
/// ensures the indexes exist, and places both a `Client` and a `Database`
/// into managed state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");
        let (client, db) = match config.connect().await {
            Ok(connection) => connection,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };

        if let Err(e) = ensure_indexes_exist(&db).await {
            error!("Failed to create indexes on '{}': {e}", config.db_name());
            return Err(rocket);
        }
        info!("...database connection online!");

        Ok(rocket.manage(client).manage(db))
    }
}
