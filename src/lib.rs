#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;

use config::{ConfigFairing, DatabaseFairing};
use logging::LoggerFairing;

/// Assemble the server. The database connection is made on ignition.
pub fn build() -> Rocket<Build> {
    with_routes(rocket::build()).attach(DatabaseFairing)
}

/// Attach everything except the database.
fn with_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .attach(LoggerFairing)
        .attach(ConfigFairing)
        .attach(Template::fairing())
        .mount("/", api::routes())
        .register("/", api::catchers())
}

/// Assemble the server around an existing connection, using the named database.
#[cfg(test)]
pub(crate) async fn rocket_for_db(client: mongodb::Client, db_name: &str) -> Rocket<Build> {
    let db = client.database(db_name);
    model::mongodb::ensure_indexes_exist(&db)
        .await
        .expect("Failed to create test indexes");
    with_routes(rocket::build()).manage(client).manage(db)
}

/// Connect to the database server named in the test config.
#[cfg(test)]
pub(crate) async fn db_client() -> mongodb::Client {
    let config: config::DbConfig = rocket::Config::figment()
        .extract()
        .expect("`db_uri` not set");
    mongodb::Client::with_uri_str(config.db_uri())
        .await
        .expect("Could not connect to test database")
}

/// Get a fresh database name, so concurrent tests do not collide.
#[cfg(test)]
pub(crate) fn database() -> String {
    let random: u32 = rand::random();
    let db = format!("test{random}");
    log::info!("Using database {db}");
    db
}
