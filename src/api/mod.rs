use rocket::{Catcher, Route};

mod common;
mod create;
mod public;
mod voting;

pub use common::FormResponse;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(public::routes());
    routes.extend(voting::routes());
    routes.extend(create::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![common::not_found]
}
