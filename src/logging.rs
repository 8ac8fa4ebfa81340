use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rocket::{
    fairing::{Fairing, Info, Kind},
    http::{Status, StatusClass},
    request::{FromRequest, Outcome},
    Data, Orbit, Request, Response, Rocket,
};

/// Tags every log line belonging to one request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Atomically take the next ID, wrapping on overflow.
    pub fn next() -> RequestId {
        static NEXT_REQUEST_ID: AtomicUsize = AtomicUsize::new(0);
        RequestId(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Per-request bookkeeping, created on first use and cached on the request.
#[derive(Debug)]
struct RequestTrace {
    id: RequestId,
    started: Instant,
}

impl RequestTrace {
    fn new() -> Self {
        Self {
            id: RequestId::next(),
            started: Instant::now(),
        }
    }

    fn of<'r>(req: &'r Request<'_>) -> &'r RequestTrace {
        req.local_cache(RequestTrace::new)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for &'r RequestId {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        Outcome::Success(&RequestTrace::of(req).id)
    }
}

/// Name of the matched route and its path pattern, for response logs.
fn route_label(req: &Request<'_>) -> String {
    match req.route() {
        Some(route) => match &route.name {
            Some(name) => format!("{name} ({})", route.uri),
            None => route.uri.to_string(),
        },
        None => "no route".to_string(),
    }
}

/// Log level for a response with this status.
fn response_level(status: Status) -> log::Level {
    match status.class() {
        StatusClass::ServerError => log::Level::Error,
        StatusClass::ClientError => log::Level::Warn,
        _ => log::Level::Info,
    }
}

/// Logs launch and shutdown, and one line per request and response.
#[derive(Debug, Copy, Clone)]
pub struct LoggerFairing;

#[rocket::async_trait]
impl Fairing for LoggerFairing {
    fn info(&self) -> Info {
        Info {
            name: "Request logger",
            kind: Kind::Liftoff | Kind::Request | Kind::Response | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        let config = rocket.config();
        let scheme = if config.tls_enabled() { "https" } else { "http" };
        info!("Polls online at {scheme}://{}:{}", config.address, config.port);
    }

    async fn on_request(&self, req: &mut Request<'_>, _data: &mut Data<'_>) {
        let trace = RequestTrace::of(req);
        info!("->req{} {} {}", trace.id, req.method(), req.uri());
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        let trace = RequestTrace::of(req);
        let status = res.status();
        log::log!(
            response_level(status),
            "<-rsp{} {status} {} in {}ms",
            trace.id,
            route_label(req),
            trace.started.elapsed().as_millis()
        );
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        warn!("Shutting down");
    }
}

#[cfg(test)]
mod tests {
    use rocket::local::asynchronous::Client;

    use super::*;

    #[test]
    fn request_ids_increase() {
        let first = RequestId::next();
        let second = RequestId::next();
        assert!(second > first);
        assert_eq!(RequestId(7).to_string(), "7");
    }

    #[test]
    fn levels_follow_status_class() {
        assert_eq!(response_level(Status::Ok), log::Level::Info);
        assert_eq!(response_level(Status::SeeOther), log::Level::Info);
        assert_eq!(response_level(Status::NotFound), log::Level::Warn);
        assert_eq!(response_level(Status::InternalServerError), log::Level::Error);
    }

    #[get("/id")]
    fn echo_id(id: &RequestId) -> String {
        id.to_string()
    }

    #[rocket::async_test]
    async fn guard_sees_one_id_per_request() {
        let rocket = rocket::build()
            .attach(LoggerFairing)
            .mount("/", routes![echo_id]);
        let client = Client::untracked(rocket).await.unwrap();

        let mut ids = Vec::new();
        for _ in 0..2 {
            let body = client.get("/id").dispatch().await.into_string().await;
            ids.push(body.unwrap().parse::<usize>().unwrap());
        }
        assert!(ids[1] > ids[0]);
    }
}
