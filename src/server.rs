use crate::handler::EventHandler;
use rocket::data::{Limits, ToByteUnit};
use rocket::http::Status;
use rocket::{catch, catchers, get, post, routes, Build, Request, Rocket, State};
use std::net::IpAddr;

/// Slack allows 40k characters of message text, well past Rocket's 8 KiB default.
const MAX_EVENT_BYTES: u64 = 1024 * 1024;

#[post("/", data = "<body>")]
async fn events(handler: &State<EventHandler>, body: Vec<u8>) -> (Status, String) {
    let reply = handler.handle(&body).await;
    (Status::new(reply.status()), reply.body())
}

#[get("/health")]
fn health() -> &'static str {
    "ok"
}

#[catch(default)]
fn plain_error(status: Status, _request: &Request<'_>) -> (Status, String) {
    (status, status.reason().unwrap_or("error").to_string())
}

pub fn build_rocket(handler: EventHandler, address: IpAddr, port: u16) -> Rocket<Build> {
    let config = rocket::Config {
        address,
        port,
        limits: Limits::default().limit("bytes", MAX_EVENT_BYTES.bytes()),
        ..rocket::Config::release_default()
    };

    rocket::custom(config)
        .manage(handler)
        .mount("/", routes![events, health])
        .register("/", catchers![plain_error])
}
