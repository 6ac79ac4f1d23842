pub mod routes;
pub mod state;

use actix_web::dev::Server;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use std::net::TcpListener;

pub use state::AppState;

pub fn run(listener: TcpListener, state: AppState) -> Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .service(routes::index::handler)
            .service(routes::health::handler)
            .service(routes::resolve::handler)
            .service(routes::history::handler)
            .service(routes::movers::handler)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
