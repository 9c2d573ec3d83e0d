use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use pictogram::{config, http, logging, App};
use thiserror::Error;
use tracing_actix_web::TracingLogger;

#[derive(Debug, Error)]
#[error("Failed to start the server")]
struct StartServerError;

#[actix_web::main]
async fn main() -> Result<(), StartServerError> {
    let config = config::Server::load().change_context(StartServerError)?;
    logging::init(&config.logging).change_context(StartServerError)?;

    let address = (config.http.address, config.http.port);
    let workers = config.http.workers.get();

    let app = App::new(config).await.change_context(StartServerError)?;
    let data = web::Data::new(app);

    let server = HttpServer::new(move || {
        actix_web::App::new()
            .app_data(data.clone())
            .wrap(TracingLogger::<http::util::QuieterRootSpanBuilder>::new())
            .configure(http::controllers::configure)
    })
    .workers(workers)
    .bind(address)
    .change_context(StartServerError)
    .attach_printable_lazy(|| format!("could not bind to {}:{}", address.0, address.1))?;

    tracing::info!("Listening on {}:{}", address.0, address.1);
    server.run().await.change_context(StartServerError)
}
