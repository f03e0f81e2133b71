use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::io;
use std::sync::Arc;

use dreamteam_admin::config::AppConfig;
use dreamteam_admin::db::{create_pool, PgRepository, RepositoryState};
use dreamteam_admin::{configure, views, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let pool = create_pool(&config)
        .await
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

    let templates = views::load_templates()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

    let repo = Arc::new(PgRepository::new(pool)) as RepositoryState;
    let bind_address = config.bind_address.clone();
    let state = web::Data::new(AppState {
        repo,
        config,
        templates,
    });

    info!("Starting server at {} ({:?} profile)", bind_address, state.config.profile);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(views::error_pages())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
