use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use taskflux::auth::{CredentialHasher, TokenService};
use taskflux::config::Config;
use taskflux::directory::PgUserDirectory;
use taskflux::routes;
use taskflux::tasks::PgTaskStore;
use taskflux::AppState;

fn startup_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::debug!("Loaded configuration: {:?}", config);

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(startup_error)?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(startup_error)?;

    let state = web::Data::new(AppState::new(
        Arc::new(PgUserDirectory::new(pool.clone())),
        Arc::new(PgTaskStore::new(pool)),
        CredentialHasher::new(config.bcrypt_cost),
        TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl_secs),
    ));

    let cors_origins = config.cors_origins.clone();

    log::info!("Starting TaskFlux server at {}", config.server_url());
    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes::configure_app)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
