use actix::SyncArbiter;
use actix_cors::Cors;
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;

use services::db_utils::{get_db_pool, AppState, PgActor};
use settings::Settings;

mod schema;
mod services;
mod settings;
mod telemetry;
mod types;

fn cors(settings: &Settings) -> Cors {
    let origins = settings.allowed_origins();
    if origins.is_empty() {
        return Cors::permissive();
    }

    origins
        .into_iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let settings = Settings::from_env().context("failed to read settings from the environment")?;
    telemetry::initialize_telemetry(&settings.log_filter)?;

    let pool = get_db_pool(&settings.database_url, settings.pool_size)
        .context("failed to connect to the production database")?;
    let pg_db = SyncArbiter::start(settings.db_workers, move || PgActor(pool.clone()));
    let state = Data::new(AppState { pg_db });

    tracing::info!(address = %settings.bind_address, "starting record store");

    let app_settings = settings.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors(&app_settings))
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .configure(services::routes)
    })
        .bind(&settings.bind_address)?
        .run()
        .await?;

    Ok(())
}
