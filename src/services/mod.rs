use actix::MailboxError;
use actix_web::web::{self, Data, Json, Path, Query};
use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

use crate::services::db_models::{
    Batch, Cutting, Equipment, Extrusion, FinishedProduct, Flexa, Order, Paketki, Printing,
    Winding, Worker,
};
use crate::services::db_utils::AppState;
use crate::services::messages::{
    CreateRecord, DeleteRecord, FetchOrderBatches, FetchRecord, ListRecords, UpdateRecord,
};
use crate::services::resources::Resource;
use crate::types::AppError;

pub mod db_models;
pub mod db_utils;
pub mod entity;
pub mod filters;
pub mod insertable;
pub mod integrity;
pub mod messages;
pub mod pg_handling;
pub mod resources;

#[get("/")]
pub async fn home_page() -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": "API is running!" }))
}

fn respond<T>(sent: Result<Result<T, AppError>, MailboxError>) -> Result<T, AppError> {
    match sent {
        Ok(Ok(val)) => Ok(val),
        Ok(Err(err)) => Err(err),
        Err(err) => Err(AppError::Mailbox(err)),
    }
}

async fn list_records<R: Resource>(
    state: Data<AppState>,
    query: Query<R::Filter>,
) -> Result<HttpResponse, AppError> {
    let rows = respond(state.pg_db.send(ListRecords::<R> { filter: query.into_inner() }).await)?;
    Ok(HttpResponse::Ok().json(rows))
}

async fn fetch_record<R: Resource>(
    state: Data<AppState>,
    path: Path<i32>,
) -> Result<HttpResponse, AppError> {
    let row = respond(state.pg_db.send(FetchRecord::<R>::new(path.into_inner())).await)?;
    Ok(HttpResponse::Ok().json(row))
}

async fn create_record<R: Resource>(
    state: Data<AppState>,
    body: Json<R::New>,
) -> Result<HttpResponse, AppError> {
    let row = respond(state.pg_db.send(CreateRecord::<R> { body: body.into_inner() }).await)?;
    Ok(HttpResponse::Ok().json(row))
}

async fn update_record<R: Resource>(
    state: Data<AppState>,
    path: Path<i32>,
    body: Json<R::Changes>,
) -> Result<HttpResponse, AppError> {
    let message = UpdateRecord::<R> { id: path.into_inner(), changes: body.into_inner() };
    let row = respond(state.pg_db.send(message).await)?;
    Ok(HttpResponse::Ok().json(row))
}

async fn delete_record<R: Resource>(
    state: Data<AppState>,
    path: Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    respond(state.pg_db.send(DeleteRecord::<R>::new(id)).await)?;

    Ok(HttpResponse::Ok().json(json!({ "message": format!("{} {id} deleted successfully", R::KIND) })))
}

async fn order_batches(state: Data<AppState>, path: Path<i32>) -> Result<HttpResponse, AppError> {
    let batches = respond(state.pg_db.send(FetchOrderBatches(path.into_inner())).await)?;
    Ok(HttpResponse::Ok().json(batches))
}

/// CRUD routes for one collection, mounted inside its scope.
pub fn collection<R: Resource>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_records::<R>))
            .route(web::post().to(create_record::<R>)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(fetch_record::<R>))
            .route(web::put().to(update_record::<R>))
            .route(web::delete().to(delete_record::<R>)),
    );
}

// Malformed bodies, query strings and ids answer 400 with the usual
// `{"detail": ...}` body instead of actix's plain-text defaults.
fn extractor_errors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    extractor_errors(cfg);

    cfg.service(home_page)
        .service(
            web::scope("/orders")
                .route("/{id}/batches", web::get().to(order_batches))
                .configure(collection::<Order>),
        )
        .service(
            web::scope("/batches")
                .route("/order/{order_id}", web::get().to(order_batches))
                .configure(collection::<Batch>),
        )
        .service(web::scope("/equipment").configure(collection::<Equipment>))
        .service(web::scope("/workers").configure(collection::<Worker>))
        .service(web::scope("/winding").configure(collection::<Winding>))
        .service(web::scope("/extrusion").configure(collection::<Extrusion>))
        .service(web::scope("/cutting").configure(collection::<Cutting>))
        .service(web::scope("/paketki").configure(collection::<Paketki>))
        .service(web::scope("/printing").configure(collection::<Printing>))
        .service(web::scope("/flexa").configure(collection::<Flexa>))
        .service(web::scope("/fproducts").configure(collection::<FinishedProduct>));
}
