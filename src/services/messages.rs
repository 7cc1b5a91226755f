use std::marker::PhantomData;

use actix::Message;

use crate::services::db_models::Batch;
use crate::services::resources::Resource;
use crate::types::AppError;

pub struct ListRecords<R: Resource> {
    pub filter: R::Filter,
}

impl<R: Resource> Message for ListRecords<R> {
    type Result = Result<Vec<R>, AppError>;
}

pub struct FetchRecord<R: Resource> {
    pub id: i32,
    _row: PhantomData<fn() -> R>,
}

impl<R: Resource> FetchRecord<R> {
    pub fn new(id: i32) -> Self {
        FetchRecord { id, _row: PhantomData }
    }
}

impl<R: Resource> Message for FetchRecord<R> {
    type Result = Result<R, AppError>;
}

pub struct CreateRecord<R: Resource> {
    pub body: R::New,
}

impl<R: Resource> Message for CreateRecord<R> {
    type Result = Result<R, AppError>;
}

pub struct UpdateRecord<R: Resource> {
    pub id: i32,
    pub changes: R::Changes,
}

impl<R: Resource> Message for UpdateRecord<R> {
    type Result = Result<R, AppError>;
}

pub struct DeleteRecord<R: Resource> {
    pub id: i32,
    _row: PhantomData<fn() -> R>,
}

impl<R: Resource> DeleteRecord<R> {
    pub fn new(id: i32) -> Self {
        DeleteRecord { id, _row: PhantomData }
    }
}

impl<R: Resource> Message for DeleteRecord<R> {
    type Result = Result<(), AppError>;
}

#[derive(Message)]
#[rtype(result = "Result<Vec<Batch>, AppError>")]
pub struct FetchOrderBatches(pub i32);
