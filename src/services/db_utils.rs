use actix::{Actor, Addr, SyncContext};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

use crate::types::PoolInitializationError;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Synchronous actor owning the connection pool; every diesel call runs on
/// one of its arbiter threads.
pub struct PgActor(pub PgPool);

pub struct AppState {
    pub pg_db: Addr<PgActor>,
}

impl Actor for PgActor {
    type Context = SyncContext<Self>;
}

pub fn get_db_pool(db_url: &str, size: u32) -> Result<PgPool, PoolInitializationError> {
    let manager: ConnectionManager<PgConnection> = ConnectionManager::<PgConnection>::new(db_url);
    match Pool::builder().max_size(size).build(manager) {
        Ok(val) => Ok(val),
        Err(err) => Err(PoolInitializationError(err.to_string()))
    }
}
