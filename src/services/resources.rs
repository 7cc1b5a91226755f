use diesel::prelude::*;
use diesel::PgConnection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::schema::{
    batches, cutting, equipment, extrusion, finished_products, flexa, orders, paketki, printing,
    winding, workers,
};
use crate::services::db_models::{
    Batch, Cutting, Equipment, Extrusion, FinishedProduct, Flexa, Order, Paketki, Printing,
    Winding, Worker,
};
use crate::services::entity::EntityKind;
use crate::services::filters::{self, *};
use crate::services::insertable::*;
use crate::services::integrity::Payload;

/// A table exposed as an HTTP collection. Implemented by the row type; the
/// request bodies and list filter are associated types.
pub trait Resource: Payload + Serialize + Send + Sized + 'static {
    const KIND: EntityKind;

    type New: Payload + DeserializeOwned + Send + 'static;
    type Changes: Payload + Patch + DeserializeOwned + Send + 'static;
    type Filter: DeserializeOwned + Send + 'static;

    fn id(&self) -> i32;
    fn list(conn: &mut PgConnection, filter: &Self::Filter) -> QueryResult<Vec<Self>>;
    fn find(conn: &mut PgConnection, pk: i32) -> QueryResult<Option<Self>>;
    fn insert(conn: &mut PgConnection, new: &Self::New) -> QueryResult<Self>;
    fn apply(conn: &mut PgConnection, pk: i32, changes: &Self::Changes) -> QueryResult<Self>;
    fn remove(conn: &mut PgConnection, pk: i32) -> QueryResult<usize>;
}

macro_rules! resource {
    ($row:ty, $table:ident, $kind:expr, $new:ty, $changes:ty, $filter:ty, $query:path) => {
        impl Resource for $row {
            const KIND: EntityKind = $kind;

            type New = $new;
            type Changes = $changes;
            type Filter = $filter;

            fn id(&self) -> i32 {
                self.id
            }

            fn list(conn: &mut PgConnection, filter: &$filter) -> QueryResult<Vec<Self>> {
                $query(filter).load::<$row>(conn)
            }

            fn find(conn: &mut PgConnection, pk: i32) -> QueryResult<Option<Self>> {
                $table::table.find(pk).first::<$row>(conn).optional()
            }

            fn insert(conn: &mut PgConnection, new: &$new) -> QueryResult<Self> {
                diesel::insert_into($table::table).values(new).get_result::<$row>(conn)
            }

            fn apply(conn: &mut PgConnection, pk: i32, changes: &$changes) -> QueryResult<Self> {
                diesel::update($table::table.find(pk)).set(changes).get_result::<$row>(conn)
            }

            fn remove(conn: &mut PgConnection, pk: i32) -> QueryResult<usize> {
                diesel::delete($table::table.find(pk)).execute(conn)
            }
        }
    };
}

resource!(Order, orders, EntityKind::Order, NewOrder, OrderChanges, OrderFilter, filters::orders_query);
resource!(Batch, batches, EntityKind::Batch, NewBatch, BatchChanges, BatchFilter, filters::batches_query);
resource!(
    Equipment,
    equipment,
    EntityKind::Equipment,
    NewEquipment,
    EquipmentChanges,
    EquipmentFilter,
    filters::equipment_query
);
resource!(Worker, workers, EntityKind::Worker, NewWorker, WorkerChanges, WorkerFilter, filters::workers_query);
resource!(Winding, winding, EntityKind::Winding, NewWinding, WindingChanges, WindingFilter, filters::winding_query);
resource!(
    Extrusion,
    extrusion,
    EntityKind::Extrusion,
    NewExtrusion,
    ExtrusionChanges,
    ExtrusionFilter,
    filters::extrusion_query
);
resource!(Cutting, cutting, EntityKind::Cutting, NewCutting, CuttingChanges, CuttingFilter, filters::cutting_query);
resource!(Paketki, paketki, EntityKind::Paketki, NewPaketki, PaketkiChanges, PaketkiFilter, filters::paketki_query);
resource!(
    Printing,
    printing,
    EntityKind::Printing,
    NewPrinting,
    PrintingChanges,
    PrintingFilter,
    filters::printing_query
);
resource!(Flexa, flexa, EntityKind::Flexa, NewFlexa, FlexaChanges, FlexaFilter, filters::flexa_query);
resource!(
    FinishedProduct,
    finished_products,
    EntityKind::FinishedProduct,
    NewFinishedProduct,
    FinishedProductChanges,
    FinishedProductFilter,
    filters::finished_products_query
);

/// Batches of one order, oldest first.
pub fn batches_of_order(conn: &mut PgConnection, order_id: i32) -> QueryResult<Vec<Batch>> {
    batches::table
        .filter(batches::order_id.eq(order_id))
        .order(batches::id.asc())
        .load::<Batch>(conn)
}
