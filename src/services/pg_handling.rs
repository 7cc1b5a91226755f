use actix::Handler;
use diesel::{
    r2d2::{ConnectionManager, Pool, PooledConnection},
    Connection, PgConnection,
};

use crate::services::db_models::Batch;
use crate::services::db_utils::PgActor;
use crate::services::entity::EntityKind;
use crate::services::insertable::Patch;
use crate::services::integrity::{check_references, check_unique, guard_delete, IntegrityStore, Payload};
use crate::services::messages::{
    CreateRecord, DeleteRecord, FetchOrderBatches, FetchRecord, ListRecords, UpdateRecord,
};
use crate::services::resources::{batches_of_order, Resource};
use crate::types::AppError;

fn establish_connection(
    pool: &Pool<ConnectionManager<PgConnection>>,
) -> Result<PooledConnection<ConnectionManager<PgConnection>>, AppError> {
    Ok(pool.get()?)
}

fn not_found<R: Resource>(id: i32) -> AppError {
    AppError::NotFound { kind: R::KIND, id }
}

pub fn list_records<R: Resource>(
    conn: &mut PgConnection,
    filter: &R::Filter,
) -> Result<Vec<R>, AppError> {
    Ok(R::list(conn, filter)?)
}

pub fn fetch_record<R: Resource>(conn: &mut PgConnection, id: i32) -> Result<R, AppError> {
    R::find(conn, id)?.ok_or_else(|| not_found::<R>(id))
}

/// Parents are locked `FOR SHARE` by the reference checks, so they cannot be
/// deleted between the check and the insert.
pub fn create_record<R: Resource>(conn: &mut PgConnection, body: &R::New) -> Result<R, AppError> {
    conn.transaction(|trx_conn| {
        check_references(trx_conn, R::KIND, body)?;
        check_unique(trx_conn, R::KIND, body, None)?;

        let row = R::insert(trx_conn, body)?;
        tracing::info!(kind = %R::KIND, id = row.id(), "record created");

        Ok(row)
    })
}

pub fn update_record<R: Resource>(
    conn: &mut PgConnection,
    id: i32,
    changes: &R::Changes,
) -> Result<R, AppError> {
    conn.transaction(|trx_conn| {
        if !trx_conn.claim_row(R::KIND, id)? {
            return Err(not_found::<R>(id));
        }
        let current = R::find(trx_conn, id)?.ok_or_else(|| not_found::<R>(id))?;

        if changes.is_empty() {
            return Ok(current);
        }

        check_references(trx_conn, R::KIND, changes)?;
        let stored: &dyn Payload = &current;
        check_unique(trx_conn, R::KIND, changes, Some((id, stored)))?;

        let row = R::apply(trx_conn, id, changes)?;
        tracing::info!(kind = %R::KIND, id, "record updated");

        Ok(row)
    })
}

pub fn delete_record<R: Resource>(conn: &mut PgConnection, id: i32) -> Result<(), AppError> {
    conn.transaction(|trx_conn| {
        if !trx_conn.claim_row(R::KIND, id)? {
            return Err(not_found::<R>(id));
        }
        guard_delete(trx_conn, R::KIND, id)?;

        R::remove(trx_conn, id)?;
        tracing::info!(kind = %R::KIND, id, "record deleted");

        Ok(())
    })
}

pub fn order_batches(conn: &mut PgConnection, order_id: i32) -> Result<Vec<Batch>, AppError> {
    if !conn.row_exists(EntityKind::Order, order_id)? {
        return Err(AppError::NotFound { kind: EntityKind::Order, id: order_id });
    }

    Ok(batches_of_order(conn, order_id)?)
}

impl<R: Resource> Handler<ListRecords<R>> for PgActor {
    type Result = Result<Vec<R>, AppError>;

    fn handle(&mut self, msg: ListRecords<R>, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        list_records::<R>(&mut conn, &msg.filter)
    }
}

impl<R: Resource> Handler<FetchRecord<R>> for PgActor {
    type Result = Result<R, AppError>;

    fn handle(&mut self, msg: FetchRecord<R>, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        fetch_record::<R>(&mut conn, msg.id)
    }
}

impl<R: Resource> Handler<CreateRecord<R>> for PgActor {
    type Result = Result<R, AppError>;

    fn handle(&mut self, msg: CreateRecord<R>, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        create_record::<R>(&mut conn, &msg.body)
    }
}

impl<R: Resource> Handler<UpdateRecord<R>> for PgActor {
    type Result = Result<R, AppError>;

    fn handle(&mut self, msg: UpdateRecord<R>, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        update_record::<R>(&mut conn, msg.id, &msg.changes)
    }
}

impl<R: Resource> Handler<DeleteRecord<R>> for PgActor {
    type Result = Result<(), AppError>;

    fn handle(&mut self, msg: DeleteRecord<R>, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        delete_record::<R>(&mut conn, msg.id)
    }
}

impl Handler<FetchOrderBatches> for PgActor {
    type Result = Result<Vec<Batch>, AppError>;

    fn handle(&mut self, msg: FetchOrderBatches, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        order_batches(&mut conn, msg.0)
    }
}

// Runs only when TEST_DATABASE_URL points at a disposable PostgreSQL
// database. Each test works in a private schema inside a transaction that is
// never committed.
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use diesel::connection::SimpleConnection;
    use serde::de::DeserializeOwned;
    use serde_json::{json, Value};

    use super::*;
    use crate::services::db_models::{
        Cutting, Equipment, Extrusion, FinishedProduct, Flexa, Order, Paketki, Printing, Winding,
        Worker,
    };
    use crate::services::entity::{Relation, UniqueField};
    use crate::services::filters::OrderFilter;

    static SCHEMA_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn test_connection() -> Option<PgConnection> {
        let url = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("TEST_DATABASE_URL is not set, skipping");
                return None;
            }
        };

        let mut conn = PgConnection::establish(&url).expect("test database is reachable");
        conn.begin_test_transaction().unwrap();

        let schema = format!(
            "record_flows_{}_{}",
            std::process::id(),
            SCHEMA_SEQ.fetch_add(1, Ordering::SeqCst)
        );
        conn.batch_execute(&format!("CREATE SCHEMA {schema}; SET LOCAL search_path TO {schema};"))
            .unwrap();
        conn.batch_execute(include_str!(
            "../../migrations/2024-05-01-000000_create_production_tables/up.sql"
        ))
        .unwrap();

        Some(conn)
    }

    fn body<T: DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    fn order_body(number: &str, client: &str) -> Value {
        json!({
            "order_number": number,
            "client": client,
            "order_status": "new",
            "product_name": "T-shirt bag",
            "sleeve_name": "Sleeve 40",
            "order_date": "2024-03-01",
            "quantity": 10000,
            "order_weight": 250.0,
            "product_type": "bag",
            "pack": 100,
            "packaging": 50,
            "width": 40.0,
            "length": 60.0,
            "thickness": 0.02,
            "width_squared": 0.4,
            "length_squared": 0.6,
            "thickness_squared": 0.0002,
            "density": 0.92,
            "weight_without_cutting": 240.0,
            "weight_with_cutting": 250.0
        })
    }

    fn seed_order(conn: &mut PgConnection, number: &str, client: &str) -> Order {
        create_record::<Order>(conn, &body(order_body(number, client))).unwrap()
    }

    fn seed_batch(conn: &mut PgConnection, order_id: i32, number: &str) -> Batch {
        let new = body(json!({
            "order_id": order_id,
            "batch_number": number,
            "batch_status": "planned"
        }));
        create_record::<Batch>(conn, &new).unwrap()
    }

    #[test]
    fn batch_for_missing_order_is_rejected() {
        let Some(mut conn) = test_connection() else { return };

        let new = body(json!({ "order_id": 9999, "batch_number": "B-1", "batch_status": "planned" }));
        let err = create_record::<Batch>(&mut conn, &new).unwrap_err();

        assert!(matches!(err, AppError::InvalidReference { kind: EntityKind::Order, id: 9999 }));
    }

    #[test]
    fn created_batch_defaults_shipment_and_is_listed_under_its_order() {
        let Some(mut conn) = test_connection() else { return };

        let order = seed_order(&mut conn, "ORD-1", "Acme");
        let batch = seed_batch(&mut conn, order.id, "B-1");
        assert!(!batch.shipment);

        let batches = order_batches(&mut conn, order.id).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].id, batch.id);

        let err = order_batches(&mut conn, order.id + 100).unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: EntityKind::Order, .. }));
    }

    #[test]
    fn stage_records_reject_a_missing_worker_and_store_a_real_one() {
        let Some(mut conn) = test_connection() else { return };

        let order = seed_order(&mut conn, "ORD-W", "Acme");
        let batch = seed_batch(&mut conn, order.id, "B-W");
        let worker = create_record::<Worker>(&mut conn, &body(json!({ "fio": "Sidorov S.S." })))
            .unwrap();
        let line = create_record::<Equipment>(&mut conn, &body(json!({ "name": "Line W" })))
            .unwrap();
        let winding = create_record::<Winding>(
            &mut conn,
            &body(json!({
                "batch_id": batch.id, "equipment_id": line.id, "priority": 1, "status": "queued",
                "norm": 120.0, "days": 2.0, "wound": 0.0, "required_to_wind": 500.0,
                "remain_to_wind": 500.0
            })),
        )
        .unwrap();
        let extrusion = create_record::<Extrusion>(
            &mut conn,
            &body(json!({
                "winding_id": winding.id, "worker_id": worker.id, "date": "2024-03-02",
                "equipment_operating_time": 8.0, "shift_norm": 100.0, "total_shift": 95.0,
                "white_defective": 1.0, "transparent_defective": 0.5, "colored_defective": 0.0,
                "hourly_production": 12.0, "seasonal": 1.0
            })),
        )
        .unwrap();
        assert_eq!(extrusion.winding_id, winding.id);
        assert_eq!(extrusion.worker_id, worker.id);

        let cutting = create_record::<Cutting>(
            &mut conn,
            &body(json!({
                "batch_id": batch.id, "equipment_id": line.id, "priority": 2, "status": "queued",
                "cut": 0.0, "cut_pcs": 0, "remain_to_cut": 300.0, "remain_to_cut_pcs": 9000,
                "days": 3.0, "norm": 100.0
            })),
        )
        .unwrap();
        let printing = create_record::<Printing>(
            &mut conn,
            &body(json!({ "batch_id": batch.id, "printed": 10.0, "remain_to_print": 90.0 })),
        )
        .unwrap();

        let paketki = |worker_id: i32| {
            json!({
                "extrusion_id": extrusion.id, "cutting_id": cutting.id, "worker_id": worker_id,
                "date": "2024-03-03", "operating_time": 7.5, "shift_norm": 90.0,
                "total_shift": 88.0, "white_defective": 0.2, "transparent_defective": 0.1,
                "colored_defective": 0.0, "hourly_production": 11.0, "seasonal": 1.0
            })
        };
        let flexa = |worker_id: i32| {
            json!({
                "printing_id": printing.id, "worker_id": worker_id, "date": "2024-03-04",
                "operating_time": 6.0, "shift_norm": 80.0, "total_shift": 78.0,
                "white_defective": 0.3, "print_defective": 0.4, "colored_defective": 0.1,
                "hourly_production": 13.0
            })
        };
        let finished = |worker_id: i32| {
            json!({
                "batch_id": batch.id, "worker_id": worker_id, "date": "2024-03-05",
                "quantity": 9000, "weight": 240.0
            })
        };

        let missing = worker.id + 1000;
        let expect_missing_worker = |err: AppError| {
            assert!(
                matches!(err, AppError::InvalidReference { kind: EntityKind::Worker, id } if id == missing),
                "{err}"
            );
        };

        expect_missing_worker(
            create_record::<Paketki>(&mut conn, &body(paketki(missing))).unwrap_err(),
        );
        expect_missing_worker(create_record::<Flexa>(&mut conn, &body(flexa(missing))).unwrap_err());
        expect_missing_worker(
            create_record::<FinishedProduct>(&mut conn, &body(finished(missing))).unwrap_err(),
        );

        let stored = create_record::<Paketki>(&mut conn, &body(paketki(worker.id))).unwrap();
        assert_eq!(
            (stored.extrusion_id, stored.cutting_id, stored.worker_id),
            (extrusion.id, cutting.id, worker.id)
        );
        let stored = create_record::<Flexa>(&mut conn, &body(flexa(worker.id))).unwrap();
        assert_eq!((stored.printing_id, stored.worker_id), (printing.id, worker.id));
        let stored = create_record::<FinishedProduct>(&mut conn, &body(finished(worker.id))).unwrap();
        assert_eq!((stored.batch_id, stored.worker_id), (batch.id, worker.id));

        expect_missing_worker(
            update_record::<FinishedProduct>(
                &mut conn,
                stored.id,
                &body(json!({ "worker_id": missing })),
            )
            .unwrap_err(),
        );
    }

    #[test]
    fn duplicate_order_number_is_rejected() {
        let Some(mut conn) = test_connection() else { return };

        seed_order(&mut conn, "ORD-7", "Acme");
        let err = create_record::<Order>(&mut conn, &body(order_body("ORD-7", "Globex")))
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateValue { field: UniqueField::OrderNumber }));
    }

    #[test]
    fn worker_can_keep_its_own_name_but_not_take_another() {
        let Some(mut conn) = test_connection() else { return };

        let ivanov = create_record::<Worker>(&mut conn, &body(json!({ "fio": "Ivanov I.I." }))).unwrap();
        let petrov = create_record::<Worker>(&mut conn, &body(json!({ "fio": "Petrov P.P." }))).unwrap();

        let same = update_record::<Worker>(&mut conn, ivanov.id, &body(json!({ "fio": "Ivanov I.I." })))
            .unwrap();
        assert_eq!(same.fio, "Ivanov I.I.");

        let err = update_record::<Worker>(&mut conn, petrov.id, &body(json!({ "fio": "Ivanov I.I." })))
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateValue { field: UniqueField::WorkerFio }));
    }

    #[test]
    fn empty_patch_returns_the_stored_row() {
        let Some(mut conn) = test_connection() else { return };

        let lathe =
            create_record::<Equipment>(&mut conn, &body(json!({ "name": "Extruder 1", "description": "line A" })))
                .unwrap();
        let same = update_record::<Equipment>(&mut conn, lathe.id, &body(json!({}))).unwrap();

        assert_eq!(same.name, "Extruder 1");
        assert_eq!(same.description.as_deref(), Some("line A"));
    }

    #[test]
    fn explicit_null_clears_a_nullable_column() {
        let Some(mut conn) = test_connection() else { return };

        let lathe =
            create_record::<Equipment>(&mut conn, &body(json!({ "name": "Slitter", "description": "line B" })))
                .unwrap();
        let cleared =
            update_record::<Equipment>(&mut conn, lathe.id, &body(json!({ "description": null })))
                .unwrap();

        assert_eq!(cleared.name, "Slitter");
        assert_eq!(cleared.description, None);
    }

    #[test]
    fn single_field_update_leaves_the_rest_alone() {
        let Some(mut conn) = test_connection() else { return };

        let order = seed_order(&mut conn, "ORD-3", "Acme");
        let batch = create_record::<Batch>(
            &mut conn,
            &body(json!({
                "order_id": order.id,
                "batch_number": "B-3",
                "batch_status": "planned",
                "label_name": "Blue label",
                "accepted": 12.5
            })),
        )
        .unwrap();

        let updated =
            update_record::<Batch>(&mut conn, batch.id, &body(json!({ "batch_status": "wound" })))
                .unwrap();

        assert_eq!(updated.batch_status, "wound");
        assert_eq!(updated.order_id, order.id);
        assert_eq!(updated.batch_number, "B-3");
        assert_eq!(updated.label_name.as_deref(), Some("Blue label"));
        assert_eq!(updated.accepted, Some(12.5));
        assert!(!updated.shipment);
    }

    #[test]
    fn missing_rows_are_not_found() {
        let Some(mut conn) = test_connection() else { return };

        let err = fetch_record::<Winding>(&mut conn, 42).unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: EntityKind::Winding, id: 42 }));

        let err = update_record::<Worker>(&mut conn, 42, &body(json!({ "fio": "Nobody" })))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: EntityKind::Worker, id: 42 }));

        let err = delete_record::<Equipment>(&mut conn, 42).unwrap_err();
        assert!(matches!(err, AppError::NotFound { kind: EntityKind::Equipment, id: 42 }));
    }

    #[test]
    fn referenced_rows_cannot_be_deleted_until_released() {
        let Some(mut conn) = test_connection() else { return };

        let order = seed_order(&mut conn, "ORD-9", "Acme");
        let batch = seed_batch(&mut conn, order.id, "B-9");
        let line = create_record::<Equipment>(&mut conn, &body(json!({ "name": "Winder 2" }))).unwrap();
        let winding = create_record::<Winding>(
            &mut conn,
            &body(json!({
                "batch_id": batch.id,
                "equipment_id": line.id,
                "priority": 1,
                "status": "queued",
                "norm": 120.0,
                "days": 2.0,
                "wound": 0.0,
                "required_to_wind": 500.0,
                "remain_to_wind": 500.0
            })),
        )
        .unwrap();

        let err = delete_record::<Equipment>(&mut conn, line.id).unwrap_err();
        assert!(matches!(
            err,
            AppError::DependentRowsExist { relation: Relation::WindingEquipment, .. }
        ));

        let err = delete_record::<Order>(&mut conn, order.id).unwrap_err();
        assert!(matches!(err, AppError::DependentRowsExist { relation: Relation::BatchOrder, .. }));

        delete_record::<Winding>(&mut conn, winding.id).unwrap();
        delete_record::<Equipment>(&mut conn, line.id).unwrap();
        delete_record::<Batch>(&mut conn, batch.id).unwrap();
        delete_record::<Order>(&mut conn, order.id).unwrap();

        let err = fetch_record::<Order>(&mut conn, order.id).unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn list_filters_orders_by_client_substring() {
        let Some(mut conn) = test_connection() else { return };

        seed_order(&mut conn, "ORD-A", "Acme Plastics");
        seed_order(&mut conn, "ORD-B", "Globex");
        seed_order(&mut conn, "ORD-C", "ACME foods");

        let filter = OrderFilter { client: Some("acme".to_owned()), ..Default::default() };
        let found = list_records::<Order>(&mut conn, &filter).unwrap();

        let numbers: Vec<&str> = found.iter().map(|o| o.order_number.as_str()).collect();
        assert_eq!(numbers, vec!["ORD-A", "ORD-C"]);

        let page = OrderFilter { skip: Some(1), limit: Some(1), ..Default::default() };
        let found = list_records::<Order>(&mut conn, &page).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].order_number, "ORD-B");
    }
}
