//! Referential-integrity checks shared by every collection.
//!
//! Writes go through three checks before touching a table: referenced rows
//! must exist, unique fields must not collide, and a row may only be deleted
//! once nothing references it. The checks are expressed against
//! [`IntegrityStore`] so the same routines serve every entity kind.

use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::PgConnection;

use crate::schema::{
    batches, cutting, equipment, extrusion, finished_products, flexa, orders, paketki, printing,
    winding, workers,
};
use crate::services::entity::{EntityKind, Relation, UniqueField};
use crate::types::AppError;

/// Exposes the foreign keys and unique values a request body or stored row
/// carries. Absent fields report `None` and are not checked.
pub trait Payload {
    fn reference(&self, _relation: Relation) -> Option<i32> {
        None
    }

    fn unique_value(&self, _field: UniqueField) -> Option<&str> {
        None
    }
}

pub trait IntegrityStore {
    /// Whether the row exists. Implementations may share-lock it for the rest
    /// of the transaction.
    fn row_exists(&mut self, kind: EntityKind, pk: i32) -> QueryResult<bool>;

    /// Whether the row exists, locking it for modification.
    fn claim_row(&mut self, kind: EntityKind, pk: i32) -> QueryResult<bool>;

    fn value_taken(
        &mut self,
        field: UniqueField,
        value: &str,
        exclude_id: Option<i32>,
    ) -> QueryResult<bool>;

    /// Whether any child row of `relation` points at parent `pk`.
    fn is_referenced(&mut self, relation: Relation, pk: i32) -> QueryResult<bool>;
}

pub fn validate_reference<S: IntegrityStore + ?Sized>(
    store: &mut S,
    kind: EntityKind,
    pk: i32,
) -> QueryResult<bool> {
    store.row_exists(kind, pk)
}

pub fn validate_unique<S: IntegrityStore + ?Sized>(
    store: &mut S,
    field: UniqueField,
    value: &str,
    exclude_id: Option<i32>,
) -> QueryResult<bool> {
    store.value_taken(field, value, exclude_id).map(|taken| !taken)
}

/// First relation still holding rows that point at `pk`, probing in the
/// order given by [`EntityKind::dependents`].
pub fn first_dependent<S: IntegrityStore + ?Sized>(
    store: &mut S,
    kind: EntityKind,
    pk: i32,
) -> QueryResult<Option<Relation>> {
    for relation in kind.dependents() {
        if store.is_referenced(*relation, pk)? {
            return Ok(Some(*relation));
        }
    }

    Ok(None)
}

/// Boolean form of [`first_dependent`]. Deletes go through [`guard_delete`],
/// which needs the blocking relation for its error.
#[cfg(test)]
pub fn has_dependents<S: IntegrityStore + ?Sized>(
    store: &mut S,
    kind: EntityKind,
    pk: i32,
) -> QueryResult<bool> {
    first_dependent(store, kind, pk).map(|relation| relation.is_some())
}

pub fn check_references<S: IntegrityStore + ?Sized>(
    store: &mut S,
    kind: EntityKind,
    payload: &dyn Payload,
) -> Result<(), AppError> {
    for relation in kind.foreign_keys() {
        let Some(parent_id) = payload.reference(*relation) else {
            continue;
        };

        if !validate_reference(store, relation.parent(), parent_id)? {
            tracing::debug!(
                kind = %kind,
                column = relation.column(),
                parent_id,
                "rejected write with dangling reference"
            );
            return Err(AppError::InvalidReference { kind: relation.parent(), id: parent_id });
        }
    }

    Ok(())
}

/// `current` is the stored row on update; a value equal to the stored one is
/// never a collision.
pub fn check_unique<S: IntegrityStore + ?Sized>(
    store: &mut S,
    kind: EntityKind,
    payload: &dyn Payload,
    current: Option<(i32, &dyn Payload)>,
) -> Result<(), AppError> {
    for field in kind.unique_fields() {
        let Some(value) = payload.unique_value(*field) else {
            continue;
        };

        if let Some((_, stored)) = current {
            if stored.unique_value(*field) == Some(value) {
                continue;
            }
        }

        let exclude_id = current.map(|(pk, _)| pk);
        if !validate_unique(store, *field, value, exclude_id)? {
            tracing::debug!(kind = %kind, field = field.column(), "rejected duplicate value");
            return Err(AppError::DuplicateValue { field: *field });
        }
    }

    Ok(())
}

pub fn guard_delete<S: IntegrityStore + ?Sized>(
    store: &mut S,
    kind: EntityKind,
    pk: i32,
) -> Result<(), AppError> {
    match first_dependent(store, kind, pk)? {
        Some(relation) => {
            tracing::debug!(kind = %kind, pk, blocking = %relation.child(), "rejected delete");
            Err(AppError::DependentRowsExist { relation, id: pk })
        }
        None => Ok(()),
    }
}

macro_rules! probe_row {
    ($conn:expr, $table:ident, $pk:expr, $lock:ident) => {
        $table::table
            .find($pk)
            .select($table::id)
            .$lock()
            .get_result::<i32>($conn)
            .optional()
            .map(|row| row.is_some())
    };
}

macro_rules! probe_kind {
    ($conn:expr, $kind:expr, $pk:expr, $lock:ident) => {
        match $kind {
            EntityKind::Order => probe_row!($conn, orders, $pk, $lock),
            EntityKind::Batch => probe_row!($conn, batches, $pk, $lock),
            EntityKind::Equipment => probe_row!($conn, equipment, $pk, $lock),
            EntityKind::Worker => probe_row!($conn, workers, $pk, $lock),
            EntityKind::Winding => probe_row!($conn, winding, $pk, $lock),
            EntityKind::Extrusion => probe_row!($conn, extrusion, $pk, $lock),
            EntityKind::Cutting => probe_row!($conn, cutting, $pk, $lock),
            EntityKind::Paketki => probe_row!($conn, paketki, $pk, $lock),
            EntityKind::Printing => probe_row!($conn, printing, $pk, $lock),
            EntityKind::Flexa => probe_row!($conn, flexa, $pk, $lock),
            EntityKind::FinishedProduct => probe_row!($conn, finished_products, $pk, $lock),
        }
    };
}

macro_rules! referenced {
    ($conn:expr, $child:ident, $column:ident, $pk:expr) => {
        select(exists($child::table.filter($child::$column.eq($pk)))).get_result::<bool>($conn)
    };
}

macro_rules! value_taken {
    ($conn:expr, $table:ident, $column:ident, $value:expr, $exclude_id:expr) => {
        match $exclude_id {
            Some(exclude_id) => select(exists(
                $table::table
                    .filter($table::$column.eq($value))
                    .filter($table::id.ne(exclude_id)),
            ))
            .get_result::<bool>($conn),
            None => select(exists($table::table.filter($table::$column.eq($value))))
                .get_result::<bool>($conn),
        }
    };
}

impl IntegrityStore for PgConnection {
    fn row_exists(&mut self, kind: EntityKind, pk: i32) -> QueryResult<bool> {
        probe_kind!(self, kind, pk, for_share)
    }

    fn claim_row(&mut self, kind: EntityKind, pk: i32) -> QueryResult<bool> {
        probe_kind!(self, kind, pk, for_update)
    }

    fn value_taken(
        &mut self,
        field: UniqueField,
        value: &str,
        exclude_id: Option<i32>,
    ) -> QueryResult<bool> {
        match field {
            UniqueField::OrderNumber => value_taken!(self, orders, order_number, value, exclude_id),
            UniqueField::EquipmentName => value_taken!(self, equipment, name, value, exclude_id),
            UniqueField::WorkerFio => value_taken!(self, workers, fio, value, exclude_id),
        }
    }

    fn is_referenced(&mut self, relation: Relation, pk: i32) -> QueryResult<bool> {
        match relation {
            Relation::BatchOrder => referenced!(self, batches, order_id, pk),
            Relation::WindingBatch => referenced!(self, winding, batch_id, pk),
            Relation::WindingEquipment => referenced!(self, winding, equipment_id, pk),
            Relation::ExtrusionWinding => referenced!(self, extrusion, winding_id, pk),
            Relation::ExtrusionWorker => referenced!(self, extrusion, worker_id, pk),
            Relation::CuttingBatch => referenced!(self, cutting, batch_id, pk),
            Relation::CuttingEquipment => referenced!(self, cutting, equipment_id, pk),
            Relation::PaketkiExtrusion => referenced!(self, paketki, extrusion_id, pk),
            Relation::PaketkiCutting => referenced!(self, paketki, cutting_id, pk),
            Relation::PaketkiWorker => referenced!(self, paketki, worker_id, pk),
            Relation::PrintingBatch => referenced!(self, printing, batch_id, pk),
            Relation::FlexaPrinting => referenced!(self, flexa, printing_id, pk),
            Relation::FlexaWorker => referenced!(self, flexa, worker_id, pk),
            Relation::FinishedProductBatch => referenced!(self, finished_products, batch_id, pk),
            Relation::FinishedProductWorker => referenced!(self, finished_products, worker_id, pk),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        rows: HashSet<(EntityKind, i32)>,
        links: Vec<(Relation, i32)>,
        values: Vec<(UniqueField, i32, String)>,
        probes: HashMap<Relation, usize>,
    }

    impl MemoryStore {
        fn with_rows(rows: &[(EntityKind, i32)]) -> Self {
            MemoryStore { rows: rows.iter().copied().collect(), ..Default::default() }
        }

        fn link(mut self, relation: Relation, parent_id: i32) -> Self {
            self.links.push((relation, parent_id));
            self
        }

        fn value(mut self, field: UniqueField, pk: i32, value: &str) -> Self {
            self.values.push((field, pk, value.to_owned()));
            self
        }
    }

    impl IntegrityStore for MemoryStore {
        fn row_exists(&mut self, kind: EntityKind, pk: i32) -> QueryResult<bool> {
            Ok(self.rows.contains(&(kind, pk)))
        }

        fn claim_row(&mut self, kind: EntityKind, pk: i32) -> QueryResult<bool> {
            self.row_exists(kind, pk)
        }

        fn value_taken(
            &mut self,
            field: UniqueField,
            value: &str,
            exclude_id: Option<i32>,
        ) -> QueryResult<bool> {
            Ok(self
                .values
                .iter()
                .any(|(f, pk, v)| *f == field && v == value && Some(*pk) != exclude_id))
        }

        fn is_referenced(&mut self, relation: Relation, pk: i32) -> QueryResult<bool> {
            *self.probes.entry(relation).or_default() += 1;
            Ok(self.links.iter().any(|(r, parent)| *r == relation && *parent == pk))
        }
    }

    #[derive(Default)]
    struct Body {
        batch_id: Option<i32>,
        equipment_id: Option<i32>,
        name: Option<String>,
    }

    impl Payload for Body {
        fn reference(&self, relation: Relation) -> Option<i32> {
            match relation {
                Relation::WindingBatch | Relation::CuttingBatch => self.batch_id,
                Relation::WindingEquipment | Relation::CuttingEquipment => self.equipment_id,
                _ => None,
            }
        }

        fn unique_value(&self, field: UniqueField) -> Option<&str> {
            match field {
                UniqueField::EquipmentName => self.name.as_deref(),
                _ => None,
            }
        }
    }

    #[test]
    fn missing_parent_is_named_in_the_error() {
        let mut store = MemoryStore::with_rows(&[(EntityKind::Batch, 1)]);
        let body = Body { batch_id: Some(1), equipment_id: Some(42), ..Default::default() };

        let err = check_references(&mut store, EntityKind::Winding, &body).unwrap_err();

        assert!(matches!(
            err,
            AppError::InvalidReference { kind: EntityKind::Equipment, id: 42 }
        ));
        assert_eq!(err.to_string(), "Equipment with id 42 does not exist");
    }

    #[test]
    fn existing_parents_pass() {
        let mut store = MemoryStore::with_rows(&[(EntityKind::Batch, 1), (EntityKind::Equipment, 2)]);
        let body = Body { batch_id: Some(1), equipment_id: Some(2), ..Default::default() };

        assert!(check_references(&mut store, EntityKind::Cutting, &body).is_ok());
    }

    #[test]
    fn absent_foreign_keys_are_not_checked() {
        let mut store = MemoryStore::default();
        let body = Body { equipment_id: None, batch_id: None, ..Default::default() };

        assert!(check_references(&mut store, EntityKind::Winding, &body).is_ok());
    }

    #[test]
    fn duplicate_name_is_rejected_on_create() {
        let mut store = MemoryStore::default().value(UniqueField::EquipmentName, 1, "Extruder 1");
        let body = Body { name: Some("Extruder 1".into()), ..Default::default() };

        let err = check_unique(&mut store, EntityKind::Equipment, &body, None).unwrap_err();

        assert!(matches!(err, AppError::DuplicateValue { field: UniqueField::EquipmentName }));
    }

    #[test]
    fn row_does_not_collide_with_itself() {
        let mut store = MemoryStore::default().value(UniqueField::EquipmentName, 1, "Extruder 1");
        let stored = Body { name: Some("Extruder 1".into()), ..Default::default() };
        let stored: &dyn Payload = &stored;
        let body = Body { name: Some("Extruder 1".into()), ..Default::default() };

        assert!(check_unique(&mut store, EntityKind::Equipment, &body, Some((1, stored))).is_ok());
    }

    #[test]
    fn renaming_onto_another_row_is_rejected() {
        let mut store = MemoryStore::default()
            .value(UniqueField::EquipmentName, 1, "Extruder 1")
            .value(UniqueField::EquipmentName, 2, "Extruder 2");
        let stored = Body { name: Some("Extruder 1".into()), ..Default::default() };
        let stored: &dyn Payload = &stored;
        let body = Body { name: Some("Extruder 2".into()), ..Default::default() };

        let err =
            check_unique(&mut store, EntityKind::Equipment, &body, Some((1, stored))).unwrap_err();

        assert!(matches!(err, AppError::DuplicateValue { .. }));
    }

    #[test]
    fn validate_unique_excludes_the_given_row() {
        let mut store = MemoryStore::default().value(UniqueField::WorkerFio, 5, "Ivanov I.I.");

        assert!(!validate_unique(&mut store, UniqueField::WorkerFio, "Ivanov I.I.", None).unwrap());
        assert!(validate_unique(&mut store, UniqueField::WorkerFio, "Ivanov I.I.", Some(5)).unwrap());
        assert!(validate_unique(&mut store, UniqueField::WorkerFio, "Petrov P.P.", None).unwrap());
    }

    #[test]
    fn delete_is_blocked_by_the_first_dependent() {
        let mut store = MemoryStore::default()
            .link(Relation::WindingEquipment, 3)
            .link(Relation::CuttingEquipment, 3);

        let err = guard_delete(&mut store, EntityKind::Equipment, 3).unwrap_err();

        assert!(matches!(
            err,
            AppError::DependentRowsExist { relation: Relation::WindingEquipment, id: 3 }
        ));
        assert_eq!(store.probes.get(&Relation::CuttingEquipment), None);
    }

    #[test]
    fn delete_passes_once_dependents_are_gone() {
        let mut store = MemoryStore::default().link(Relation::FlexaWorker, 8);

        assert!(has_dependents(&mut store, EntityKind::Worker, 8).unwrap());
        assert!(!has_dependents(&mut store, EntityKind::Worker, 9).unwrap());
        assert!(guard_delete(&mut store, EntityKind::Worker, 9).is_ok());
        assert_eq!(store.probes.get(&Relation::FinishedProductWorker), Some(&2));
    }

    #[test]
    fn orders_with_batches_are_guarded() {
        let mut store = MemoryStore::default().link(Relation::BatchOrder, 1);

        assert!(matches!(
            guard_delete(&mut store, EntityKind::Order, 1),
            Err(AppError::DependentRowsExist { relation: Relation::BatchOrder, .. })
        ));
    }

    #[test]
    fn leaf_rows_delete_without_probes() {
        let mut store = MemoryStore::default();

        assert!(guard_delete(&mut store, EntityKind::Paketki, 1).is_ok());
        assert!(store.probes.is_empty());
    }

    #[test]
    fn validate_reference_reports_existence() {
        let mut store = MemoryStore::with_rows(&[(EntityKind::Order, 1)]);

        assert!(validate_reference(&mut store, EntityKind::Order, 1).unwrap());
        assert!(!validate_reference(&mut store, EntityKind::Order, 9999).unwrap());
        assert!(!validate_reference(&mut store, EntityKind::Batch, 1).unwrap());
    }
}
