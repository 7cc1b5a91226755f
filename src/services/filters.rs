//! List filters. Every present parameter narrows the result by conjunction;
//! rows come back in primary-key order with `skip`/`limit` applied last.

use chrono::NaiveDate;
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::Deserialize;

use crate::schema::{
    batches, cutting, equipment, extrusion, finished_products, flexa, orders, paketki, printing,
    winding, workers,
};

pub const DEFAULT_LIMIT: u32 = 100;

/// Offset and limit for a list request.
pub fn window(skip: Option<u32>, limit: Option<u32>) -> (i64, i64) {
    (i64::from(skip.unwrap_or(0)), i64::from(limit.unwrap_or(DEFAULT_LIMIT)))
}

/// Empty strings impose no constraint.
fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards in the needle
/// taken literally.
pub fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct OrderFilter {
    pub client: Option<String>,
    pub order_status: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub fn orders_query(filter: &OrderFilter) -> orders::BoxedQuery<'static, Pg> {
    let mut query = orders::table.into_boxed();

    if let Some(client) = text(&filter.client) {
        query = query.filter(orders::client.ilike(contains_pattern(client)));
    }
    if let Some(status) = text(&filter.order_status) {
        query = query.filter(orders::order_status.ilike(contains_pattern(status)));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(orders::id.asc()).offset(offset).limit(limit)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct BatchFilter {
    pub order_id: Option<i32>,
    pub batch_status: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub fn batches_query(filter: &BatchFilter) -> batches::BoxedQuery<'static, Pg> {
    let mut query = batches::table.into_boxed();

    if let Some(order_id) = filter.order_id {
        query = query.filter(batches::order_id.eq(order_id));
    }
    if let Some(status) = text(&filter.batch_status) {
        query = query.filter(batches::batch_status.ilike(contains_pattern(status)));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(batches::id.asc()).offset(offset).limit(limit)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct EquipmentFilter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub fn equipment_query(filter: &EquipmentFilter) -> equipment::BoxedQuery<'static, Pg> {
    let mut query = equipment::table.into_boxed();

    if let Some(name) = text(&filter.name) {
        query = query.filter(equipment::name.ilike(contains_pattern(name)));
    }
    if let Some(description) = text(&filter.description) {
        query = query.filter(equipment::description.ilike(contains_pattern(description)));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(equipment::id.asc()).offset(offset).limit(limit)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct WorkerFilter {
    pub fio: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub fn workers_query(filter: &WorkerFilter) -> workers::BoxedQuery<'static, Pg> {
    let mut query = workers::table.into_boxed();

    if let Some(fio) = text(&filter.fio) {
        query = query.filter(workers::fio.ilike(contains_pattern(fio)));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(workers::id.asc()).offset(offset).limit(limit)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct WindingFilter {
    pub batch_id: Option<i32>,
    pub equipment_id: Option<i32>,
    pub status: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub fn winding_query(filter: &WindingFilter) -> winding::BoxedQuery<'static, Pg> {
    let mut query = winding::table.into_boxed();

    if let Some(batch_id) = filter.batch_id {
        query = query.filter(winding::batch_id.eq(batch_id));
    }
    if let Some(equipment_id) = filter.equipment_id {
        query = query.filter(winding::equipment_id.eq(equipment_id));
    }
    if let Some(status) = text(&filter.status) {
        query = query.filter(winding::status.ilike(contains_pattern(status)));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(winding::id.asc()).offset(offset).limit(limit)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct ExtrusionFilter {
    pub winding_id: Option<i32>,
    pub worker_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub fn extrusion_query(filter: &ExtrusionFilter) -> extrusion::BoxedQuery<'static, Pg> {
    let mut query = extrusion::table.into_boxed();

    if let Some(winding_id) = filter.winding_id {
        query = query.filter(extrusion::winding_id.eq(winding_id));
    }
    if let Some(worker_id) = filter.worker_id {
        query = query.filter(extrusion::worker_id.eq(worker_id));
    }
    if let Some(from) = filter.start_date {
        query = query.filter(extrusion::date.ge(from));
    }
    if let Some(to) = filter.end_date {
        query = query.filter(extrusion::date.le(to));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(extrusion::id.asc()).offset(offset).limit(limit)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct CuttingFilter {
    pub batch_id: Option<i32>,
    pub equipment_id: Option<i32>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// The date bounds apply to the cut's start date.
pub fn cutting_query(filter: &CuttingFilter) -> cutting::BoxedQuery<'static, Pg> {
    let mut query = cutting::table.into_boxed();

    if let Some(batch_id) = filter.batch_id {
        query = query.filter(cutting::batch_id.eq(batch_id));
    }
    if let Some(equipment_id) = filter.equipment_id {
        query = query.filter(cutting::equipment_id.eq(equipment_id));
    }
    if let Some(status) = text(&filter.status) {
        query = query.filter(cutting::status.ilike(contains_pattern(status)));
    }
    if let Some(from) = filter.start_date {
        query = query.filter(cutting::start_date.ge(from));
    }
    if let Some(to) = filter.end_date {
        query = query.filter(cutting::start_date.le(to));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(cutting::id.asc()).offset(offset).limit(limit)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct PaketkiFilter {
    pub extrusion_id: Option<i32>,
    pub cutting_id: Option<i32>,
    pub worker_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub fn paketki_query(filter: &PaketkiFilter) -> paketki::BoxedQuery<'static, Pg> {
    let mut query = paketki::table.into_boxed();

    if let Some(extrusion_id) = filter.extrusion_id {
        query = query.filter(paketki::extrusion_id.eq(extrusion_id));
    }
    if let Some(cutting_id) = filter.cutting_id {
        query = query.filter(paketki::cutting_id.eq(cutting_id));
    }
    if let Some(worker_id) = filter.worker_id {
        query = query.filter(paketki::worker_id.eq(worker_id));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(paketki::date.ge(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(paketki::date.le(to));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(paketki::id.asc()).offset(offset).limit(limit)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct PrintingFilter {
    pub batch_id: Option<i32>,
    pub printing_min: Option<f64>,
    pub printing_max: Option<f64>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub fn printing_query(filter: &PrintingFilter) -> printing::BoxedQuery<'static, Pg> {
    let mut query = printing::table.into_boxed();

    if let Some(batch_id) = filter.batch_id {
        query = query.filter(printing::batch_id.eq(batch_id));
    }
    if let Some(min) = filter.printing_min {
        query = query.filter(printing::printed.ge(min));
    }
    if let Some(max) = filter.printing_max {
        query = query.filter(printing::printed.le(max));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(printing::id.asc()).offset(offset).limit(limit)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct FlexaFilter {
    pub printing_id: Option<i32>,
    pub worker_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub fn flexa_query(filter: &FlexaFilter) -> flexa::BoxedQuery<'static, Pg> {
    let mut query = flexa::table.into_boxed();

    if let Some(printing_id) = filter.printing_id {
        query = query.filter(flexa::printing_id.eq(printing_id));
    }
    if let Some(worker_id) = filter.worker_id {
        query = query.filter(flexa::worker_id.eq(worker_id));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(flexa::date.ge(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(flexa::date.le(to));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(flexa::id.asc()).offset(offset).limit(limit)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct FinishedProductFilter {
    pub batch_id: Option<i32>,
    pub worker_id: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

pub fn finished_products_query(
    filter: &FinishedProductFilter,
) -> finished_products::BoxedQuery<'static, Pg> {
    let mut query = finished_products::table.into_boxed();

    if let Some(batch_id) = filter.batch_id {
        query = query.filter(finished_products::batch_id.eq(batch_id));
    }
    if let Some(worker_id) = filter.worker_id {
        query = query.filter(finished_products::worker_id.eq(worker_id));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(finished_products::date.ge(from));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(finished_products::date.le(to));
    }
    if let Some(min) = filter.min_quantity {
        query = query.filter(finished_products::quantity.ge(min));
    }
    if let Some(max) = filter.max_quantity {
        query = query.filter(finished_products::quantity.le(max));
    }

    let (offset, limit) = window(filter.skip, filter.limit);
    query.order(finished_products::id.asc()).offset(offset).limit(limit)
}
