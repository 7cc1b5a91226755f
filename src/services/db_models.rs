use chrono::NaiveDate;
use diesel::Queryable;
use serde::Serialize;

use crate::services::entity::UniqueField;
use crate::services::integrity::Payload;

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Order {
    pub id: i32,
    pub order_number: String,
    pub client: String,
    pub order_status: String,
    pub product_name: String,
    pub sleeve_name: String,
    pub order_date: NaiveDate,
    pub desired_completion_date: Option<NaiveDate>,
    pub quantity: i32,
    pub order_weight: f64,
    pub product_type: String,
    pub pack: i32,
    pub packaging: i32,
    pub comments: Option<String>,
    pub width: f64,
    pub length: f64,
    pub thickness: f64,
    pub width_squared: f64,
    pub length_squared: f64,
    pub thickness_squared: f64,
    pub density: f64,
    pub weight_without_cutting: f64,
    pub weight_with_cutting: f64,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Batch {
    pub id: i32,
    pub order_id: i32,
    pub batch_number: String,
    pub batch_status: String,
    pub label_name: Option<String>,
    pub completion_date: Option<NaiveDate>,
    pub shipment: bool,
    pub print: Option<String>,
    pub accepted: Option<f64>,
    pub accepted_pcs: Option<i32>,
    pub deviation: Option<f64>,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Worker {
    pub id: i32,
    pub fio: String,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Winding {
    pub id: i32,
    pub batch_id: i32,
    pub equipment_id: i32,
    pub priority: i32,
    pub status: String,
    pub cutting_date: Option<NaiveDate>,
    pub norm: f64,
    pub days: f64,
    pub wound: f64,
    pub required_to_wind: f64,
    pub remain_to_wind: f64,
    pub weight_check: Option<f64>,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Extrusion {
    pub id: i32,
    pub winding_id: i32,
    pub worker_id: i32,
    pub date: NaiveDate,
    pub equipment_operating_time: f64,
    pub shift_norm: f64,
    pub total_shift: f64,
    pub white_defective: f64,
    pub transparent_defective: f64,
    pub colored_defective: f64,
    pub hourly_production: f64,
    pub seasonal: f64,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Cutting {
    pub id: i32,
    pub batch_id: i32,
    pub equipment_id: i32,
    pub priority: i32,
    pub status: String,
    pub cut: f64,
    pub cut_pcs: i32,
    pub remain_to_cut: f64,
    pub remain_to_cut_pcs: i32,
    pub days: f64,
    pub norm: f64,
    pub start_date: Option<NaiveDate>,
    pub pcs_check: Option<i32>,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Paketki {
    pub id: i32,
    pub extrusion_id: i32,
    pub cutting_id: i32,
    pub worker_id: i32,
    pub date: NaiveDate,
    pub operating_time: f64,
    pub shift_norm: f64,
    pub total_shift: f64,
    pub white_defective: f64,
    pub transparent_defective: f64,
    pub colored_defective: f64,
    pub hourly_production: f64,
    pub seasonal: f64,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Printing {
    pub id: i32,
    pub batch_id: i32,
    pub printed: f64,
    pub remain_to_print: f64,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Flexa {
    pub id: i32,
    pub printing_id: i32,
    pub worker_id: i32,
    pub date: NaiveDate,
    pub operating_time: f64,
    pub shift_norm: f64,
    pub total_shift: f64,
    pub white_defective: f64,
    pub print_defective: f64,
    pub colored_defective: f64,
    pub hourly_production: f64,
    pub remark: Option<String>,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct FinishedProduct {
    pub id: i32,
    pub batch_id: i32,
    pub worker_id: i32,
    pub date: NaiveDate,
    pub quantity: i32,
    pub weight: f64,
}

// Stored rows only report unique values, which update compares against.

impl Payload for Order {
    fn unique_value(&self, field: UniqueField) -> Option<&str> {
        (field == UniqueField::OrderNumber).then_some(self.order_number.as_str())
    }
}

impl Payload for Equipment {
    fn unique_value(&self, field: UniqueField) -> Option<&str> {
        (field == UniqueField::EquipmentName).then_some(self.name.as_str())
    }
}

impl Payload for Worker {
    fn unique_value(&self, field: UniqueField) -> Option<&str> {
        (field == UniqueField::WorkerFio).then_some(self.fio.as_str())
    }
}

impl Payload for Batch {}
impl Payload for Winding {}
impl Payload for Extrusion {}
impl Payload for Cutting {}
impl Payload for Paketki {}
impl Payload for Printing {}
impl Payload for Flexa {}
impl Payload for FinishedProduct {}
