use chrono::NaiveDate;
use diesel::{AsChangeset, Insertable};
use serde::{Deserialize, Deserializer};

use crate::schema::{
    batches, cutting, equipment, extrusion, finished_products, flexa, orders, paketki, printing,
    winding, workers,
};
use crate::services::entity::{Relation, UniqueField};
use crate::services::integrity::Payload;

/// A partial update body. Empty patches leave the row untouched.
pub trait Patch {
    fn is_empty(&self) -> bool;
}

/// Distinguishes an absent key (`None`) from an explicit `null`
/// (`Some(None)`) so nullable columns can be cleared.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

macro_rules! impl_patch {
    ($changes:ty { $($field:ident),+ $(,)? }) => {
        impl Patch for $changes {
            fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())+
            }
        }
    };
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = orders)]
pub struct NewOrder {
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

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = orders)]
pub struct OrderChanges {
    pub order_number: Option<String>,
    pub client: Option<String>,
    pub order_status: Option<String>,
    pub product_name: Option<String>,
    pub sleeve_name: Option<String>,
    pub order_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    pub desired_completion_date: Option<Option<NaiveDate>>,
    pub quantity: Option<i32>,
    pub order_weight: Option<f64>,
    pub product_type: Option<String>,
    pub pack: Option<i32>,
    pub packaging: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub comments: Option<Option<String>>,
    pub width: Option<f64>,
    pub length: Option<f64>,
    pub thickness: Option<f64>,
    pub width_squared: Option<f64>,
    pub length_squared: Option<f64>,
    pub thickness_squared: Option<f64>,
    pub density: Option<f64>,
    pub weight_without_cutting: Option<f64>,
    pub weight_with_cutting: Option<f64>,
}

impl_patch!(OrderChanges {
    order_number, client, order_status, product_name, sleeve_name, order_date,
    desired_completion_date, quantity, order_weight, product_type, pack, packaging, comments,
    width, length, thickness, width_squared, length_squared, thickness_squared, density,
    weight_without_cutting, weight_with_cutting,
});

impl Payload for NewOrder {
    fn unique_value(&self, field: UniqueField) -> Option<&str> {
        (field == UniqueField::OrderNumber).then_some(self.order_number.as_str())
    }
}

impl Payload for OrderChanges {
    fn unique_value(&self, field: UniqueField) -> Option<&str> {
        match field {
            UniqueField::OrderNumber => self.order_number.as_deref(),
            _ => None,
        }
    }
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = batches)]
pub struct NewBatch {
    pub order_id: i32,
    pub batch_number: String,
    pub batch_status: String,
    pub label_name: Option<String>,
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub shipment: bool,
    pub print: Option<String>,
    pub accepted: Option<f64>,
    pub accepted_pcs: Option<i32>,
    pub deviation: Option<f64>,
}

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = batches)]
pub struct BatchChanges {
    pub order_id: Option<i32>,
    pub batch_number: Option<String>,
    pub batch_status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub label_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub completion_date: Option<Option<NaiveDate>>,
    pub shipment: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub print: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub accepted: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub accepted_pcs: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub deviation: Option<Option<f64>>,
}

impl_patch!(BatchChanges {
    order_id, batch_number, batch_status, label_name, completion_date, shipment, print,
    accepted, accepted_pcs, deviation,
});

impl Payload for NewBatch {
    fn reference(&self, relation: Relation) -> Option<i32> {
        (relation == Relation::BatchOrder).then_some(self.order_id)
    }
}

impl Payload for BatchChanges {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::BatchOrder => self.order_id,
            _ => None,
        }
    }
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = equipment)]
pub struct NewEquipment {
    pub name: String,
    pub description: Option<String>,
}

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = equipment)]
pub struct EquipmentChanges {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl_patch!(EquipmentChanges { name, description });

impl Payload for NewEquipment {
    fn unique_value(&self, field: UniqueField) -> Option<&str> {
        (field == UniqueField::EquipmentName).then_some(self.name.as_str())
    }
}

impl Payload for EquipmentChanges {
    fn unique_value(&self, field: UniqueField) -> Option<&str> {
        match field {
            UniqueField::EquipmentName => self.name.as_deref(),
            _ => None,
        }
    }
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = workers)]
pub struct NewWorker {
    pub fio: String,
}

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = workers)]
pub struct WorkerChanges {
    pub fio: Option<String>,
}

impl_patch!(WorkerChanges { fio });

impl Payload for NewWorker {
    fn unique_value(&self, field: UniqueField) -> Option<&str> {
        (field == UniqueField::WorkerFio).then_some(self.fio.as_str())
    }
}

impl Payload for WorkerChanges {
    fn unique_value(&self, field: UniqueField) -> Option<&str> {
        match field {
            UniqueField::WorkerFio => self.fio.as_deref(),
            _ => None,
        }
    }
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = winding)]
pub struct NewWinding {
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

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = winding)]
pub struct WindingChanges {
    pub batch_id: Option<i32>,
    pub equipment_id: Option<i32>,
    pub priority: Option<i32>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub cutting_date: Option<Option<NaiveDate>>,
    pub norm: Option<f64>,
    pub days: Option<f64>,
    pub wound: Option<f64>,
    pub required_to_wind: Option<f64>,
    pub remain_to_wind: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub weight_check: Option<Option<f64>>,
}

impl_patch!(WindingChanges {
    batch_id, equipment_id, priority, status, cutting_date, norm, days, wound, required_to_wind,
    remain_to_wind, weight_check,
});

impl Payload for NewWinding {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::WindingBatch => Some(self.batch_id),
            Relation::WindingEquipment => Some(self.equipment_id),
            _ => None,
        }
    }
}

impl Payload for WindingChanges {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::WindingBatch => self.batch_id,
            Relation::WindingEquipment => self.equipment_id,
            _ => None,
        }
    }
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = extrusion)]
pub struct NewExtrusion {
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

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = extrusion)]
pub struct ExtrusionChanges {
    pub winding_id: Option<i32>,
    pub worker_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub equipment_operating_time: Option<f64>,
    pub shift_norm: Option<f64>,
    pub total_shift: Option<f64>,
    pub white_defective: Option<f64>,
    pub transparent_defective: Option<f64>,
    pub colored_defective: Option<f64>,
    pub hourly_production: Option<f64>,
    pub seasonal: Option<f64>,
}

impl_patch!(ExtrusionChanges {
    winding_id, worker_id, date, equipment_operating_time, shift_norm, total_shift,
    white_defective, transparent_defective, colored_defective, hourly_production, seasonal,
});

impl Payload for NewExtrusion {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::ExtrusionWinding => Some(self.winding_id),
            Relation::ExtrusionWorker => Some(self.worker_id),
            _ => None,
        }
    }
}

impl Payload for ExtrusionChanges {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::ExtrusionWinding => self.winding_id,
            Relation::ExtrusionWorker => self.worker_id,
            _ => None,
        }
    }
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = cutting)]
pub struct NewCutting {
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

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = cutting)]
pub struct CuttingChanges {
    pub batch_id: Option<i32>,
    pub equipment_id: Option<i32>,
    pub priority: Option<i32>,
    pub status: Option<String>,
    pub cut: Option<f64>,
    pub cut_pcs: Option<i32>,
    pub remain_to_cut: Option<f64>,
    pub remain_to_cut_pcs: Option<i32>,
    pub days: Option<f64>,
    pub norm: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub pcs_check: Option<Option<i32>>,
}

impl_patch!(CuttingChanges {
    batch_id, equipment_id, priority, status, cut, cut_pcs, remain_to_cut, remain_to_cut_pcs,
    days, norm, start_date, pcs_check,
});

impl Payload for NewCutting {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::CuttingBatch => Some(self.batch_id),
            Relation::CuttingEquipment => Some(self.equipment_id),
            _ => None,
        }
    }
}

impl Payload for CuttingChanges {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::CuttingBatch => self.batch_id,
            Relation::CuttingEquipment => self.equipment_id,
            _ => None,
        }
    }
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = paketki)]
pub struct NewPaketki {
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

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = paketki)]
pub struct PaketkiChanges {
    pub extrusion_id: Option<i32>,
    pub cutting_id: Option<i32>,
    pub worker_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub operating_time: Option<f64>,
    pub shift_norm: Option<f64>,
    pub total_shift: Option<f64>,
    pub white_defective: Option<f64>,
    pub transparent_defective: Option<f64>,
    pub colored_defective: Option<f64>,
    pub hourly_production: Option<f64>,
    pub seasonal: Option<f64>,
}

impl_patch!(PaketkiChanges {
    extrusion_id, cutting_id, worker_id, date, operating_time, shift_norm, total_shift,
    white_defective, transparent_defective, colored_defective, hourly_production, seasonal,
});

impl Payload for NewPaketki {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::PaketkiExtrusion => Some(self.extrusion_id),
            Relation::PaketkiCutting => Some(self.cutting_id),
            Relation::PaketkiWorker => Some(self.worker_id),
            _ => None,
        }
    }
}

impl Payload for PaketkiChanges {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::PaketkiExtrusion => self.extrusion_id,
            Relation::PaketkiCutting => self.cutting_id,
            Relation::PaketkiWorker => self.worker_id,
            _ => None,
        }
    }
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = printing)]
pub struct NewPrinting {
    pub batch_id: i32,
    pub printed: f64,
    pub remain_to_print: f64,
}

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = printing)]
pub struct PrintingChanges {
    pub batch_id: Option<i32>,
    pub printed: Option<f64>,
    pub remain_to_print: Option<f64>,
}

impl_patch!(PrintingChanges { batch_id, printed, remain_to_print });

impl Payload for NewPrinting {
    fn reference(&self, relation: Relation) -> Option<i32> {
        (relation == Relation::PrintingBatch).then_some(self.batch_id)
    }
}

impl Payload for PrintingChanges {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::PrintingBatch => self.batch_id,
            _ => None,
        }
    }
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = flexa)]
pub struct NewFlexa {
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

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = flexa)]
pub struct FlexaChanges {
    pub printing_id: Option<i32>,
    pub worker_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub operating_time: Option<f64>,
    pub shift_norm: Option<f64>,
    pub total_shift: Option<f64>,
    pub white_defective: Option<f64>,
    pub print_defective: Option<f64>,
    pub colored_defective: Option<f64>,
    pub hourly_production: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub remark: Option<Option<String>>,
}

impl_patch!(FlexaChanges {
    printing_id, worker_id, date, operating_time, shift_norm, total_shift, white_defective,
    print_defective, colored_defective, hourly_production, remark,
});

impl Payload for NewFlexa {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::FlexaPrinting => Some(self.printing_id),
            Relation::FlexaWorker => Some(self.worker_id),
            _ => None,
        }
    }
}

impl Payload for FlexaChanges {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::FlexaPrinting => self.printing_id,
            Relation::FlexaWorker => self.worker_id,
            _ => None,
        }
    }
}

#[derive(Insertable, Deserialize, Debug, Clone)]
#[diesel(table_name = finished_products)]
pub struct NewFinishedProduct {
    pub batch_id: i32,
    pub worker_id: i32,
    pub date: NaiveDate,
    pub quantity: i32,
    pub weight: f64,
}

#[derive(AsChangeset, Deserialize, Debug, Clone, Default)]
#[diesel(table_name = finished_products)]
pub struct FinishedProductChanges {
    pub batch_id: Option<i32>,
    pub worker_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub quantity: Option<i32>,
    pub weight: Option<f64>,
}

impl_patch!(FinishedProductChanges { batch_id, worker_id, date, quantity, weight });

impl Payload for NewFinishedProduct {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::FinishedProductBatch => Some(self.batch_id),
            Relation::FinishedProductWorker => Some(self.worker_id),
            _ => None,
        }
    }
}

impl Payload for FinishedProductChanges {
    fn reference(&self, relation: Relation) -> Option<i32> {
        match relation {
            Relation::FinishedProductBatch => self.batch_id,
            Relation::FinishedProductWorker => self.worker_id,
            _ => None,
        }
    }
}
