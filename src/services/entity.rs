use std::fmt::{Display, Formatter};

/// Every table the service manages. Carries the static integrity metadata
/// the validators dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Order,
    Batch,
    Equipment,
    Worker,
    Winding,
    Extrusion,
    Cutting,
    Paketki,
    Printing,
    Flexa,
    FinishedProduct,
}

impl EntityKind {
    #[cfg(test)]
    pub const ALL: [EntityKind; 11] = [
        EntityKind::Order,
        EntityKind::Batch,
        EntityKind::Equipment,
        EntityKind::Worker,
        EntityKind::Winding,
        EntityKind::Extrusion,
        EntityKind::Cutting,
        EntityKind::Paketki,
        EntityKind::Printing,
        EntityKind::Flexa,
        EntityKind::FinishedProduct,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Order => "Order",
            EntityKind::Batch => "Batch",
            EntityKind::Equipment => "Equipment",
            EntityKind::Worker => "Worker",
            EntityKind::Winding => "Winding",
            EntityKind::Extrusion => "Extrusion",
            EntityKind::Cutting => "Cutting",
            EntityKind::Paketki => "Paketki",
            EntityKind::Printing => "Printing",
            EntityKind::Flexa => "Flexa",
            EntityKind::FinishedProduct => "Finished product",
        }
    }

    /// Foreign keys held by rows of this kind.
    pub const fn foreign_keys(self) -> &'static [Relation] {
        use Relation::*;

        match self {
            EntityKind::Order | EntityKind::Equipment | EntityKind::Worker => &[],
            EntityKind::Batch => &[BatchOrder],
            EntityKind::Winding => &[WindingBatch, WindingEquipment],
            EntityKind::Extrusion => &[ExtrusionWinding, ExtrusionWorker],
            EntityKind::Cutting => &[CuttingBatch, CuttingEquipment],
            EntityKind::Paketki => &[PaketkiExtrusion, PaketkiCutting, PaketkiWorker],
            EntityKind::Printing => &[PrintingBatch],
            EntityKind::Flexa => &[FlexaPrinting, FlexaWorker],
            EntityKind::FinishedProduct => &[FinishedProductBatch, FinishedProductWorker],
        }
    }

    pub const fn unique_fields(self) -> &'static [UniqueField] {
        match self {
            EntityKind::Order => &[UniqueField::OrderNumber],
            EntityKind::Equipment => &[UniqueField::EquipmentName],
            EntityKind::Worker => &[UniqueField::WorkerFio],
            _ => &[],
        }
    }

    /// Relations whose rows block deleting a row of this kind, in the order
    /// they are probed.
    pub const fn dependents(self) -> &'static [Relation] {
        use Relation::*;

        match self {
            EntityKind::Order => &[BatchOrder],
            EntityKind::Batch => &[WindingBatch, CuttingBatch, PrintingBatch, FinishedProductBatch],
            EntityKind::Equipment => &[WindingEquipment, CuttingEquipment],
            EntityKind::Worker => &[ExtrusionWorker, PaketkiWorker, FlexaWorker, FinishedProductWorker],
            EntityKind::Winding => &[ExtrusionWinding],
            EntityKind::Cutting => &[PaketkiCutting],
            EntityKind::Extrusion => &[PaketkiExtrusion],
            EntityKind::Printing => &[FlexaPrinting],
            EntityKind::Paketki | EntityKind::Flexa | EntityKind::FinishedProduct => &[],
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// A foreign-key edge, named child first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    BatchOrder,
    WindingBatch,
    WindingEquipment,
    ExtrusionWinding,
    ExtrusionWorker,
    CuttingBatch,
    CuttingEquipment,
    PaketkiExtrusion,
    PaketkiCutting,
    PaketkiWorker,
    PrintingBatch,
    FlexaPrinting,
    FlexaWorker,
    FinishedProductBatch,
    FinishedProductWorker,
}

impl Relation {
    pub const fn child(self) -> EntityKind {
        match self {
            Relation::BatchOrder => EntityKind::Batch,
            Relation::WindingBatch | Relation::WindingEquipment => EntityKind::Winding,
            Relation::ExtrusionWinding | Relation::ExtrusionWorker => EntityKind::Extrusion,
            Relation::CuttingBatch | Relation::CuttingEquipment => EntityKind::Cutting,
            Relation::PaketkiExtrusion | Relation::PaketkiCutting | Relation::PaketkiWorker => {
                EntityKind::Paketki
            }
            Relation::PrintingBatch => EntityKind::Printing,
            Relation::FlexaPrinting | Relation::FlexaWorker => EntityKind::Flexa,
            Relation::FinishedProductBatch | Relation::FinishedProductWorker => {
                EntityKind::FinishedProduct
            }
        }
    }

    pub const fn parent(self) -> EntityKind {
        match self {
            Relation::BatchOrder => EntityKind::Order,
            Relation::WindingBatch
            | Relation::CuttingBatch
            | Relation::PrintingBatch
            | Relation::FinishedProductBatch => EntityKind::Batch,
            Relation::WindingEquipment | Relation::CuttingEquipment => EntityKind::Equipment,
            Relation::ExtrusionWinding => EntityKind::Winding,
            Relation::ExtrusionWorker
            | Relation::PaketkiWorker
            | Relation::FlexaWorker
            | Relation::FinishedProductWorker => EntityKind::Worker,
            Relation::PaketkiExtrusion => EntityKind::Extrusion,
            Relation::PaketkiCutting => EntityKind::Cutting,
            Relation::FlexaPrinting => EntityKind::Printing,
        }
    }

    /// Column on the child table holding the parent's id.
    pub const fn column(self) -> &'static str {
        match self {
            Relation::BatchOrder => "order_id",
            Relation::WindingBatch
            | Relation::CuttingBatch
            | Relation::PrintingBatch
            | Relation::FinishedProductBatch => "batch_id",
            Relation::WindingEquipment | Relation::CuttingEquipment => "equipment_id",
            Relation::ExtrusionWinding => "winding_id",
            Relation::ExtrusionWorker
            | Relation::PaketkiWorker
            | Relation::FlexaWorker
            | Relation::FinishedProductWorker => "worker_id",
            Relation::PaketkiExtrusion => "extrusion_id",
            Relation::PaketkiCutting => "cutting_id",
            Relation::FlexaPrinting => "printing_id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueField {
    OrderNumber,
    EquipmentName,
    WorkerFio,
}

impl UniqueField {
    pub const fn owner(self) -> EntityKind {
        match self {
            UniqueField::OrderNumber => EntityKind::Order,
            UniqueField::EquipmentName => EntityKind::Equipment,
            UniqueField::WorkerFio => EntityKind::Worker,
        }
    }

    pub const fn column(self) -> &'static str {
        match self {
            UniqueField::OrderNumber => "order_number",
            UniqueField::EquipmentName => "name",
            UniqueField::WorkerFio => "fio",
        }
    }
}
