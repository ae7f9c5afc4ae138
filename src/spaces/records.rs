//! Wire records for the annotation store.
//!
//! The live object graph serializes into plain nested mappings; geometry is
//! dropped on the way out and stays absent after a read, with the cached
//! scalar fields standing in for it. Map keys combine the human-readable
//! room key with the numeric id, so they stay legible and collision-free.

use crate::id::Id;
use crate::spaces::params::SurfaceParams;
use crate::spaces::space::Space;
use crate::spaces::tfa::TfaSurface;
use crate::spaces::volume::Volume;
use crate::ventilation::{VentFlowRates, VentPort, VentSchedule};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfaSurfaceRecord {
    pub id: Id,
    pub space_number: Option<String>,
    pub space_name: Option<String>,
    pub host_room_name: String,
    pub params: SurfaceParams,
    pub gross_area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeRecord {
    pub id: Id,
    pub height: f64,
    pub tfa_surface: TfaSurfaceRecord,
    #[serde(default)]
    pub tfa_sub_surfaces: BTreeMap<String, TfaSurfaceRecord>,
    pub net_volume: f64,
    pub vent_flow_rates: VentFlowRates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceRecord {
    pub id: Id,
    pub phpp_vent_system_id: String,
    pub volumes: BTreeMap<String, VolumeRecord>,
    pub vent_flow_rates: VentFlowRates,
    pub vent_schedule: VentSchedule,
}

/// Map key: human-readable room key plus the unique id.
pub fn composite_key(dict_key: &str, id: Id) -> String {
    format!("{}_{}", dict_key, id)
}

impl TfaSurface {
    pub fn to_record(&self) -> TfaSurfaceRecord {
        TfaSurfaceRecord {
            id: self.id(),
            space_number: self.space_number().map(str::to_string),
            space_name: self.space_name().map(str::to_string),
            host_room_name: self.host_room_name().to_string(),
            params: self.params().clone(),
            gross_area: self.gross_area(),
        }
    }

    /// Records of the pre-merge constituents, keyed like all other maps.
    pub fn sub_surface_records(&self) -> BTreeMap<String, TfaSurfaceRecord> {
        self.sub_surfaces()
            .iter()
            .map(|sub| (composite_key(&sub.dict_key(), sub.id()), sub.to_record()))
            .collect()
    }

    /// Rebuilds a surface (and its sub-surfaces) without geometry; the
    /// recorded gross area becomes the authoritative cached value.
    pub fn from_record(
        record: TfaSurfaceRecord,
        sub_records: &BTreeMap<String, TfaSurfaceRecord>,
    ) -> Self {
        let empty = BTreeMap::new();
        let sub_surfaces = sub_records
            .values()
            .map(|sub| TfaSurface::from_record(sub.clone(), &empty))
            .collect();
        TfaSurface::from_parts(
            record.id,
            record.host_room_name,
            None,
            record.params,
            sub_surfaces,
            Some(record.gross_area),
        )
    }
}

impl Volume {
    pub fn to_record(&self) -> VolumeRecord {
        let rates = VentFlowRates::new(
            self.vent_flow_rate(VentPort::Supply),
            self.vent_flow_rate(VentPort::Extract),
            self.vent_flow_rate(VentPort::Transfer),
        );
        VolumeRecord {
            id: self.id(),
            height: self.height(),
            tfa_surface: self.tfa_surface().to_record(),
            tfa_sub_surfaces: self.tfa_surface().sub_surface_records(),
            net_volume: self.net_volume(),
            vent_flow_rates: rates,
        }
    }

    pub fn from_record(record: VolumeRecord) -> Self {
        let surface = TfaSurface::from_record(record.tfa_surface, &record.tfa_sub_surfaces);
        Volume::from_parts(
            record.id,
            surface,
            Some(record.height),
            Some(record.net_volume),
            record.vent_flow_rates,
        )
    }
}

impl Space {
    pub fn to_record(&self) -> SpaceRecord {
        let volumes = self
            .volumes()
            .iter()
            .map(|v| (composite_key(&v.dict_key(), v.id()), v.to_record()))
            .collect();
        SpaceRecord {
            id: self.id(),
            phpp_vent_system_id: self.vent_system_id().to_string(),
            volumes,
            vent_flow_rates: self.vent_flow_rates(),
            vent_schedule: *self.vent_schedule(),
        }
    }

    pub fn from_record(record: SpaceRecord) -> Result<Self> {
        let volumes: Vec<Volume> = record
            .volumes
            .into_values()
            .map(Volume::from_record)
            .collect();
        Space::from_parts(
            record.id,
            volumes,
            record.phpp_vent_system_id,
            record.vent_flow_rates,
            record.vent_schedule,
        )
    }
}
