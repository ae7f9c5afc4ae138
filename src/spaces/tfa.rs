//! Treated-floor-area surfaces.

use crate::geom::Polygon;
use crate::id::Id;
use crate::spaces::params::SurfaceParams;
use crate::ventilation::VentPort;
use std::collections::BTreeSet;

/// One treated-floor-area element of a room.
///
/// A surface starts as one raw floor plate read from the CAD document.
/// After merging, a surface may stand for a whole group of touching plates,
/// with the originals kept as `sub_surfaces` for audit and serialization.
#[derive(Debug, Clone)]
pub struct TfaSurface {
    id: Id,
    host_room_name: String,
    footprint: Option<Polygon>,
    params: SurfaceParams,
    sub_surfaces: Vec<TfaSurface>,
    gross_area: Option<f64>,
    neighbors: BTreeSet<Id>,
}

impl TfaSurface {
    pub fn new(footprint: Option<Polygon>, host_room_name: &str, params: SurfaceParams) -> Self {
        let id = Id::next();
        Self {
            id,
            host_room_name: host_room_name.to_string(),
            footprint,
            params,
            sub_surfaces: Vec::new(),
            gross_area: None,
            neighbors: BTreeSet::from([id]),
        }
    }

    /// Assembles a surface from already-known parts (merging, deserialization).
    pub(crate) fn from_parts(
        id: Id,
        host_room_name: String,
        footprint: Option<Polygon>,
        params: SurfaceParams,
        sub_surfaces: Vec<TfaSurface>,
        gross_area: Option<f64>,
    ) -> Self {
        Self {
            id,
            host_room_name,
            footprint,
            params,
            sub_surfaces,
            gross_area,
            neighbors: BTreeSet::from([id]),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn host_room_name(&self) -> &str {
        &self.host_room_name
    }

    pub fn footprint(&self) -> Option<&Polygon> {
        self.footprint.as_ref()
    }

    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    /// Pre-merge constituents of a merged surface; empty for raw surfaces.
    pub fn sub_surfaces(&self) -> &[TfaSurface] {
        &self.sub_surfaces
    }

    /// Ids of all surfaces transitively touching this one (self included).
    pub fn neighbors(&self) -> &BTreeSet<Id> {
        &self.neighbors
    }

    /// Replaces the neighbor set. The own id is always retained, so the
    /// set stays reflexive no matter what the detector hands in.
    pub fn set_neighbors(&mut self, ids: BTreeSet<Id>) {
        self.neighbors = ids;
        self.neighbors.insert(self.id);
    }

    /// Gross floor area.
    ///
    /// An explicitly set area is authoritative and never recomputed.
    /// Otherwise the footprint is measured; without a footprint the area
    /// is unknown and reported as zero.
    pub fn gross_area(&self) -> f64 {
        if let Some(area) = self.gross_area {
            return area;
        }
        match &self.footprint {
            Some(footprint) => footprint.area(),
            None => {
                log::warn!(
                    "no footprint and no cached gross area for surface {}; reporting 0",
                    self.id
                );
                0.0
            }
        }
    }

    pub fn set_gross_area(&mut self, area: f64) {
        self.gross_area = Some(area);
    }

    /// Area-ratio factor applied to the gross area (1.0 when unset).
    pub fn tfa_factor(&self) -> f64 {
        self.params.tfa_factor.unwrap_or(1.0)
    }

    pub fn set_tfa_factor(&mut self, factor: f64) {
        self.params.tfa_factor = Some(factor);
    }

    /// Treated floor area: gross area scaled by the area-ratio factor.
    pub fn area_tfa(&self) -> f64 {
        self.gross_area() * self.tfa_factor()
    }

    pub fn space_number(&self) -> Option<&str> {
        self.params.space_number.as_deref()
    }

    pub fn set_space_number(&mut self, number: &str) {
        self.params.space_number = Some(number.to_string());
    }

    pub fn space_name(&self) -> Option<&str> {
        self.params.space_name.as_deref()
    }

    pub fn set_space_name(&mut self, name: &str) {
        self.params.space_name = Some(name.to_string());
    }

    pub fn vent_flow_rate(&self, port: VentPort) -> Option<f64> {
        self.params.vent_flow_rate(port)
    }

    pub fn set_vent_flow_rate(&mut self, port: VentPort, rate: f64) {
        self.params.set_vent_flow_rate(port, rate);
    }

    /// Human-readable key used for serialized maps.
    pub fn dict_key(&self) -> String {
        match (self.space_number(), self.space_name()) {
            (Some(number), Some(name)) => format!("{}-{}", number, name),
            _ => format!("{}-NONAME", self.id),
        }
    }
}
