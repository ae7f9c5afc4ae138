//! The logical room: one or more volumes sharing a room identity.

use crate::diagnostics::IdentityConflict;
use crate::id::Id;
use crate::spaces::volume::Volume;
use crate::ventilation::{VentFlowRates, VentPort, VentSchedule};
use anyhow::{anyhow, Result};

/// Tag used until a real ventilation system is assigned.
pub const DEFAULT_VENT_SYSTEM_ID: &str = "default";

/// A named room composed of one or more volumes.
///
/// The volume list is never empty: construction rejects an empty list, so
/// every aggregate (including the average ceiling height) is total.
#[derive(Debug, Clone)]
pub struct Space {
    id: Id,
    volumes: Vec<Volume>,
    vent_system_id: String,
    vent_flow_rates: VentFlowRates,
    vent_schedule: VentSchedule,
}

impl Space {
    pub fn new(volumes: Vec<Volume>) -> Result<Self> {
        Self::with_schedule(volumes, VentSchedule::default())
    }

    pub fn with_schedule(volumes: Vec<Volume>, vent_schedule: VentSchedule) -> Result<Self> {
        if volumes.is_empty() {
            return Err(anyhow!("A space needs at least one volume"));
        }
        Ok(Self {
            id: Id::next(),
            volumes,
            vent_system_id: DEFAULT_VENT_SYSTEM_ID.to_string(),
            vent_flow_rates: VentFlowRates::default(),
            vent_schedule,
        })
    }

    /// Rebuilds a space from serialized parts.
    pub(crate) fn from_parts(
        id: Id,
        volumes: Vec<Volume>,
        vent_system_id: String,
        vent_flow_rates: VentFlowRates,
        vent_schedule: VentSchedule,
    ) -> Result<Self> {
        if volumes.is_empty() {
            return Err(anyhow!("A space needs at least one volume"));
        }
        Ok(Self {
            id,
            volumes,
            vent_system_id,
            vent_flow_rates,
            vent_schedule,
        })
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn vent_system_id(&self) -> &str {
        &self.vent_system_id
    }

    pub fn set_vent_system_id(&mut self, id: &str) {
        self.vent_system_id = id.to_string();
    }

    pub fn vent_schedule(&self) -> &VentSchedule {
        &self.vent_schedule
    }

    pub fn set_vent_schedule(&mut self, schedule: VentSchedule) {
        self.vent_schedule = schedule;
    }

    /// Host room name shared by all volumes.
    ///
    /// Disagreement between volumes is a data-integrity fault in the source
    /// model; the error carries every candidate so the caller can decide.
    pub fn host_room_name(&self) -> std::result::Result<String, IdentityConflict> {
        self.single_identity("host room name", |v| {
            Some(v.host_room_name().to_string())
        })
        .map(|name| name.unwrap_or_default())
    }

    /// Space name shared by all volumes (None when uniformly unset).
    pub fn space_name(&self) -> std::result::Result<Option<String>, IdentityConflict> {
        self.single_identity("space name", |v| v.name().map(str::to_string))
    }

    /// Space number shared by all volumes (None when uniformly unset).
    pub fn space_number(&self) -> std::result::Result<Option<String>, IdentityConflict> {
        self.single_identity("space number", |v| v.number().map(str::to_string))
    }

    fn single_identity(
        &self,
        field: &'static str,
        get: impl Fn(&Volume) -> Option<String>,
    ) -> std::result::Result<Option<String>, IdentityConflict> {
        let mut distinct: Vec<Option<String>> = Vec::new();
        for volume in &self.volumes {
            let value = get(volume);
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        if distinct.len() == 1 {
            Ok(distinct.remove(0))
        } else {
            Err(IdentityConflict {
                field,
                candidates: distinct
                    .into_iter()
                    .map(|v| v.unwrap_or_else(|| "(unset)".to_string()))
                    .collect(),
            })
        }
    }

    /// Key used for serialized space maps. On an identity conflict the
    /// first volume's key is used after logging, so output still appears.
    pub fn dict_key(&self) -> String {
        match (self.space_number(), self.space_name()) {
            (Ok(Some(number)), Ok(Some(name))) => format!("{}-{}", number, name),
            (Err(conflict), _) | (_, Err(conflict)) => {
                log::warn!("{}; keying space {} by its first volume", conflict, self.id);
                self.volumes[0].dict_key()
            }
            _ => format!("{}-NONAME", self.id),
        }
    }

    /// Total net air volume (Vn50) over all volumes.
    pub fn vn50(&self) -> f64 {
        self.volumes.iter().map(|v| v.net_volume()).sum()
    }

    /// Total treated floor area over all volumes.
    pub fn area_tfa(&self) -> f64 {
        self.volumes.iter().map(|v| v.area_tfa()).sum()
    }

    /// Mean clear ceiling height over all volumes.
    pub fn avg_clear_ceiling_height(&self) -> f64 {
        let total: f64 = self.volumes.iter().map(|v| v.height()).sum();
        total / self.volumes.len() as f64
    }

    /// Flow rate for one port: the maximum reported by any volume.
    ///
    /// Ports serve overlapping footprints, so rates do not add up. The
    /// space-level override only answers when there are no volume values,
    /// which cannot happen for a constructed space but holds the contract
    /// for deserialized edge cases.
    pub fn vent_flow_rate(&self, port: VentPort) -> f64 {
        self.volumes
            .iter()
            .map(|v| v.vent_flow_rate(port))
            .fold(None, |acc: Option<f64>, rate| {
                Some(acc.map_or(rate, |a| a.max(rate)))
            })
            .unwrap_or_else(|| self.vent_flow_rates.get(port))
    }

    pub fn vent_flow_rates(&self) -> VentFlowRates {
        VentFlowRates::new(
            self.vent_flow_rate(VentPort::Supply),
            self.vent_flow_rate(VentPort::Extract),
            self.vent_flow_rate(VentPort::Transfer),
        )
    }

    /// Stores the rates as the space-level override and propagates them to
    /// every volume. The record is complete by construction, so acceptance
    /// is all-or-nothing.
    pub fn set_vent_flow_rates(&mut self, rates: VentFlowRates) {
        self.vent_flow_rates = rates;
        for volume in &mut self.volumes {
            volume.set_vent_flow_rates(rates);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{IsClose, Point, Polygon};
    use crate::spaces::params::SurfaceParams;
    use crate::spaces::tfa::TfaSurface;

    fn volume(number: &str, name: &str, host: &str, height: f64) -> Volume {
        let footprint = Polygon::new(vec![
            Point::new(0., 0., 0.),
            Point::new(2., 0., 0.),
            Point::new(2., 2., 0.),
            Point::new(0., 2., 0.),
        ])
        .unwrap();
        let params = SurfaceParams {
            space_number: Some(number.to_string()),
            space_name: Some(name.to_string()),
            ..Default::default()
        };
        let surface = TfaSurface::new(Some(footprint), host, params);
        Volume::from_extrusion(surface, height)
    }

    #[test]
    fn test_empty_space_rejected() {
        assert!(Space::new(Vec::new()).is_err());
    }

    #[test]
    fn test_identity_consistent() {
        let space = Space::new(vec![
            volume("101", "Kitchen", "Zone A", 2.5),
            volume("101", "Kitchen", "Zone A", 3.0),
        ])
        .unwrap();
        assert_eq!(space.host_room_name().unwrap(), "Zone A");
        assert_eq!(space.space_name().unwrap().as_deref(), Some("Kitchen"));
        assert_eq!(space.space_number().unwrap().as_deref(), Some("101"));
        assert_eq!(space.dict_key(), "101-Kitchen");
    }

    #[test]
    fn test_identity_conflict_reports_all_candidates() {
        let space = Space::new(vec![
            volume("101", "Kitchen", "Zone A", 2.5),
            volume("102", "Kitchen", "Zone A", 2.5),
        ])
        .unwrap();
        let conflict = space.space_number().unwrap_err();
        assert_eq!(conflict.field, "space number");
        assert_eq!(conflict.candidates, vec!["101", "102"]);
        assert_eq!(conflict.any(), "101");
        // Name and host room are still fine
        assert!(space.space_name().is_ok());
        assert!(space.host_room_name().is_ok());
    }

    #[test]
    fn test_aggregates() {
        let space = Space::new(vec![
            volume("101", "Kitchen", "Zone A", 2.0),
            volume("101", "Kitchen", "Zone A", 3.0),
        ])
        .unwrap();
        // Each volume: 2x2 footprint
        assert!(space.area_tfa().is_close(8.0));
        assert!(space.vn50().is_close(4.0 * 2.0 + 4.0 * 3.0));
        assert!(space.avg_clear_ceiling_height().is_close(2.5));
    }

    #[test]
    fn test_vent_flow_rate_is_max_across_volumes() {
        let mut a = volume("101", "Kitchen", "Zone A", 2.5);
        let mut b = volume("101", "Kitchen", "Zone A", 2.5);
        a.set_vent_flow_rates(VentFlowRates::new(20.0, 10.0, 0.0));
        b.set_vent_flow_rates(VentFlowRates::new(10.0, 15.0, 0.0));
        let space = Space::new(vec![a, b]).unwrap();

        assert!(space.vent_flow_rate(VentPort::Supply).is_close(20.0));
        assert!(space.vent_flow_rate(VentPort::Extract).is_close(15.0));
        assert!(space.vent_flow_rate(VentPort::Transfer).is_close(0.0));
    }

    #[test]
    fn test_set_vent_flow_rates_propagates_to_all_volumes() {
        let mut space = Space::new(vec![
            volume("101", "Kitchen", "Zone A", 2.5),
            volume("101", "Kitchen", "Zone A", 2.5),
        ])
        .unwrap();
        let rates = VentFlowRates::new(30.0, 25.0, 5.0);
        space.set_vent_flow_rates(rates);

        for vol in space.volumes() {
            assert!(vol.vent_flow_rate(VentPort::Supply).is_close(30.0));
            assert_eq!(
                vol.tfa_surface().vent_flow_rate(VentPort::Extract),
                Some(25.0)
            );
        }
        assert!(space.vent_flow_rate(VentPort::Transfer).is_close(5.0));
    }

    #[test]
    fn test_default_vent_system_id() {
        let space = Space::new(vec![volume("101", "Kitchen", "Zone A", 2.5)]).unwrap();
        assert_eq!(space.vent_system_id(), DEFAULT_VENT_SYSTEM_ID);
    }
}
