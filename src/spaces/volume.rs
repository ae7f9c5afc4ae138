//! One vertical extrusion of a TFA surface.

use crate::geom::Solid;
use crate::id::Id;
use crate::spaces::tfa::TfaSurface;
use crate::ventilation::{VentFlowRates, VentPort};

/// Clear height assumed when neither geometry nor a user default is known.
pub const FALLBACK_CLEAR_HEIGHT: f64 = 2.5;

/// Net air volume assumed when neither geometry nor a cached value is known.
pub const FALLBACK_NET_VOLUME: f64 = 5.0;

/// Where a derived quantity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Computed from attached geometry.
    Geometry,
    /// Read from a stored scalar (user default or cached value).
    Cached,
    /// The hard-coded fallback constant.
    Default,
}

/// A derived quantity together with the path that produced it, so callers
/// and tests can tell a computed value from a fallback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    pub value: f64,
    pub source: Source,
}

/// One geometric part of a space: a TFA surface plus its solid(s).
///
/// All geometric derivations are best-effort. A missing or unusable solid
/// degrades to the stored scalar, then to a fixed constant; it never
/// propagates an error.
#[derive(Debug, Clone)]
pub struct Volume {
    id: Id,
    tfa_surface: TfaSurface,
    solids: Vec<Solid>,
    default_height: Option<f64>,
    cached_net_volume: Option<f64>,
    vent_flow_rates: VentFlowRates,
}

impl Volume {
    pub fn new(tfa_surface: TfaSurface, solids: Vec<Solid>, default_height: Option<f64>) -> Self {
        Self {
            id: Id::next(),
            tfa_surface,
            solids,
            default_height,
            cached_net_volume: None,
            vent_flow_rates: VentFlowRates::default(),
        }
    }

    /// Builds the volume by extruding the surface footprint vertically.
    ///
    /// When the footprint is missing or cannot be extruded, the volume is
    /// created without geometry and `height`/`net_volume` fall back to the
    /// given height and the constants.
    pub fn from_extrusion(tfa_surface: TfaSurface, height: f64) -> Self {
        let solids = match tfa_surface.footprint() {
            Some(footprint) => match Solid::extrude(footprint, height) {
                Ok(solid) => vec![solid],
                Err(err) => {
                    log::warn!(
                        "cannot extrude surface {}: {}; volume has no geometry",
                        tfa_surface.id(),
                        err
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        Self::new(tfa_surface, solids, Some(height))
    }

    /// Rebuilds a volume from serialized parts (no live geometry).
    pub(crate) fn from_parts(
        id: Id,
        tfa_surface: TfaSurface,
        default_height: Option<f64>,
        cached_net_volume: Option<f64>,
        vent_flow_rates: VentFlowRates,
    ) -> Self {
        Self {
            id,
            tfa_surface,
            solids: Vec::new(),
            default_height,
            cached_net_volume,
            vent_flow_rates,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn tfa_surface(&self) -> &TfaSurface {
        &self.tfa_surface
    }

    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    pub fn host_room_name(&self) -> &str {
        self.tfa_surface.host_room_name()
    }

    pub fn name(&self) -> Option<&str> {
        self.tfa_surface.space_name()
    }

    pub fn number(&self) -> Option<&str> {
        self.tfa_surface.space_number()
    }

    pub fn dict_key(&self) -> String {
        self.tfa_surface.dict_key()
    }

    pub fn set_default_height(&mut self, height: f64) {
        self.default_height = Some(height);
    }

    pub fn set_cached_net_volume(&mut self, net_volume: f64) {
        self.cached_net_volume = Some(net_volume);
    }

    /// Clear height: vertical span of the solid vertices, else the stored
    /// default, else 2.5.
    pub fn height_derived(&self) -> Derived {
        let mut extremes: Option<(f64, f64)> = None;
        for solid in &self.solids {
            if let Some((lo, hi)) = solid.z_extremes() {
                extremes = Some(match extremes {
                    Some((alo, ahi)) => (alo.min(lo), ahi.max(hi)),
                    None => (lo, hi),
                });
            }
        }
        if let Some((lo, hi)) = extremes {
            return Derived {
                value: (hi - lo).abs(),
                source: Source::Geometry,
            };
        }
        match self.default_height {
            Some(height) if height.is_finite() && height > 0. => Derived {
                value: height,
                source: Source::Cached,
            },
            _ => Derived {
                value: FALLBACK_CLEAR_HEIGHT,
                source: Source::Default,
            },
        }
    }

    pub fn height(&self) -> f64 {
        self.height_derived().value
    }

    /// Net air volume (Vn50): sum over the closed solids, else the cached
    /// value, else 5. Non-closed solids are skipped, contributing zero.
    pub fn net_volume_derived(&self) -> Derived {
        if !self.solids.is_empty() {
            let mut total = 0.;
            for solid in &self.solids {
                if solid.is_closed() {
                    total += solid.volume().abs();
                } else {
                    log::debug!("skipping open solid on volume {}", self.id);
                }
            }
            return Derived {
                value: total,
                source: Source::Geometry,
            };
        }
        match self.cached_net_volume {
            Some(net_volume) if net_volume.is_finite() => Derived {
                value: net_volume,
                source: Source::Cached,
            },
            _ => Derived {
                value: FALLBACK_NET_VOLUME,
                source: Source::Default,
            },
        }
    }

    pub fn net_volume(&self) -> f64 {
        self.net_volume_derived().value
    }

    pub fn area_tfa(&self) -> f64 {
        self.tfa_surface.area_tfa()
    }

    /// Flow rate for one port: the surface parameter when present, else
    /// the volume's own cached default.
    pub fn vent_flow_rate(&self, port: VentPort) -> f64 {
        self.tfa_surface
            .vent_flow_rate(port)
            .unwrap_or_else(|| self.vent_flow_rates.get(port))
    }

    /// Stores the rates on the volume and writes them through to the
    /// surface parameters, keeping both views consistent.
    pub fn set_vent_flow_rates(&mut self, rates: VentFlowRates) {
        self.vent_flow_rates = rates;
        for port in VentPort::ALL {
            self.tfa_surface.set_vent_flow_rate(port, rates.get(port));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{IsClose, Point, Polygon};
    use crate::spaces::params::SurfaceParams;

    fn surface_with_footprint(size: f64) -> TfaSurface {
        let footprint = Polygon::new(vec![
            Point::new(0., 0., 1.),
            Point::new(size, 0., 1.),
            Point::new(size, size, 1.),
            Point::new(0., size, 1.),
        ])
        .unwrap();
        TfaSurface::new(Some(footprint), "Zone A", SurfaceParams::default())
    }

    fn bare_surface() -> TfaSurface {
        TfaSurface::new(None, "Zone A", SurfaceParams::default())
    }

    #[test]
    fn test_height_fallback_chain() {
        // No solid, no default: the constant
        let volume = Volume::new(bare_surface(), Vec::new(), None);
        let height = volume.height_derived();
        assert!(height.value.is_close(FALLBACK_CLEAR_HEIGHT));
        assert_eq!(height.source, Source::Default);

        // No solid, stored default wins
        let volume = Volume::new(bare_surface(), Vec::new(), Some(3.0));
        let height = volume.height_derived();
        assert!(height.value.is_close(3.0));
        assert_eq!(height.source, Source::Cached);

        // A solid spanning z = 1..4 wins over the default
        let solid = Solid::extrude(
            surface_with_footprint(1.).footprint().unwrap(),
            3.0,
        )
        .unwrap();
        let volume = Volume::new(bare_surface(), vec![solid], Some(9.9));
        let height = volume.height_derived();
        assert!(height.value.is_close(3.0));
        assert_eq!(height.source, Source::Geometry);
    }

    #[test]
    fn test_invalid_default_height_falls_through() {
        let volume = Volume::new(bare_surface(), Vec::new(), Some(-1.0));
        assert!(volume.height().is_close(FALLBACK_CLEAR_HEIGHT));
    }

    #[test]
    fn test_net_volume_from_geometry() {
        let volume = Volume::from_extrusion(surface_with_footprint(2.), 2.5);
        let net = volume.net_volume_derived();
        assert!(net.value.is_close(10.0));
        assert_eq!(net.source, Source::Geometry);
    }

    #[test]
    fn test_net_volume_fallback_chain() {
        let mut volume = Volume::new(bare_surface(), Vec::new(), None);
        let net = volume.net_volume_derived();
        assert!(net.value.is_close(FALLBACK_NET_VOLUME));
        assert_eq!(net.source, Source::Default);

        volume.set_cached_net_volume(42.0);
        let net = volume.net_volume_derived();
        assert!(net.value.is_close(42.0));
        assert_eq!(net.source, Source::Cached);
    }

    #[test]
    fn test_open_solid_contributes_zero() {
        let cube = Solid::extrude(surface_with_footprint(1.).footprint().unwrap(), 1.).unwrap();
        let open = Solid::new(cube.polygons()[..5].to_vec()).unwrap();
        let volume = Volume::new(bare_surface(), vec![open], None);
        let net = volume.net_volume_derived();
        assert_eq!(net.source, Source::Geometry);
        assert!(net.value.is_close(0.0));
    }

    #[test]
    fn test_extrusion_without_footprint_degrades() {
        let volume = Volume::from_extrusion(bare_surface(), 2.8);
        assert!(volume.solids().is_empty());
        assert!(volume.height().is_close(2.8)); // The given height is kept
        assert!(volume.net_volume().is_close(FALLBACK_NET_VOLUME));
    }

    #[test]
    fn test_vent_flow_rate_prefers_surface_params() {
        let mut surface = bare_surface();
        surface.set_vent_flow_rate(VentPort::Supply, 30.0);
        let mut volume = Volume::new(surface, Vec::new(), None);
        volume.vent_flow_rates = VentFlowRates::new(1.0, 2.0, 3.0);

        assert!(volume.vent_flow_rate(VentPort::Supply).is_close(30.0));
        // No surface parameter for extract: cache wins
        assert!(volume.vent_flow_rate(VentPort::Extract).is_close(2.0));
    }

    #[test]
    fn test_set_vent_flow_rates_writes_through() {
        let mut volume = Volume::new(bare_surface(), Vec::new(), None);
        volume.set_vent_flow_rates(VentFlowRates::new(20.0, 15.0, 5.0));

        assert_eq!(
            volume.tfa_surface().vent_flow_rate(VentPort::Supply),
            Some(20.0)
        );
        assert!(volume.vent_flow_rate(VentPort::Transfer).is_close(5.0));
    }

    #[test]
    fn test_area_tfa_delegates_to_surface() {
        let mut surface = surface_with_footprint(2.);
        surface.set_tfa_factor(0.5);
        let volume = Volume::new(surface, Vec::new(), None);
        assert!(volume.area_tfa().is_close(2.0));
    }
}
