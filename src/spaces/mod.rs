//! PHPP space aggregation.
//!
//! Raw floor plates with metadata become TFA surfaces; touching surfaces
//! are detected and merged; each merged surface is wrapped in a volume and
//! volumes sharing a room identity become one space.
//!
//! Hierarchy: Space → Volume → TfaSurface → sub-surfaces.

pub mod adjacency;
pub mod merge;
pub mod params;
pub mod records;
pub mod space;
pub mod tfa;
pub mod volume;

pub use params::SurfaceParams;
pub use records::{SpaceRecord, TfaSurfaceRecord, VolumeRecord};
pub use space::Space;
pub use tfa::TfaSurface;
pub use volume::{Derived, Source, Volume};

use crate::diagnostics::Diagnostic;
use anyhow::Result;
use std::collections::BTreeMap;

/// Runs the whole aggregation: adjacency detection, merging, volume
/// wrapping and grouping into spaces.
///
/// Surfaces are processed per host room; within a room, volumes sharing a
/// space number and name end up in the same space. `default_height` is the
/// extrusion height used for every surface with a footprint and the height
/// fallback for surfaces without one. Output is deterministic: spaces are
/// ordered by host room, then by room key.
pub fn build_spaces(
    surfaces: Vec<TfaSurface>,
    default_height: f64,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<Space>> {
    let mut by_room: BTreeMap<String, Vec<TfaSurface>> = BTreeMap::new();
    for surface in surfaces {
        by_room
            .entry(surface.host_room_name().to_string())
            .or_default()
            .push(surface);
    }

    let mut spaces = Vec::new();
    for (_room, mut room_surfaces) in by_room {
        adjacency::find_neighbors(&mut room_surfaces);
        let groups = adjacency::bin_by_neighbors(room_surfaces);
        let merged = merge::join_touching_groups(groups, diagnostics);

        let mut volumes_by_key: BTreeMap<String, Vec<Volume>> = BTreeMap::new();
        for surface in merged {
            let key = surface.dict_key();
            let volume = Volume::from_extrusion(surface, default_height);
            volumes_by_key.entry(key).or_default().push(volume);
        }
        for (_key, volumes) in volumes_by_key {
            spaces.push(Space::new(volumes)?);
        }
    }
    Ok(spaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{IsClose, Point, Polygon};
    use crate::ventilation::VentPort;

    fn surface(
        x: f64,
        size: f64,
        room: &str,
        number: &str,
        name: &str,
    ) -> TfaSurface {
        let footprint = Polygon::new(vec![
            Point::new(x, 0., 0.),
            Point::new(x + size, 0., 0.),
            Point::new(x + size, size, 0.),
            Point::new(x, size, 0.),
        ])
        .unwrap();
        let params = SurfaceParams {
            space_number: Some(number.to_string()),
            space_name: Some(name.to_string()),
            ..Default::default()
        };
        TfaSurface::new(Some(footprint), room, params)
    }

    #[test]
    fn test_build_spaces_merges_touching_and_groups_by_identity() {
        // Two touching plates of one room plus a separate room
        let surfaces = vec![
            surface(0., 1., "Zone A", "101", "Kitchen"),
            surface(1., 1., "Zone A", "101", "Kitchen"),
            surface(5., 1., "Zone A", "102", "Bath"),
        ];
        let mut diagnostics = Vec::new();
        let spaces = build_spaces(surfaces, 2.5, &mut diagnostics).unwrap();

        assert_eq!(spaces.len(), 2);
        assert!(diagnostics.is_empty());

        let kitchen = &spaces[0];
        assert_eq!(kitchen.space_name().unwrap().as_deref(), Some("Kitchen"));
        assert_eq!(kitchen.volumes().len(), 1);
        assert!(kitchen.area_tfa().is_close(2.0));
        assert!(kitchen.vn50().is_close(5.0)); // 2 m2 x 2.5 m

        let bath = &spaces[1];
        assert_eq!(bath.space_number().unwrap().as_deref(), Some("102"));
        assert!(bath.area_tfa().is_close(1.0));
    }

    #[test]
    fn test_build_spaces_same_identity_in_two_parts() {
        // Two plates of the same room that do NOT touch: one space,
        // two volumes
        let surfaces = vec![
            surface(0., 1., "Zone A", "101", "Kitchen"),
            surface(5., 1., "Zone A", "101", "Kitchen"),
        ];
        let mut diagnostics = Vec::new();
        let spaces = build_spaces(surfaces, 2.5, &mut diagnostics).unwrap();

        assert_eq!(spaces.len(), 1);
        assert_eq!(spaces[0].volumes().len(), 2);
        assert!(spaces[0].avg_clear_ceiling_height().is_close(2.5));
    }

    #[test]
    fn test_build_spaces_separate_rooms_never_merge() {
        // Touching plates in different host rooms stay apart
        let surfaces = vec![
            surface(0., 1., "Zone A", "101", "Kitchen"),
            surface(1., 1., "Zone B", "201", "Office"),
        ];
        let mut diagnostics = Vec::new();
        let spaces = build_spaces(surfaces, 2.5, &mut diagnostics).unwrap();

        assert_eq!(spaces.len(), 2);
        for space in &spaces {
            assert!(space.volumes()[0].tfa_surface().sub_surfaces().is_empty());
        }
    }

    #[test]
    fn test_build_spaces_vent_rates_survive() {
        let mut a = surface(0., 1., "Zone A", "101", "Kitchen");
        a.set_vent_flow_rate(VentPort::Supply, 20.0);
        let mut b = surface(1., 1., "Zone A", "101", "Kitchen");
        b.set_vent_flow_rate(VentPort::Supply, 10.0);

        let mut diagnostics = Vec::new();
        let spaces = build_spaces(vec![a, b], 2.5, &mut diagnostics).unwrap();
        assert_eq!(spaces.len(), 1);
        assert!(spaces[0].vent_flow_rate(VentPort::Supply).is_close(20.0));
    }
}
