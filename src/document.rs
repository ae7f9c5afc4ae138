//! The CAD-document boundary.
//!
//! Everything the plugin reads from the document comes through explicit
//! handles passed in by the caller; no global document state is consulted.
//! Attribute bags are validated here, on the way in.

use crate::diagnostics::Diagnostic;
use crate::geom::{Polygon, Solid};
use crate::spaces::{SurfaceParams, TfaSurface};
use std::collections::BTreeMap;

/// One floor-plate object as handed over by the CAD document: its display
/// name, footprint geometry and the raw user-text attribute bag.
#[derive(Debug, Clone)]
pub struct CadObject {
    pub name: String,
    pub footprint: Option<Polygon>,
    pub user_text: BTreeMap<String, String>,
}

/// A candidate host room from the energy model, with its solid geometry.
#[derive(Debug, Clone)]
pub struct HostRoom {
    pub name: String,
    pub solid: Solid,
}

/// Builds a TFA surface from a CAD object.
///
/// The attribute bag is validated field by field; bad values are reported
/// and skipped. When the bag carries an object-name attribute, the live
/// document name wins over that (possibly stale) copy.
pub fn tfa_surface_from_object(
    object: &CadObject,
    host_room_name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> TfaSurface {
    let (mut params, mut param_diagnostics) = SurfaceParams::from_user_text(&object.user_text);
    diagnostics.append(&mut param_diagnostics);

    if params.space_name.is_some() {
        params.space_name = Some(object.name.clone());
    }

    TfaSurface::new(object.footprint.clone(), host_room_name, params)
}

/// Finds the room whose solid contains the footprint's centroid.
///
/// Returns `None` when the footprint sits in no room (or in none cleanly);
/// the host layer reports that to the user as a modeling problem.
pub fn find_host_room<'a>(footprint: &Polygon, rooms: &'a [HostRoom]) -> Option<&'a HostRoom> {
    let centroid = footprint.centroid();
    rooms.iter().find(|room| room.solid.is_point_inside(centroid))
}
