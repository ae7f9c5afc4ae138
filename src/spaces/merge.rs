//! Collapses each group of touching TFA surfaces into one logical surface.

use crate::diagnostics::Diagnostic;
use crate::geom::boolean::outline_union;
use crate::geom::{Polygon, EPS};
use crate::id::Id;
use crate::spaces::tfa::TfaSurface;
use crate::ventilation::VentPort;

/// Merges every neighbor group into a single output surface.
///
/// Singleton groups pass through unchanged. A group whose footprints do
/// not union into one planar region is dropped with a diagnostic, so the
/// output may hold fewer surfaces than there were groups.
pub fn join_touching_groups(
    groups: Vec<Vec<TfaSurface>>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<TfaSurface> {
    let mut joined = Vec::with_capacity(groups.len());

    for group in groups {
        if group.is_empty() {
            continue;
        }
        if group.len() == 1 {
            joined.extend(group);
            continue;
        }
        if let Some(surface) = merge_group(group, diagnostics) {
            joined.push(surface);
        }
    }

    joined
}

fn merge_group(group: Vec<TfaSurface>, diagnostics: &mut Vec<Diagnostic>) -> Option<TfaSurface> {
    let ids: Vec<Id> = group.iter().map(|s| s.id()).collect();

    let footprints: Option<Vec<&Polygon>> = group.iter().map(|s| s.footprint()).collect();
    let merged_footprint = footprints.and_then(|footprints| outline_union(&footprints));

    let gross_sum: f64 = group.iter().map(|s| s.gross_area()).sum();
    if merged_footprint.is_none() || gross_sum < EPS {
        log::warn!("dropping merge group {:?}: no usable unioned surface", ids);
        diagnostics.push(Diagnostic::EmptyMergeGroup { ids });
        return None;
    }

    let tfa_sum: f64 = group.iter().map(|s| s.area_tfa()).sum();
    let max_rate = |port: VentPort| {
        group
            .iter()
            .map(|s| s.vent_flow_rate(port).unwrap_or(0.0))
            .fold(0.0, f64::max)
    };
    let rates: Vec<(VentPort, f64)> = VentPort::ALL.into_iter().map(|p| (p, max_rate(p))).collect();

    // Identity comes from the first member; members were already asserted
    // to share identity upstream.
    let host_room_name = group[0].host_room_name().to_string();
    let params = group[0].params().clone();

    let mut merged = TfaSurface::from_parts(
        Id::next(),
        host_room_name,
        merged_footprint,
        params,
        group,
        None,
    );

    // Gross area is the sum of the members, not the measured union; any
    // overlap between members is masked here on purpose.
    merged.set_gross_area(gross_sum);
    merged.set_tfa_factor(tfa_sum / gross_sum);
    for (port, rate) in rates {
        merged.set_vent_flow_rate(port, rate);
    }

    Some(merged)
}
