//! Blower-door airflow calculations based on the PHPP net air volume.

use crate::spaces::Space;

/// Reference pressure at rest (Pa) used by the energy model.
pub const STANDARD_PRESSURE_PA: f64 = 4.0;

/// Empirical flow exponent for pressure normalization.
const FLOW_EXPONENT: f64 = 0.63;

/// Total Vn50 over a set of spaces.
pub fn total_vn50(spaces: &[Space]) -> f64 {
    spaces.iter().map(|s| s.vn50()).sum()
}

/// Room infiltration airflow in m3/s.
///
/// Preference order: an n50 rate against the PHPP net air volume, then a
/// q50 rate against the exposed envelope area, then the energy model's own
/// flow-per-exterior-area figure.
pub fn room_infiltration_airflow(
    n50: Option<f64>,
    q50: Option<f64>,
    vn50: f64,
    exposed_area: f64,
    flow_per_exterior_area: f64,
) -> f64 {
    if let Some(n50) = n50 {
        vn50 * n50 / 3600.0
    } else if let Some(q50) = q50 {
        exposed_area * q50 / 3600.0
    } else {
        exposed_area * flow_per_exterior_area / 3600.0
    }
}

/// Normalizes a blower-door airflow to the standard 4 Pa pressure.
pub fn standard_flow_rate(airflow: f64, blower_pressure: f64) -> f64 {
    let factor = (blower_pressure / STANDARD_PRESSURE_PA).powf(FLOW_EXPONENT);
    airflow / factor
}
