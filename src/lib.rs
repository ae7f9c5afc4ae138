//! Converts building geometry and energy-model data from a CAD host into
//! PHPP (Passive House Planning Package) records.
//!
//! The core is the space aggregation model in [`spaces`]: treated-floor-area
//! surfaces built from CAD floor plates, adjacency detection and merging of
//! touching plates, per-space roll-ups with fallback defaults, and the
//! nested-mapping wire format persisted as model annotations. The
//! [`windows`], [`ventilation`] and [`airtightness`] modules cover the
//! remaining PHPP parameter records.

pub mod airtightness;
pub mod annotation;
pub mod diagnostics;
pub mod document;
pub mod geom;
mod id;
pub mod spaces;
pub mod units;
pub mod ventilation;
pub mod windows;

// Prelude
pub use diagnostics::{Diagnostic, IdentityConflict};
pub use geom::{Point, Polygon, Solid, Vector};
pub use id::Id;
pub use spaces::{build_spaces, Space, SurfaceParams, TfaSurface, Volume};
pub use ventilation::{VentFlowRates, VentPort, VentSchedule};
