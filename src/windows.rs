//! PHPP window records: frame, glazing, install conditions and the
//! installed window U-value.
//!
//! These are flat parameter records; frame and glazing types normally come
//! from a document library and are looked up by name. The only arithmetic
//! is `Window::u_w_installed`, the PHPP heat-loss sum over glazing, frame,
//! glazing-edge and install-edge contributions.

use crate::geom::EPS;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// One side of a rectangular window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEdge {
    Left,
    Right,
    Bottom,
    Top,
}

impl WindowEdge {
    pub const ALL: [WindowEdge; 4] = [
        WindowEdge::Left,
        WindowEdge::Right,
        WindowEdge::Bottom,
        WindowEdge::Top,
    ];
}

/// A value per window edge (left, right, bottom, top).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerEdge {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl PerEdge {
    pub fn uniform(value: f64) -> Self {
        Self {
            left: value,
            right: value,
            bottom: value,
            top: value,
        }
    }

    pub fn get(&self, edge: WindowEdge) -> f64 {
        match edge {
            WindowEdge::Left => self.left,
            WindowEdge::Right => self.right,
            WindowEdge::Bottom => self.bottom,
            WindowEdge::Top => self.top,
        }
    }
}

/// PHPP frame type: per-edge U-values, widths and psi coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    /// Frame U-values (W/m2K) per edge.
    pub u_values: PerEdge,
    /// Frame face widths (m) per edge.
    pub widths: PerEdge,
    /// Glazing-spacer psi values (W/mK) per edge.
    pub psi_glazing: PerEdge,
    /// Installation psi values (W/mK) per edge.
    pub psi_install: PerEdge,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            name: "Default Frame".to_string(),
            u_values: PerEdge::uniform(1.0),
            widths: PerEdge::uniform(0.1),
            psi_glazing: PerEdge::uniform(0.04),
            psi_install: PerEdge::uniform(0.04),
        }
    }
}

/// PHPP glazing type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glazing {
    pub name: String,
    /// Solar heat gain coefficient per EN 410.
    pub g_value: f64,
    /// Center-of-glass U-value (W/m2K) per EN 673.
    pub u_value: f64,
}

impl Default for Glazing {
    fn default() -> Self {
        Self {
            name: "Default Glazing".to_string(),
            g_value: 0.4,
            u_value: 1.0,
        }
    }
}

/// Which edges get the install psi applied (all of them by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installs {
    pub left: bool,
    pub right: bool,
    pub bottom: bool,
    pub top: bool,
}

impl Default for Installs {
    fn default() -> Self {
        Self::uniform(true)
    }
}

impl Installs {
    pub fn uniform(installed: bool) -> Self {
        Self {
            left: installed,
            right: installed,
            bottom: installed,
            top: installed,
        }
    }

    fn factor(&self, edge: WindowEdge) -> f64 {
        let installed = match edge {
            WindowEdge::Left => self.left,
            WindowEdge::Right => self.right,
            WindowEdge::Bottom => self.bottom,
            WindowEdge::Top => self.top,
        };
        if installed {
            1.0
        } else {
            0.0
        }
    }
}

/// A window aperture with its PHPP frame/glazing assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub name: String,
    /// Outer edge lengths (m).
    pub edge_lengths: PerEdge,
    /// Aperture area (m2).
    pub area: f64,
    pub frame: Frame,
    pub glazing: Glazing,
    pub installs: Installs,
}

impl Window {
    /// Glazing edge lengths: the window edges minus the frame faces at
    /// both ends of each edge.
    pub fn glazing_edge_lengths(&self) -> PerEdge {
        let w = &self.frame.widths;
        PerEdge {
            left: self.edge_lengths.left - w.top - w.bottom,
            right: self.edge_lengths.right - w.top - w.bottom,
            bottom: self.edge_lengths.bottom - w.left - w.right,
            top: self.edge_lengths.top - w.left - w.right,
        }
    }

    pub fn glazing_area(&self) -> f64 {
        let glazing_edges = self.glazing_edge_lengths();
        glazing_edges.left * glazing_edges.bottom
    }

    /// Installed window U-value (W/m2K).
    ///
    /// Heat losses of glazing, frame faces, glazing edges and install
    /// edges (gated by the install flags), referred to the aperture area.
    pub fn u_w_installed(&self) -> Result<f64> {
        if self.area < EPS {
            return Err(anyhow!("Window '{}' has no area", self.name));
        }
        let glazing_edges = self.glazing_edge_lengths();

        let hl_glazing = self.glazing_area() * self.glazing.u_value;
        let mut hl_frames = 0.0;
        let mut hl_glazing_edge = 0.0;
        let mut hl_install_edge = 0.0;
        for edge in WindowEdge::ALL {
            let length = self.edge_lengths.get(edge);
            hl_frames += length * self.frame.widths.get(edge) * self.frame.u_values.get(edge);
            hl_glazing_edge += glazing_edges.get(edge) * self.frame.psi_glazing.get(edge);
            hl_install_edge +=
                length * self.frame.psi_install.get(edge) * self.installs.factor(edge);
        }

        Ok((hl_glazing + hl_frames + hl_glazing_edge + hl_install_edge) / self.area)
    }
}
