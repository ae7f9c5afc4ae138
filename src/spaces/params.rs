//! Per-surface parameters attached as key/value metadata in the CAD document.
//!
//! Well-known keys become typed optional fields; anything else is kept in a
//! residual map so user extensions survive a round trip. Validation happens
//! here, at the boundary where external metadata enters the system: a value
//! that does not parse rejects that field only and never touches state that
//! was already accepted.

use crate::diagnostics::Diagnostic;
use crate::ventilation::VentPort;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const KEY_SPACE_NUMBER: &str = "Room_Number";
const KEY_SPACE_NAME: &str = "Object Name";
const KEY_TFA_FACTOR: &str = "TFA_Factor";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceParams {
    #[serde(rename = "Room_Number", default, skip_serializing_if = "Option::is_none")]
    pub space_number: Option<String>,
    #[serde(rename = "Object Name", default, skip_serializing_if = "Option::is_none")]
    pub space_name: Option<String>,
    #[serde(rename = "TFA_Factor", default, skip_serializing_if = "Option::is_none")]
    pub tfa_factor: Option<f64>,
    #[serde(rename = "V_sup", default, skip_serializing_if = "Option::is_none")]
    pub v_sup: Option<f64>,
    #[serde(rename = "V_eta", default, skip_serializing_if = "Option::is_none")]
    pub v_eta: Option<f64>,
    #[serde(rename = "V_trans", default, skip_serializing_if = "Option::is_none")]
    pub v_trans: Option<f64>,
    /// Free-form extension keys, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl SurfaceParams {
    /// Builds a validated record from a raw CAD attribute bag.
    ///
    /// Unparseable numeric values are rejected field-by-field and reported.
    pub fn from_user_text(
        user_text: &BTreeMap<String, String>,
    ) -> (Self, Vec<Diagnostic>) {
        let mut params = Self::default();
        let mut diagnostics = Vec::new();

        for (key, value) in user_text {
            match key.as_str() {
                KEY_SPACE_NUMBER => params.space_number = Some(value.clone()),
                KEY_SPACE_NAME => params.space_name = Some(value.clone()),
                KEY_TFA_FACTOR => {
                    params.tfa_factor = parse_number(key, value, &mut diagnostics);
                }
                _ => {
                    if let Some(port) = port_for_key(key) {
                        let rate = parse_number(key, value, &mut diagnostics);
                        params.set_vent_flow_rate_opt(port, rate);
                    } else {
                        params.extra.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        (params, diagnostics)
    }

    pub fn vent_flow_rate(&self, port: VentPort) -> Option<f64> {
        match port {
            VentPort::Supply => self.v_sup,
            VentPort::Extract => self.v_eta,
            VentPort::Transfer => self.v_trans,
        }
    }

    pub fn set_vent_flow_rate(&mut self, port: VentPort, rate: f64) {
        self.set_vent_flow_rate_opt(port, Some(rate));
    }

    fn set_vent_flow_rate_opt(&mut self, port: VentPort, rate: Option<f64>) {
        match port {
            VentPort::Supply => self.v_sup = rate,
            VentPort::Extract => self.v_eta = rate,
            VentPort::Transfer => self.v_trans = rate,
        }
    }
}

fn port_for_key(key: &str) -> Option<VentPort> {
    VentPort::ALL.into_iter().find(|port| port.key() == key)
}

fn parse_number(key: &str, value: &str, diagnostics: &mut Vec<Diagnostic>) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(number) => Some(number),
        Err(_) => {
            log::warn!("ignoring bad value {:?} for '{}'", value, key);
            diagnostics.push(Diagnostic::MalformedInput {
                key: key.to_string(),
                value: value.to_string(),
                reason: "expected a number".to_string(),
            });
            None
        }
    }
}
