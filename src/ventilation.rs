//! Ventilation flow-rate records and operating schedules.
//!
//! Every volume and space tracks three named airflow ports: supply,
//! extract and transfer. The wire names (`V_sup`, `V_eta`, `V_trans`) are
//! the PHPP worksheet names and are kept verbatim in serialized payloads.

use crate::diagnostics::Diagnostic;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the three airflow channels tracked per volume/space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VentPort {
    Supply,
    Extract,
    Transfer,
}

impl VentPort {
    pub const ALL: [VentPort; 3] = [VentPort::Supply, VentPort::Extract, VentPort::Transfer];

    /// The PHPP wire name of the port.
    pub fn key(&self) -> &'static str {
        match self {
            VentPort::Supply => "V_sup",
            VentPort::Extract => "V_eta",
            VentPort::Transfer => "V_trans",
        }
    }
}

impl fmt::Display for VentPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Flow rates (m3/h) for all three ports.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VentFlowRates {
    #[serde(rename = "V_sup")]
    pub v_sup: f64,
    #[serde(rename = "V_eta")]
    pub v_eta: f64,
    #[serde(rename = "V_trans")]
    pub v_trans: f64,
}

impl VentFlowRates {
    pub fn new(v_sup: f64, v_eta: f64, v_trans: f64) -> Self {
        Self {
            v_sup,
            v_eta,
            v_trans,
        }
    }

    pub fn get(&self, port: VentPort) -> f64 {
        match port {
            VentPort::Supply => self.v_sup,
            VentPort::Extract => self.v_eta,
            VentPort::Transfer => self.v_trans,
        }
    }

    pub fn set(&mut self, port: VentPort, rate: f64) {
        match port {
            VentPort::Supply => self.v_sup = rate,
            VentPort::Extract => self.v_eta = rate,
            VentPort::Transfer => self.v_trans = rate,
        }
    }

    /// Builds a record from an untyped mapping.
    ///
    /// Acceptance is atomic: if any port is missing, nothing is accepted
    /// and the caller's cached state stays as it was.
    pub fn from_map(map: &BTreeMap<String, f64>) -> std::result::Result<Self, Diagnostic> {
        let mut rates = Self::default();
        for port in VentPort::ALL {
            match map.get(port.key()) {
                Some(rate) => rates.set(port, *rate),
                None => {
                    return Err(Diagnostic::MalformedInput {
                        key: port.key().to_string(),
                        value: "<missing>".to_string(),
                        reason: "ventilation record must name all three ports".to_string(),
                    })
                }
            }
        }
        Ok(rates)
    }
}

/// PHPP operating schedule for a ventilation system.
///
/// Three operating speeds, each a fraction of the design flow rate, with
/// the fraction of time spent at each. The default is constant operation
/// at full speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VentSchedule {
    pub speed_high: f64,
    pub time_high: f64,
    pub speed_med: f64,
    pub time_med: f64,
    pub speed_low: f64,
    pub time_low: f64,
}

impl Default for VentSchedule {
    fn default() -> Self {
        Self {
            speed_high: 1.0,
            time_high: 1.0,
            speed_med: 0.0,
            time_med: 0.0,
            speed_low: 0.0,
            time_low: 0.0,
        }
    }
}

impl VentSchedule {
    pub fn new(
        speed_high: f64,
        time_high: f64,
        speed_med: f64,
        time_med: f64,
        speed_low: f64,
        time_low: f64,
    ) -> Result<Self> {
        let fractions = [speed_high, time_high, speed_med, time_med, speed_low, time_low];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(anyhow!("Schedule fractions must be within 0..=1"));
        }
        let total_time = time_high + time_med + time_low;
        if (total_time - 1.0).abs() > 0.001 {
            return Err(anyhow!(
                "Operating time fractions must sum to 1.0, got {}",
                total_time
            ));
        }
        Ok(Self {
            speed_high,
            time_high,
            speed_med,
            time_med,
            speed_low,
            time_low,
        })
    }

    /// Time-weighted average of the operating speeds.
    pub fn annual_average_factor(&self) -> f64 {
        self.speed_high * self.time_high
            + self.speed_med * self.time_med
            + self.speed_low * self.time_low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_keys() {
        assert_eq!(VentPort::Supply.key(), "V_sup");
        assert_eq!(VentPort::Extract.key(), "V_eta");
        assert_eq!(VentPort::Transfer.key(), "V_trans");
    }

    #[test]
    fn test_rates_get_set() {
        let mut rates = VentFlowRates::default();
        rates.set(VentPort::Supply, 30.0);
        rates.set(VentPort::Transfer, 10.0);
        assert_eq!(rates.get(VentPort::Supply), 30.0);
        assert_eq!(rates.get(VentPort::Extract), 0.0);
        assert_eq!(rates.get(VentPort::Transfer), 10.0);
    }

    #[test]
    fn test_from_map_complete() {
        let mut map = BTreeMap::new();
        map.insert("V_sup".to_string(), 20.0);
        map.insert("V_eta".to_string(), 15.0);
        map.insert("V_trans".to_string(), 5.0);
        let rates = VentFlowRates::from_map(&map).unwrap();
        assert_eq!(rates, VentFlowRates::new(20.0, 15.0, 5.0));
    }

    #[test]
    fn test_from_map_missing_port_rejected() {
        let mut map = BTreeMap::new();
        map.insert("V_sup".to_string(), 20.0);
        map.insert("V_eta".to_string(), 15.0);
        let result = VentFlowRates::from_map(&map);
        assert!(result.is_err());
    }

    #[test]
    fn test_rates_wire_names() {
        let rates = VentFlowRates::new(20.0, 15.0, 5.0);
        let json = serde_json::to_string(&rates).unwrap();
        assert!(json.contains("\"V_sup\":20.0"));
        assert!(json.contains("\"V_eta\":15.0"));
        assert!(json.contains("\"V_trans\":5.0"));
    }

    #[test]
    fn test_default_schedule_is_constant_full_speed() {
        let sched = VentSchedule::default();
        assert!((sched.annual_average_factor() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_schedule_average_factor() {
        let sched = VentSchedule::new(1.0, 0.5, 0.77, 0.25, 0.4, 0.25).unwrap();
        let expected = 1.0 * 0.5 + 0.77 * 0.25 + 0.4 * 0.25;
        assert!((sched.annual_average_factor() - expected).abs() < 1e-10);
    }

    #[test]
    fn test_schedule_rejects_bad_fractions() {
        assert!(VentSchedule::new(1.2, 1.0, 0., 0., 0., 0.).is_err());
        assert!(VentSchedule::new(1.0, 0.5, 1.0, 0.2, 1.0, 0.2).is_err());
    }

    #[test]
    fn test_schedule_round_trip() {
        let sched = VentSchedule::new(1.0, 0.4, 0.7, 0.4, 0.4, 0.2).unwrap();
        let json = serde_json::to_string(&sched).unwrap();
        let back: VentSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(sched, back);
    }
}
