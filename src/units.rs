//! Unit-string parsing and conversion to metric.
//!
//! User attribute values arrive as free text like `"12 FT"` or `"450mm"`.
//! A bare number passes through unchanged; otherwise the first numeric
//! token is scaled by the factor between the recognized unit suffix and
//! the requested metric target.

/// Unit recognized in an input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Si,
    M,
    Cm,
    Mm,
    Ft,
    In,
    Ip,
    Ft3,
}

/// Metric unit the caller wants the value in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetUnit {
    M,
    Cm,
    Mm,
    /// W/m2K (thermal transmittance)
    WPerM2K,
    /// W/mK (linear thermal bridge)
    WPerMK,
    M3,
}

/// Recognizes the unit suffix of an input string.
pub fn parse_unit(input: &str) -> Unit {
    let upper = input.to_uppercase();
    if upper.contains("FT3") {
        Unit::Ft3
    } else if upper.contains("FT") || upper.contains('\'') {
        Unit::Ft
    } else if upper.contains("IN") || upper.contains('"') {
        Unit::In
    } else if upper.contains("MM") {
        Unit::Mm
    } else if upper.contains("CM") {
        Unit::Cm
    } else if upper.contains('M') {
        Unit::M
    } else if upper.contains("IP") {
        Unit::Ip
    } else {
        Unit::Si
    }
}

/// Conversion factor from `unit` to `target` (1.0 for unknown pairings).
fn factor(target: TargetUnit, unit: Unit) -> f64 {
    match (target, unit) {
        (TargetUnit::M, Unit::Cm) => 0.01,
        (TargetUnit::M, Unit::Mm) => 0.001,
        (TargetUnit::M, Unit::Ft) => 0.3048,
        (TargetUnit::M, Unit::In) => 0.0254,
        (TargetUnit::Cm, Unit::M) => 100.0,
        (TargetUnit::Cm, Unit::Mm) => 0.1,
        (TargetUnit::Cm, Unit::Ft) => 30.48,
        (TargetUnit::Cm, Unit::In) => 2.54,
        (TargetUnit::Mm, Unit::M) => 1000.0,
        (TargetUnit::Mm, Unit::Cm) => 10.0,
        (TargetUnit::Mm, Unit::Ft) => 304.8,
        (TargetUnit::Mm, Unit::In) => 25.4,
        // IP here is Btu/hr-sf-F
        (TargetUnit::WPerM2K, Unit::Ip) => 5.678264134,
        // IP here is Btu/hr-ft-F
        (TargetUnit::WPerMK, Unit::Ip) => 1.730734908,
        (TargetUnit::M3, Unit::Ft3) => 0.028316847,
        _ => 1.0,
    }
}

/// Converts a user-entered value string to the target metric unit.
///
/// Returns `None` when no numeric value can be found at all.
pub fn convert_to_metric(input: &str, target: TargetUnit) -> Option<f64> {
    let trimmed = input.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return Some(value);
    }
    let token = trimmed
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .find(|token| !token.is_empty())?;
    let value = token.parse::<f64>().ok()?;
    Some(value * factor(target, parse_unit(trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit() {
        assert_eq!(parse_unit("12 FT"), Unit::Ft);
        assert_eq!(parse_unit("4'"), Unit::Ft);
        assert_eq!(parse_unit("6\""), Unit::In);
        assert_eq!(parse_unit("450mm"), Unit::Mm);
        assert_eq!(parse_unit("45 cm"), Unit::Cm);
        assert_eq!(parse_unit("3 m"), Unit::M);
        assert_eq!(parse_unit("1 IP"), Unit::Ip);
        assert_eq!(parse_unit("200 ft3"), Unit::Ft3);
        assert_eq!(parse_unit("42"), Unit::Si);
    }

    #[test]
    fn test_bare_number_passes_through() {
        assert_eq!(convert_to_metric("2.5", TargetUnit::M), Some(2.5));
    }

    #[test]
    fn test_length_conversions() {
        let meters = convert_to_metric("12 FT", TargetUnit::M).unwrap();
        assert!((meters - 3.6576).abs() < 1e-10);

        let meters = convert_to_metric("450mm", TargetUnit::M).unwrap();
        assert!((meters - 0.45).abs() < 1e-10);

        let millimeters = convert_to_metric("1 in", TargetUnit::Mm).unwrap();
        assert!((millimeters - 25.4).abs() < 1e-10);
    }

    #[test]
    fn test_u_value_conversion() {
        let u_value = convert_to_metric("1 IP", TargetUnit::WPerM2K).unwrap();
        assert!((u_value - 5.678264134).abs() < 1e-10);
    }

    #[test]
    fn test_volume_conversion() {
        let cubic_meters = convert_to_metric("100 ft3", TargetUnit::M3).unwrap();
        assert!((cubic_meters - 2.8316847).abs() < 1e-10);
    }

    #[test]
    fn test_unknown_pairing_keeps_value() {
        // A volume given in mm makes no sense; the value passes unscaled
        assert_eq!(convert_to_metric("5 mm", TargetUnit::M3), Some(5.0));
    }

    #[test]
    fn test_no_number_at_all() {
        assert_eq!(convert_to_metric("tbd", TargetUnit::M), None);
    }
}
