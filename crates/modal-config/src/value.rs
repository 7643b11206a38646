//! Patch parameter values.

use serde::{Deserialize, Serialize};

/// A parameter value as written in a patch file.
///
/// TOML numbers are taken as plain values. Strings are either a choice
/// label (`exciter = "Blow"`) or a number with a unit suffix, see
/// [`parse_param_value`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    /// Plain numeric value.
    Number(f64),
    /// Choice label or number with unit.
    Text(String),
}

impl ParamValue {
    /// Numeric value holding exactly `value` with its shortest decimal form.
    ///
    /// `f32` widened directly to `f64` prints as e.g. `0.10000000149011612`;
    /// going through the shortest `f32` text keeps saved patches readable
    /// and still converts back to the same `f32`.
    pub fn from_f32(value: f32) -> Self {
        ParamValue::Number(widen(value))
    }
}

/// Widens an `f32` to the `f64` with the same shortest decimal form.
pub(crate) fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl core::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

/// Parse a parameter value string into an f32.
///
/// Supports:
/// - Plain numbers: "0.5", "12", "-0.03"
/// - Percentages: "50%" (divided by 100)
/// - Time in ms: "100ms" (converted to seconds)
/// - Time in s: "1.5s"
/// - Frequency in Hz: "440Hz"
/// - Frequency in kHz: "1.2kHz" (converted to Hz)
///
/// Returns `None` for anything else, including choice labels.
pub fn parse_param_value(value: &str) -> Option<f32> {
    let value = value.trim();

    if let Some(pct) = value.strip_suffix('%') {
        return pct.trim().parse::<f32>().ok().map(|v| v / 100.0);
    }

    if let Some(ms) = value.strip_suffix("ms") {
        return ms.trim().parse::<f32>().ok().map(|v| v / 1000.0);
    }

    if let Some(khz) = value
        .strip_suffix("kHz")
        .or_else(|| value.strip_suffix("khz"))
    {
        return khz.trim().parse::<f32>().ok().map(|v| v * 1000.0);
    }

    if let Some(hz) = value
        .strip_suffix("Hz")
        .or_else(|| value.strip_suffix("hz"))
    {
        return hz.trim().parse::<f32>().ok();
    }

    if let Some(s) = value.strip_suffix('s') {
        return s.trim().parse::<f32>().ok();
    }

    value.parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_param_value("0.5"), Some(0.5));
        assert_eq!(parse_param_value(" 12 "), Some(12.0));
        assert_eq!(parse_param_value("-0.03"), Some(-0.03));
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_param_value("50%"), Some(0.5));
        assert_eq!(parse_param_value("250ms"), Some(0.25));
        assert_eq!(parse_param_value("1.5s"), Some(1.5));
        assert_eq!(parse_param_value("440Hz"), Some(440.0));
        assert_eq!(parse_param_value("1.6kHz"), Some(1600.0));
        assert_eq!(parse_param_value("900 hz"), Some(900.0));
    }

    #[test]
    fn test_parse_rejects_labels() {
        assert_eq!(parse_param_value("Blow"), None);
        assert_eq!(parse_param_value("Undertones"), None);
        assert_eq!(parse_param_value(""), None);
    }

    #[test]
    fn test_from_f32_is_tidy_and_exact() {
        let value = ParamValue::from_f32(0.1);
        assert_eq!(value, ParamValue::Number(0.1));
        let ParamValue::Number(n) = value else {
            panic!("expected number");
        };
        assert_eq!(n as f32, 0.1f32);
    }

    #[test]
    fn test_untagged_toml_values() {
        #[derive(Deserialize)]
        struct Table {
            a: ParamValue,
            b: ParamValue,
            c: ParamValue,
        }
        let table: Table = toml::from_str("a = 12\nb = 0.25\nc = \"Blow\"").unwrap();
        assert_eq!(table.a, ParamValue::Number(12.0));
        assert_eq!(table.b, ParamValue::Number(0.25));
        assert_eq!(table.c, ParamValue::Text("Blow".to_string()));
    }
}
