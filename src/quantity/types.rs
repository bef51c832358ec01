use crate::prefs::{with_preferences, Preferences};
use crate::quantity::formatter::{combine, format_general};
use crate::quantity::patterns::scale_factor_exponent;
use log::debug;
use serde::Serialize;

/// How the number behind a quantity is held.
#[derive(Debug, Clone, PartialEq)]
enum Repr {
    /// Pieces of the text the quantity was parsed from, kept verbatim so the
    /// value can be written back without loss.
    Text {
        mantissa: String,
        scale_factor: String,
    },
    /// Built directly from a number.
    Number(f64),
}

/// A number paired with (possibly empty) units.
#[derive(Debug, Clone)]
pub struct Quantity {
    repr: Repr,
    units: String,
    name: Option<String>,
    description: Option<String>,
}

/// Flattened view of a quantity, for JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantitySummary {
    pub mantissa: Option<String>,
    pub scale_factor: Option<String>,
    pub units: String,
    pub value: Option<f64>,
    pub is_infinite: bool,
    pub is_nan: bool,
    pub engineering: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Quantity {
    pub(crate) fn from_parts(mantissa: String, scale_factor: String, units: String) -> Self {
        Self {
            repr: Repr::Text {
                mantissa,
                scale_factor,
            },
            units,
            name: None,
            description: None,
        }
    }

    /// Build a quantity from a number; nothing is parsed.
    pub fn from_value(value: f64, units: Option<&str>) -> Self {
        Self {
            repr: Repr::Number(value),
            units: units.unwrap_or_default().to_string(),
            name: None,
            description: None,
        }
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    /// Signed mantissa exactly as written, if parsed from text.
    pub fn mantissa(&self) -> Option<&str> {
        match &self.repr {
            Repr::Text { mantissa, .. } => Some(mantissa),
            Repr::Number(_) => None,
        }
    }

    /// Scale factor or lower-cased exponent token, if parsed from text.
    pub fn scale_factor(&self) -> Option<&str> {
        match &self.repr {
            Repr::Text { scale_factor, .. } => Some(scale_factor),
            Repr::Number(_) => None,
        }
    }

    /// The number given at construction, if not parsed from text.
    pub fn numeric_value(&self) -> Option<f64> {
        match self.repr {
            Repr::Number(value) => Some(value),
            Repr::Text { .. } => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description(description);
        self
    }

    pub fn is_infinite(&self) -> bool {
        match &self.repr {
            Repr::Text { mantissa, .. } => {
                matches!(mantissa.to_lowercase().as_str(), "inf" | "-inf" | "+inf")
            }
            Repr::Number(value) => value.is_infinite(),
        }
    }

    pub fn is_nan(&self) -> bool {
        match &self.repr {
            Repr::Text { mantissa, .. } => {
                matches!(mantissa.to_lowercase().as_str(), "nan" | "-nan" | "+nan")
            }
            Repr::Number(value) => value.is_nan(),
        }
    }

    /// The value as a float.
    pub fn to_float(&self) -> f64 {
        match &self.repr {
            Repr::Text {
                mantissa,
                scale_factor,
            } => {
                let exponent =
                    scale_factor_exponent(scale_factor).unwrap_or(scale_factor.as_str());
                let number = format!("{}{}", mantissa, exponent);
                match number.parse::<f64>() {
                    Ok(value) => value,
                    Err(e) => {
                        debug!("'{}' does not convert to a float: {}", number, e);
                        f64::NAN
                    }
                }
            }
            Repr::Number(value) => *value,
        }
    }

    pub fn to_tuple(&self) -> (f64, &str) {
        (self.to_float(), &self.units)
    }

    /// The value as text without units. Text input comes back exactly as
    /// given (`14204.05751786M`); numbers use the machine precision.
    pub fn to_raw_string(&self) -> String {
        with_preferences(|prefs| self.to_raw_string_with(prefs))
    }

    pub fn to_raw_string_with(&self, prefs: &Preferences) -> String {
        match &self.repr {
            Repr::Text {
                mantissa,
                scale_factor,
            } => format!("{}{}", mantissa, scale_factor),
            Repr::Number(value) => format_general(*value, prefs.machine_precision + 1),
        }
    }

    /// Like [`Quantity::to_raw_string`] but with the scale factor written as
    /// an exponent (`1.0n` becomes `1.0e-9`).
    pub fn to_unitless_exponential(&self) -> String {
        with_preferences(|prefs| self.to_unitless_exponential_with(prefs))
    }

    pub fn to_unitless_exponential_with(&self, prefs: &Preferences) -> String {
        match &self.repr {
            Repr::Text {
                mantissa,
                scale_factor,
            } => {
                let exponent =
                    scale_factor_exponent(scale_factor).unwrap_or(scale_factor.as_str());
                format!("{}{}", mantissa, exponent)
            }
            Repr::Number(value) => format_general(*value, prefs.machine_precision + 1),
        }
    }

    /// The raw string with units attached.
    pub fn to_str(&self) -> String {
        with_preferences(|prefs| self.to_str_with(prefs))
    }

    pub fn to_str_with(&self, prefs: &Preferences) -> String {
        combine(
            &self.to_raw_string_with(prefs),
            "",
            &self.units,
            &prefs.spacer,
        )
    }

    /// Unitless exponential string and units. `None` when the mantissa ends
    /// in a bare decimal point (`1.ns`): such text renders fine but has no
    /// canonical raw form.
    pub fn raw_parts(&self) -> Option<(String, String)> {
        if self.mantissa().is_some_and(|m| m.ends_with('.')) {
            return None;
        }
        Some((self.to_unitless_exponential(), self.units.clone()))
    }

    pub fn summary(&self) -> QuantitySummary {
        QuantitySummary {
            mantissa: self.mantissa().map(str::to_string),
            scale_factor: self.scale_factor().map(str::to_string),
            units: self.units.clone(),
            value: Some(self.to_float()).filter(|v| v.is_finite()),
            is_infinite: self.is_infinite(),
            is_nan: self.is_nan(),
            engineering: self.to_engineering(None),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

// Name and description are labels, not part of the value.
impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.repr == other.repr && self.units == other.units
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Self::from_value(value, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(mantissa: &str, scale_factor: &str, units: &str) -> Quantity {
        Quantity::from_parts(
            mantissa.to_string(),
            scale_factor.to_string(),
            units.to_string(),
        )
    }

    #[test]
    fn test_exactly_one_representation() {
        let parsed = text("1.5", "n", "s");
        assert_eq!(parsed.mantissa(), Some("1.5"));
        assert_eq!(parsed.scale_factor(), Some("n"));
        assert_eq!(parsed.numeric_value(), None);

        let built = Quantity::from_value(2.5, Some("V"));
        assert_eq!(built.mantissa(), None);
        assert_eq!(built.scale_factor(), None);
        assert_eq!(built.numeric_value(), Some(2.5));
        assert_eq!(built.units(), "V");
    }

    #[test]
    fn test_to_float() {
        assert_eq!(text("1.5", "n", "s").to_float(), 1.5e-9);
        assert_eq!(text("-10", "e-9", "s").to_float(), -10e-9);
        assert_eq!(text("1.", "n", "s").to_float(), 1e-9);
        assert_eq!(text("2", "", "").to_float(), 2.0);
        assert!(text("-inf", "", "").to_float().is_infinite());
        assert!(text("+nan", "", "Hz").to_float().is_nan());
        // parts that never came through the parser
        assert!(text("1..2", "", "").to_float().is_nan());
        assert!(text("1.5", "x", "s").to_float().is_nan());
    }

    #[test]
    fn test_raw_strings() {
        let prefs = Preferences::default();
        let q = text("14204.05751786", "M", "Hz");
        assert_eq!(q.to_raw_string_with(&prefs), "14204.05751786M");
        assert_eq!(q.to_unitless_exponential_with(&prefs), "14204.05751786e6");

        let q = Quantity::from_value(1420405751.786, Some("Hz"));
        assert_eq!(q.to_raw_string_with(&prefs), "1.42040575e+09");
        assert_eq!(q.to_unitless_exponential_with(&prefs), "1.42040575e+09");
    }

    #[test]
    fn test_to_str() {
        let mut prefs = Preferences::default();
        prefs.spacer = " ".to_string();
        assert_eq!(
            text("1420405751.786", "", "Hz").to_str_with(&prefs),
            "1420405751.786 Hz"
        );
        assert_eq!(text("-10", "", "$").to_str_with(&prefs), "-$10");
    }

    #[test]
    fn test_special_values() {
        assert!(text("INF", "", "").is_infinite());
        assert!(text("-inf", "", "Hz").is_infinite());
        assert!(!text("-inf", "", "Hz").is_nan());
        assert!(text("+nan", "", "").is_nan());
        assert!(Quantity::from_value(f64::NEG_INFINITY, None).is_infinite());
        assert!(Quantity::from_value(f64::NAN, None).is_nan());
        assert!(!Quantity::from(1.0).is_nan());
    }

    #[test]
    fn test_raw_parts_trailing_point() {
        assert_eq!(
            text("1.0", "n", "s").raw_parts(),
            Some(("1.0e-9".to_string(), "s".to_string()))
        );
        assert_eq!(text("1.", "n", "s").raw_parts(), None);
    }

    #[test]
    fn test_labels_are_not_identity() {
        let a = text("1", "n", "s").with_name("tau");
        let b = text("1", "n", "s").with_description("delay");
        assert_eq!(a, b);
        assert_eq!(a.name(), Some("tau"));
        assert_eq!(b.description(), Some("delay"));
        assert_ne!(a, text("1", "n", "F"));
    }
}
