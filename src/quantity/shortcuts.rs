//! One-call conversions: parse, then render with the current preferences.

use crate::quantity::error::Result;
use crate::quantity::types::Quantity;

/// `"1420405751.786 Hz"` -> `"1.4204GHz"`
pub fn quant_to_eng(text: &str, units: Option<&str>) -> Result<String> {
    Ok(Quantity::parse(text, units, None)?.to_engineering(None))
}

/// `"1420405751.786 Hz"` -> `"1.4204G"`
pub fn quant_to_unitless_eng(text: &str, units: Option<&str>) -> Result<String> {
    Ok(Quantity::parse(text, units, None)?.to_unitless_engineering(None))
}

pub fn quant_to_sci(text: &str, units: Option<&str>) -> Result<String> {
    Ok(Quantity::parse(text, units, None)?.to_scientific(None))
}

/// The number as written, with units: `"1420405751.786 Hz"`.
pub fn quant_to_str(text: &str, units: Option<&str>) -> Result<String> {
    Ok(Quantity::parse(text, units, None)?.to_str())
}

/// The number without units, scale factor written as an exponent:
/// `"1.5ns"` -> `"1.5e-9"`.
pub fn quant_to_unitless_str(text: &str, units: Option<&str>) -> Result<String> {
    Ok(Quantity::parse(text, units, None)?.to_unitless_exponential())
}

/// Drop the units and keep the number exactly as written
/// (`"14204.05751786MHz"` -> `"14204.05751786M"`).
pub fn quant_strip(text: &str, units: Option<&str>) -> Result<String> {
    Ok(Quantity::parse(text, units, None)?.to_raw_string())
}

pub fn quant_to_float(text: &str, units: Option<&str>) -> Result<f64> {
    Ok(Quantity::parse(text, units, None)?.to_float())
}

pub fn quant_to_tuple(text: &str, units: Option<&str>) -> Result<(f64, String)> {
    let quantity = Quantity::parse(text, units, None)?;
    Ok((quantity.to_float(), quantity.units().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{set_preferences, PreferenceUpdate, Setting};
    use crate::quantity::error::QuantityError;

    const HYDROGEN: &str = "1420405751.786 Hz";

    fn spaced() {
        set_preferences(PreferenceUpdate {
            spacer: Setting::Set(" ".to_string()),
            ..PreferenceUpdate::reset_all()
        });
    }

    #[test]
    fn test_shortcuts() {
        spaced();
        assert_eq!(
            quant_to_tuple(HYDROGEN, None),
            Ok((1420405751.786, "Hz".to_string()))
        );
        assert_eq!(quant_to_eng(HYDROGEN, None).unwrap(), "1.4204 GHz");
        assert_eq!(quant_to_sci(HYDROGEN, None).unwrap(), "1.4204×10⁰⁹ Hz");
        assert_eq!(quant_to_str(HYDROGEN, None).unwrap(), "1420405751.786 Hz");
        assert_eq!(quant_to_float(HYDROGEN, None), Ok(1420405751.786));
        assert_eq!(quant_to_unitless_eng(HYDROGEN, None).unwrap(), "1.4204G");
        assert_eq!(quant_to_unitless_str(HYDROGEN, None).unwrap(), "1420405751.786");
        assert_eq!(quant_strip(HYDROGEN, None).unwrap(), "1420405751.786");
        assert_eq!(quant_strip("14204.05751786MHz", None).unwrap(), "14204.05751786M");
        assert_eq!(
            quant_to_unitless_str("14204.05751786MHz", None).unwrap(),
            "14204.05751786e6"
        );
        assert_eq!(
            Quantity::from_value(1420405751.786, Some("Hz")).to_raw_string(),
            "1.42040575e+09"
        );
    }

    #[test]
    fn test_constants() {
        spaced();
        let cases = [
            ("h", "662.61e-36 J-s"),
            ("k", "13.806e-24 J/K"),
            ("q", "160.22e-21 C"),
            ("c", "299.79 Mm/s"),
            ("C0", "273.15 K"),
            ("eps0", "8.8542 pF/m"),
            ("mu0", "1.2566 uH/m"),
            ("Z0", "376.73 Ohms"),
        ];
        for (name, expected) in cases {
            assert_eq!(quant_to_eng(name, None).unwrap(), expected, "{}", name);
        }
    }

    #[test]
    fn test_errors_propagate() {
        assert_eq!(
            quant_to_eng(HYDROGEN, Some("Ohms")),
            Err(QuantityError::UnitsMismatch {
                expected: "Ohms".to_string(),
                found: "Hz".to_string()
            })
        );
        assert!(quant_to_float("fast", None).is_err());
    }
}
