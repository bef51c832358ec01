//! `name = value -- description` lines, read into named quantities.

use crate::prefs::{with_preferences, Preferences};
use crate::quantity::error::{QuantityError, Result};
use crate::quantity::types::Quantity;
use log::trace;
use regex::Regex;
use std::collections::HashMap;

/// Parse assignment lines such as
///
/// ```text
/// Fref = 156 MHz  -- reference frequency
/// Kdet = 88.3 uA  -- gain of phase detector
/// ```
///
/// into a map from name to quantity, with the description attached. Blank
/// lines and lines starting with `#` are skipped; any other line that is not
/// an assignment is an error.
pub fn parse_assignments(text: &str) -> Result<HashMap<String, Quantity>> {
    with_preferences(|prefs| parse_assignments_with(text, prefs))
}

pub fn parse_assignments_with(
    text: &str,
    prefs: &Preferences,
) -> Result<HashMap<String, Quantity>> {
    let recognizer = compile_recognizer(&prefs.assignment_recognizer)?;
    let mut quantities = HashMap::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let caps = recognizer
            .captures(line)
            .ok_or_else(|| QuantityError::InvalidAssignment(trimmed.to_string()))?;
        let name = caps.name("name").map_or("", |m| m.as_str());
        let value = caps.name("qty").map_or("", |m| m.as_str());
        if name.is_empty() {
            return Err(QuantityError::InvalidAssignment(trimmed.to_string()));
        }

        let mut quantity = Quantity::parse(value, None, Some(prefs.ignore_scale_factors))?;
        quantity.set_name(name);
        if let Some(desc) = caps.name("desc").map(|m| m.as_str()).filter(|d| !d.is_empty()) {
            quantity.set_description(desc);
        }
        trace!("assigned {} = {}", name, value);
        quantities.insert(name.to_string(), quantity);
    }

    Ok(quantities)
}

fn compile_recognizer(pattern: &str) -> Result<Regex> {
    let regex = Regex::new(pattern).map_err(|e| QuantityError::BadRecognizer(e.to_string()))?;
    for group in ["name", "qty"] {
        if !regex.capture_names().flatten().any(|n| n == group) {
            return Err(QuantityError::BadRecognizer(format!(
                "missing '{}' group in {}",
                group, pattern
            )));
        }
    }
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignments() {
        let text = "
            # PLL parameters
            Fref = 156 MHz  -- reference frequency
            Kdet = 88.3 uA  -- gain of phase detector

            Kvco = 9.07 GHz/V
        ";
        let prefs = Preferences::default();
        let quantities = parse_assignments_with(text, &prefs).unwrap();
        assert_eq!(quantities.len(), 3);

        let fref = &quantities["Fref"];
        assert_eq!(fref.to_float(), 156e6);
        assert_eq!(fref.units(), "Hz");
        assert_eq!(fref.name(), Some("Fref"));
        assert_eq!(fref.description(), Some("reference frequency"));
        assert_eq!(fref.format_with("Q", &prefs), "Fref = 156MHz");

        let kvco = &quantities["Kvco"];
        assert_eq!(kvco.units(), "Hz/V");
        assert_eq!(kvco.description(), None);
    }

    #[test]
    fn test_rejects_non_assignments() {
        let prefs = Preferences::default();
        assert_eq!(
            parse_assignments_with("1ns", &prefs).unwrap_err(),
            QuantityError::InvalidAssignment("1ns".to_string())
        );
        assert_eq!(
            parse_assignments_with("x*y = z", &prefs).unwrap_err(),
            QuantityError::InvalidAssignment("x*y = z".to_string())
        );
        assert_eq!(
            parse_assignments_with("x = fast", &prefs).unwrap_err(),
            QuantityError::InvalidNumber("fast".to_string())
        );
    }

    #[test]
    fn test_custom_recognizer() {
        let mut prefs = Preferences::default();
        prefs.assignment_recognizer = r"^(?P<name>\w+):\s*(?P<qty>.*)$".to_string();
        let quantities = parse_assignments_with("tau: 2.5ns", &prefs).unwrap();
        assert_eq!(quantities["tau"].to_float(), 2.5e-9);

        prefs.assignment_recognizer = r"^(?P<qty>.*)$".to_string();
        assert!(matches!(
            parse_assignments_with("tau: 2.5ns", &prefs),
            Err(QuantityError::BadRecognizer(_))
        ));

        prefs.assignment_recognizer = r"(".to_string();
        assert!(matches!(
            parse_assignments_with("tau: 2.5ns", &prefs),
            Err(QuantityError::BadRecognizer(_))
        ));
    }
}
