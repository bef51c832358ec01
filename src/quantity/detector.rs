use crate::prefs::{with_preferences, Preferences};
use crate::quantity::patterns::{EMBEDDED_ENG, EMBEDDED_FLOAT};
use crate::quantity::types::Quantity;
use log::debug;
use regex::{Captures, Regex};

/// Rewrite every floating-point quantity in `text` (`1e-3A`) in engineering
/// notation (`1mA`). Everything else is left alone.
pub fn all_to_eng(text: &str) -> String {
    with_preferences(|prefs| all_to_eng_with(text, prefs))
}

pub fn all_to_eng_with(text: &str, prefs: &Preferences) -> String {
    replace_embedded(&EMBEDDED_FLOAT, text, |qty| {
        Quantity::parse(qty, None, Some(false))
            .map(|q| q.to_engineering_with(None, prefs))
            .ok()
    })
}

/// Rewrite every engineering-notation quantity in `text` (`1mA`) as a
/// floating-point number (`1e-3A`).
pub fn all_from_eng(text: &str) -> String {
    with_preferences(|prefs| all_from_eng_with(text, prefs))
}

pub fn all_from_eng_with(text: &str, prefs: &Preferences) -> String {
    replace_embedded(&EMBEDDED_ENG, text, |qty| {
        Quantity::parse(qty, None, Some(false))
            .map(|q| format!("{}{}", q.to_unitless_exponential_with(prefs), q.units()))
            .ok()
    })
}

fn replace_embedded<F>(regex: &Regex, text: &str, convert: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    regex
        .replace_all(text, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let lead = caps.name("lead").map_or("", |m| m.as_str());
            let Some(qty) = caps.name("qty") else {
                return whole.to_string();
            };
            if !right_boundary_ok(&text[qty.end()..]) {
                return whole.to_string();
            }
            match convert(qty.as_str()) {
                Some(converted) => format!("{}{}", lead, converted),
                None => {
                    debug!("'{}' looked like a quantity but did not parse", qty.as_str());
                    whole.to_string()
                }
            }
        })
        .into_owned()
}

/// A quantity ends at end of text, at a character that cannot continue a
/// word, or at a period that is not a decimal point.
fn right_boundary_ok(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        None => true,
        Some('.') => !chars.next().is_some_and(|c| c.is_ascii_digit()),
        Some(c) => !(c.is_alphanumeric() || c == '_'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // (name, engineering, floating)
    const CASES: [(&str, &str, &str); 9] = [
        ("chirp", "1mA", "1e-3A"),
        ("bungler", "blah 1mA", "blah 1e-3A"),
        ("dilute", "blah 1mA.", "blah 1e-3A."),
        ("pelvis", "blah 1mA blah", "blah 1e-3A blah"),
        ("tickle", "-1mA", "-1e-3A"),
        ("wrangle", "blah -1mA", "blah -1e-3A"),
        ("accessory", "blah -1mA.", "blah -1e-3A."),
        ("observer", "blah -1mA blah", "blah -1e-3A blah"),
        ("meadow", "blah ipn_250nA.", "blah ipn_250nA."),
    ];

    #[test]
    fn test_text_conversion() {
        let prefs = Preferences::default();
        for (name, eng, flt) in CASES {
            assert_eq!(all_to_eng_with(flt, &prefs), eng, "{}", name);
            assert_eq!(all_from_eng_with(eng, &prefs), flt, "{}", name);
        }
    }

    #[test]
    fn test_several_quantities() {
        let prefs = Preferences::default();
        assert_eq!(
            all_to_eng_with("f = 1.4204e9Hz, t = 2.5e-9s", &prefs),
            "f = 1.4204GHz, t = 2.5ns"
        );
        assert_eq!(
            all_from_eng_with("(1kOhms,2.2uF)", &prefs),
            "(1e3Ohms,2.2e-6F)"
        );
    }

    #[test]
    fn test_word_boundaries() {
        let prefs = Preferences::default();
        assert_eq!(all_from_eng_with("x1mA", &prefs), "x1mA");
        assert_eq!(all_from_eng_with("1mA9", &prefs), "1mA9");
        assert_eq!(all_to_eng_with("v1.2e3V", &prefs), "v1.2e3V");
        assert_eq!(all_to_eng_with("no numbers here", &prefs), "no numbers here");
    }
}
