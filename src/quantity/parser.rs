use crate::prefs::with_preferences;
use crate::quantity::constants::find_constant;
use crate::quantity::error::{QuantityError, Result};
use crate::quantity::patterns::patterns;
use crate::quantity::types::Quantity;
use log::{debug, trace};
use std::str::FromStr;

impl Quantity {
    /// Parse a quantity such as `2.5ns`, `1.7 MHz`, `1e6Ohms`, `$10K` or a
    /// named constant (`h`, `eps0`).
    ///
    /// `units`, if given, is used when the text carries none and must agree
    /// with the text's units otherwise. `ignore_scale_factors` overrides the
    /// preference of the same name.
    pub fn parse(
        text: &str,
        units: Option<&str>,
        ignore_scale_factors: Option<bool>,
    ) -> Result<Self> {
        let ignore_scale_factors = ignore_scale_factors
            .unwrap_or_else(|| with_preferences(|prefs| prefs.ignore_scale_factors));

        for pattern in patterns(ignore_scale_factors) {
            let Some(caps) = pattern.regex.captures(text) else {
                continue;
            };
            trace!("'{}' matched {}", text, pattern.name);

            let mantissa = (pattern.mantissa)(&caps);
            let mut scale_factor = (pattern.scale_factor)(&caps);
            if scale_factor == "_" {
                scale_factor.clear();
            }
            let units = reconcile_units((pattern.units)(&caps), units)?;
            return Ok(Quantity::from_parts(mantissa, scale_factor, units));
        }

        let name = text.trim();
        match find_constant(name) {
            Some(constant) => {
                debug!("'{}' taken as a named constant", name);
                let units = reconcile_units(constant.units.to_string(), units)?;
                Ok(Quantity::from_value(constant.value, Some(&units)))
            }
            None => Err(QuantityError::InvalidNumber(text.to_string())),
        }
    }
}

/// Units found in the text win, but may not contradict the caller.
fn reconcile_units(found: String, given: Option<&str>) -> Result<String> {
    let given = given.unwrap_or_default();
    if found.is_empty() {
        return Ok(given.to_string());
    }
    if !given.is_empty() && given != found {
        return Err(QuantityError::UnitsMismatch {
            expected: given.to_string(),
            found,
        });
    }
    Ok(found)
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self> {
        Quantity::parse(s, None, None)
    }
}
