//! Rendering quantities as text.
//!
//! Precision is applied to the decimal string produced by scientific
//! formatting, never by scaling the float, so the digits shown are the
//! correctly rounded digits of the stored value.

use crate::prefs::{with_preferences, Preferences};
use crate::quantity::patterns::{
    is_currency, is_scale_factor, BIG_SCALE_FACTORS, SMALL_SCALE_FACTORS,
};
use crate::quantity::types::Quantity;
use std::cmp::Ordering;

impl Quantity {
    /// Engineering notation with units, e.g. `1.4204GHz`.
    pub fn to_engineering(&self, precision: Option<usize>) -> String {
        with_preferences(|prefs| self.to_engineering_with(precision, prefs))
    }

    pub fn to_engineering_with(&self, precision: Option<usize>, prefs: &Preferences) -> String {
        let precision = precision.unwrap_or(prefs.human_precision);
        render_engineering(self, precision, self.units(), prefs)
    }

    /// Engineering notation without units, e.g. `1.4204G`.
    pub fn to_unitless_engineering(&self, precision: Option<usize>) -> String {
        with_preferences(|prefs| self.to_unitless_engineering_with(precision, prefs))
    }

    pub fn to_unitless_engineering_with(
        &self,
        precision: Option<usize>,
        prefs: &Preferences,
    ) -> String {
        let precision = precision.unwrap_or(prefs.human_precision);
        render_engineering(self, precision, "", prefs)
    }

    /// Scientific notation for display, e.g. `1.4204×10⁰⁹Hz`.
    pub fn to_scientific(&self, precision: Option<usize>) -> String {
        with_preferences(|prefs| self.to_scientific_with(precision, prefs))
    }

    pub fn to_scientific_with(&self, precision: Option<usize>, prefs: &Preferences) -> String {
        let precision = precision.unwrap_or(prefs.human_precision);
        if let Some(special) = render_special(self, self.units(), prefs) {
            return special;
        }
        let (mantissa, exponent) = split_scientific(self.to_float(), precision);
        let power = format!("×10{}", superscript(exponent));
        combine(trim_fraction(&mantissa), &power, self.units(), &prefs.spacer)
    }
}

/// Infinities and NaN bypass scale factors and always get a space before
/// non-currency units.
fn render_special(quantity: &Quantity, units: &str, prefs: &Preferences) -> Option<String> {
    if quantity.is_infinite() || quantity.is_nan() {
        return Some(combine(&quantity.to_raw_string_with(prefs), "", units, " "));
    }
    let value = quantity.to_float();
    if !value.is_finite() {
        // text such as 1e999 that overflows on conversion
        return Some(combine(&non_finite(value), "", units, " "));
    }
    None
}

fn render_engineering(
    quantity: &Quantity,
    precision: usize,
    units: &str,
    prefs: &Preferences,
) -> String {
    if let Some(special) = render_special(quantity, units, prefs) {
        return special;
    }

    let (mantissa, exponent) = split_scientific(quantity.to_float(), precision);
    let index = exponent.div_euclid(3);
    let shift = exponent.rem_euclid(3);
    let scale_factor = select_scale_factor(index, exponent - shift, units, prefs);
    let mantissa = shift_point(&mantissa, shift as usize);

    combine(trim_fraction(&mantissa), &scale_factor, units, &prefs.spacer)
}

fn select_scale_factor(index: i32, exponent: i32, units: &str, prefs: &Preferences) -> String {
    let letter = match index.cmp(&0) {
        Ordering::Equal => {
            if !prefs.spacer.is_empty() || units.is_empty() || is_currency(units) {
                return String::new();
            }
            return prefs.unity_scale_factor.clone();
        }
        Ordering::Greater => BIG_SCALE_FACTORS.chars().nth(index as usize - 1),
        Ordering::Less => SMALL_SCALE_FACTORS.chars().nth(index.unsigned_abs() as usize - 1),
    };
    match letter {
        Some(sf) if prefs.output_scale_factors.contains(sf) => sf.to_string(),
        _ => format!("e{}", exponent),
    }
}

/// Join a mantissa, a scale factor or exponent, and units.
pub(crate) fn combine(mantissa: &str, scale_factor: &str, units: &str, spacer: &str) -> String {
    let mantissa = mantissa.strip_prefix('+').unwrap_or(mantissa);
    if units.is_empty() {
        return format!("{}{}", mantissa, scale_factor);
    }
    if is_currency(units) {
        // -$10, never $-10
        return match mantissa.strip_prefix('-') {
            Some(magnitude) => format!("-{}{}{}", units, magnitude, scale_factor),
            None => format!("{}{}{}", units, mantissa, scale_factor),
        };
    }
    if is_scale_factor(scale_factor) {
        format!("{}{}{}{}", mantissa, spacer, scale_factor, units)
    } else {
        format!("{}{}{}{}", mantissa, scale_factor, spacer, units)
    }
}

/// Fraction digits past which every double formats as zeros: at most 767
/// significant digits, at most 1074 after the point in fixed form.
const EXACT_DIGITS: usize = 1100;

/// `%.*e` split into the signed mantissa and the decimal exponent. Digits
/// beyond [`EXACT_DIGITS`] are not produced.
fn split_scientific(value: f64, precision: usize) -> (String, i32) {
    let text = format!("{:.*e}", precision.min(EXACT_DIGITS), value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => (mantissa.to_string(), exponent.parse().unwrap_or(0)),
        None => (text, 0),
    }
}

/// Move the decimal point `shift` places to the right, padding with zeros.
fn shift_point(mantissa: &str, shift: usize) -> String {
    let (sign, digits) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let mut fraction = fraction.to_string();
    while fraction.len() < shift {
        fraction.push('0');
    }
    let (moved, rest) = fraction.split_at(shift);
    if rest.is_empty() {
        format!("{}{}{}", sign, whole, moved)
    } else {
        format!("{}{}{}.{}", sign, whole, moved, rest)
    }
}

/// Drop trailing fractional zeros, then a bare trailing point.
fn trim_fraction(number: &str) -> &str {
    if !number.contains('.') {
        return number;
    }
    number.trim_end_matches('0').trim_end_matches('.')
}

fn superscript(exponent: i32) -> String {
    let digits = format!("{:02}", exponent.unsigned_abs());
    let sign = if exponent < 0 { "⁻" } else { "" };
    let digits: String = digits
        .chars()
        .map(|d| match d {
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            _ => '⁹',
        })
        .collect();
    format!("{}{}", sign, digits)
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

/// printf `%.*e`: `1.420406e+09`.
pub fn format_exponential(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let (mantissa, exponent) = split_scientific(value, precision);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!(
        "{}e{}{:02}",
        pad_zeros(mantissa, precision),
        sign,
        exponent.unsigned_abs()
    )
}

/// printf `%.*f`.
pub fn format_fixed(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    pad_zeros(format!("{:.*}", precision.min(EXACT_DIGITS), value), precision)
}

/// Extend a formatted number with zeros to `precision` fraction digits.
fn pad_zeros(mut number: String, precision: usize) -> String {
    let written = number.split_once('.').map_or(0, |(_, fraction)| fraction.len());
    if written < precision {
        number.extend(std::iter::repeat('0').take(precision - written));
    }
    number
}

/// printf `%.*g`: `precision` significant digits, trailing zeros removed,
/// exponential form outside `1e-4 <= |value| < 10^precision`.
pub fn format_general(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    // trailing zeros are dropped anyway
    let precision = precision.clamp(1, EXACT_DIGITS);
    let (mantissa, exponent) = split_scientific(value, precision - 1);
    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(&mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}
