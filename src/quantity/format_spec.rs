//! Compact format specifications, `[[fill]align][width][.precision][type]`.

use crate::prefs::{with_preferences, Preferences};
use crate::quantity::error::{QuantityError, Result, MAX_PRECISION};
use crate::quantity::formatter::{format_exponential, format_fixed, format_general};
use crate::quantity::types::Quantity;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref SPEC_REGEX: Regex = Regex::new(
        r"\A(?:(?P<fill>.)?(?P<align>[<>^]))?(?P<width>\d+)?(?:\.(?P<prec>\d+))?(?P<type>[a-zA-Z%])?\z"
    )
    .unwrap();
}

/// Numeric codes without an explicit precision use this many digits.
const DEFAULT_NUMERIC_PRECISION: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCode {
    /// `q`: engineering with units
    Quantity,
    /// `r`: engineering without units
    Unitless,
    /// `u`
    Units,
    /// `n`
    Name,
    /// `d`
    Description,
    /// `Q`: assignment, name and quantity
    Assignment,
    /// `R`: assignment, name and unitless value
    UnitlessAssignment,
    /// `e` / `E`
    Exponential { upper: bool },
    /// `f` / `F`
    Fixed { upper: bool },
    /// `g` / `G`
    General { upper: bool },
    /// `%`
    Percent,
}

impl TypeCode {
    fn from_char(code: char) -> Option<Self> {
        let type_code = match code {
            'q' => TypeCode::Quantity,
            'r' => TypeCode::Unitless,
            'u' => TypeCode::Units,
            'n' => TypeCode::Name,
            'd' => TypeCode::Description,
            'Q' => TypeCode::Assignment,
            'R' => TypeCode::UnitlessAssignment,
            'e' | 'E' => TypeCode::Exponential { upper: code == 'E' },
            'f' | 'F' => TypeCode::Fixed { upper: code == 'F' },
            'g' | 'G' => TypeCode::General { upper: code == 'G' },
            '%' => TypeCode::Percent,
            _ => return None,
        };
        Some(type_code)
    }

    fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeCode::Exponential { .. }
                | TypeCode::Fixed { .. }
                | TypeCode::General { .. }
                | TypeCode::Percent
        )
    }
}

/// A parsed format specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    pub fill: char,
    pub align: Option<Align>,
    pub width: usize,
    pub precision: Option<usize>,
    pub type_code: TypeCode,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: None,
            width: 0,
            precision: None,
            type_code: TypeCode::Quantity,
        }
    }
}

impl FormatSpec {
    pub fn parse(spec: &str) -> Result<Self> {
        let bad = || QuantityError::BadFormatSpec(spec.to_string());
        let caps = SPEC_REGEX.captures(spec).ok_or_else(bad)?;

        let align = caps.name("align").map(|m| match m.as_str() {
            "<" => Align::Left,
            ">" => Align::Right,
            _ => Align::Center,
        });
        let fill = caps
            .name("fill")
            .and_then(|m| m.as_str().chars().next())
            .unwrap_or(' ');
        let width = match caps.name("width") {
            Some(m) => m.as_str().parse().map_err(|_| bad())?,
            None => 0,
        };
        let precision = match caps.name("prec") {
            Some(m) => {
                let precision: usize = m.as_str().parse().map_err(|_| bad())?;
                if precision > MAX_PRECISION {
                    return Err(bad());
                }
                Some(precision)
            }
            None => None,
        };
        let type_code = match caps.name("type") {
            Some(m) => m
                .as_str()
                .chars()
                .next()
                .and_then(TypeCode::from_char)
                .ok_or_else(bad)?,
            None => TypeCode::Quantity,
        };

        Ok(Self {
            fill,
            align,
            width,
            precision,
            type_code,
        })
    }

    /// Explicit alignment, else left for text codes and right for numbers.
    fn alignment(&self) -> Align {
        self.align.unwrap_or(if self.type_code.is_numeric() {
            Align::Right
        } else {
            Align::Left
        })
    }
}

/// Pad `text` to `width` characters. Never truncates.
pub fn pad(text: &str, width: usize, fill: char, align: Align) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let padding = width - len;
    let (before, after) = match align {
        Align::Left => (0, padding),
        Align::Right => (padding, 0),
        Align::Center => (padding / 2, padding - padding / 2),
    };
    let mut padded = String::with_capacity(text.len() + padding);
    padded.extend(std::iter::repeat(fill).take(before));
    padded.push_str(text);
    padded.extend(std::iter::repeat(fill).take(after));
    padded
}

impl Quantity {
    /// Render according to a format specification such as `.8q`, `>12r` or
    /// `e`. An unrecognized specification renders the default engineering
    /// form.
    pub fn format(&self, spec: &str) -> String {
        with_preferences(|prefs| self.format_with(spec, prefs))
    }

    pub fn format_with(&self, spec: &str, prefs: &Preferences) -> String {
        match FormatSpec::parse(spec) {
            Ok(spec) => self.format_spec_with(&spec, prefs),
            Err(e) => {
                debug!("{}, using the default form", e);
                self.to_engineering_with(None, prefs)
            }
        }
    }

    pub fn format_spec_with(&self, spec: &FormatSpec, prefs: &Preferences) -> String {
        let precision = spec.precision;
        let digits = precision.unwrap_or(DEFAULT_NUMERIC_PRECISION);
        let text = match spec.type_code {
            TypeCode::Quantity => self.to_engineering_with(precision, prefs),
            TypeCode::Unitless => self.to_unitless_engineering_with(precision, prefs),
            TypeCode::Units => self.units().to_string(),
            TypeCode::Name => self.name().unwrap_or_default().to_string(),
            TypeCode::Description => self.description().unwrap_or_default().to_string(),
            TypeCode::Assignment => {
                self.render_assignment(self.to_engineering_with(precision, prefs), prefs)
            }
            TypeCode::UnitlessAssignment => {
                self.render_assignment(self.to_unitless_engineering_with(precision, prefs), prefs)
            }
            TypeCode::Exponential { upper } => {
                numeric_case(format_exponential(self.to_float(), digits), upper)
            }
            TypeCode::Fixed { upper } => numeric_case(format_fixed(self.to_float(), digits), upper),
            TypeCode::General { upper } => {
                numeric_case(format_general(self.to_float(), digits), upper)
            }
            TypeCode::Percent => format!("{}%", format_fixed(self.to_float() * 100.0, digits)),
        };
        pad(&text, spec.width, spec.fill, spec.alignment())
    }

    /// Fill the assignment template; without a name only the value is shown.
    fn render_assignment(&self, value: String, prefs: &Preferences) -> String {
        let Some(name) = self.name() else {
            return value;
        };
        prefs
            .assignment_formatter
            .replace("{n}", name)
            .replace("{v}", &value)
            .replace("{d}", self.description().unwrap_or_default())
    }
}

fn numeric_case(text: String, upper: bool) -> String {
    if upper {
        text.to_uppercase()
    } else {
        text
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_engineering(f.precision());
        let align = match f.align() {
            Some(fmt::Alignment::Right) => Align::Right,
            Some(fmt::Alignment::Center) => Align::Center,
            _ => Align::Left,
        };
        write!(f, "{}", pad(&text, f.width().unwrap_or(0), f.fill(), align))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{set_preferences, PreferenceUpdate};

    fn hydrogen() -> Quantity {
        Quantity::parse("1420.405751786 MHz", None, Some(false)).unwrap()
    }

    #[test]
    fn test_parse_spec() {
        let spec = FormatSpec::parse("*^12.3r").unwrap();
        assert_eq!(spec.fill, '*');
        assert_eq!(spec.align, Some(Align::Center));
        assert_eq!(spec.width, 12);
        assert_eq!(spec.precision, Some(3));
        assert_eq!(spec.type_code, TypeCode::Unitless);

        assert_eq!(FormatSpec::parse("").unwrap(), FormatSpec::default());
        assert_eq!(
            FormatSpec::parse(".8").unwrap().type_code,
            TypeCode::Quantity
        );
    }

    #[test]
    fn test_bad_spec() {
        assert_eq!(
            FormatSpec::parse("x"),
            Err(QuantityError::BadFormatSpec("x".to_string()))
        );
        assert!(FormatSpec::parse("10.q5").is_err());
    }

    #[test]
    fn test_type_codes() {
        let prefs = Preferences::default();
        let q = hydrogen();
        assert_eq!(q.format_with("", &prefs), "1.4204GHz");
        assert_eq!(q.format_with(".8q", &prefs), "1.42040575GHz");
        assert_eq!(q.format_with(".8", &prefs), "1.42040575GHz");
        assert_eq!(q.format_with("r", &prefs), "1.4204G");
        assert_eq!(q.format_with("u", &prefs), "Hz");
        assert_eq!(q.format_with("f", &prefs), "1420405751.786000");
        assert_eq!(q.format_with("e", &prefs), "1.420406e+09");
        assert_eq!(q.format_with("E", &prefs), "1.420406E+09");
        assert_eq!(q.format_with("g", &prefs), "1.42041e+09");
        assert_eq!(q.format_with(".2%", &prefs), "142040575178.60%");
    }

    #[test]
    fn test_unknown_spec_uses_default() {
        let prefs = Preferences::default();
        assert_eq!(hydrogen().format_with("!!", &prefs), "1.4204GHz");
    }

    #[test]
    fn test_precision_limit() {
        assert_eq!(
            FormatSpec::parse(".70000e"),
            Err(QuantityError::BadFormatSpec(".70000e".to_string()))
        );
        assert_eq!(
            FormatSpec::parse(".99999999999999999999999q"),
            Err(QuantityError::BadFormatSpec(
                ".99999999999999999999999q".to_string()
            ))
        );

        let prefs = Preferences::default();
        let q = hydrogen();
        assert_eq!(q.format_with(".70000e", &prefs), "1.4204GHz");

        let text = q.format_with(".1000e", &prefs);
        assert!(text.starts_with("1.4204057517860000133514404296875000"));
        assert!(text.ends_with("0e+09"));
        assert_eq!(text.len(), "1.".len() + 1000 + "e+09".len());

        let text = q.format_with(".1000f", &prefs);
        assert_eq!(text.len(), "1420405751.".len() + 1000);
    }

    #[test]
    fn test_alignment() {
        let prefs = Preferences::default();
        let q = hydrogen();
        assert_eq!(q.format_with("12", &prefs), "1.4204GHz   ");
        assert_eq!(q.format_with(">12", &prefs), "   1.4204GHz");
        assert_eq!(q.format_with("-^13", &prefs), "--1.4204GHz--");
        assert_eq!(q.format_with("14.2e", &prefs), "      1.42e+09");
        assert_eq!(q.format_with("3", &prefs), "1.4204GHz");
    }

    #[test]
    fn test_names_and_assignments() {
        let prefs = Preferences::default();
        let q = hydrogen()
            .with_name("f")
            .with_description("hydrogen line");
        assert_eq!(q.format_with("n", &prefs), "f");
        assert_eq!(q.format_with("d", &prefs), "hydrogen line");
        assert_eq!(q.format_with("Q", &prefs), "f = 1.4204GHz");
        assert_eq!(q.format_with("R", &prefs), "f = 1.4204G");

        let mut prefs = Preferences::default();
        prefs.assignment_formatter = "{n}: {v} -- {d}".to_string();
        assert_eq!(q.format_with("Q", &prefs), "f: 1.4204GHz -- hydrogen line");

        assert_eq!(hydrogen().format_with("Q", &prefs), "1.4204GHz");
        assert_eq!(hydrogen().format_with("n", &prefs), "");
    }

    #[test]
    fn test_display() {
        set_preferences(PreferenceUpdate::reset_all());
        let q = hydrogen();
        assert_eq!(format!("{}", q), "1.4204GHz");
        assert_eq!(format!("{:.8}", q), "1.42040575GHz");
        assert_eq!(format!("{:>12}", q), "   1.4204GHz");
        assert_eq!(format!("{:.2}", q), "1.42GHz");
    }
}
