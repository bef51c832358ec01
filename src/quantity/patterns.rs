//! Lexical shapes a quantity may take.
//!
//! The recognizers are kept in a single ordered table, [`TABLE`]. The first
//! row that matches wins, so the order is part of the grammar: a number with
//! an exponent has to be tried before a plain number, otherwise `1.0E-9s`
//! would be read as `1.0` with units `E-9s`.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Characters that may appear before the mantissa as a currency unit.
pub const CURRENCY_SYMBOLS: &str = "$";

/// One letter per three decades, starting at 1e3. `k` rather than `K` so a
/// lone scale factor does not read as kelvin.
pub const BIG_SCALE_FACTORS: &str = "kMGTPEZY";

/// One letter per three decades, starting at 1e-3.
pub const SMALL_SCALE_FACTORS: &str = "munpfazy";

/// Scale factors accepted on input and the exponent each stands for.
/// `_` and the empty string both mean unity.
const MAPPINGS: [(&str, &str); 19] = [
    ("Y", "e24"),
    ("Z", "e21"),
    ("E", "e18"),
    ("P", "e15"),
    ("T", "e12"),
    ("G", "e9"),
    ("M", "e6"),
    ("K", "e3"),
    ("k", "e3"),
    ("_", ""),
    ("", ""),
    ("m", "e-3"),
    ("u", "e-6"),
    ("n", "e-9"),
    ("p", "e-12"),
    ("f", "e-15"),
    ("a", "e-18"),
    ("z", "e-21"),
    ("y", "e-24"),
];

/// Exponent text equivalent to a scale factor, e.g. `n` -> `e-9`.
pub fn scale_factor_exponent(scale_factor: &str) -> Option<&'static str> {
    MAPPINGS
        .iter()
        .find(|(sf, _)| *sf == scale_factor)
        .map(|(_, exp)| *exp)
}

/// True for the SI letters, `_` and the empty token; false for exponents.
pub fn is_scale_factor(token: &str) -> bool {
    scale_factor_exponent(token).is_some()
}

/// True when the units are a single currency symbol.
pub fn is_currency(units: &str) -> bool {
    let mut chars = units.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => CURRENCY_SYMBOLS.contains(c),
        _ => false,
    }
}

type Extract = fn(&Captures<'_>) -> String;

/// A compiled recognizer and the extractors for its three components.
pub struct QuantityPattern {
    pub name: &'static str,
    pub regex: Regex,
    pub mantissa: Extract,
    pub scale_factor: Extract,
    pub units: Extract,
}

struct Row {
    name: &'static str,
    template: &'static str,
    mantissa: Extract,
    scale_factor: Extract,
    units: Extract,
    uses_scale_factor: bool,
}

/// Every quantity shape, highest priority first.
const TABLE: [Row; 9] = [
    Row {
        name: "number_with_exponent",
        template: r"{sign}{mant}{exp}\s*{units}",
        mantissa: signed_mantissa,
        scale_factor: exponent_token,
        units: units_token,
        uses_scale_factor: false,
    },
    Row {
        name: "number_with_scale_factor",
        template: r"{sign}{mant}\s*{sf}{units}",
        mantissa: signed_mantissa,
        scale_factor: scale_factor_token,
        units: units_token,
        uses_scale_factor: true,
    },
    Row {
        name: "simple_number",
        template: r"{sign}{mant}\s*{units}",
        mantissa: signed_mantissa,
        scale_factor: nothing,
        units: units_token,
        uses_scale_factor: false,
    },
    Row {
        name: "currency_with_exponent",
        template: r"{sign}{currency}{mant}{exp}",
        mantissa: signed_mantissa,
        scale_factor: exponent_token,
        units: currency_token,
        uses_scale_factor: false,
    },
    Row {
        name: "currency_with_scale_factor",
        template: r"{sign}{currency}{mant}\s*{sf}",
        mantissa: signed_mantissa,
        scale_factor: scale_factor_token,
        units: currency_token,
        uses_scale_factor: true,
    },
    Row {
        name: "simple_currency",
        template: r"{sign}{currency}{mant}",
        mantissa: signed_mantissa,
        scale_factor: nothing,
        units: currency_token,
        uses_scale_factor: false,
    },
    Row {
        name: "nan_with_units",
        template: r"{sign}{nan}\s+{units}",
        mantissa: signed_nan,
        scale_factor: nothing,
        units: units_token,
        uses_scale_factor: false,
    },
    Row {
        name: "currency_nan",
        template: r"{sign}{currency}{nan}",
        mantissa: signed_nan,
        scale_factor: nothing,
        units: currency_token,
        uses_scale_factor: false,
    },
    Row {
        name: "simple_nan",
        template: r"{sign}{nan}",
        mantissa: signed_nan,
        scale_factor: nothing,
        units: nothing,
        uses_scale_factor: false,
    },
];

const SIGN: &str = r"(?P<sign>[-+]?)";
// A trailing point with no digits after it ("1.") is allowed.
const MANTISSA: &str = r"(?P<mant>[0-9]+\.?[0-9]*|\.[0-9]+)";
const EXPONENT: &str = r"(?P<exp>[eE][-+]?[0-9]+)";
// Leading letter keeps "1.0E-9s" from splitting as ("1.0E", "-9s").
const UNITS: &str = r"(?P<units>(?:[a-zA-Z][-^/()\w]*)?)";
const NAN: &str = r"(?P<nan>(?i:inf|nan))";
// Free text has no delimiters, so embedded units are letters only.
const SIMPLE_UNITS: &str = r"(?P<units>[a-zA-Z_]*)";

fn scale_factor_class() -> String {
    let letters: String = MAPPINGS.iter().map(|(sf, _)| *sf).collect();
    format!("(?P<sf>[{}])", regex::escape(&letters))
}

fn currency_class() -> String {
    format!("(?P<currency>[{}])", regex::escape(CURRENCY_SYMBOLS))
}

fn expand(template: &str) -> String {
    template
        .replace("{sign}", SIGN)
        .replace("{mant}", MANTISSA)
        .replace("{exp}", EXPONENT)
        .replace("{sf}", &scale_factor_class())
        .replace("{units}", UNITS)
        .replace("{currency}", &currency_class())
        .replace("{nan}", NAN)
}

fn build_patterns(with_scale_factors: bool) -> Vec<QuantityPattern> {
    TABLE
        .iter()
        .filter(|row| with_scale_factors || !row.uses_scale_factor)
        .map(|row| QuantityPattern {
            name: row.name,
            regex: Regex::new(&format!(r"\A\s*{}\s*\z", expand(row.template))).unwrap(),
            mantissa: row.mantissa,
            scale_factor: row.scale_factor,
            units: row.units,
        })
        .collect()
}

lazy_static! {
    /// Full pattern set, scale factors recognized.
    static ref PATTERNS: Vec<QuantityPattern> = build_patterns(true);

    /// Scale-factor letters are left to the units.
    static ref PATTERNS_WITHOUT_SCALE_FACTORS: Vec<QuantityPattern> = build_patterns(false);

    /// A floating-point quantity (exponent required) embedded in free text.
    /// The leading group stands in for a look-behind; the caller checks the
    /// right-hand boundary.
    pub static ref EMBEDDED_FLOAT: Regex = Regex::new(&format!(
        r"(?P<lead>\A|[^a-zA-Z0-9_.])(?P<qty>{}{}{}{})",
        SIGN, MANTISSA, EXPONENT, SIMPLE_UNITS
    ))
    .unwrap();

    /// An engineering-notation quantity (scale factor required) embedded in
    /// free text.
    pub static ref EMBEDDED_ENG: Regex = Regex::new(&format!(
        r"(?P<lead>\A|[^a-zA-Z0-9_.])(?P<qty>{}{}{}{})",
        SIGN,
        MANTISSA,
        scale_factor_class(),
        SIMPLE_UNITS
    ))
    .unwrap();
}

/// The ordered pattern set to use for parsing.
pub fn patterns(ignore_scale_factors: bool) -> &'static [QuantityPattern] {
    if ignore_scale_factors {
        &PATTERNS_WITHOUT_SCALE_FACTORS
    } else {
        &PATTERNS
    }
}

fn group<'h>(caps: &Captures<'h>, name: &str) -> &'h str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn signed_mantissa(caps: &Captures<'_>) -> String {
    format!("{}{}", group(caps, "sign"), group(caps, "mant"))
}

fn signed_nan(caps: &Captures<'_>) -> String {
    format!("{}{}", group(caps, "sign"), group(caps, "nan").to_lowercase())
}

fn exponent_token(caps: &Captures<'_>) -> String {
    group(caps, "exp").to_lowercase()
}

fn scale_factor_token(caps: &Captures<'_>) -> String {
    group(caps, "sf").to_string()
}

fn units_token(caps: &Captures<'_>) -> String {
    group(caps, "units").to_string()
}

fn currency_token(caps: &Captures<'_>) -> String {
    group(caps, "currency").to_string()
}

fn nothing(_: &Captures<'_>) -> String {
    String::new()
}
