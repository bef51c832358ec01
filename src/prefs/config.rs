use crate::quantity::error::{check_precision, QuantityError, Result};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

pub const DEFAULT_HUMAN_PRECISION: usize = 4;
pub const DEFAULT_MACHINE_PRECISION: usize = 8;
pub const DEFAULT_SPACER: &str = "";
pub const DEFAULT_UNITY_SCALE_FACTOR: &str = "";
pub const DEFAULT_OUTPUT_SCALE_FACTORS: &str = "TGMkmunpfa";
pub const DEFAULT_ASSIGNMENT_FORMATTER: &str = "{n} = {v}";
pub const DEFAULT_ASSIGNMENT_RECOGNIZER: &str =
    r"^\s*(?P<name>\w+)\s*=\s*(?P<qty>.*?)(?:\s*--\s*(?P<desc>.*?))?\s*$";

/// Rendering and parsing policy read by every quantity operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preferences {
    /// Digits after the first for engineering rendering.
    pub human_precision: usize,
    /// Digits after the first when a numeric value is written as text.
    pub machine_precision: usize,
    /// Inserted between the number and its scale factor or units.
    pub spacer: String,
    /// Scale factor emitted for values between 1 and 1000.
    pub unity_scale_factor: String,
    /// Scale-factor letters that may appear in output.
    pub output_scale_factors: String,
    /// Treat scale-factor letters as part of the units when parsing.
    pub ignore_scale_factors: bool,
    /// Template for `name = value` lines: `{n}`, `{v}` and `{d}`.
    pub assignment_formatter: String,
    /// Regex with `name`, `qty` and optional `desc` groups.
    pub assignment_recognizer: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            human_precision: DEFAULT_HUMAN_PRECISION,
            machine_precision: DEFAULT_MACHINE_PRECISION,
            spacer: DEFAULT_SPACER.to_string(),
            unity_scale_factor: DEFAULT_UNITY_SCALE_FACTOR.to_string(),
            output_scale_factors: DEFAULT_OUTPUT_SCALE_FACTORS.to_string(),
            ignore_scale_factors: false,
            assignment_formatter: DEFAULT_ASSIGNMENT_FORMATTER.to_string(),
            assignment_recognizer: DEFAULT_ASSIGNMENT_RECOGNIZER.to_string(),
        }
    }
}

/// How one preference is touched by an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Setting<T> {
    /// Leave the current value alone.
    #[default]
    Keep,
    /// Restore the built-in default.
    Reset,
    Set(T),
}

impl<T> Setting<T> {
    fn apply(self, slot: &mut T, default: impl FnOnce() -> T) {
        match self {
            Setting::Keep => {}
            Setting::Reset => *slot = default(),
            Setting::Set(value) => *slot = value,
        }
    }
}

impl<T> From<Option<T>> for Setting<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Setting::Set(v),
            None => Setting::Keep,
        }
    }
}

/// A batch of preference changes; every field defaults to [`Setting::Keep`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferenceUpdate {
    pub human_precision: Setting<usize>,
    pub machine_precision: Setting<usize>,
    pub spacer: Setting<String>,
    pub unity_scale_factor: Setting<String>,
    pub output_scale_factors: Setting<String>,
    pub ignore_scale_factors: Setting<bool>,
    pub assignment_formatter: Setting<String>,
    pub assignment_recognizer: Setting<String>,
}

impl PreferenceUpdate {
    /// An update that resets every preference.
    pub fn reset_all() -> Self {
        Self {
            human_precision: Setting::Reset,
            machine_precision: Setting::Reset,
            spacer: Setting::Reset,
            unity_scale_factor: Setting::Reset,
            output_scale_factors: Setting::Reset,
            ignore_scale_factors: Setting::Reset,
            assignment_formatter: Setting::Reset,
            assignment_recognizer: Setting::Reset,
        }
    }
}

impl Preferences {
    pub fn apply(&mut self, update: PreferenceUpdate) {
        update
            .human_precision
            .apply(&mut self.human_precision, || DEFAULT_HUMAN_PRECISION);
        update
            .machine_precision
            .apply(&mut self.machine_precision, || DEFAULT_MACHINE_PRECISION);
        update
            .spacer
            .apply(&mut self.spacer, || DEFAULT_SPACER.to_string());
        update
            .unity_scale_factor
            .apply(&mut self.unity_scale_factor, || {
                DEFAULT_UNITY_SCALE_FACTOR.to_string()
            });
        update
            .output_scale_factors
            .apply(&mut self.output_scale_factors, || {
                DEFAULT_OUTPUT_SCALE_FACTORS.to_string()
            });
        update
            .ignore_scale_factors
            .apply(&mut self.ignore_scale_factors, || false);
        update
            .assignment_formatter
            .apply(&mut self.assignment_formatter, || {
                DEFAULT_ASSIGNMENT_FORMATTER.to_string()
            });
        update
            .assignment_recognizer
            .apply(&mut self.assignment_recognizer, || {
                DEFAULT_ASSIGNMENT_RECOGNIZER.to_string()
            });
    }
}

/// Preferences as written in a TOML file. A key that is present is set,
/// a missing key is left alone.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PreferencesFile {
    #[serde(default)]
    pub human_precision: Option<i64>,
    #[serde(default)]
    pub machine_precision: Option<i64>,
    #[serde(default)]
    pub spacer: Option<String>,
    #[serde(default)]
    pub unity_scale_factor: Option<String>,
    #[serde(default)]
    pub output_scale_factors: Option<String>,
    #[serde(default)]
    pub ignore_scale_factors: Option<bool>,
    #[serde(default)]
    pub assignment_formatter: Option<String>,
    #[serde(default)]
    pub assignment_recognizer: Option<String>,
}

impl PreferencesFile {
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| QuantityError::Config(format!("{}: {}", path.display(), e)))?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| QuantityError::Config(e.to_string()))
    }

    pub fn into_update(self) -> Result<PreferenceUpdate> {
        Ok(PreferenceUpdate {
            human_precision: self.human_precision.map(check_precision).transpose()?.into(),
            machine_precision: self
                .machine_precision
                .map(check_precision)
                .transpose()?
                .into(),
            spacer: self.spacer.into(),
            unity_scale_factor: self.unity_scale_factor.into(),
            output_scale_factors: self.output_scale_factors.into(),
            ignore_scale_factors: self.ignore_scale_factors.into(),
            assignment_formatter: self.assignment_formatter.into(),
            assignment_recognizer: self.assignment_recognizer.into(),
        })
    }
}

thread_local! {
    // One store per thread; a single-threaded host sees exactly one.
    static CURRENT: RefCell<Preferences> = RefCell::new(Preferences::default());
}

/// Apply an update to the current preferences.
pub fn set_preferences(update: PreferenceUpdate) {
    CURRENT.with(|prefs| prefs.borrow_mut().apply(update));
}

/// Run `f` against the current preferences.
pub fn with_preferences<R>(f: impl FnOnce(&Preferences) -> R) -> R {
    CURRENT.with(|prefs| f(&prefs.borrow()))
}

/// A copy of the current preferences.
pub fn current() -> Preferences {
    with_preferences(Preferences::clone)
}

/// Load a TOML preferences file and apply it to the current preferences.
pub fn load_preferences<P: AsRef<std::path::Path>>(path: P) -> Result<()> {
    let update = PreferencesFile::load_from_file(path)?.into_update()?;
    set_preferences(update);
    Ok(())
}
