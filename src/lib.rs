pub mod prefs;
pub mod quantity;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use prefs::{set_preferences, PreferenceUpdate, Preferences, Setting};
pub use quantity::{Quantity, QuantityError, Result};
