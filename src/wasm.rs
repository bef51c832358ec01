// WebAssembly bindings for reading and writing quantities
use crate::prefs::{self, PreferencesFile};
use crate::quantity::{self, Quantity, QuantitySummary};
use wasm_bindgen::prelude::*;

fn parse(text: &str, units: Option<String>) -> Result<Quantity, JsValue> {
    Quantity::parse(text, units.as_deref(), None).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub struct EngFmtWasm {}

impl Default for EngFmtWasm {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl EngFmtWasm {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {}
    }

    /// Engineering notation, e.g. "1.4204GHz". A negative precision is an error.
    #[wasm_bindgen]
    pub fn to_eng(
        &self,
        text: &str,
        units: Option<String>,
        precision: Option<i32>,
    ) -> Result<String, JsValue> {
        let precision = precision
            .map(|p| quantity::check_precision(p.into()))
            .transpose()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(parse(text, units)?.to_engineering(precision))
    }

    #[wasm_bindgen]
    pub fn to_float(&self, text: &str, units: Option<String>) -> Result<f64, JsValue> {
        Ok(parse(text, units)?.to_float())
    }

    #[wasm_bindgen]
    pub fn to_sci(&self, text: &str, units: Option<String>) -> Result<String, JsValue> {
        Ok(parse(text, units)?.to_scientific(None))
    }

    /// Render with a format specification such as ".8q" or "e"
    #[wasm_bindgen]
    pub fn format(&self, text: &str, spec: &str) -> Result<String, JsValue> {
        Ok(parse(text, None)?.format(spec))
    }

    #[wasm_bindgen]
    pub fn all_to_eng(&self, text: &str) -> String {
        quantity::all_to_eng(text)
    }

    #[wasm_bindgen]
    pub fn all_from_eng(&self, text: &str) -> String {
        quantity::all_from_eng(text)
    }

    /// Returns JSON string of the decomposed quantity
    #[wasm_bindgen]
    pub fn inspect(&self, text: &str) -> Result<String, JsValue> {
        let summary: QuantitySummary = parse(text, None)?.summary();
        serde_json::to_string(&summary)
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize quantity: {}", e)))
    }

    /// Update preferences from a JSON object with the same keys as the
    /// preferences file; missing keys are left alone.
    #[wasm_bindgen]
    pub fn set_preferences(&self, prefs_json: &str) -> Result<(), JsValue> {
        let file: PreferencesFile = serde_json::from_str(prefs_json)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse preferences JSON: {}", e)))?;
        let update = file
            .into_update()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        prefs::set_preferences(update);
        Ok(())
    }

    /// Current preferences as JSON
    #[wasm_bindgen]
    pub fn preferences(&self) -> Result<String, JsValue> {
        serde_json::to_string(&prefs::current())
            .map_err(|e| JsValue::from_str(&format!("Failed to serialize preferences: {}", e)))
    }
}
