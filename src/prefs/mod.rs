// Rendering/parsing preferences, held per thread and optionally loaded from TOML

pub mod config;

pub use config::*;
