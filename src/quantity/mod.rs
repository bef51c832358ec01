// Physical quantities in engineering notation: parsing, rendering and scanning

pub mod assignments;
pub mod constants;
pub mod detector;
pub mod error;
pub mod format_spec;
pub mod formatter;
pub mod parser;
pub mod patterns;
pub mod shortcuts;
pub mod types;


pub use assignments::{parse_assignments, parse_assignments_with};
pub use constants::{find_constant, lookup_constant, Constant, CONSTANTS};
pub use detector::{all_from_eng, all_from_eng_with, all_to_eng, all_to_eng_with};
pub use error::{check_precision, QuantityError, Result};
pub use format_spec::{Align, FormatSpec, TypeCode};
pub use formatter::{format_exponential, format_fixed, format_general};
pub use shortcuts::*;
pub use types::{Quantity, QuantitySummary};
