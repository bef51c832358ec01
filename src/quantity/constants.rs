use crate::quantity::error::{QuantityError, Result};
use std::f64::consts::PI;

/// A physical constant that may be used in place of a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    pub name: &'static str,
    pub value: f64,
    pub units: &'static str,
    pub description: &'static str,
}

/// Named constants, consulted only when the text matches no number pattern.
pub const CONSTANTS: [Constant; 9] = [
    Constant {
        name: "h",
        value: 6.62606957e-34,
        units: "J-s",
        description: "Plank's constant",
    },
    Constant {
        name: "hbar",
        value: 1.054571726e-34,
        units: "J-s",
        description: "reduced Plank's constant",
    },
    Constant {
        name: "k",
        value: 1.3806488e-23,
        units: "J/K",
        description: "Boltzmann's constant",
    },
    Constant {
        name: "q",
        value: 1.602176565e-19,
        units: "C",
        description: "elementary charge",
    },
    Constant {
        name: "c",
        value: 2.99792458e8,
        units: "m/s",
        description: "speed of light",
    },
    Constant {
        name: "C0",
        value: 273.15,
        units: "K",
        description: "zero degrees Celsius in Kelvin",
    },
    Constant {
        name: "eps0",
        value: 8.854187817e-12,
        units: "F/m",
        description: "permittivity of free space",
    },
    Constant {
        name: "mu0",
        value: 4e-7 * PI,
        units: "H/m",
        description: "permeability of free space",
    },
    Constant {
        name: "Z0",
        value: 376.730313461,
        units: "Ohms",
        description: "characteristic impedance of free space",
    },
];

pub fn find_constant(name: &str) -> Option<&'static Constant> {
    CONSTANTS.iter().find(|c| c.name == name)
}

/// Value and units of a named constant.
pub fn lookup_constant(name: &str) -> Result<(f64, &'static str)> {
    find_constant(name)
        .map(|c| (c.value, c.units))
        .ok_or_else(|| QuantityError::UnknownConstant(name.to_string()))
}
