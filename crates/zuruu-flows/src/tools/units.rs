//! Unit converter for mass, volume and temperature.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Mcg,
    Mg,
    G,
    Kg,
    Lb,
    Ml,
    L,
    Tsp,
    Tbsp,
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Mass,
    Volume,
    Temperature,
}

impl Unit {
    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Mcg | Unit::Mg | Unit::G | Unit::Kg | Unit::Lb => Dimension::Mass,
            Unit::Ml | Unit::L | Unit::Tsp | Unit::Tbsp => Dimension::Volume,
            Unit::Celsius | Unit::Fahrenheit => Dimension::Temperature,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Mcg => "mcg",
            Unit::Mg => "mg",
            Unit::G => "g",
            Unit::Kg => "kg",
            Unit::Lb => "lb",
            Unit::Ml => "mL",
            Unit::L => "L",
            Unit::Tsp => "tsp",
            Unit::Tbsp => "tbsp",
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
        }
    }

    /// Factor to the base unit of the dimension (grams, millilitres).
    fn base_factor(&self) -> f64 {
        match self {
            Unit::Mcg => 1e-6,
            Unit::Mg => 1e-3,
            Unit::G => 1.0,
            Unit::Kg => 1e3,
            Unit::Lb => 453.592_37,
            Unit::Ml => 1.0,
            Unit::L => 1e3,
            // Medical teaspoon and tablespoon.
            Unit::Tsp => 5.0,
            Unit::Tbsp => 15.0,
            Unit::Celsius | Unit::Fahrenheit => 1.0,
        }
    }
}

impl FromStr for Unit {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "mcg" | "µg" | "ug" | "microgram" | "micrograms" => Unit::Mcg,
            "mg" | "milligram" | "milligrams" => Unit::Mg,
            "g" | "gram" | "grams" => Unit::G,
            "kg" | "kilogram" | "kilograms" => Unit::Kg,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Lb,
            "ml" | "millilitre" | "milliliter" | "millilitres" | "milliliters" => Unit::Ml,
            "l" | "litre" | "liter" | "litres" | "liters" => Unit::L,
            "tsp" | "teaspoon" | "teaspoons" => Unit::Tsp,
            "tbsp" | "tablespoon" | "tablespoons" => Unit::Tbsp,
            "c" | "°c" | "celsius" => Unit::Celsius,
            "f" | "°f" | "fahrenheit" => Unit::Fahrenheit,
            _ => return Err(FlowError::UnknownUnit(s.to_string())),
        };
        Ok(unit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub value: f64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub value: f64,
    pub from: Unit,
    pub to: Unit,
    pub result: f64,
    /// e.g. `"500 mg = 0.5 g"`.
    pub display: String,
}

/// Convert `value` between two units of the same dimension.
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, FlowError> {
    if from.dimension() != to.dimension() {
        return Err(FlowError::IncompatibleUnits {
            from: from.symbol().to_string(),
            to: to.symbol().to_string(),
        });
    }

    let result = match (from, to) {
        (Unit::Celsius, Unit::Fahrenheit) => value * 9.0 / 5.0 + 32.0,
        (Unit::Fahrenheit, Unit::Celsius) => (value - 32.0) * 5.0 / 9.0,
        _ => value * from.base_factor() / to.base_factor(),
    };
    Ok(result)
}

/// Parse the unit names in `request` and convert.
pub fn convert_request(request: &ConversionRequest) -> Result<Conversion, FlowError> {
    let from: Unit = request.from.parse()?;
    let to: Unit = request.to.parse()?;
    let result = convert(request.value, from, to)?;
    // Trim float noise such as 0.30000000000000004.
    let result = (result * 1e9).round() / 1e9;

    Ok(Conversion {
        value: request.value,
        from,
        to,
        result,
        display: format!("{} {} = {} {}", request.value, from.symbol(), result, to.symbol()),
    })
}
