use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Unit of measure a material is priced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "m²")]
    SquareMeter,
    #[serde(rename = "unidade")]
    Each,
    #[serde(rename = "metro linear")]
    LinearMeter,
    #[serde(rename = "litro")]
    Liter,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "m³")]
    CubicMeter,
    #[serde(rename = "peça")]
    Piece,
}

impl Unit {
    pub const ALL: [Unit; 7] = [
        Unit::SquareMeter,
        Unit::Each,
        Unit::LinearMeter,
        Unit::Liter,
        Unit::Kilogram,
        Unit::CubicMeter,
        Unit::Piece,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Unit::SquareMeter => "m²",
            Unit::Each => "unidade",
            Unit::LinearMeter => "metro linear",
            Unit::Liter => "litro",
            Unit::Kilogram => "kg",
            Unit::CubicMeter => "m³",
            Unit::Piece => "peça",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|u| *u == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let i = Self::ALL.iter().position(|u| *u == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    /// Name of a category; not a live reference.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub owner_email: String,
}

impl Material {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("Name"));
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField("Category"));
        }
        if self.unit_price < 0.0 {
            return Err(ValidationError::Negative("Unit price"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cycles_through_every_variant() {
        let mut unit = Unit::SquareMeter;
        for _ in 0..Unit::ALL.len() {
            unit = unit.next();
        }
        assert_eq!(unit, Unit::SquareMeter);
        assert_eq!(Unit::SquareMeter.previous(), Unit::Piece);
    }

    #[test]
    fn deserializes_stored_labels_and_defaults() {
        let json = r#"{"id":"1","name":"MDF 15mm","unit":"metro linear","unitPrice":42.5}"#;
        let material: Material = serde_json::from_str(json).unwrap();
        assert_eq!(material.unit, Unit::LinearMeter);
        assert_eq!(material.category, "");
        assert_eq!(material.owner_email, "");
        assert_eq!(material.unit_price, 42.5);
    }

    #[test]
    fn validation_requires_name_category_and_non_negative_price() {
        let mut material = Material {
            id: String::new(),
            name: "MDF 15mm".to_string(),
            category: String::new(),
            unit: Unit::SquareMeter,
            unit_price: 10.0,
            owner_email: String::new(),
        };
        assert_eq!(material.validate(), Err(ValidationError::MissingField("Category")));

        material.category = "Chapas".to_string();
        material.unit_price = -1.0;
        assert_eq!(material.validate(), Err(ValidationError::Negative("Unit price")));

        material.unit_price = 0.0;
        assert_eq!(material.validate(), Ok(()));
    }
}
