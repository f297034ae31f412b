//! Validated subtype payload fields. Out-of-range input is rejected at
//! construction, never clamped.

use crate::error::{InventoryError, Result};

/// A load percentage in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadPercent(u8);

impl LoadPercent {
    pub fn new(value: u8) -> Result<Self> {
        if value > 100 {
            return Err(InventoryError::validation(format!(
                "load must be between 0 and 100, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

/// Number of physical ports on a switch; strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortCount(u32);

impl PortCount {
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(InventoryError::validation(
                "number of ports must be a positive integer",
            ));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Non-empty switch model designation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName(String);

impl ModelName {
    pub fn new(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(InventoryError::validation(
                "model must be a non-empty string",
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_percent_bounds() {
        assert!(LoadPercent::new(0).is_ok());
        assert!(LoadPercent::new(100).is_ok());
        assert!(LoadPercent::new(101).is_err());
    }

    #[test]
    fn port_count_must_be_positive() {
        assert!(PortCount::new(0).is_err());
        assert_eq!(PortCount::new(24).unwrap().get(), 24);
    }

    #[test]
    fn model_name_must_be_non_empty() {
        assert!(ModelName::new("").is_err());
        assert!(ModelName::new("  ").is_err());
        assert_eq!(ModelName::new("T1600G-28TS").unwrap().as_str(), "T1600G-28TS");
    }
}
