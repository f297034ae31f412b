//! Validated link-layer hardware address.

use std::str::FromStr;

use crate::error::InventoryError;

/// A six-octet hardware address, accepted in the standard colon or
/// hyphen delimited hex form and rendered canonically as lowercase
/// colon-separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HardwareAddr([u8; 6]);

impl HardwareAddr {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Lowercase hex with no delimiters, the normalized form used for
    /// interface-table matching.
    pub fn plain_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl FromStr for HardwareAddr {
    type Err = InventoryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || InventoryError::validation(format!("invalid hardware address {raw:?}"));

        let mut octets = [0u8; 6];
        let mut parts = raw.split(|c| c == ':' || c == '-');
        for slot in octets.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 {
                return Err(invalid());
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(octets))
    }
}

impl std::fmt::Display for HardwareAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}
