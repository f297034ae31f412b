//! Cross-crate flows for the inventory engine, exercised end to end
//! against scripted in-memory gateways and real registries.

pub mod fake;

#[cfg(test)]
mod inventory;
