//! Interface-index lookup over an agent-reported hardware-address table.

use netinv_common::device::HardwareAddr;
use netinv_common::error::{InventoryError, Result};

/// Finds the interface index whose hardware address matches `target`.
///
/// Both sides are normalized to lowercase hex with no delimiters; a
/// candidate matches when the target string occurs inside it. Exact
/// equality beats a pure substring hit, and among substring hits the
/// shortest candidate wins (the least surrounding noise).
pub fn resolve_interface_index(target: &HardwareAddr, table: &[(u32, String)]) -> Result<u32> {
    let needle = target.plain_hex();

    let mut exact: Option<u32> = None;
    let mut loose: Option<(u32, usize)> = None;

    for (index, raw) in table {
        let candidate = normalize(raw);
        if candidate == needle {
            exact.get_or_insert(*index);
        } else if candidate.contains(&needle) {
            match loose {
                Some((_, len)) if len <= candidate.len() => {}
                _ => loose = Some((*index, candidate.len())),
            }
        }
    }

    exact
        .or(loose.map(|(index, _)| index))
        .ok_or_else(|| InventoryError::not_found(format!("no interface matching {target}")))
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_hexdigit())
        .collect::<String>()
        .to_lowercase()
}
