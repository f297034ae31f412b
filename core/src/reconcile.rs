//! Merging discovery batches into the persistent device snapshot.
//!
//! A sweep only sees what answered right now; the previous snapshot
//! holds everything learned before. Reconciliation combines the two
//! without losing prior knowledge: identity survives, enriched fields
//! beat blank ones, and absence only ever means "offline", never
//! deletion.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use netinv_common::device::{Device, DiscoveredHost, is_placeholder};

use crate::classifier::reclassify;

struct LastRun {
    at: Instant,
    snapshot: Vec<Device>,
}

/// Debounced single-writer reconciler.
///
/// Discovery probing is costly, so runs closer together than the
/// minimum interval are collapsed onto the cached snapshot. The
/// debounce check and the snapshot swap happen under one lock, so
/// concurrent callers inside the window observe the same result and
/// never a partial overlap.
pub struct ScanReconciler {
    min_interval: Duration,
    keep_previous_capability: bool,
    state: Mutex<Option<LastRun>>,
}

impl ScanReconciler {
    pub fn new(min_interval: Duration, keep_previous_capability: bool) -> Self {
        Self {
            min_interval,
            keep_previous_capability,
            state: Mutex::new(None),
        }
    }

    /// Produces the next snapshot from the previous one and a fresh
    /// batch, or the cached snapshot when called inside the debounce
    /// window.
    pub fn reconcile(&self, previous: &[Device], batch: &[DiscoveredHost]) -> Vec<Device> {
        let mut state = self.state.lock().expect("reconciler state poisoned");
        let now = Instant::now();

        if let Some(last) = state.as_ref() {
            if now.duration_since(last.at) < self.min_interval {
                debug!("inside debounce window, serving cached snapshot");
                return last.snapshot.clone();
            }
        }

        let next = merge(previous, batch, self.keep_previous_capability);
        *state = Some(LastRun {
            at: now,
            snapshot: next.clone(),
        });
        next
    }
}

/// Pure merge of one batch into one snapshot.
///
/// Output ordering: merged/new entries in batch order, then
/// newly-offline entries in previous-snapshot order. Exactly one entry
/// per distinct address across both inputs.
pub fn merge(
    previous: &[Device],
    batch: &[DiscoveredHost],
    keep_previous_capability: bool,
) -> Vec<Device> {
    let mut remaining: Vec<Option<Device>> = previous.iter().cloned().map(Some).collect();
    let by_address: HashMap<IpAddr, usize> = previous
        .iter()
        .enumerate()
        .map(|(i, d)| (d.address, i))
        .collect();

    let mut seen: HashSet<IpAddr> = HashSet::new();
    let mut next = Vec::with_capacity(previous.len() + batch.len());

    for host in batch {
        if !seen.insert(host.address) {
            continue;
        }
        let fresh = Device::fresh(host.address, host.hardware_id, host.snmp);
        let prev = by_address
            .get(&host.address)
            .and_then(|i| remaining[*i].take());
        match prev {
            Some(prev) => next.push(merge_record(prev, fresh, keep_previous_capability)),
            None => next.push(fresh),
        }
    }

    for prev in remaining.into_iter().flatten() {
        next.push(Device {
            connected: false,
            ..prev
        });
    }

    next
}

/// Field-wise merge of a matched record. Descriptive fields prefer the
/// retained historical value over a blank fresh one; reachability and
/// capability come from the fresh probe (unless the stale-capability
/// knob is set). The previous subtype is re-applied through the
/// reclassification boundary so its payload survives.
fn merge_record(prev: Device, fresh: Device, keep_previous_capability: bool) -> Device {
    let target = prev.kind.tag();
    let merged = Device {
        id: prev.id,
        address: fresh.address,
        hardware_id: fresh.hardware_id,
        vendor: pick(prev.vendor, fresh.vendor),
        os: pick(prev.os, fresh.os),
        hostname: pick(prev.hostname, fresh.hostname),
        tags: if prev.tags.is_empty() {
            fresh.tags
        } else {
            prev.tags
        },
        services: if prev.services.is_empty() {
            fresh.services
        } else {
            prev.services
        },
        connected: fresh.connected,
        uptime: if prev.uptime.is_zero() {
            fresh.uptime
        } else {
            prev.uptime
        },
        snmp: if keep_previous_capability {
            prev.snmp
        } else {
            fresh.snmp
        },
        kind: prev.kind,
    };
    reclassify(merged, target)
}

fn pick(prev: String, fresh: String) -> String {
    if is_placeholder(&prev) { fresh } else { prev }
}
