//! Per-device enrichment fan-out.
//!
//! Each device's enrichment touches only its own record and the
//! gateway, so the tasks run on a bounded pool. Every task carries its
//! own timeout and a small fixed-backoff retry budget; exhausting it
//! leaves the device at its prior values instead of blocking the batch
//! or cancelling siblings.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use netinv_common::config::EnrichmentConfig;
use netinv_common::device::{Device, is_placeholder};
use netinv_common::error::{InventoryError, Result};

use crate::classifier::{assign_tags, resolve_os};
use crate::gateway::EnrichmentGateway;
use crate::registry::DeviceRegistry;

#[derive(Debug, Clone)]
pub struct EnrichmentPolicy {
    pub workers: usize,
    pub task_timeout: Duration,
    pub retries: u32,
    pub backoff: Duration,
}

impl EnrichmentPolicy {
    pub fn from_config(config: &EnrichmentConfig) -> Self {
        Self {
            workers: config.workers.max(1),
            task_timeout: Duration::from_secs(config.task_timeout_secs),
            retries: config.retries.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }
}

/// One enrichment attempt: service scan, OS fingerprint, SNMP scalars,
/// then classification. Capability-unavailable results degrade the
/// affected field and keep going; any other gateway failure aborts the
/// attempt so the retry loop can decide.
async fn attempt(gateway: &dyn EnrichmentGateway, device: &Device) -> Result<Device> {
    let mut next = device.clone();

    match gateway.scan_services(next.address).await {
        Ok(services) if !services.is_empty() => next.services = services,
        Ok(_) => {}
        Err(InventoryError::Unsupported(_)) => {}
        Err(e) => return Err(e),
    }

    let fingerprint = match gateway.query_os_fingerprint(next.address).await {
        Ok(raw) => Some(raw),
        Err(InventoryError::Unsupported(_)) => None,
        Err(e) => return Err(e),
    };

    let scalars = match gateway.query_snmp_scalars(next.address).await {
        Ok(scalars) => Some(scalars),
        Err(InventoryError::Unsupported(_)) => None,
        Err(e) => return Err(e),
    };

    // Prefer the active fingerprint; fall back to the agent's sysDescr.
    let raw_os = fingerprint.or_else(|| scalars.as_ref().map(|s| s.sys_descr.clone()));
    if let Some(raw) = raw_os {
        let family = resolve_os(&raw, &next.vendor);
        // An unknown result never clobbers a previously known OS.
        if family.is_known() {
            next.os = family.as_str().to_string();
        }
    }

    if let Some(scalars) = scalars.as_ref() {
        if !is_placeholder(scalars.sys_name.trim()) {
            next.set_hostname(scalars.sys_name.trim())?;
        }
        if scalars.uptime_ticks > 0 {
            next.uptime = scalars.uptime();
        }
    }

    let tags = assign_tags(&next, scalars.as_ref());
    if !tags.is_empty() {
        next.tags = tags;
    }

    Ok(next)
}

/// Enriches one device with timeout and bounded fixed-backoff retries.
/// Failure is absorbed: the prior record comes back unchanged.
pub async fn enrich_device(
    gateway: Arc<dyn EnrichmentGateway>,
    device: Device,
    policy: &EnrichmentPolicy,
) -> Device {
    for attempt_no in 1..=policy.retries {
        match tokio::time::timeout(policy.task_timeout, attempt(gateway.as_ref(), &device)).await {
            Ok(Ok(next)) => return next,
            Ok(Err(e)) => {
                warn!(address = %device.address, attempt = attempt_no, "enrichment failed: {e}");
            }
            Err(_) => {
                warn!(address = %device.address, attempt = attempt_no, "enrichment timed out");
            }
        }
        if attempt_no < policy.retries {
            tokio::time::sleep(policy.backoff).await;
        }
    }
    debug!(address = %device.address, "retries exhausted, keeping prior values");
    device
}

/// Fans enrichment out over a bounded worker pool and writes each
/// result back as it completes. One task's failure never cancels the
/// others; the registry write is the only exclusion point.
pub async fn enrich_all(
    gateway: Arc<dyn EnrichmentGateway>,
    registry: &dyn DeviceRegistry,
    devices: Vec<Device>,
    policy: &EnrichmentPolicy,
) -> Result<Vec<Device>> {
    let semaphore = Arc::new(Semaphore::new(policy.workers));
    let mut tasks = JoinSet::new();

    for device in devices {
        let gateway = Arc::clone(&gateway);
        let semaphore = Arc::clone(&semaphore);
        let policy = policy.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            enrich_device(gateway, device, &policy).await
        });
    }

    let mut enriched = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(device) => {
                registry.update(&device)?;
                enriched.push(device);
            }
            Err(e) => warn!("enrichment task aborted: {e}"),
        }
    }
    Ok(enriched)
}
