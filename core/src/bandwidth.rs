//! Counter-delta to throughput conversion.
//!
//! Octet counters are cumulative, so a rate needs two samples. The
//! sampler retains the last sample per (address, hardware id) key and
//! turns the delta into kilobits per second. Timestamps are passed in
//! by the caller, which keeps the arithmetic clock-free and testable.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

use netinv_common::device::HardwareAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleKey {
    pub address: IpAddr,
    pub hardware_id: HardwareAddr,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub in_kbps: f64,
    pub out_kbps: f64,
}

impl Throughput {
    pub const ZERO: Self = Self {
        in_kbps: 0.0,
        out_kbps: 0.0,
    };
}

#[derive(Debug, Clone, Copy)]
struct CounterSample {
    at: Duration,
    in_octets: u64,
    out_octets: u64,
}

/// Keyed last-sample cache. Safe to call concurrently for the same key;
/// the cache mutation is the only side effect and it sits behind a lock.
#[derive(Debug, Default)]
pub struct BandwidthSampler {
    cache: Mutex<HashMap<SampleKey, CounterSample>>,
}

impl BandwidthSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one counter sample taken at `at` and returns the estimated
    /// throughput since the previous sample for this key.
    ///
    /// First sample for a key and non-positive elapsed time both yield
    /// zero; the stored baseline is refreshed in every case. Counter
    /// decreases (reset or wraparound) are clamped to a zero delta,
    /// which under-reports exactly at the wrap instant.
    pub fn feed(&self, key: SampleKey, at: Duration, in_octets: u64, out_octets: u64) -> Throughput {
        let sample = CounterSample {
            at,
            in_octets,
            out_octets,
        };
        let mut cache = self.cache.lock().expect("bandwidth cache poisoned");
        let prev = cache.insert(key, sample);

        let Some(prev) = prev else {
            return Throughput::ZERO;
        };
        let Some(elapsed) = at.checked_sub(prev.at).filter(|e| !e.is_zero()) else {
            return Throughput::ZERO;
        };

        Throughput {
            in_kbps: kbps(in_octets.saturating_sub(prev.in_octets), elapsed),
            out_kbps: kbps(out_octets.saturating_sub(prev.out_octets), elapsed),
        }
    }
}

fn kbps(delta_octets: u64, elapsed: Duration) -> f64 {
    let raw = (delta_octets as f64) * 8.0 / elapsed.as_secs_f64() / 1000.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SampleKey {
        SampleKey {
            address: "192.168.0.30".parse().unwrap(),
            hardware_id: "aa:bb:cc:00:11:22".parse().unwrap(),
        }
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn first_sample_is_zero() {
        let sampler = BandwidthSampler::new();
        assert_eq!(sampler.feed(key(), secs(0), 1000, 500), Throughput::ZERO);
    }

    #[test]
    fn second_sample_yields_rate() {
        let sampler = BandwidthSampler::new();
        sampler.feed(key(), secs(0), 1000, 500);
        let rate = sampler.feed(key(), secs(10), 2000, 1000);
        assert_eq!(rate.in_kbps, 0.8);
        assert_eq!(rate.out_kbps, 0.4);
    }

    #[test]
    fn rounding_to_two_decimals() {
        let sampler = BandwidthSampler::new();
        sampler.feed(key(), secs(0), 0, 0);
        let rate = sampler.feed(key(), secs(3), 1000, 0);
        // 8000 bits / 3 s / 1000 = 2.666... -> 2.67
        assert_eq!(rate.in_kbps, 2.67);
    }

    #[test]
    fn decreasing_counter_clamps_to_zero() {
        let sampler = BandwidthSampler::new();
        sampler.feed(key(), secs(0), 5000, 5000);
        let rate = sampler.feed(key(), secs(10), 100, 6000);
        assert_eq!(rate.in_kbps, 0.0);
        assert_eq!(rate.out_kbps, 0.8);
    }

    #[test]
    fn clock_anomaly_returns_zero_but_refreshes_baseline() {
        let sampler = BandwidthSampler::new();
        sampler.feed(key(), secs(10), 1000, 1000);
        // Clock went backwards: no rate, but the baseline moves.
        assert_eq!(sampler.feed(key(), secs(5), 2000, 2000), Throughput::ZERO);
        let rate = sampler.feed(key(), secs(15), 3000, 3000);
        assert_eq!(rate.in_kbps, 0.8);
        assert_eq!(rate.out_kbps, 0.8);
    }

    #[test]
    fn keys_are_independent() {
        let sampler = BandwidthSampler::new();
        let other = SampleKey {
            address: "192.168.0.31".parse().unwrap(),
            hardware_id: "aa:bb:cc:00:11:23".parse().unwrap(),
        };
        sampler.feed(key(), secs(0), 1000, 1000);
        assert_eq!(sampler.feed(other, secs(10), 9000, 9000), Throughput::ZERO);
    }
}
