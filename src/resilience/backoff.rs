//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before retry number `retry` (1-based); retry 0 is immediate.
///
/// Doubles from `base` per retry, capped at `max`, plus up to 10% jitter so
/// concurrent submitters do not retry in lockstep.
pub fn calculate_backoff(retry: u32, base: Duration, max: Duration) -> Duration {
    if retry == 0 {
        return Duration::ZERO;
    }

    let factor = 2u32.saturating_pow(retry - 1);
    let delay = base.saturating_mul(factor).min(max);

    let jitter_ms = (delay.as_millis() / 10) as u64;
    let jitter = if jitter_ms > 0 {
        Duration::from_millis(rand::thread_rng().gen_range(0..jitter_ms))
    } else {
        Duration::ZERO
    };

    delay + jitter
}
