//! Per-command frequency limiting.

use crate::{GuardError, GuardErrorKind, GuardResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Frequency limit declared by a command: at most `max` invocations per
/// cooldown window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyLimit {
    /// Maximum invocations inside one window.
    pub max: u32,
    /// Cooldown window length in minutes.
    pub cooldown_minutes: u64,
}

impl FrequencyLimit {
    /// Create a limit.
    pub fn new(max: u32, cooldown_minutes: u64) -> Self {
        Self {
            max,
            cooldown_minutes,
        }
    }

    /// The cooldown window as a duration.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.cooldown_minutes * 60)
    }
}

/// One counter with its scheduled expiry.
#[derive(Debug, Clone)]
struct Counter {
    count: u32,
    expires_at: Instant,
}

/// Per-command invocation counters with timed reset.
///
/// Counters are modeled as value + scheduled-expiry timestamp and
/// expired lazily on the next access, so no background timer can outlive
/// a guild reload. The expiry is armed when a counter first leaves zero
/// and stays fixed for the rest of the window.
///
/// Operators bypass the limit but their invocations are still counted,
/// which keeps the counters honest for observability.
#[derive(Debug, Clone, Default)]
pub struct ThrottleCache {
    counters: HashMap<String, Counter>,
}

impl ThrottleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check and record one invocation of `command` under `limit`.
    ///
    /// Rejects with [`GuardErrorKind::FrequencyExceeded`] (without
    /// incrementing) when the counter has reached the maximum and the
    /// invoker is not an operator.
    #[instrument(skip(self), fields(command, count))]
    pub fn check(
        &mut self,
        command: &str,
        limit: FrequencyLimit,
        operator: bool,
    ) -> GuardResult<()> {
        let now = Instant::now();

        // Lazy expiry: a counter past its window resets to zero.
        if let Some(counter) = self.counters.get(command) {
            if now >= counter.expires_at {
                debug!(command, "Throttle window elapsed, resetting counter");
                self.counters.remove(command);
            }
        }

        let current = self.counters.get(command).map(|c| c.count).unwrap_or(0);
        tracing::Span::current().record("count", current);

        if current >= limit.max && !operator {
            debug!(command, current, max = limit.max, "Frequency limit exceeded");
            return Err(GuardError::new(GuardErrorKind::FrequencyExceeded {
                command: command.to_string(),
                max: limit.max,
                window_secs: limit.window().as_secs(),
            }));
        }

        match self.counters.get_mut(command) {
            Some(counter) => counter.count += 1,
            None => {
                // First invocation of the window arms the expiry.
                self.counters.insert(
                    command.to_string(),
                    Counter {
                        count: 1,
                        expires_at: now + limit.window(),
                    },
                );
            }
        }

        Ok(())
    }

    /// Current counter value for `command`.
    pub fn count(&self, command: &str) -> u32 {
        self.counters.get(command).map(|c| c.count).unwrap_or(0)
    }

    /// Drop all counters, as on guild reload.
    pub fn reset(&mut self) {
        self.counters.clear();
    }
}
