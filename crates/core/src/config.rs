use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ROLL_DURATION_MS: u64 = 2200;
pub const DEFAULT_INITIAL_TICK_MS: u64 = 60;
pub const DEFAULT_MAX_TICK_MS: u64 = 300;
pub const DEFAULT_HISTORY_CAP: usize = 5;
pub const DEFAULT_PICK_COUNT: i64 = 1;
pub const MAX_ROLL_DURATION_MS: u64 = 600_000;
pub const MAX_TICK_MS: u64 = 60_000;
pub const MAX_TOAST_TTL_MS: u64 = 600_000;
pub const MAX_CELEBRATION_BURSTS: u32 = 20;
pub const MAX_CELEBRATION_INTERVAL_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawConfig {
    pub roll_duration_ms: u64,
    pub initial_tick_ms: u64,
    pub max_tick_ms: u64,
    pub history_cap: usize,
    pub default_count: i64,
    pub toast_ttl_ms: u64,
    pub celebration_bursts: u32,
    pub celebration_interval_ms: u64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            roll_duration_ms: DEFAULT_ROLL_DURATION_MS,
            initial_tick_ms: DEFAULT_INITIAL_TICK_MS,
            max_tick_ms: DEFAULT_MAX_TICK_MS,
            history_cap: DEFAULT_HISTORY_CAP,
            default_count: DEFAULT_PICK_COUNT,
            toast_ttl_ms: 2800,
            celebration_bursts: 3,
            celebration_interval_ms: 800,
        }
    }
}

impl DrawConfig {
    pub fn sanitized(mut self) -> Self {
        self.roll_duration_ms = self.roll_duration_ms.min(MAX_ROLL_DURATION_MS);
        self.initial_tick_ms = self.initial_tick_ms.min(MAX_TICK_MS);
        self.max_tick_ms = self.max_tick_ms.min(MAX_TICK_MS);
        if self.max_tick_ms < self.initial_tick_ms {
            self.max_tick_ms = self.initial_tick_ms;
        }
        self.history_cap = self.history_cap.max(1);
        self.default_count = self.default_count.max(1);
        self.toast_ttl_ms = self.toast_ttl_ms.min(MAX_TOAST_TTL_MS);
        self.celebration_bursts = self.celebration_bursts.min(MAX_CELEBRATION_BURSTS);
        self.celebration_interval_ms = self
            .celebration_interval_ms
            .min(MAX_CELEBRATION_INTERVAL_MS);
        self
    }

    pub fn roll_duration(&self) -> Duration {
        Duration::from_millis(self.roll_duration_ms)
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    pub fn celebration_span(&self) -> Duration {
        self.celebration_span_for(self.celebration_bursts)
    }

    pub fn celebration_span_for(&self, bursts: u32) -> Duration {
        Duration::from_millis(
            self.celebration_interval_ms
                .saturating_mul(u64::from(bursts.min(MAX_CELEBRATION_BURSTS))),
        )
    }

    /// Grows linearly from the initial tick toward the max tick as the roll nears its end.
    pub fn tick_after(&self, elapsed: Duration) -> Duration {
        let total = self.roll_duration().as_nanos().max(1);
        let elapsed = elapsed.as_nanos().min(total);
        let span = u128::from(self.max_tick_ms.saturating_sub(self.initial_tick_ms)) * 1_000_000;
        let extra = span * elapsed / total;
        Duration::from_millis(self.initial_tick_ms) + Duration::from_nanos(extra as u64)
    }
}
