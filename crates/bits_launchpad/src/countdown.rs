//! Reward-wait countdown.
//!
//! After a stake the pool only pays rewards once [`REWARD_WAIT_MS`] have
//! passed. The start time is session-local: a restarted client has no stake
//! time and therefore no wait.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::clock::Clock;
use crate::state::DashboardState;

pub const REWARD_WAIT_MS: i64 = 60_000;

/// Interval between countdown refreshes.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Milliseconds left before rewards can be claimed.
pub fn remaining_ms(last_stake_time_ms: Option<i64>, now_ms: i64) -> i64 {
    match last_stake_time_ms {
        Some(start) => (REWARD_WAIT_MS - (now_ms - start)).clamp(0, REWARD_WAIT_MS),
        None => 0,
    }
}

/// Render milliseconds as `m:ss`.
pub fn format_time_remaining(ms: i64) -> String {
    let ms = ms.max(0);
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    format!("{minutes}:{seconds:02}")
}

/// Recompute `time_remaining_ms` from the clock.
pub fn tick(state: &RwLock<DashboardState>, clock: &dyn Clock) {
    let now = clock.now_ms();
    let mut state = state.write();
    if state.last_stake_time_ms.is_some() {
        state.time_remaining_ms = state.remaining_ms(now);
        trace!(remaining_ms = state.time_remaining_ms, "countdown tick");
    }
}

/// Spawn the once-per-second countdown task. It runs until the handle is
/// aborted or the runtime shuts down.
pub fn spawn_ticker(state: Arc<RwLock<DashboardState>>, clock: Arc<dyn Clock>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            tick(&state, clock.as_ref());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const T: i64 = 1_700_000_000_000;

    #[test]
    fn halfway_through_the_wait() {
        assert_eq!(remaining_ms(Some(T), T + 30_000), 30_000);
        assert_eq!(format_time_remaining(30_000), "0:30");
    }

    #[test]
    fn wait_ends_at_sixty_seconds() {
        assert_eq!(remaining_ms(Some(T), T + 60_000), 0);
        assert_eq!(remaining_ms(Some(T), T + 600_000), 0);
    }

    #[test]
    fn no_stake_time_means_no_wait() {
        assert_eq!(remaining_ms(None, T), 0);
    }

    #[test]
    fn clock_skew_never_exceeds_full_wait() {
        assert_eq!(remaining_ms(Some(T), T - 5_000), REWARD_WAIT_MS);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time_remaining(60_000), "1:00");
        assert_eq!(format_time_remaining(59_999), "0:59");
        assert_eq!(format_time_remaining(0), "0:00");
        assert_eq!(format_time_remaining(-10), "0:00");
        assert_eq!(format_time_remaining(125_000), "2:05");
    }

    #[test]
    fn tick_updates_only_after_a_stake() {
        let state = RwLock::new(DashboardState::new());
        let clock = ManualClock::new(T);

        tick(&state, &clock);
        assert_eq!(state.read().time_remaining_ms, 0);

        state.write().last_stake_time_ms = Some(T);
        clock.advance(15_000);
        tick(&state, &clock);
        assert_eq!(state.read().time_remaining_ms, 45_000);
        assert_eq!(state.read().time_remaining_label(), "0:45");
    }

    #[tokio::test]
    async fn ticker_refreshes_state() {
        let state = Arc::new(RwLock::new(DashboardState::new()));
        state.write().last_stake_time_ms = Some(T);
        let clock = Arc::new(ManualClock::new(T + 20_000));

        let handle = spawn_ticker(state.clone(), clock.clone());
        // The first interval tick fires immediately.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(state.read().time_remaining_ms, 40_000);

        handle.abort();
    }
}
