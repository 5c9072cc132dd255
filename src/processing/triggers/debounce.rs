use std::time::Duration;
use std::time::Instant;

use crate::processing::decision::Decision;

// DEBOUNCE GATE ---------------------------------------------------------------

/// Cooldown state machine between the decider and the key sink.
///
/// Idle: a winning decision passes through, the trigger time is recorded
/// and the gate starts cooling. Cooling: every decision is swallowed until
/// the cooldown has elapsed. A sustained above-threshold response therefore
/// emits at most one action per cooldown interval.
///
/// The current time is passed in by the caller, so the machine can be
/// driven with synthetic clocks in tests. State resets to idle on process
/// start; nothing persists across restarts.
pub struct DebounceGate {
    cooldown: Duration,
    last_trigger: Option<Instant>,
}

impl DebounceGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_trigger: None,
        }
    }

    pub fn is_cooling(&self, now: Instant) -> bool {
        match self.last_trigger {
            Some(at) => now.duration_since(at) < self.cooldown,
            None => false,
        }
    }

    /// Offers this cycle's decision. Returns the winning band index exactly
    /// when the gate accepts it for output.
    pub fn offer(&mut self, decision: Decision, now: Instant) -> Option<usize> {
        if self.is_cooling(now) {
            return None;
        }
        match decision {
            Decision::Winner(index) => {
                self.last_trigger = Some(now);
                Some(index)
            }
            Decision::None => None,
        }
    }
}
