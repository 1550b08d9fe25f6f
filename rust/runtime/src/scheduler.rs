//! Timer table for the runtime.
//!
//! At most one timer per [`TimerPurpose`] is armed. Every timer carries the
//! [`TurnKey`] of the state it was armed for; a callback whose key no longer
//! matches the table is stale and must not act.

use felt_engine::game::{HandStatus, TableState};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerPurpose {
    CpuAction,
    Watchdog,
    PlayerAction,
    AutoDeal,
}

/// Identity of the decision point a timer was armed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnKey {
    pub hand_id: u64,
    pub status: HandStatus,
    pub current_to_act: Option<usize>,
    pub action_count: u32,
}

impl TurnKey {
    pub fn of(state: &TableState) -> Self {
        Self {
            hand_id: state.hand_id,
            status: state.status,
            current_to_act: state.current_to_act,
            action_count: state.action_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedTimer {
    pub purpose: TimerPurpose,
    pub deadline: Instant,
    pub key: TurnKey,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    timers: Vec<ArmedTimer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Arm `purpose`, replacing any timer already armed for it.
    pub fn arm(&mut self, purpose: TimerPurpose, deadline: Instant, key: TurnKey) {
        self.cancel(purpose);
        self.timers.push(ArmedTimer {
            purpose,
            deadline,
            key,
        });
    }

    pub fn cancel(&mut self, purpose: TimerPurpose) {
        self.timers.retain(|t| t.purpose != purpose);
    }

    pub fn is_armed(&self, purpose: TimerPurpose) -> bool {
        self.timers.iter().any(|t| t.purpose == purpose)
    }

    pub fn deadline_of(&self, purpose: TimerPurpose) -> Option<Instant> {
        self.timers
            .iter()
            .find(|t| t.purpose == purpose)
            .map(|t| t.deadline)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.iter().map(|t| t.deadline).min()
    }

    /// Remove and return every timer due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<ArmedTimer> {
        let mut due: Vec<ArmedTimer> = self
            .timers
            .iter()
            .copied()
            .filter(|t| t.deadline <= now)
            .collect();
        self.timers.retain(|t| t.deadline > now);
        due.sort_by_key(|t| (t.deadline, t.purpose));
        due
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }
}
