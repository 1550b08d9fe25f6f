//! Outbound contract: every change at the table is reported to one
//! [`EventSink`] as a [`TableEvent`].

use std::sync::{Arc, Mutex, PoisonError};

use felt_engine::game::{HandResult, HandSetup, Street, TableState};
use felt_engine::logger::HandRecord;
use felt_engine::player::PlayerAction;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

// Bounded so a stalled consumer cannot grow memory without limit; events are
// dropped once the buffer is full.
pub const EVENT_CHANNEL_BUFFER: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForcedReason {
    /// The CPU timer never got to act.
    Watchdog,
    /// A human seat ran out of time.
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableEvent {
    /// Sent after every mutation, last in its batch.
    State { state: Box<TableState> },
    HandStart {
        hand_id: u64,
        button: usize,
        small_blind: u32,
        big_blind: u32,
    },
    PostBlind { seat: usize, amount: u32 },
    HandSetup { setup: HandSetup },
    Action {
        hand_id: u64,
        seat: usize,
        action: PlayerAction,
        amount_to_call: u32,
        street: Street,
    },
    Deal {
        hand_id: u64,
        street: Street,
        cards: Vec<String>,
    },
    HandOver { result: HandResult },
    /// Completed history of the hand that just ended.
    HandHistory { record: Box<HandRecord> },
    /// Precedes the `Action` event of a timer-forced move.
    ForcedAction {
        hand_id: u64,
        seat: usize,
        action: PlayerAction,
        reason: ForcedReason,
    },
    /// No further hand will be dealt automatically.
    Finished { hand_id: u64, game_over: bool },
}

impl TableEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TableEvent::State { .. } => "state",
            TableEvent::HandStart { .. } => "hand_start",
            TableEvent::PostBlind { .. } => "post_blind",
            TableEvent::HandSetup { .. } => "hand_setup",
            TableEvent::Action { .. } => "action",
            TableEvent::Deal { .. } => "deal",
            TableEvent::HandOver { .. } => "hand_over",
            TableEvent::HandHistory { .. } => "hand_history",
            TableEvent::ForcedAction { .. } => "forced_action",
            TableEvent::Finished { .. } => "finished",
        }
    }
}

/// Receives table events synchronously, in order, before the mutation that
/// produced them returns.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &TableEvent);
}

impl<F> EventSink for F
where
    F: Fn(&TableEvent) + Send + Sync,
{
    fn on_event(&self, event: &TableEvent) {
        self(event)
    }
}

/// Forwards events into a bounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<TableEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::Receiver<TableEvent>) {
        Self::with_capacity(EVENT_CHANNEL_BUFFER)
    }

    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<TableEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn on_event(&self, event: &TableEvent) {
        if let Err(err) = self.sender.try_send(event.clone()) {
            tracing::warn!(
                event = event.name(),
                error = %err,
                "failed to deliver table event"
            );
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<TableEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TableEvent> {
        self.lock().clone()
    }

    /// Drain what has been recorded so far.
    pub fn take(&self) -> Vec<TableEvent> {
        std::mem::take(&mut *self.lock())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.lock().iter().map(TableEvent::name).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TableEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for RecordingSink {
    fn on_event(&self, event: &TableEvent) {
        self.lock().push(event.clone());
    }
}
