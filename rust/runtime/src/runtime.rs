//! Single-threaded table driver.
//!
//! [`TableRuntime`] owns the table and is the only thing that mutates it.
//! After every mutation it reports the produced events to its sink and calls
//! [`TableRuntime::rearm`], which throws away every armed timer and derives
//! the new set from the current state:
//!
//! | state                                   | timers                        |
//! |-----------------------------------------|-------------------------------|
//! | in hand, CPU or autoplaying seat to act | `CpuAction`, `Watchdog` later |
//! | in hand, human seat to act              | `PlayerAction` if configured  |
//! | hand over, table still playing          | `AutoDeal`                    |
//!
//! Time is passed in by the caller so the whole thing can be driven by the
//! async actor or stepped by hand in tests.

use std::sync::Arc;

use felt_ai::baseline::legalize;
use felt_ai::{AIOpponent, HeuristicAI};
use felt_engine::engine::EngineEvent;
use felt_engine::errors::GameError;
use felt_engine::game::{HandStatus, TableState};
use felt_engine::logger::HandRecorder;
use felt_engine::player::{ActionKind, PlayerAction};
use felt_engine::rng::{source_for_seed, RandomSource};
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::RuntimeConfig;
use crate::errors::RuntimeError;
use crate::events::{EventSink, ForcedReason, TableEvent};
use crate::scheduler::{ArmedTimer, Scheduler, TimerPurpose, TurnKey};

/// Host policy deciding whether a human seat is played automatically.
pub type AutoplayPolicy = Box<dyn Fn(usize) -> bool + Send>;

pub struct TableRuntime {
    id: Uuid,
    config: RuntimeConfig,
    state: TableState,
    rng: Box<dyn RandomSource>,
    scheduler: Scheduler,
    strategy: Box<dyn AIOpponent>,
    sink: Arc<dyn EventSink>,
    autoplay: AutoplayPolicy,
    recorder: HandRecorder,
    disposed: bool,
}

impl TableRuntime {
    pub fn new(config: RuntimeConfig, sink: Arc<dyn EventSink>) -> Result<Self, RuntimeError> {
        config.validate()?;
        let mut state = TableState::new(config.seat_count, config.starting_stack, config.rules())?;
        for &seat in &config.cpu_seats {
            state.set_seat_cpu(seat, true)?;
        }
        let id = Uuid::new_v4();
        tracing::info!(
            table_id = %id,
            seats = config.seat_count,
            cpu_seats = ?config.cpu_seats,
            seed = ?config.seed,
            "table runtime created"
        );
        Ok(Self {
            id,
            rng: source_for_seed(config.seed),
            strategy: Box::new(HeuristicAI::new(config.cpu_profile)),
            recorder: HandRecorder::new(config.seed),
            config,
            state,
            scheduler: Scheduler::new(),
            sink,
            autoplay: Box::new(|_| false),
            disposed: false,
        })
    }

    /// Replace the CPU strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn AIOpponent>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn begin_hand(&mut self, now: Instant) -> Result<(), RuntimeError> {
        self.ensure_live()?;
        self.deal()?;
        self.rearm(now);
        Ok(())
    }

    /// Apply an action requested by the host for `seat`.
    pub fn act(&mut self, seat: usize, action: PlayerAction, now: Instant) -> Result<(), RuntimeError> {
        self.ensure_live()?;
        self.apply(seat, action, false)?;
        self.rearm(now);
        Ok(())
    }

    pub fn set_seat_cpu(&mut self, seat: usize, is_cpu: bool, now: Instant) -> Result<(), RuntimeError> {
        self.ensure_live()?;
        self.state.set_seat_cpu(seat, is_cpu)?;
        tracing::debug!(table_id = %self.id, seat, is_cpu, "seat control changed");
        self.publish(Vec::new(), None, false);
        self.rearm(now);
        Ok(())
    }

    /// Install the autoplay policy for human seats. Re-evaluated on every
    /// rearm.
    pub fn set_autoplay(&mut self, policy: AutoplayPolicy, now: Instant) -> Result<(), RuntimeError> {
        self.ensure_live()?;
        self.autoplay = policy;
        self.rearm(now);
        Ok(())
    }

    /// Drop every timer and arm the ones the current state calls for.
    pub fn rearm(&mut self, now: Instant) {
        self.scheduler.clear();
        if self.disposed {
            return;
        }
        let key = TurnKey::of(&self.state);
        match (self.state.status, self.state.current_to_act) {
            (HandStatus::InHand, Some(seat)) => {
                if self.is_automated(seat) {
                    self.scheduler
                        .arm(TimerPurpose::CpuAction, now + self.config.cpu_delay(), key);
                    self.scheduler
                        .arm(TimerPurpose::Watchdog, now + self.config.watchdog_delay(), key);
                } else if let Some(timeout) = self.config.player_timeout() {
                    self.scheduler.arm(TimerPurpose::PlayerAction, now + timeout, key);
                }
            }
            (HandStatus::HandOver, _) if self.deals_again() => {
                self.scheduler
                    .arm(TimerPurpose::AutoDeal, now + self.config.auto_deal_delay(), key);
            }
            _ => {}
        }
    }

    /// Run every timer due at `now`. Returns how many of them acted.
    pub fn fire_due(&mut self, now: Instant) -> usize {
        if self.disposed {
            return 0;
        }
        let mut fired = 0;
        for timer in self.scheduler.take_due(now) {
            if self.disposed {
                break;
            }
            if timer.key != TurnKey::of(&self.state) {
                tracing::trace!(table_id = %self.id, purpose = ?timer.purpose, "stale timer skipped");
                continue;
            }
            if self.fire(timer) {
                fired += 1;
                self.rearm(now);
            }
        }
        fired
    }

    /// Clear every timer for good. Nothing fires after this and further
    /// requests fail with [`RuntimeError::Disposed`].
    pub fn dispose(&mut self) {
        if !self.disposed {
            tracing::info!(table_id = %self.id, hand_id = self.state.hand_id, "table runtime disposed");
        }
        self.disposed = true;
        self.scheduler.clear();
    }

    fn fire(&mut self, timer: ArmedTimer) -> bool {
        let seat = timer.key.current_to_act;
        match (timer.purpose, seat) {
            (TimerPurpose::CpuAction, Some(seat)) => {
                let action = self.decide(seat);
                match self.apply(seat, action, false) {
                    Ok(()) => true,
                    Err(err) => {
                        // leave the watchdog armed to force a move
                        tracing::warn!(table_id = %self.id, seat, action = ?action, error = %err, "cpu action rejected");
                        false
                    }
                }
            }
            (TimerPurpose::Watchdog, Some(seat)) => {
                let action = self.decide(seat);
                self.force(seat, action, ForcedReason::Watchdog)
            }
            (TimerPurpose::PlayerAction, Some(seat)) => {
                let action = self.passive_action();
                self.force(seat, action, ForcedReason::Timeout)
            }
            (TimerPurpose::AutoDeal, _) => match self.deal() {
                Ok(()) => true,
                Err(err) => {
                    tracing::error!(table_id = %self.id, error = %err, "auto deal failed");
                    false
                }
            },
            (_, None) => false,
        }
    }

    fn deal(&mut self) -> Result<(), RuntimeError> {
        let stacks_before: Vec<u32> = self.state.seats.iter().map(|s| s.stack).collect();
        let events = self.state.start_hand(self.rng.as_mut())?;
        tracing::info!(
            table_id = %self.id,
            hand_id = self.state.hand_id,
            button = ?self.state.button_index,
            "hand started"
        );
        self.publish(events, Some(stacks_before), false);
        Ok(())
    }

    /// Forced path: logged and announced as such so hosts can tell a timer
    /// made the move. Falls back to check or fold if the preferred action is
    /// refused.
    fn force(&mut self, seat: usize, action: PlayerAction, reason: ForcedReason) -> bool {
        let hand_id = self.state.hand_id;
        tracing::warn!(
            table_id = %self.id,
            hand_id,
            seat,
            action = ?action,
            reason = ?reason,
            "forcing action"
        );
        self.sink.on_event(&TableEvent::ForcedAction {
            hand_id,
            seat,
            action,
            reason,
        });
        if self.apply(seat, action, true).is_ok() {
            return true;
        }
        let fallback = self.passive_action();
        match self.apply(seat, fallback, true) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(table_id = %self.id, hand_id, seat, error = %err, "forced action rejected");
                false
            }
        }
    }

    fn apply(&mut self, seat: usize, action: PlayerAction, forced: bool) -> Result<(), GameError> {
        let events = self.state.apply_action(seat, action)?;
        tracing::debug!(
            table_id = %self.id,
            hand_id = self.state.hand_id,
            seat,
            action = ?action,
            forced,
            "action applied"
        );
        self.publish(events, None, forced);
        Ok(())
    }

    fn decide(&self, seat: usize) -> PlayerAction {
        let preferred = self.strategy.get_action(&self.state, seat);
        match self.state.available_actions() {
            Ok(legal) => legalize(preferred, &legal),
            Err(_) => preferred,
        }
    }

    fn passive_action(&self) -> PlayerAction {
        match self.state.available_actions() {
            Ok(legal) if legal.contains(ActionKind::Check) => PlayerAction::Check,
            _ => PlayerAction::Fold,
        }
    }

    fn is_automated(&self, seat: usize) -> bool {
        self.state.seats.get(seat).is_some_and(|s| s.is_cpu) || (self.autoplay)(seat)
    }

    fn deals_again(&self) -> bool {
        !self.state.game_over && self.config.hand_limit.is_none_or(|limit| self.state.hand_id < limit)
    }

    fn ensure_live(&self) -> Result<(), RuntimeError> {
        if self.disposed {
            Err(RuntimeError::Disposed)
        } else {
            Ok(())
        }
    }

    /// Translate engine events for the sink, then send the state. A new
    /// hand gets its setup snapshot right after the blinds and hole cards.
    fn publish(&mut self, events: Vec<EngineEvent>, stacks_before: Option<Vec<u32>>, forced: bool) {
        let mut out = Vec::with_capacity(events.len() + 3);
        let mut setup_pending = stacks_before.is_some();
        let mut blinds = Vec::new();
        let mut history = None;
        for event in &events {
            let opens_hand = matches!(
                event,
                EngineEvent::HandStarted { .. }
                    | EngineEvent::BlindPosted { .. }
                    | EngineEvent::HoleCardsDealt { .. }
            );
            if setup_pending && !opens_hand {
                out.extend(self.setup_event(stacks_before.as_deref(), &blinds));
                setup_pending = false;
            }
            if let Some(record) = self.recorder.observe(event) {
                history = Some(record);
            }
            match event {
                EngineEvent::HandStarted {
                    hand_id,
                    button,
                    small_blind,
                    big_blind,
                    ..
                } => out.push(TableEvent::HandStart {
                    hand_id: *hand_id,
                    button: *button,
                    small_blind: *small_blind,
                    big_blind: *big_blind,
                }),
                EngineEvent::BlindPosted { seat, amount } => {
                    blinds.push((*seat, *amount));
                    out.push(TableEvent::PostBlind {
                        seat: *seat,
                        amount: *amount,
                    });
                }
                EngineEvent::HoleCardsDealt { .. } => {}
                EngineEvent::ActionApplied {
                    hand_id,
                    seat,
                    action,
                    amount_to_call,
                    street,
                    ..
                } => {
                    if forced {
                        self.recorder.mark_last_forced();
                    }
                    out.push(TableEvent::Action {
                        hand_id: *hand_id,
                        seat: *seat,
                        action: *action,
                        amount_to_call: *amount_to_call,
                        street: *street,
                    });
                }
                EngineEvent::StreetDealt {
                    hand_id,
                    street,
                    cards,
                } => out.push(TableEvent::Deal {
                    hand_id: *hand_id,
                    street: *street,
                    cards: cards.iter().map(|c| c.code()).collect(),
                }),
                EngineEvent::HandFinished { result, .. } => {
                    out.push(TableEvent::HandOver {
                        result: result.clone(),
                    });
                    if let Some(record) = history.take() {
                        out.push(TableEvent::HandHistory {
                            record: Box::new(record),
                        });
                    }
                }
            }
        }
        if setup_pending {
            out.extend(self.setup_event(stacks_before.as_deref(), &blinds));
        }
        let hand_over = events
            .iter()
            .any(|e| matches!(e, EngineEvent::HandFinished { .. }));
        if hand_over {
            tracing::info!(
                table_id = %self.id,
                hand_id = self.state.hand_id,
                game_over = self.state.game_over,
                "hand finished"
            );
            if !self.deals_again() {
                out.push(TableEvent::Finished {
                    hand_id: self.state.hand_id,
                    game_over: self.state.game_over,
                });
            }
        }
        out.push(TableEvent::State {
            state: Box::new(self.state.clone()),
        });
        for event in &out {
            self.sink.on_event(event);
        }
    }

    // Stacks are rebuilt from the pre-deal stacks and the posted blinds so
    // the snapshot is right even when the deal ran the board out at once.
    fn setup_event(&self, stacks_before: Option<&[u32]>, blinds: &[(usize, u32)]) -> Option<TableEvent> {
        let mut setup = self.state.setup_snapshot()?;
        if let Some(before) = stacks_before {
            let mut stacks = before.to_vec();
            for &(seat, amount) in blinds {
                if let Some(stack) = stacks.get_mut(seat) {
                    *stack = stack.saturating_sub(amount);
                }
            }
            setup.stacks = stacks;
        }
        if self.state.status != HandStatus::InHand {
            setup.first_to_act = None;
        }
        Some(TableEvent::HandSetup { setup })
    }
}

impl std::fmt::Debug for TableRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableRuntime")
            .field("id", &self.id)
            .field("hand_id", &self.state.hand_id)
            .field("status", &self.state.status)
            .field("strategy", &self.strategy.name())
            .field("timers", &self.scheduler.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn table(config: RuntimeConfig) -> (TableRuntime, RecordingSink) {
        let sink = RecordingSink::new();
        let runtime = TableRuntime::new(config, Arc::new(sink.clone())).unwrap();
        (runtime, sink)
    }

    fn cpu_table(seats: usize) -> (TableRuntime, RecordingSink) {
        table(RuntimeConfig {
            seed: Some(11),
            cpu_action_delay_ms: 100,
            watchdog_grace_ms: 400,
            auto_deal_delay_ms: 1_000,
            ..RuntimeConfig::all_cpu(seats)
        })
    }

    #[test]
    fn hand_start_events_come_in_contract_order() {
        let (mut rt, sink) = cpu_table(4);
        rt.begin_hand(Instant::now()).unwrap();
        assert_eq!(
            sink.names(),
            vec!["hand_start", "post_blind", "post_blind", "hand_setup", "state"]
        );
        match &sink.events()[3] {
            TableEvent::HandSetup { setup } => {
                assert_eq!(setup.hand_id, 1);
                assert_eq!(setup.first_to_act, rt.state().current_to_act);
                assert_eq!(setup.stacks.iter().map(|&s| s as u64).sum::<u64>(), 40_000 - 150);
            }
            other => panic!("expected hand_setup, got {:?}", other),
        }
    }

    #[test]
    fn cpu_turn_arms_action_and_watchdog() {
        let t0 = Instant::now();
        let (mut rt, _) = cpu_table(3);
        rt.begin_hand(t0).unwrap();
        assert_eq!(rt.scheduler().deadline_of(TimerPurpose::CpuAction), Some(t0 + ms(100)));
        assert_eq!(rt.scheduler().deadline_of(TimerPurpose::Watchdog), Some(t0 + ms(500)));
        assert!(!rt.scheduler().is_armed(TimerPurpose::PlayerAction));
    }

    #[test]
    fn cpu_timer_acts_once_and_rearms_for_the_next_seat() {
        let t0 = Instant::now();
        let (mut rt, sink) = cpu_table(3);
        rt.begin_hand(t0).unwrap();
        let first = rt.state().current_to_act;
        sink.take();

        assert_eq!(rt.fire_due(t0 + ms(100)), 1);
        assert_eq!(rt.state().action_count, 1);
        assert!(sink.names().contains(&"action"));
        assert!(!sink.names().contains(&"forced_action"));
        assert_ne!(rt.state().current_to_act, first);
        assert_eq!(
            rt.scheduler().deadline_of(TimerPurpose::CpuAction),
            Some(t0 + ms(200))
        );
    }

    #[test]
    fn watchdog_moves_the_hand_when_the_cpu_timer_is_lost() {
        let t0 = Instant::now();
        let (mut rt, sink) = cpu_table(3);
        rt.begin_hand(t0).unwrap();
        let seat = rt.state().current_to_act.unwrap();
        rt.scheduler.cancel(TimerPurpose::CpuAction);

        assert_eq!(rt.fire_due(t0 + ms(499)), 0);
        assert_eq!(rt.state().action_count, 0);

        assert_eq!(rt.fire_due(t0 + ms(500)), 1);
        assert_eq!(rt.state().action_count, 1);
        let forced = sink.events().into_iter().find_map(|e| match e {
            TableEvent::ForcedAction { seat, reason, .. } => Some((seat, reason)),
            _ => None,
        });
        assert_eq!(forced, Some((seat, ForcedReason::Watchdog)));
    }

    #[test]
    fn cpu_hands_never_stall_with_only_watchdogs() {
        let (mut rt, _) = cpu_table(4);
        let mut now = Instant::now();
        rt.begin_hand(now).unwrap();
        for _ in 0..2_000 {
            if rt.state().status != HandStatus::InHand {
                break;
            }
            rt.scheduler.cancel(TimerPurpose::CpuAction);
            now += ms(500);
            assert_eq!(rt.fire_due(now), 1, "stalled at {:?}", rt.state().current_to_act);
        }
        assert_eq!(rt.state().status, HandStatus::HandOver);
        assert_eq!(rt.state().chip_total(), 40_000);
    }

    #[test]
    fn human_turn_times_out_into_check_or_fold() {
        let t0 = Instant::now();
        let (mut rt, sink) = table(RuntimeConfig {
            seat_count: 2,
            cpu_seats: vec![],
            seed: Some(5),
            player_action_timeout_ms: Some(10_000),
            ..RuntimeConfig::default()
        });
        rt.begin_hand(t0).unwrap();
        let seat = rt.state().current_to_act.unwrap();
        assert_eq!(
            rt.scheduler().deadline_of(TimerPurpose::PlayerAction),
            Some(t0 + ms(10_000))
        );
        assert!(!rt.scheduler().is_armed(TimerPurpose::CpuAction));

        // heads-up button owes the rest of the small blind: no check, so fold
        rt.fire_due(t0 + ms(10_000));
        assert_eq!(rt.state().status, HandStatus::HandOver);
        let forced: Vec<_> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                TableEvent::ForcedAction { seat, action, reason, .. } => Some((seat, action, reason)),
                _ => None,
            })
            .collect();
        assert_eq!(forced, vec![(seat, PlayerAction::Fold, ForcedReason::Timeout)]);
        match sink.events().iter().find(|e| matches!(e, TableEvent::HandHistory { .. })) {
            Some(TableEvent::HandHistory { record }) => assert!(record.actions[0].forced),
            other => panic!("expected hand history, got {:?}", other),
        }
    }

    #[test]
    fn stale_timer_does_not_act_after_a_host_action() {
        let t0 = Instant::now();
        let (mut rt, _) = table(RuntimeConfig {
            seat_count: 2,
            cpu_seats: vec![],
            seed: Some(5),
            player_action_timeout_ms: Some(1_000),
            ..RuntimeConfig::default()
        });
        rt.begin_hand(t0).unwrap();
        let stale = TurnKey::of(rt.state());
        let seat = rt.state().current_to_act.unwrap();
        rt.act(seat, PlayerAction::Call, t0 + ms(10)).unwrap();

        // put the pre-call timeout back: its key no longer matches
        rt.scheduler.clear();
        rt.scheduler.arm(TimerPurpose::PlayerAction, t0 + ms(1_000), stale);
        let before = rt.state().clone();
        assert_eq!(rt.fire_due(t0 + ms(1_000)), 0);
        assert_eq!(rt.state(), &before);
    }

    #[test]
    fn hand_over_schedules_the_next_deal() {
        let t0 = Instant::now();
        let (mut rt, _) = table(RuntimeConfig {
            seat_count: 2,
            cpu_seats: vec![],
            seed: Some(5),
            auto_deal_delay_ms: 2_000,
            ..RuntimeConfig::default()
        });
        rt.begin_hand(t0).unwrap();
        let seat = rt.state().current_to_act.unwrap();
        rt.act(seat, PlayerAction::Fold, t0).unwrap();
        assert_eq!(rt.scheduler().deadline_of(TimerPurpose::AutoDeal), Some(t0 + ms(2_000)));

        assert_eq!(rt.fire_due(t0 + ms(2_000)), 1);
        assert_eq!(rt.state().hand_id, 2);
        assert_eq!(rt.state().status, HandStatus::InHand);
    }

    #[test]
    fn hand_limit_stops_auto_deal_and_reports_finished() {
        let (mut rt, sink) = table(RuntimeConfig {
            seed: Some(2),
            hand_limit: Some(1),
            ..RuntimeConfig::all_cpu(2)
        });
        let mut now = Instant::now();
        rt.begin_hand(now).unwrap();
        while let Some(deadline) = rt.next_deadline() {
            now = now.max(deadline);
            rt.fire_due(now);
        }
        assert_eq!(rt.state().hand_id, 1);
        assert_eq!(rt.state().status, HandStatus::HandOver);
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, TableEvent::Finished { hand_id: 1, .. })));
    }

    #[test]
    fn autoplay_policy_turns_a_human_seat_into_a_cpu_turn() {
        let t0 = Instant::now();
        let (mut rt, _) = table(RuntimeConfig {
            seat_count: 2,
            cpu_seats: vec![],
            seed: Some(5),
            ..RuntimeConfig::default()
        });
        rt.begin_hand(t0).unwrap();
        assert!(rt.scheduler().is_armed(TimerPurpose::PlayerAction));

        rt.set_autoplay(Box::new(|_| true), t0).unwrap();
        assert!(rt.scheduler().is_armed(TimerPurpose::CpuAction));
        assert!(rt.scheduler().is_armed(TimerPurpose::Watchdog));
        assert!(!rt.scheduler().is_armed(TimerPurpose::PlayerAction));
    }

    #[test]
    fn seat_flag_toggle_rearms_and_emits_state() {
        let t0 = Instant::now();
        let (mut rt, sink) = table(RuntimeConfig {
            seat_count: 2,
            cpu_seats: vec![],
            seed: Some(5),
            ..RuntimeConfig::default()
        });
        rt.begin_hand(t0).unwrap();
        let seat = rt.state().current_to_act.unwrap();
        sink.take();
        rt.set_seat_cpu(seat, true, t0).unwrap();
        assert_eq!(sink.names(), vec!["state"]);
        assert!(rt.scheduler().is_armed(TimerPurpose::CpuAction));
    }

    #[test]
    fn rejected_host_action_changes_nothing() {
        let t0 = Instant::now();
        let (mut rt, sink) = table(RuntimeConfig {
            seat_count: 3,
            cpu_seats: vec![],
            seed: Some(5),
            ..RuntimeConfig::default()
        });
        rt.begin_hand(t0).unwrap();
        let before = rt.state().clone();
        let wrong = (rt.state().current_to_act.unwrap() + 1) % 3;
        sink.take();

        let err = rt.act(wrong, PlayerAction::Call, t0).unwrap_err();
        assert!(matches!(err, RuntimeError::Game(GameError::InvalidActor { .. })));
        assert!(err.is_rejection());
        assert_eq!(rt.state(), &before);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn nothing_fires_after_dispose() {
        let t0 = Instant::now();
        let (mut rt, sink) = cpu_table(3);
        rt.begin_hand(t0).unwrap();
        rt.dispose();
        sink.take();

        assert!(rt.scheduler().is_empty());
        assert_eq!(rt.fire_due(t0 + ms(60_000)), 0);
        rt.rearm(t0);
        assert!(rt.scheduler().is_empty());
        assert_eq!(rt.begin_hand(t0), Err(RuntimeError::Disposed));
        assert!(sink.events().is_empty());
    }

    struct Stubborn;

    impl AIOpponent for Stubborn {
        fn get_action(&self, _state: &TableState, _seat: usize) -> PlayerAction {
            PlayerAction::Bet(0)
        }

        fn name(&self) -> &str {
            "Stubborn"
        }
    }

    #[test]
    fn illegal_strategy_output_is_legalized() {
        let t0 = Instant::now();
        let (rt, _) = cpu_table(3);
        let mut rt = rt.with_strategy(Box::new(Stubborn));
        rt.begin_hand(t0).unwrap();
        assert_eq!(rt.fire_due(t0 + ms(100)), 1);
        assert_eq!(rt.state().action_count, 1);
    }
}
