//! Hand history: records built from [`EngineEvent`]s and written as JSONL.

use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::engine::EngineEvent;
use crate::game::{HandResult, Street};
use crate::player::PlayerAction;

/// One applied action, as it appears in the history.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat: usize,
    pub street: Street,
    pub action: PlayerAction,
    pub chips: u32,
    #[serde(default)]
    pub forced: bool,
}

/// Everything needed to audit or replay one hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// Log-scoped id (format: YYYYMMDD-NNNNNN), assigned when written.
    #[serde(default)]
    pub record_id: Option<String>,
    /// Table hand counter.
    pub hand_id: u64,
    /// Table seed; with the action list this reproduces the hand.
    pub seed: Option<u64>,
    pub button: usize,
    pub blinds: (u32, u32),
    pub hole_cards: Vec<(usize, Vec<Card>)>,
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    pub result: Option<HandResult>,
    /// RFC3339, filled in by the logger when missing.
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Folds the event stream of a table into [`HandRecord`]s.
#[derive(Debug, Default)]
pub struct HandRecorder {
    seed: Option<u64>,
    current: Option<HandRecord>,
}

impl HandRecorder {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            current: None,
        }
    }

    /// Feed one event; returns the finished record on `HandFinished`.
    pub fn observe(&mut self, event: &EngineEvent) -> Option<HandRecord> {
        match event {
            EngineEvent::HandStarted {
                hand_id,
                button,
                small_blind,
                big_blind,
                ..
            } => {
                self.current = Some(HandRecord {
                    record_id: None,
                    hand_id: *hand_id,
                    seed: self.seed,
                    button: *button,
                    blinds: (*small_blind, *big_blind),
                    hole_cards: Vec::new(),
                    actions: Vec::new(),
                    board: Vec::new(),
                    result: None,
                    ts: None,
                    meta: None,
                });
                None
            }
            EngineEvent::BlindPosted { .. } => None,
            EngineEvent::HoleCardsDealt { seat, cards } => {
                if let Some(rec) = self.current.as_mut() {
                    rec.hole_cards.push((*seat, cards.clone()));
                }
                None
            }
            EngineEvent::ActionApplied {
                seat,
                action,
                chips,
                street,
                ..
            } => {
                if let Some(rec) = self.current.as_mut() {
                    rec.actions.push(ActionRecord {
                        seat: *seat,
                        street: *street,
                        action: *action,
                        chips: *chips,
                        forced: false,
                    });
                }
                None
            }
            EngineEvent::StreetDealt { cards, .. } => {
                if let Some(rec) = self.current.as_mut() {
                    rec.board.extend_from_slice(cards);
                }
                None
            }
            EngineEvent::HandFinished { result, .. } => {
                let mut rec = self.current.take()?;
                rec.result = Some(result.clone());
                Some(rec)
            }
        }
    }

    /// Flag the most recent action as forced by a timer.
    pub fn mark_last_forced(&mut self) {
        if let Some(last) = self.current.as_mut().and_then(|r| r.actions.last_mut()) {
            last.forced = true;
        }
    }
}

pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger that only hands out ids, for tests.
    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.record_id.is_none() {
            rec.record_id = Some(self.next_id());
        }
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}

/// Read back a JSONL history, skipping blank lines.
pub fn read_records<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<HandRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line).map_err(std::io::Error::other)?);
    }
    Ok(records)
}
