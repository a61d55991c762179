//! Turn outcomes and the journal of recent ones.

use std::collections::VecDeque;

use super::state::{MatchResult, Side};
use crate::tone::{MelodySelection, Tone};
use crate::weather::PowerUpKind;

/// Everything a resolved turn did, for the presentation layer to animate.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub side: Side,
    /// The selection as submitted.
    pub selection: MelodySelection,
    /// The pitch actually played (differs under Musical Echo).
    pub pitch: Tone,
    /// Tier after power-ups, weather, and the perfect-harmony gate.
    pub harmony_tier: u8,
    pub harmony: u32,
    /// Damage computed for the hit, before the health floor.
    pub damage_dealt: u32,
    /// Heal awarded to the acting side, before the health cap.
    pub heal_applied: u32,
    pub stun_applied: bool,
    pub combo_after: u32,
    pub score_delta: u32,
    pub finisher: bool,
    /// A perfect harmony landed.
    pub critical: bool,
    /// A perfect harmony was refused by quota or cooldown.
    pub perfect_blocked: bool,
    pub echoed: bool,
    pub power_up_granted: Option<PowerUpKind>,
    pub terminal: Option<MatchResult>,
}

/// What happened on a turn, resolved or skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalEntry {
    Resolved(TurnOutcome),
    StunSkipped { side: Side, turn_number: u32 },
}

impl JournalEntry {
    pub fn side(&self) -> Side {
        match self {
            JournalEntry::Resolved(outcome) => outcome.side,
            JournalEntry::StunSkipped { side, .. } => *side,
        }
    }
}

/// Bounded ring buffer of recent turns, oldest evicted first.
#[derive(Debug, Clone)]
pub struct OutcomeJournal {
    entries: VecDeque<JournalEntry>,
    capacity: usize,
}

impl OutcomeJournal {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: JournalEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// The `n` most recent entries, newest last.
    pub fn recent(&self, n: usize) -> Vec<&JournalEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).collect()
    }

    pub fn last(&self) -> Option<&JournalEntry> {
        self.entries.back()
    }

    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
