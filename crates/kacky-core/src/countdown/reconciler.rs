use std::collections::HashMap;

use tracing::debug;

use crate::roster::{ServerId, ServerSnapshot};

/// Lifecycle of a [`Reconciler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No snapshot has arrived yet. Nothing ticks.
    Empty,
    /// Slots mirror the latest snapshot and tick every period.
    Active,
    /// Torn down. Every further call is a silent no-op.
    Stopped,
}

/// One countdown, index-aligned with the snapshot it was seeded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub server_id: ServerId,
    pub remaining: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReseedOutcome {
    /// First snapshot: the caller should start ticking.
    Armed,
    /// Replaced the slots of an already ticking reconciler.
    Reseeded,
    /// Arrived after teardown and was ignored.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ticked { decremented: usize },
    /// No snapshot yet.
    Idle,
    Discarded,
}

/// Keeps the per-server countdowns between authoritative snapshots.
///
/// Every snapshot replaces all slots wholesale with `remaining_secs +
/// fixed_offset`, in the snapshot's own order. Between snapshots each
/// positive slot loses one second per tick and stops at zero. Slots are
/// only reindexed by the next snapshot; there is no identity diffing.
///
/// The displayed value is the raw slot. The offset is applied once, when
/// the slot is seeded.
#[derive(Debug)]
pub struct Reconciler {
    phase: Phase,
    slots: Vec<Slot>,
    by_id: HashMap<ServerId, usize>,
    fixed_offset: u64,
    revision: u64,
}

impl Reconciler {
    pub fn new(fixed_offset: u64) -> Self {
        Self {
            phase: Phase::Empty,
            slots: Vec::new(),
            by_id: HashMap::new(),
            fixed_offset,
            revision: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn fixed_offset(&self) -> u64 {
        self.fixed_offset
    }

    /// Number of mutations applied so far. Constant once stopped.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Hard reseed from an authoritative snapshot.
    pub fn on_snapshot(&mut self, servers: &[ServerSnapshot]) -> ReseedOutcome {
        let outcome = match self.phase {
            Phase::Stopped => {
                debug!(event = "core.countdown.snapshot_discarded");
                return ReseedOutcome::Discarded;
            }
            Phase::Empty => ReseedOutcome::Armed,
            Phase::Active => ReseedOutcome::Reseeded,
        };

        self.slots = servers
            .iter()
            .map(|server| Slot {
                server_id: server.server_id.clone(),
                remaining: server.remaining_secs.saturating_add(self.fixed_offset),
            })
            .collect();

        // First occurrence wins if the backend ever repeats an id
        self.by_id.clear();
        for (index, slot) in self.slots.iter().enumerate() {
            self.by_id.entry(slot.server_id.clone()).or_insert(index);
        }

        self.phase = Phase::Active;
        self.revision += 1;

        debug!(
            event = "core.countdown.reseeded",
            slot_count = self.slots.len(),
            revision = self.revision,
        );

        outcome
    }

    /// Advance every positive slot by one second.
    pub fn tick(&mut self) -> TickOutcome {
        match self.phase {
            Phase::Stopped => return TickOutcome::Discarded,
            Phase::Empty => return TickOutcome::Idle,
            Phase::Active => {}
        }

        let mut decremented = 0;
        for slot in self.slots.iter_mut().filter(|slot| slot.remaining > 0) {
            slot.remaining -= 1;
            decremented += 1;
        }

        if decremented > 0 {
            self.revision += 1;
        }

        TickOutcome::Ticked { decremented }
    }

    pub fn read(&self, index: usize) -> Option<u64> {
        self.slots.get(index).map(|slot| slot.remaining)
    }

    pub fn read_by_id(&self, server_id: &ServerId) -> Option<u64> {
        self.by_id
            .get(server_id)
            .and_then(|&index| self.read(index))
    }

    /// Read the slot at `index`, falling back to the id when the slot there
    /// belongs to a different server.
    pub fn read_for(&self, index: usize, server_id: &ServerId) -> Option<u64> {
        match self.slots.get(index) {
            Some(slot) if &slot.server_id == server_id => Some(slot.remaining),
            _ => self.read_by_id(server_id),
        }
    }

    /// Seconds to show for the slot at `index`; zero for unknown slots.
    pub fn display_seconds(&self, index: usize) -> u64 {
        self.read(index).unwrap_or(0)
    }

    /// Stop for good. Returns true only for the call that stopped it.
    pub fn teardown(&mut self) -> bool {
        if self.phase == Phase::Stopped {
            return false;
        }
        self.phase = Phase::Stopped;
        self.slots.clear();
        self.by_id.clear();
        debug!(event = "core.countdown.torn_down", revision = self.revision);
        true
    }
}
