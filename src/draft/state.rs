// Draft state: who has been taken, by whom, in what order.
//
// This is the only mutable state in the engine. Every derivation (availability,
// scarcity, board views, bye-week groups) is a pure function of the pool plus a
// snapshot of this state, so mutation goes through exactly two operations:
// `draft_player` and `reset`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pool::{Player, PlayerId, PlayerPool};

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// Whose roster a pick belongs to. Only `Me` picks count toward bye-week
/// analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    #[serde(rename = "me")]
    Me,
    #[serde(rename = "other")]
    Other,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A rejected draft action. The state is left untouched in every case, so
/// `current_pick` tracks exactly one increment per successful pick.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("player {0} is not in the pool")]
    UnknownPlayer(PlayerId),

    #[error("player {0} has already been drafted")]
    AlreadyDrafted(PlayerId),
}

// ---------------------------------------------------------------------------
// DraftState
// ---------------------------------------------------------------------------

/// A single recorded pick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPick {
    /// Sequential pick number (1-indexed).
    pub pick_number: u32,
    /// The drafted player.
    pub player_id: PlayerId,
    /// Whose roster the player went to.
    pub owner: Owner,
}

/// Mutable record of draft progress: an insertion-ordered pick log plus an
/// id -> owner index for membership checks.
#[derive(Debug, Clone)]
pub struct DraftState {
    picks: Vec<DraftPick>,
    owners: HashMap<PlayerId, Owner>,
    picking_for: Owner,
    /// Bumped on every successful mutation; lets derived views key their
    /// caches on the exact state they were computed from.
    version: u64,
}

impl Default for DraftState {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftState {
    /// Create an empty draft: no picks, picking for `Me`.
    pub fn new() -> Self {
        DraftState {
            picks: Vec::new(),
            owners: HashMap::new(),
            picking_for: Owner::Me,
            version: 0,
        }
    }

    /// Record that `id` was drafted by `owner`.
    ///
    /// Rejected (with no state change) when the id is unknown to the pool or
    /// already drafted. On success the turn cursor advances asymmetrically:
    /// a `Me` pick flips `picking_for` to `Other`; an `Other` pick leaves it
    /// alone, since other managers' picks are entered manually and say nothing
    /// about whose turn comes next for the user.
    pub fn draft_player(
        &mut self,
        pool: &PlayerPool,
        id: PlayerId,
        owner: Owner,
    ) -> Result<(), DraftError> {
        if !pool.contains(id) {
            return Err(DraftError::UnknownPlayer(id));
        }
        if self.owners.contains_key(&id) {
            return Err(DraftError::AlreadyDrafted(id));
        }

        let pick_number = self.current_pick();
        self.picks.push(DraftPick {
            pick_number,
            player_id: id,
            owner,
        });
        self.owners.insert(id, owner);
        if owner == Owner::Me {
            self.picking_for = Owner::Other;
        }
        self.version += 1;

        debug!("pick {} recorded: player {} -> {:?}", pick_number, id, owner);
        Ok(())
    }

    /// Draft `id` for whoever the turn cursor currently points at.
    pub fn draft_for_current(
        &mut self,
        pool: &PlayerPool,
        id: PlayerId,
    ) -> Result<(), DraftError> {
        self.draft_player(pool, id, self.picking_for)
    }

    /// Clear all picks and return to the initial state: `current_pick` = 1,
    /// picking for `Me`. Available from any state.
    pub fn reset(&mut self) {
        self.picks.clear();
        self.owners.clear();
        self.picking_for = Owner::Me;
        self.version += 1;
        debug!("draft reset");
    }

    /// The 1-indexed number of the next pick.
    pub fn current_pick(&self) -> u32 {
        self.picks.len() as u32 + 1
    }

    /// Who the next manual pick defaults to.
    pub fn picking_for(&self) -> Owner {
        self.picking_for
    }

    /// Override the turn cursor (the UI's "picking for" toggle).
    pub fn set_picking_for(&mut self, owner: Owner) {
        self.picking_for = owner;
    }

    /// Whether the given player has been drafted.
    pub fn is_drafted(&self, id: PlayerId) -> bool {
        self.owners.contains_key(&id)
    }

    /// Who drafted the given player, if anyone.
    pub fn owner_of(&self, id: PlayerId) -> Option<Owner> {
        self.owners.get(&id).copied()
    }

    /// All recorded picks, in draft order.
    pub fn picks(&self) -> &[DraftPick] {
        &self.picks
    }

    /// Monotonic counter identifying this exact state snapshot.
    pub fn version(&self) -> u64 {
        self.version
    }
}

// ---------------------------------------------------------------------------
// Availability View
// ---------------------------------------------------------------------------

/// Pool minus drafted players, in pool order. Pure; recompute after any
/// draft-state change.
pub fn available_players<'a>(pool: &'a PlayerPool, state: &DraftState) -> Vec<&'a Player> {
    pool.players()
        .iter()
        .filter(|p| !state.is_drafted(p.id))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
