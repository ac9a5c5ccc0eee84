// Positional scarcity detection.
//
// For each considered position, compares the best player available right now
// against the best player likely to still be there after the next window of
// picks. A steep drop between the two means the position is about to fall off
// a value cliff, and the best-now player gets flagged so the user can see the
// urgency on the board.

use std::collections::HashMap;

use serde::Deserialize;

use crate::pool::{Player, PlayerId, Position};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunables for the scarcity scan. Fixed at engine construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScarcityConfig {
    /// How many upcoming picks count as "soon" when looking for survivors.
    pub window_picks: u32,
    /// Relative margin a position's drop must hold over the next-largest drop
    /// to qualify (0.04 = 4%).
    pub superiority_pct: f64,
    /// Absolute VOR drop floor; smaller drops are never flagged.
    pub min_abs_drop: f64,
    /// Maximum number of positions flagged at once.
    pub top_k_positions: usize,
    /// Positions included in the scan. K and DEF are excluded by default:
    /// their replacement value is nearly flat, so drops there are noise.
    pub considered_positions: Vec<Position>,
}

impl Default for ScarcityConfig {
    fn default() -> Self {
        ScarcityConfig {
            window_picks: 30,
            superiority_pct: 0.04,
            min_abs_drop: 1.0,
            top_k_positions: 3,
            considered_positions: vec![
                Position::Quarterback,
                Position::RunningBack,
                Position::WideReceiver,
                Position::TightEnd,
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Why a player was flagged: their position and the VOR cliff behind them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DangerFlag {
    pub position: Position,
    /// VOR lost if the user waits past the look-ahead window.
    pub drop: f64,
}

/// Per-player danger flags for one availability snapshot. Valid only until
/// the draft state changes; the engine recomputes it on every mutation.
#[derive(Debug, Clone, Default)]
pub struct ScarcityReport {
    flags: HashMap<PlayerId, DangerFlag>,
}

impl ScarcityReport {
    /// Whether this player is the flagged cliff-edge player at their position.
    pub fn is_danger(&self, id: PlayerId) -> bool {
        self.flags.contains_key(&id)
    }

    /// The flag details for a player, if flagged.
    pub fn flag(&self, id: PlayerId) -> Option<&DangerFlag> {
        self.flags.get(&id)
    }

    /// All flagged players.
    pub fn flags(&self) -> &HashMap<PlayerId, DangerFlag> {
        &self.flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// One position's drop measurement, before selection.
#[derive(Debug, Clone)]
struct PositionDrop {
    best_now: PlayerId,
    drop: f64,
    position: Position,
}

/// Compute the scarcity report for the current availability snapshot.
///
/// Per considered position with at least two available players:
/// `best_now` = max-VOR available player; `best_later` = max VOR among players
/// at that position whose adp exceeds `current_pick + window_picks` (0.0 when
/// nobody survives the window); `drop = max(0, best_now.vor - best_later)`.
/// A position with a single available player gets `drop = 0`: with no later
/// player to compare against, there is no cliff to measure.
///
/// Selection then walks positions in descending drop order, accepting up to
/// `top_k_positions` candidates. A candidate must clear `min_abs_drop`, and
/// unless it is the final candidate it must also exceed the next-largest drop
/// by `superiority_pct`. The walk stops at the first failure: once a position
/// misses its margin, no smaller-drop position is considered.
pub fn compute_scarcity(
    available: &[&Player],
    current_pick: u32,
    config: &ScarcityConfig,
) -> ScarcityReport {
    let horizon = (current_pick + config.window_picks) as f64;
    let mut drops: Vec<PositionDrop> = Vec::new();

    for &pos in &config.considered_positions {
        let at_pos: Vec<&&Player> = available.iter().filter(|p| p.position == pos).collect();
        let Some(best_now) = at_pos
            .iter()
            .max_by(|a, b| a.vor.total_cmp(&b.vor))
        else {
            continue;
        };

        let drop = if at_pos.len() < 2 {
            0.0
        } else {
            // No survivor past the horizon means best_later is 0; a surviving
            // negative-VOR player anchors it below zero and widens the drop.
            let best_later = at_pos
                .iter()
                .filter(|p| p.adp > horizon)
                .map(|p| p.vor)
                .max_by(f64::total_cmp)
                .unwrap_or(0.0);
            (best_now.vor - best_later).max(0.0)
        };

        drops.push(PositionDrop {
            best_now: best_now.id,
            drop,
            position: pos,
        });
    }

    drops.sort_by(|a, b| b.drop.total_cmp(&a.drop));

    let mut report = ScarcityReport::default();
    for (i, candidate) in drops.iter().enumerate() {
        if report.len() >= config.top_k_positions {
            break;
        }

        let passes = candidate.drop >= config.min_abs_drop
            && match drops.get(i + 1) {
                // Against remaining candidates: must beat the next-largest
                // drop by the relative margin.
                Some(next) => candidate.drop >= (1.0 + config.superiority_pct) * next.drop,
                // Last candidate standing: the absolute floor alone decides.
                None => true,
            };

        if !passes {
            break;
        }

        report.flags.insert(
            candidate.best_now,
            DangerFlag {
                position: candidate.position,
                drop: candidate.drop,
            },
        );
    }

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
