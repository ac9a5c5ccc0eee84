// The visible board: filter, sort, and search over available players.
//
// A fixed pipeline (filter by position category, then stable sort, then
// free-text search) plus the steal predicate that marks players who fell
// past their consensus draft slot.

use serde::Deserialize;

use crate::pool::{Player, Position};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Board tunables. Fixed at engine construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// How many picks past a player's adp make them a steal.
    pub steal_discount_picks: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            steal_discount_picks: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline parameters
// ---------------------------------------------------------------------------

/// Position category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFilter {
    /// Everything passes.
    All,
    /// RB, WR, and TE (flex-eligible).
    Flex,
    /// Exact position match.
    At(Position),
}

impl PositionFilter {
    pub fn matches(&self, position: Position) -> bool {
        match self {
            PositionFilter::All => true,
            PositionFilter::Flex => position.is_flex(),
            PositionFilter::At(pos) => position == *pos,
        }
    }
}

/// Sort key for the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// Ascending: lower consensus draft slot first.
    Adp,
    /// Descending: higher value first.
    Vor,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Apply the board pipeline to an availability snapshot: filter, then a
/// stable sort (ties keep input order), then case-insensitive substring
/// search over name, team, and position. Empty query passes everything.
pub fn visible_players<'a>(
    available: &[&'a Player],
    filter: PositionFilter,
    sort: SortBy,
    query: &str,
) -> Vec<&'a Player> {
    let mut list: Vec<&Player> = available
        .iter()
        .copied()
        .filter(|p| filter.matches(p.position))
        .collect();

    match sort {
        SortBy::Adp => list.sort_by(|a, b| a.adp.total_cmp(&b.adp)),
        SortBy::Vor => list.sort_by(|a, b| b.vor.total_cmp(&a.vor)),
    }

    let query = query.trim().to_lowercase();
    if !query.is_empty() {
        list.retain(|p| {
            p.name.to_lowercase().contains(&query)
                || p.team.to_lowercase().contains(&query)
                || p.position.display_str().to_lowercase().contains(&query)
        });
    }

    list
}

/// Whether a player's consensus slot has already passed by at least the
/// configured discount: `current_pick - adp >= steal_discount_picks`.
pub fn is_steal(player: &Player, current_pick: u32, config: &BoardConfig) -> bool {
    current_pick as f64 - player.adp >= config.steal_discount_picks as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
