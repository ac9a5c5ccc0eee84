// Bye-week clustering for the user's drafted players.
//
// Groups the `Me` roster by bye week so the display layer can surface weeks
// where too many starters sit out together.

use std::collections::BTreeMap;

use crate::draft::{DraftState, Owner};
use crate::pool::{Player, PlayerPool};

/// More than this many players sharing a bye week is a scheduling conflict.
pub const BYE_CONFLICT_THRESHOLD: usize = 2;

/// Group all players drafted by `Me` by bye week, ordered by week.
///
/// Reads the pool directly (not the availability view): drafted players are
/// by definition unavailable. Players within a week keep draft order.
pub fn bye_week_groups<'a>(
    pool: &'a PlayerPool,
    state: &DraftState,
) -> BTreeMap<u8, Vec<&'a Player>> {
    let mut groups: BTreeMap<u8, Vec<&Player>> = BTreeMap::new();
    for pick in state.picks() {
        if pick.owner != Owner::Me {
            continue;
        }
        if let Some(player) = pool.player(pick.player_id) {
            groups.entry(player.bye).or_default().push(player);
        }
    }
    groups
}

/// Whether a week's player count signals a scheduling conflict.
pub fn is_conflict(count: usize) -> bool {
    count > BYE_CONFLICT_THRESHOLD
}
