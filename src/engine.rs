// Engine facade: the single-writer handle over pool, draft state, and config.
//
// All mutation and every derived view flows through this type. The scarcity
// report is the one derivation worth caching; it is memoized against the
// draft-state version counter so a report computed for an older snapshot can
// never be observed after a pick or reset.

use tracing::info;

use crate::analysis::board::{is_steal, visible_players, PositionFilter, SortBy};
use crate::analysis::byes::bye_week_groups;
use crate::analysis::scarcity::{compute_scarcity, ScarcityReport};
use crate::config::EngineConfig;
use crate::draft::{available_players, DraftError, DraftState, Owner};
use crate::pool::{Player, PlayerId, PlayerPool};

/// The draft recommendation engine.
pub struct DraftEngine {
    config: EngineConfig,
    pool: PlayerPool,
    state: DraftState,
    /// Scarcity report memoized as (state version, report).
    scarcity_cache: Option<(u64, ScarcityReport)>,
}

impl DraftEngine {
    /// Build an engine over a loaded pool. The pool is read-only from here on.
    pub fn new(config: EngineConfig, pool: PlayerPool) -> Self {
        info!("engine initialized with {} players", pool.len());
        DraftEngine {
            config,
            pool,
            state: DraftState::new(),
            scarcity_cache: None,
        }
    }

    // -- mutation ----------------------------------------------------------

    /// Record a pick for an explicit owner. Invalid actions are rejected with
    /// no state change.
    pub fn draft_player(&mut self, id: PlayerId, owner: Owner) -> Result<(), DraftError> {
        self.state.draft_player(&self.pool, id, owner)
    }

    /// Record a pick for whoever the turn cursor points at.
    pub fn draft_for_current(&mut self, id: PlayerId) -> Result<(), DraftError> {
        self.state.draft_for_current(&self.pool, id)
    }

    /// Draft the first player on the fully filtered, sorted, and searched
    /// board for the current picker. A no-op returning `None` when the board
    /// is empty.
    pub fn draft_first_match(
        &mut self,
        filter: PositionFilter,
        sort: SortBy,
        query: &str,
    ) -> Result<Option<PlayerId>, DraftError> {
        let Some(id) = self.visible(filter, sort, query).first().map(|p| p.id) else {
            return Ok(None);
        };
        self.state.draft_for_current(&self.pool, id)?;
        Ok(Some(id))
    }

    /// Clear the draft back to its initial state.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Set the turn cursor (the "picking for" toggle).
    pub fn set_picking_for(&mut self, owner: Owner) {
        self.state.set_picking_for(owner);
    }

    // -- derived views -----------------------------------------------------

    /// Undrafted players in pool order.
    pub fn available(&self) -> Vec<&Player> {
        available_players(&self.pool, &self.state)
    }

    /// The board view: availability run through filter, stable sort, and
    /// free-text search.
    pub fn visible(&self, filter: PositionFilter, sort: SortBy, query: &str) -> Vec<&Player> {
        visible_players(&self.available(), filter, sort, query)
    }

    /// The scarcity report for the current snapshot, recomputed only when
    /// the draft state has changed since the last call.
    pub fn scarcity(&mut self) -> &ScarcityReport {
        let version = self.state.version();
        if !matches!(&self.scarcity_cache, Some((v, _)) if *v == version) {
            let report = compute_scarcity(
                &available_players(&self.pool, &self.state),
                self.state.current_pick(),
                &self.config.scarcity,
            );
            self.scarcity_cache = Some((version, report));
        }
        &self.scarcity_cache.as_ref().unwrap().1
    }

    /// Whether a player has fallen far enough past their adp to be a steal.
    pub fn is_steal(&self, player: &Player) -> bool {
        is_steal(player, self.state.current_pick(), &self.config.board)
    }

    /// The user's drafted players grouped by bye week, ordered by week.
    pub fn bye_weeks(&self) -> std::collections::BTreeMap<u8, Vec<&Player>> {
        bye_week_groups(&self.pool, &self.state)
    }

    // -- accessors ---------------------------------------------------------

    pub fn pool(&self) -> &PlayerPool {
        &self.pool
    }

    pub fn state(&self) -> &DraftState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_pick(&self) -> u32 {
        self.state.current_pick()
    }

    pub fn picking_for(&self) -> Owner {
        self.state.picking_for()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Position;

    fn make_player(id: PlayerId, position: Position, adp: f64, vor: f64, bye: u8) -> Player {
        Player {
            id,
            name: format!("Player {id}"),
            team: "KC".into(),
            position,
            adp,
            vor,
            ppg: 15.0,
            bye,
        }
    }

    fn test_engine() -> DraftEngine {
        let pool = PlayerPool::new(vec![
            make_player(1, Position::Quarterback, 5.0, 20.0, 9),
            make_player(2, Position::Quarterback, 40.0, 8.0, 7),
            make_player(3, Position::RunningBack, 10.0, 18.0, 9),
            make_player(4, Position::RunningBack, 12.0, 16.0, 9),
            make_player(5, Position::WideReceiver, 2.0, 22.0, 12),
        ])
        .unwrap();
        DraftEngine::new(EngineConfig::default(), pool)
    }

    #[test]
    fn scarcity_memoized_until_state_changes() {
        let mut engine = test_engine();
        let first: Vec<PlayerId> = engine.scarcity().flags().keys().copied().collect();
        // Second call with no mutation serves the cached report.
        let version = engine.state().version();
        let second: Vec<PlayerId> = engine.scarcity().flags().keys().copied().collect();
        assert_eq!(engine.state().version(), version);
        let mut a = first.clone();
        let mut b = second;
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn scarcity_invalidated_by_pick() {
        let mut engine = test_engine();
        assert!(engine.scarcity().is_danger(1));

        // Drafting the flagged QB leaves a single QB: drop 0, flag gone.
        engine.draft_player(1, Owner::Other).unwrap();
        assert!(!engine.scarcity().is_danger(1));
        assert!(!engine.scarcity().is_danger(2));
    }

    #[test]
    fn scarcity_invalidated_by_reset() {
        let mut engine = test_engine();
        engine.draft_player(1, Owner::Other).unwrap();
        assert!(!engine.scarcity().is_danger(1));

        engine.reset();
        assert!(engine.scarcity().is_danger(1));
    }

    #[test]
    fn draft_first_match_takes_board_head() {
        let mut engine = test_engine();
        let drafted = engine
            .draft_first_match(PositionFilter::All, SortBy::Adp, "")
            .unwrap();
        // Lowest adp is player 5.
        assert_eq!(drafted, Some(5));
        assert!(engine.state().is_drafted(5));
        assert_eq!(engine.state().owner_of(5), Some(Owner::Me));
        // My pick flipped the cursor.
        assert_eq!(engine.picking_for(), Owner::Other);
    }

    #[test]
    fn draft_first_match_empty_board_is_noop() {
        let mut engine = test_engine();
        let before = engine.state().version();
        let drafted = engine
            .draft_first_match(PositionFilter::At(Position::Kicker), SortBy::Adp, "")
            .unwrap();
        assert_eq!(drafted, None);
        assert_eq!(engine.state().version(), before);
        assert_eq!(engine.current_pick(), 1);
    }

    #[test]
    fn draft_first_match_respects_query() {
        let mut engine = test_engine();
        let drafted = engine
            .draft_first_match(PositionFilter::All, SortBy::Vor, "player 3")
            .unwrap();
        assert_eq!(drafted, Some(3));
    }

    #[test]
    fn steal_uses_current_pick() {
        let mut engine = test_engine();
        let faller = make_player(9, Position::RunningBack, 4.0, 10.0, 9);
        assert!(!engine.is_steal(&faller)); // pick 1: 1 - 4 < 5

        // Exhaust the board to advance the pick counter.
        for id in [1, 2, 3, 4, 5] {
            engine.draft_player(id, Owner::Other).unwrap();
        }
        assert_eq!(engine.current_pick(), 6);
        // 6 - 4 = 2 < 5: still not a steal.
        assert!(!engine.is_steal(&faller));
        let closer = make_player(10, Position::RunningBack, 1.0, 10.0, 9);
        // 6 - 1 = 5 >= 5: steal.
        assert!(engine.is_steal(&closer));
    }

    #[test]
    fn bye_weeks_through_facade() {
        let mut engine = test_engine();
        engine.draft_player(3, Owner::Me).unwrap();
        engine.draft_player(4, Owner::Me).unwrap();
        let groups = engine.bye_weeks();
        assert_eq!(groups.get(&9).map(|v| v.len()), Some(2));
    }
}
