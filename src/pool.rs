// Player pool loading and the core data model.
//
// The pool is the ground truth the whole engine reads from: loaded once at
// startup, never mutated. Two on-disk formats are supported: the front end's
// players.json (array of player records) and the stats backend's flat CSV
// export (header: id,name,team,position,adp,vor,ppg,bye).

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Football positions a pooled player can carry. Closed set: anything else
/// in the input data is a schema violation and fails the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Quarterback,
    #[serde(rename = "RB")]
    RunningBack,
    #[serde(rename = "WR")]
    WideReceiver,
    #[serde(rename = "TE")]
    TightEnd,
    #[serde(rename = "K")]
    Kicker,
    #[serde(rename = "DEF")]
    Defense,
}

/// All positions, in display order.
pub const ALL_POSITIONS: &[Position] = &[
    Position::Quarterback,
    Position::RunningBack,
    Position::WideReceiver,
    Position::TightEnd,
    Position::Kicker,
    Position::Defense,
];

impl Position {
    /// Parse a position abbreviation ("QB", "rb", ...) into a Position.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" => Some(Position::Kicker),
            "DEF" | "DST" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display abbreviation for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DEF",
        }
    }

    /// Whether this position fills a FLEX slot (RB/WR/TE).
    pub fn is_flex(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }

    /// Deterministic ordering index for display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Quarterback => 0,
            Position::RunningBack => 1,
            Position::WideReceiver => 2,
            Position::TightEnd => 3,
            Position::Kicker => 4,
            Position::Defense => 5,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Unique numeric player identifier from the pool data.
pub type PlayerId = u32;

/// A single player record from the pool. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique id across the pool.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// NFL team abbreviation (e.g. "KC", "SF").
    pub team: String,
    /// Primary position.
    pub position: Position,
    /// Average draft position; lower = drafted earlier by consensus.
    pub adp: f64,
    /// Value over replacement; higher = more valuable vs a replacement-level
    /// player at the same position.
    pub vor: f64,
    /// Projected points per game (informational).
    pub ppg: f64,
    /// Week number of the player's team bye.
    pub bye: u8,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("failed to read pool file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("duplicate player id {id} ('{name}')")]
    DuplicateId { id: PlayerId, name: String },

    #[error("pool file {path} contains no players")]
    Empty { path: String },

    #[error("unrecognized pool file extension: {path} (expected .json or .csv)")]
    UnknownFormat { path: String },
}

// ---------------------------------------------------------------------------
// PlayerPool
// ---------------------------------------------------------------------------

/// The immutable, load-once collection of players.
#[derive(Debug, Clone)]
pub struct PlayerPool {
    players: Vec<Player>,
}

impl PlayerPool {
    /// Build a pool from already-parsed records, enforcing id uniqueness.
    pub fn new(players: Vec<Player>) -> Result<Self, PoolError> {
        let mut seen: HashSet<PlayerId> = HashSet::with_capacity(players.len());
        for p in &players {
            if !seen.insert(p.id) {
                return Err(PoolError::DuplicateId {
                    id: p.id,
                    name: p.name.clone(),
                });
            }
        }
        Ok(PlayerPool { players })
    }

    /// Load a pool from disk, dispatching on file extension.
    ///
    /// A transport or parse failure is surfaced as an error; it is never
    /// collapsed into an empty pool. A file that parses to zero players is
    /// also a load failure.
    pub fn load(path: &Path) -> Result<Self, PoolError> {
        let path_str = path.display().to_string();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let players = match ext.as_deref() {
            Some("json") => {
                let text = std::fs::read_to_string(path).map_err(|e| PoolError::Io {
                    path: path_str.clone(),
                    source: e,
                })?;
                serde_json::from_str::<Vec<Player>>(&text).map_err(|e| PoolError::Json {
                    path: path_str.clone(),
                    source: e,
                })?
            }
            Some("csv") => {
                let file = std::fs::File::open(path).map_err(|e| PoolError::Io {
                    path: path_str.clone(),
                    source: e,
                })?;
                load_csv_from_reader(file).map_err(|e| PoolError::Csv {
                    path: path_str.clone(),
                    source: e,
                })?
            }
            _ => return Err(PoolError::UnknownFormat { path: path_str }),
        };

        if players.is_empty() {
            return Err(PoolError::Empty { path: path_str });
        }

        debug!("loaded {} players from {}", players.len(), path_str);
        Self::new(players)
    }

    /// Look up a player by id.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Whether the pool contains the given id.
    pub fn contains(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// All players, in file order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CSV loading (reader-based, enables testing without temp files)
// ---------------------------------------------------------------------------

/// CSV row matching the stats backend's flat export. Position arrives as a
/// string and is validated through the Position serde enum.
#[derive(Debug, Deserialize)]
struct RawCsvPlayer {
    id: PlayerId,
    name: String,
    team: String,
    position: Position,
    adp: f64,
    vor: f64,
    ppg: f64,
    bye: u8,
}

fn load_csv_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawCsvPlayer>() {
        let raw = result?;
        players.push(Player {
            id: raw.id,
            name: raw.name.trim().to_string(),
            team: raw.team.trim().to_string(),
            position: raw.position,
            adp: raw.adp,
            vor: raw.vor,
            ppg: raw.ppg,
            bye: raw.bye,
        });
    }
    Ok(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_player(id: PlayerId, name: &str, position: Position) -> Player {
        Player {
            id,
            name: name.into(),
            team: "KC".into(),
            position,
            adp: id as f64,
            vor: 10.0,
            ppg: 15.0,
            bye: 9,
        }
    }

    #[test]
    fn from_str_pos_all_positions() {
        assert_eq!(Position::from_str_pos("QB"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("RB"), Some(Position::RunningBack));
        assert_eq!(Position::from_str_pos("WR"), Some(Position::WideReceiver));
        assert_eq!(Position::from_str_pos("TE"), Some(Position::TightEnd));
        assert_eq!(Position::from_str_pos("K"), Some(Position::Kicker));
        assert_eq!(Position::from_str_pos("DEF"), Some(Position::Defense));
    }

    #[test]
    fn from_str_pos_aliases_and_case() {
        assert_eq!(Position::from_str_pos("qb"), Some(Position::Quarterback));
        assert_eq!(Position::from_str_pos("DST"), Some(Position::Defense));
        assert_eq!(Position::from_str_pos("FB"), None);
        assert_eq!(Position::from_str_pos(""), None);
    }

    #[test]
    fn display_str_roundtrip() {
        for &pos in ALL_POSITIONS {
            assert_eq!(Position::from_str_pos(pos.display_str()), Some(pos));
        }
    }

    #[test]
    fn is_flex_covers_rb_wr_te_only() {
        assert!(Position::RunningBack.is_flex());
        assert!(Position::WideReceiver.is_flex());
        assert!(Position::TightEnd.is_flex());
        assert!(!Position::Quarterback.is_flex());
        assert!(!Position::Kicker.is_flex());
        assert!(!Position::Defense.is_flex());
    }

    #[test]
    fn pool_rejects_duplicate_ids() {
        let players = vec![
            make_player(1, "A", Position::Quarterback),
            make_player(2, "B", Position::RunningBack),
            make_player(1, "C", Position::WideReceiver),
        ];
        match PlayerPool::new(players) {
            Err(PoolError::DuplicateId { id, name }) => {
                assert_eq!(id, 1);
                assert_eq!(name, "C");
            }
            other => panic!("expected DuplicateId, got {:?}", other),
        }
    }

    #[test]
    fn pool_lookup_by_id() {
        let pool = PlayerPool::new(vec![
            make_player(1, "A", Position::Quarterback),
            make_player(7, "B", Position::RunningBack),
        ])
        .unwrap();
        assert_eq!(pool.player(7).unwrap().name, "B");
        assert!(pool.player(3).is_none());
        assert!(pool.contains(1));
        assert!(!pool.contains(99));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn pool_preserves_file_order() {
        let pool = PlayerPool::new(vec![
            make_player(5, "First", Position::Quarterback),
            make_player(2, "Second", Position::RunningBack),
            make_player(9, "Third", Position::TightEnd),
        ])
        .unwrap();
        let ids: Vec<PlayerId> = pool.players().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn json_parse_of_player_records() {
        let json = r#"[
            {"id":1,"name":"Pat Mahomes","team":"KC","position":"QB",
             "adp":18.2,"vor":42.5,"ppg":23.1,"bye":10},
            {"id":2,"name":"Bijan Robinson","team":"ATL","position":"RB",
             "adp":2.4,"vor":61.0,"ppg":19.8,"bye":5}
        ]"#;
        let players: Vec<Player> = serde_json::from_str(json).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].position, Position::Quarterback);
        assert_eq!(players[1].bye, 5);
    }

    #[test]
    fn json_rejects_unknown_position() {
        let json = r#"[{"id":1,"name":"X","team":"KC","position":"LB",
                        "adp":1.0,"vor":1.0,"ppg":1.0,"bye":9}]"#;
        assert!(serde_json::from_str::<Vec<Player>>(json).is_err());
    }

    #[test]
    fn csv_loader_parses_rows() {
        let csv = "id,name,team,position,adp,vor,ppg,bye\n\
                   1,Pat Mahomes,KC,QB,18.2,42.5,23.1,10\n\
                   2,Bijan Robinson,ATL,RB,2.4,61.0,19.8,5\n";
        let players = load_csv_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].name, "Pat Mahomes");
        assert_eq!(players[1].position, Position::RunningBack);
    }

    #[test]
    fn csv_loader_rejects_bad_position() {
        let csv = "id,name,team,position,adp,vor,ppg,bye\n\
                   1,Someone,KC,XX,18.2,42.5,23.1,10\n";
        assert!(load_csv_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn load_json_file_succeeds() {
        // cargo runs unit tests from the crate root, same as tests/.
        let pool = PlayerPool::load(Path::new("tests/fixtures/players.json")).unwrap();
        assert!(!pool.is_empty());
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let err = PlayerPool::load(Path::new("players.yaml")).unwrap_err();
        assert!(matches!(err, PoolError::UnknownFormat { .. }));
    }

    #[test]
    fn load_surfaces_missing_file() {
        let err = PlayerPool::load(Path::new("no/such/players.json")).unwrap_err();
        assert!(matches!(err, PoolError::Io { .. }));
    }
}
