// Draft progress tracking.

pub mod state;

pub use state::{available_players, DraftError, DraftPick, DraftState, Owner};
