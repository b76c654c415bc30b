mod board;
mod board_set;
mod config;
mod draw;
mod game_state;
mod score;
mod submission;

pub use board::{Board, BoardError};
pub use board_set::{BoardId, BoardSet, BoardSlot, Evaluation};
pub use config::{ConfigError, GameConfig};
pub use draw::{DrawError, DrawSequence, DrawnNumbers, Number};
pub use game_state::{DrawOutcome, GameController, GameError, GameState, SubmitError};
pub use score::{Score, ScoreCalculator, UnmarkedSum};
pub use submission::{
    NameError, Notification, PlayerName, ScoreSubmission, SubmissionOutcome, MIN_NAME_LEN,
};
