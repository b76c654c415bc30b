use crate::bingo::board_set::{BoardId, BoardSet, BoardSlot};
use crate::bingo::config::GameConfig;
use crate::bingo::draw::{DrawError, DrawnNumbers, Number};
use crate::bingo::score::{Score, ScoreCalculator, UnmarkedSum};
use crate::bingo::submission::{
    NameError, Notification, PlayerName, ScoreSubmission, SubmissionOutcome,
};
use crate::messages::{GameSnapshot, SlotView};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum GameError {
    #[error("The game has ended. Restart to play again")]
    GameEnded,
    #[error("Draw failed: {0}")]
    Draw(#[from] DrawError),
}

#[derive(Error, Debug, PartialEq)]
pub enum SubmitError {
    #[error("The game has not ended yet")]
    GameInProgress,
    #[error("The score has not been calculated yet")]
    NoScore,
    #[error("The score has already been submitted")]
    AlreadySubmitted,
    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum GameState {
    InProgress,
    Ended { winner: BoardId },
}

#[derive(Debug, PartialEq)]
pub enum DrawOutcome {
    Continue {
        number: Number,
        eliminated: Vec<BoardId>,
    },
    Ended {
        number: Number,
        winner: BoardId,
        score: Score,
    },
}

/// Drives a single game from the first draw to the final score.
#[derive(Debug)]
pub struct GameController<S: ScoreCalculator = UnmarkedSum> {
    config: GameConfig,
    drawn: DrawnNumbers,
    cursor: usize,
    boards: BoardSet,
    state: GameState,
    auto_draw: bool,
    score: Option<Score>,
    // Response payload of a successful score submission
    submission: Option<Value>,
    // Bumped on every restart
    generation: u64,
    calculator: S,
}

impl Default for GameController {
    fn default() -> Self {
        GameController::new(GameConfig::default())
    }
}

impl GameController {
    pub fn new(config: GameConfig) -> Self {
        GameController::with_calculator(config, UnmarkedSum)
    }
}

impl<S: ScoreCalculator> GameController<S> {
    pub fn with_calculator(config: GameConfig, calculator: S) -> Self {
        let boards = BoardSet::new(config.boards().to_vec());
        GameController {
            config,
            drawn: DrawnNumbers::new(),
            cursor: 0,
            boards,
            state: GameState::InProgress,
            auto_draw: false,
            score: None,
            submission: None,
            generation: 0,
            calculator,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn drawn(&self) -> &DrawnNumbers {
        &self.drawn
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn boards(&self) -> &BoardSet {
        &self.boards
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.state, GameState::Ended { .. })
    }

    pub fn is_auto_drawing(&self) -> bool {
        self.auto_draw
    }

    pub fn score(&self) -> Option<Score> {
        self.score
    }

    pub fn is_submitted(&self) -> bool {
        self.submission.is_some()
    }

    /// Identifies the current round of play. Work started before a restart
    /// carries an older generation and must not touch the new game.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn draw(&mut self) -> Result<DrawOutcome, GameError> {
        if self.is_ended() {
            return Err(GameError::GameEnded);
        }
        let number = self.config.draws().next_number(self.cursor)?;
        self.drawn.push(number);
        self.cursor += 1;

        let evaluation = self.boards.evaluate(&self.drawn);
        match evaluation.winner {
            Some(winner) => {
                let score = match &self.boards[winner] {
                    BoardSlot::Active(board) => {
                        self.calculator.compute_score(board, &self.drawn, number)
                    }
                    BoardSlot::Eliminated => {
                        panic!("{} was reported as the winner but is eliminated", winner)
                    }
                };
                self.state = GameState::Ended { winner };
                self.auto_draw = false;
                self.score = Some(score);
                Ok(DrawOutcome::Ended {
                    number,
                    winner,
                    score,
                })
            }
            None => Ok(DrawOutcome::Continue {
                number,
                eliminated: evaluation.eliminated,
            }),
        }
    }

    // Recomputes the score of the winning board from the current state
    pub fn compute_score(&self) -> Option<Score> {
        let GameState::Ended { winner } = self.state else {
            return None;
        };
        let board = self.boards.get(winner)?;
        let last_drawn = self.drawn.last()?;
        Some(
            self.calculator
                .compute_score(board, &self.drawn, last_drawn),
        )
    }

    pub fn start_auto_draw(&mut self) -> Result<(), GameError> {
        if self.is_ended() {
            return Err(GameError::GameEnded);
        }
        self.auto_draw = true;
        Ok(())
    }

    pub fn stop_auto_draw(&mut self) {
        self.auto_draw = false;
    }

    pub fn restart(&mut self) {
        self.drawn.clear();
        self.cursor = 0;
        self.boards = BoardSet::new(self.config.boards().to_vec());
        self.state = GameState::InProgress;
        self.auto_draw = false;
        self.score = None;
        self.submission = None;
        self.generation += 1;
    }

    pub fn prepare_submission(&self, name: &str) -> Result<ScoreSubmission, SubmitError> {
        if !self.is_ended() {
            return Err(SubmitError::GameInProgress);
        }
        let score = self.score.ok_or(SubmitError::NoScore)?;
        if self.submission.is_some() {
            return Err(SubmitError::AlreadySubmitted);
        }
        let name = PlayerName::new(name)?;
        Ok(ScoreSubmission { score, name })
    }

    // A failed submission leaves the game untouched so the player can retry
    pub fn record_submission(&mut self, outcome: SubmissionOutcome) -> Notification {
        let notification = Notification::from(&outcome);
        if let SubmissionOutcome::Success { data } = outcome {
            self.submission = Some(data);
        }
        notification
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let boards = self
            .boards
            .slots()
            .iter()
            .map(|slot| SlotView::new(slot, &self.drawn))
            .collect();
        GameSnapshot {
            drawn: self.drawn.as_slice().to_vec(),
            boards,
            state: self.state,
            score: self.score,
            auto_draw: self.auto_draw,
            submitted: self.is_submitted(),
        }
    }
}
