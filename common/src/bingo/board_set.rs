use crate::bingo::board::Board;
use crate::bingo::draw::DrawnNumbers;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

// Permanent position of a board within its set
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct BoardId(usize);

impl BoardId {
    pub fn new(idx: usize) -> Self {
        BoardId(idx)
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

// Players count boards from one
impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board {}", self.0 + 1)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum BoardSlot {
    Active(Board),
    Eliminated,
}

impl BoardSlot {
    pub fn is_active(&self) -> bool {
        matches!(self, BoardSlot::Active(_))
    }

    pub fn board(&self) -> Option<&Board> {
        match self {
            BoardSlot::Active(board) => Some(board),
            BoardSlot::Eliminated => None,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Evaluation {
    pub eliminated: Vec<BoardId>,
    // Set when the last remaining board has won
    pub winner: Option<BoardId>,
}

/// Boards in play.
///
/// Winning boards are tombstoned rather than removed, so a [`BoardId`] refers
/// to the same board for the whole game.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct BoardSet(Vec<BoardSlot>);

impl BoardSet {
    pub fn new(boards: Vec<Board>) -> Self {
        BoardSet(boards.into_iter().map(BoardSlot::Active).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn slots(&self) -> &[BoardSlot] {
        &self.0
    }

    pub fn get(&self, id: BoardId) -> Option<&Board> {
        self.0.get(id.get()).and_then(BoardSlot::board)
    }

    pub fn active(&self) -> impl Iterator<Item = (BoardId, &Board)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.board().map(|b| (BoardId(idx), b)))
    }

    pub fn active_count(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_active()).count()
    }

    pub fn is_last_board(&self) -> bool {
        self.active_count() == 1
    }

    /// Checks every active board against the drawn numbers.
    ///
    /// Winners are eliminated unless only one board was left going into this
    /// pass, in which case that board is reported as the winner instead. If
    /// every remaining board wins at once, the highest-numbered winner is kept
    /// in play so the set never runs empty; it becomes the last board and wins
    /// on the next evaluation.
    pub fn evaluate(&mut self, drawn: &DrawnNumbers) -> Evaluation {
        let active_count = self.active_count();
        let is_last_board = active_count == 1;
        let mut winners: Vec<BoardId> = self
            .active()
            .filter(|(_, board)| board.check_win(drawn))
            .map(|(id, _)| id)
            .collect();

        if is_last_board {
            return Evaluation {
                eliminated: vec![],
                winner: winners.first().copied(),
            };
        }

        if winners.len() == active_count {
            winners.pop();
        }
        for id in &winners {
            self.0[id.get()] = BoardSlot::Eliminated;
        }
        Evaluation {
            eliminated: winners,
            winner: None,
        }
    }
}

impl Index<BoardId> for BoardSet {
    type Output = BoardSlot;
    fn index(&self, index: BoardId) -> &Self::Output {
        &self.0[index.get()]
    }
}
