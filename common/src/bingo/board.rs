use crate::bingo::draw::{DrawnNumbers, Number};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("Board with no rows given")]
    NoRows,
    #[error("Board contains empty rows")]
    EmptyRows,
    #[error("Not all board rows have the same length")]
    MismatchedRowLengths,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "Vec<Vec<Number>>")]
pub struct Board(Vec<Vec<Number>>);

impl Board {
    // Ensure that the given board meets the following criteria:
    // - board contains at least one row
    // - rows contain at least one number
    // - all rows are the same length
    pub fn new(rows: Vec<Vec<Number>>) -> Result<Self, BoardError> {
        let row = rows.first().ok_or(BoardError::NoRows)?;
        if row.is_empty() {
            return Err(BoardError::EmptyRows);
        }
        let row_len = row.len();
        if rows.iter().any(|row| row.len() != row_len) {
            return Err(BoardError::MismatchedRowLengths);
        }
        Ok(Board(rows))
    }

    pub fn height(&self) -> usize {
        self.0.len()
    }

    pub fn width(&self) -> usize {
        self.0[0].len()
    }

    pub fn rows(&self) -> &[Vec<Number>] {
        &self.0
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = Number> + '_ {
        self.0.iter().filter_map(move |row| row.get(col).copied())
    }

    pub fn numbers(&self) -> impl Iterator<Item = Number> + '_ {
        self.0.iter().flat_map(|row| row.iter().copied())
    }

    pub fn contains(&self, number: Number) -> bool {
        self.0.iter().any(|row| row.contains(&number))
    }

    // Numbers that are not on this board are never marked on it
    pub fn is_marked(&self, number: Number, drawn: &DrawnNumbers) -> bool {
        self.contains(number) && drawn.contains(number)
    }

    pub fn unmarked<'a>(&'a self, drawn: &'a DrawnNumbers) -> impl Iterator<Item = Number> + 'a {
        self.numbers().filter(move |n| !drawn.contains(*n))
    }

    // Only complete rows and columns count. Diagonals never win.
    pub fn check_win(&self, drawn: &DrawnNumbers) -> bool {
        let row_win = self
            .0
            .iter()
            .any(|row| row.iter().all(|n| drawn.contains(*n)));
        if row_win {
            return true;
        }
        (0..self.width()).any(|col| self.column(col).all(|n| drawn.contains(n)))
    }
}

impl TryFrom<Vec<Vec<Number>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<Number>>) -> Result<Self, Self::Error> {
        Board::new(rows)
    }
}
