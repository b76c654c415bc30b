use crate::bingo::board::{Board, BoardError};
use crate::bingo::draw::{DrawSequence, Number};
use serde::{Deserialize, Serialize};
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Game needs at least one board")]
    NoBoards,
    #[error("Invalid number {0:?}: {1}")]
    InvalidNumber(String, ParseIntError),
    #[error("Invalid board {index}: {source}")]
    InvalidBoard { index: usize, source: BoardError },
    #[error("Invalid game config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct RawGameConfig {
    draws: DrawSequence,
    boards: Vec<Board>,
}

/// The numbers to draw and the boards to start with.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GameConfig {
    draws: DrawSequence,
    boards: Vec<Board>,
}

impl GameConfig {
    pub fn new(draws: DrawSequence, boards: Vec<Board>) -> Result<Self, ConfigError> {
        if boards.is_empty() {
            return Err(ConfigError::NoBoards);
        }
        Ok(GameConfig { draws, boards })
    }

    // Boards are validated while deserializing
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawGameConfig = serde_json::from_str(json)?;
        GameConfig::new(raw.draws, raw.boards)
    }

    pub fn draws(&self) -> &DrawSequence {
        &self.draws
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }
}

fn parse_number(s: &str) -> Result<Number, ConfigError> {
    s.trim()
        .parse()
        .map_err(|err| ConfigError::InvalidNumber(s.trim().to_string(), err))
}

// Puzzle text format: a line of comma-separated draws, then boards separated by
// blank lines, one row per line.
impl FromStr for GameConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().map(str::trim).skip_while(|line| line.is_empty());
        let draws = match lines.next() {
            Some(line) => line
                .split(',')
                .filter(|n| !n.trim().is_empty())
                .map(parse_number)
                .collect::<Result<Vec<Number>, ConfigError>>()?,
            None => vec![],
        };

        let mut grids: Vec<Vec<Vec<Number>>> = vec![];
        let mut current: Vec<Vec<Number>> = vec![];
        for line in lines {
            if line.is_empty() {
                if !current.is_empty() {
                    grids.push(std::mem::take(&mut current));
                }
                continue;
            }
            let row = line
                .split_whitespace()
                .map(parse_number)
                .collect::<Result<Vec<Number>, ConfigError>>()?;
            current.push(row);
        }
        if !current.is_empty() {
            grids.push(current);
        }

        let boards = grids
            .into_iter()
            .enumerate()
            .map(|(index, rows)| {
                Board::new(rows).map_err(|source| ConfigError::InvalidBoard { index, source })
            })
            .collect::<Result<Vec<Board>, ConfigError>>()?;
        GameConfig::new(DrawSequence::new(draws), boards)
    }
}

const CLASSIC: &str = "
7,4,9,5,11,17,23,2,0,14,21,24,10,16,13,6,15,25,12,22,18,20,8,19,3,26,1

22 13 17 11  0
 8  2 23  4 24
21  9 14 16  7
 6 10  3 18  5
 1 12 20 15 19

 3 15  0  2 22
 9 18 13 17  5
19  8  7 25 23
20 11 10 24  4
14 21 16 12  6

14 21 17 24  4
10 16 15  9 19
18  8 23 26 20
22 11 13  6  5
 2  0 12  3  7
";

impl Default for GameConfig {
    fn default() -> Self {
        // The classic data is a constant, so failing to parse it is a bug
        CLASSIC.parse().expect("classic game data is valid")
    }
}
