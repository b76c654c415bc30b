use crate::bingo::board::Board;
use crate::bingo::draw::{DrawnNumbers, Number};

pub type Score = u64;

pub trait ScoreCalculator {
    fn compute_score(&self, board: &Board, drawn: &DrawnNumbers, last_drawn: Number) -> Score;
}

// Sum of the unmarked numbers times the number that completed the win
#[derive(Debug, Default, Clone, Copy)]
pub struct UnmarkedSum;

impl ScoreCalculator for UnmarkedSum {
    fn compute_score(&self, board: &Board, drawn: &DrawnNumbers, last_drawn: Number) -> Score {
        let unmarked: Score = board.unmarked(drawn).map(Score::from).sum();
        unmarked * Score::from(last_drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn winning_board() -> Board {
        Board::new(vec![
            vec![3, 15, 0, 2, 22],
            vec![9, 18, 13, 17, 5],
            vec![19, 8, 7, 25, 23],
            vec![20, 11, 10, 24, 4],
            vec![14, 21, 16, 12, 6],
        ])
        .unwrap()
    }

    const DRAWN: [Number; 15] = [7, 4, 9, 5, 11, 17, 23, 2, 0, 14, 21, 24, 10, 16, 13];

    #[test]
    fn test_unmarked_sum_times_last_drawn() {
        let drawn: DrawnNumbers = DRAWN.into_iter().collect();
        assert_eq!(UnmarkedSum.compute_score(&winning_board(), &drawn, 13), 1924);
    }

    #[test]
    fn test_order_invariant_and_idempotent() {
        let drawn: DrawnNumbers = DRAWN.into_iter().collect();
        let reversed: DrawnNumbers = DRAWN.into_iter().rev().collect();
        let board = winning_board();
        let first = UnmarkedSum.compute_score(&board, &drawn, 13);
        assert_eq!(first, UnmarkedSum.compute_score(&board, &reversed, 13));
        assert_eq!(first, UnmarkedSum.compute_score(&board, &drawn, 13));
    }

    #[test]
    fn test_fully_marked_board_scores_zero() {
        let board = Board::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let drawn: DrawnNumbers = [4, 3, 2, 1].into_iter().collect();
        assert_eq!(UnmarkedSum.compute_score(&board, &drawn, 1), 0);
    }

    #[test]
    fn test_zero_last_drawn_scores_zero() {
        let board = Board::new(vec![vec![0, 5], vec![6, 7]]).unwrap();
        let drawn: DrawnNumbers = [5, 0].into_iter().collect();
        assert_eq!(UnmarkedSum.compute_score(&board, &drawn, 0), 0);
    }
}
