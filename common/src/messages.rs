use crate::bingo::{BoardId, BoardSlot, DrawnNumbers, GameState, Notification, Number, Score};
use serde::{Deserialize, Serialize};

// Commands a client sends over the websocket
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Command {
    Draw,
    StartAutoDraw,
    StopAutoDraw,
    Restart,
    Submit { name: String },
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub struct Cell {
    pub number: Number,
    pub marked: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum SlotView {
    Active { cells: Vec<Vec<Cell>> },
    Eliminated,
}

impl SlotView {
    pub fn new(slot: &BoardSlot, drawn: &DrawnNumbers) -> Self {
        match slot {
            BoardSlot::Active(board) => SlotView::Active {
                cells: board
                    .rows()
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|&number| Cell {
                                number,
                                marked: board.is_marked(number, drawn),
                            })
                            .collect()
                    })
                    .collect(),
            },
            BoardSlot::Eliminated => SlotView::Eliminated,
        }
    }
}

/// Everything a client needs to render the game.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub drawn: Vec<Number>,
    pub boards: Vec<SlotView>,
    pub state: GameState,
    pub score: Option<Score>,
    pub auto_draw: bool,
    pub submitted: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Response {
    State(GameSnapshot),
    GameEnd { winner: BoardId, last_drawn: Number },
    Score { score: Score },
    Notification(Notification),
    Error { message: String },
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateGameResponse {
    pub id: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bingo::Board;
    use serde_json::from_str;

    #[test]
    fn test_parse_commands() {
        assert_eq!(from_str::<Command>("\"Draw\"").unwrap(), Command::Draw);
        assert_eq!(
            from_str::<Command>("{\"Submit\":{\"name\":\"Greg\"}}").unwrap(),
            Command::Submit {
                name: "Greg".to_string()
            }
        );
        assert!(from_str::<Command>("\"Shuffle\"").is_err());
    }

    #[test]
    fn test_slot_view_marks_drawn_numbers() {
        let board = Board::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let drawn: DrawnNumbers = [4, 1].into_iter().collect();
        let view = SlotView::new(&BoardSlot::Active(board), &drawn);
        let SlotView::Active { cells } = view else {
            panic!("expected an active slot");
        };
        let marked: Vec<bool> = cells.iter().flatten().map(|c| c.marked).collect();
        assert_eq!(marked, vec![true, false, false, true]);
        assert_eq!(
            SlotView::new(&BoardSlot::Eliminated, &drawn),
            SlotView::Eliminated
        );
    }
}
