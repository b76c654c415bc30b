use hashbrown::HashSet;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

pub type Number = u32;

#[derive(Error, Debug, PartialEq)]
pub enum DrawError {
    #[error("Draw position {cursor} is out of range for a sequence of {len} numbers")]
    OutOfRange { cursor: usize, len: usize },
}

// The numbers to reveal, in the order they will be revealed
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct DrawSequence(Vec<Number>);

impl DrawSequence {
    pub fn new(numbers: Vec<Number>) -> Self {
        DrawSequence(numbers)
    }

    pub fn next_number(&self, cursor: usize) -> Result<Number, DrawError> {
        self.0.get(cursor).copied().ok_or(DrawError::OutOfRange {
            cursor,
            len: self.0.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self) -> &[Number] {
        &self.0
    }
}

/// Numbers revealed so far.
///
/// Keeps the draw order for scoring and presentation, and a set alongside it so
/// that win checks do not scan the whole history for every cell.
#[derive(Clone, Debug, Default)]
pub struct DrawnNumbers {
    order: Vec<Number>,
    marked: HashSet<Number>,
}

impl DrawnNumbers {
    pub fn new() -> Self {
        DrawnNumbers::default()
    }

    pub fn push(&mut self, number: Number) {
        self.order.push(number);
        self.marked.insert(number);
    }

    pub fn contains(&self, number: Number) -> bool {
        self.marked.contains(&number)
    }

    // The number that was revealed most recently
    pub fn last(&self) -> Option<Number> {
        self.order.last().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[Number] {
        &self.order
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.marked.clear();
    }
}

impl PartialEq for DrawnNumbers {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl FromIterator<Number> for DrawnNumbers {
    fn from_iter<I: IntoIterator<Item = Number>>(iter: I) -> Self {
        let mut drawn = DrawnNumbers::new();
        for number in iter {
            drawn.push(number);
        }
        drawn
    }
}

impl Serialize for DrawnNumbers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.order)
    }
}
