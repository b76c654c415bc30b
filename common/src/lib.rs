pub mod bingo;
pub mod messages;

pub use bingo::*;
