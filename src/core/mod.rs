//! Core: pure text rules shared by every build (no I/O, no runtime).

pub mod extract;
pub mod paths;
pub mod suit;

pub use extract::{
    extract_game_number, extract_parenthesized_groups, is_finalized, parse_game_message,
    GameMessage, ParseError,
};
pub use suit::{contains_suit, count_by_suit, normalize, Suit};
