//! Extract: game number, card groups and completion markers from raw text.
//!
//! ```text
//! #N430. ✅4(10♦️5♠️9♠️) - 0(10♥️J♥️K♦️) #T4
//!   │               │                │
//!   game            group 1          group 2
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static GAME_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)#N\s*(\d+)").expect("game number regex"));
static GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([^)]*)\)").expect("group regex"));

/// Marks a game still in progress; overrides any completion marker.
pub const IN_PROGRESS_MARKER: char = '⏰';
pub const COMPLETION_MARKERS: &[char] = &['✅', '🔰'];

pub fn extract_game_number(text: &str) -> Option<u32> {
    GAME_NUMBER
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn extract_parenthesized_groups(text: &str) -> Vec<&str> {
    GROUP
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

pub fn is_finalized(text: &str) -> bool {
    if text.contains(IN_PROGRESS_MARKER) {
        return false;
    }
    text.contains(COMPLETION_MARKERS)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no game number")]
    MissingGameNumber,
    #[error("game #{game}: {found} group(s), need 2")]
    InsufficientGroups { game: u32, found: usize },
}

/// A source message reduced to what the rules look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMessage<'a> {
    pub game: u32,
    pub first: &'a str,
    pub second: &'a str,
}

pub fn parse_game_message(text: &str) -> Result<GameMessage<'_>, ParseError> {
    let game = extract_game_number(text).ok_or(ParseError::MissingGameNumber)?;
    match extract_parenthesized_groups(text).as_slice() {
        [first, second, ..] => Ok(GameMessage { game, first: *first, second: *second }),
        groups => Err(ParseError::InsufficientGroups { game, found: groups.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#N430. ✅4(10♦️5♠️9♠️) - 0(10♥️J♥️K♦️) #T4";

    #[test]
    fn game_number() {
        assert_eq!(extract_game_number(SAMPLE), Some(430));
        assert_eq!(extract_game_number("#n 12 (a)"), Some(12));
        assert_eq!(extract_game_number("game 430"), None);
        assert_eq!(extract_game_number("#N99999999999999999999"), None);
    }

    #[test]
    fn groups_in_order() {
        assert_eq!(extract_parenthesized_groups(SAMPLE), vec!["10♦️5♠️9♠️", "10♥️J♥️K♦️"]);
        assert_eq!(extract_parenthesized_groups("()(x)"), vec!["", "x"]);
        assert!(extract_parenthesized_groups("#N1 nothing").is_empty());
    }

    #[test]
    fn finalization_markers() {
        assert!(is_finalized(SAMPLE));
        assert!(is_finalized("#N1 🔰(A♠)(2♠)"));
        assert!(!is_finalized("#N1 ⏰ ✅(A♠)(2♠)"));
        assert!(!is_finalized("#N1 (A♠)(2♠)"));
    }

    #[test]
    fn parse_requires_two_groups() {
        let msg = parse_game_message(SAMPLE).unwrap();
        assert_eq!(msg.game, 430);
        assert_eq!(msg.second, "10♥️J♥️K♦️");

        assert_eq!(
            parse_game_message("#N5 (A♠)"),
            Err(ParseError::InsufficientGroups { game: 5, found: 1 })
        );
        assert_eq!(parse_game_message("(A♠)(2♠)"), Err(ParseError::MissingGameNumber));
    }
}
