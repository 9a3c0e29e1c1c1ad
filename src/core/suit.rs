//! Suit: four canonical suits decoded from decorative glyph variants.
//!
//! Source channels mix text-presentation glyphs (`♠`), emoji-presentation
//! glyphs (`♠️` = `♠` + U+FE0F) and look-alikes (`❤` for hearts). Everything
//! is decoded through [`DECODE_TABLE`] into one [`Suit`] value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Variation selector that turns a glyph into its emoji presentation.
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// External glyph → canonical suit.
pub const DECODE_TABLE: &[(char, Suit)] = &[
    ('♠', Suit::Spade),
    ('♥', Suit::Heart),
    ('❤', Suit::Heart),
    ('♦', Suit::Diamond),
    ('♣', Suit::Club),
];

/// Declaration order is the enumeration order used for tie-breaks.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

    /// Canonical glyph used after normalization.
    pub fn glyph(self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Heart => '♥',
            Suit::Diamond => '♦',
            Suit::Club => '♣',
        }
    }

    /// Emoji shown in published messages.
    pub fn emoji(self) -> &'static str {
        match self {
            Suit::Spade => "♠️",
            Suit::Heart => "❤️",
            Suit::Diamond => "♦️",
            Suit::Club => "♣️",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Spade => "Pique",
            Suit::Heart => "Cœur",
            Suit::Diamond => "Carreau",
            Suit::Club => "Trèfle",
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        DECODE_TABLE.iter().find(|(glyph, _)| *glyph == c).map(|(_, suit)| *suit)
    }

    /// Decode a single glyph, with or without its variation selector.
    pub fn from_glyph(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        let suit = Self::from_char(chars.next()?)?;
        match chars.as_str() {
            "" => Some(suit),
            rest if rest.chars().all(|c| c == VARIATION_SELECTOR) => Some(suit),
            _ => None,
        }
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.emoji())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown suit glyph: {0:?}")]
pub struct UnknownSuit(pub String);

impl FromStr for Suit {
    type Err = UnknownSuit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(suit) = Self::from_glyph(trimmed) {
            return Ok(suit);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "spade" | "spades" | "s" => Ok(Suit::Spade),
            "heart" | "hearts" | "h" => Ok(Suit::Heart),
            "diamond" | "diamonds" | "d" => Ok(Suit::Diamond),
            "club" | "clubs" | "c" => Ok(Suit::Club),
            _ => Err(UnknownSuit(s.to_string())),
        }
    }
}

/// Rewrite every decorative suit variant into its canonical glyph.
/// Non-suit characters pass through untouched.
pub fn normalize(group: &str) -> String {
    let mut out = String::with_capacity(group.len());
    let mut chars = group.chars().peekable();
    while let Some(c) = chars.next() {
        match Suit::from_char(c) {
            Some(suit) => {
                out.push(suit.glyph());
                while chars.peek() == Some(&VARIATION_SELECTOR) {
                    chars.next();
                }
            }
            None => out.push(c),
        }
    }
    out
}

/// Occurrences per suit; suits that do not appear are omitted.
pub fn count_by_suit(group: &str) -> BTreeMap<Suit, usize> {
    let mut counts = BTreeMap::new();
    for suit in group.chars().filter_map(Suit::from_char) {
        *counts.entry(suit).or_insert(0) += 1;
    }
    counts
}

pub fn contains_suit(group: &str, target: Suit) -> bool {
    group.chars().filter_map(Suit::from_char).any(|suit| suit == target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_variants() {
        assert_eq!(normalize("10♥️J❤️K❤"), "10♥J♥K♥");
        assert_eq!(normalize("A♠️2♦️3♣️"), "A♠2♦3♣");
        assert_eq!(normalize("no suits here"), "no suits here");
    }

    #[test]
    fn normalize_is_idempotent() {
        for group in ["10♦️5♠️9♠️", "10♥️J♥️K♦️", "❤️❤♥️♥", "", "7♣️️"] {
            let once = normalize(group);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn counts_omit_absent_suits() {
        let counts = count_by_suit("10♥️J♥️K♦️");
        assert_eq!(counts.get(&Suit::Heart), Some(&2));
        assert_eq!(counts.get(&Suit::Diamond), Some(&1));
        assert!(!counts.contains_key(&Suit::Spade));
        assert!(!counts.contains_key(&Suit::Club));
    }

    #[test]
    fn contains_matches_any_variant() {
        assert!(contains_suit("3❤", Suit::Heart));
        assert!(contains_suit("3♥️", Suit::Heart));
        assert!(!contains_suit("3♦️4♠️", Suit::Heart));
    }

    #[test]
    fn parse_glyphs_and_names() {
        assert_eq!("♥️".parse::<Suit>(), Ok(Suit::Heart));
        assert_eq!("❤".parse::<Suit>(), Ok(Suit::Heart));
        assert_eq!("clubs".parse::<Suit>(), Ok(Suit::Club));
        assert!("♥♥".parse::<Suit>().is_err());
        assert!("joker".parse::<Suit>().is_err());
    }
}
