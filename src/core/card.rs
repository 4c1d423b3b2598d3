use std::fmt;
use std::str::FromStr;

use super::CardError;

/// Card values from lowest to highest.
///
/// The discriminant is the rank code used by downstream evaluators.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Value {
    Two = 0,
    Three = 1,
    Four = 2,
    Five = 3,
    Six = 4,
    Seven = 5,
    Eight = 6,
    Nine = 7,
    Ten = 8,
    Jack = 9,
    Queen = 10,
    King = 11,
    Ace = 12,
}

/// Every value in rank code order.
const VALUES: [Value; 13] = [
    Value::Two,
    Value::Three,
    Value::Four,
    Value::Five,
    Value::Six,
    Value::Seven,
    Value::Eight,
    Value::Nine,
    Value::Ten,
    Value::Jack,
    Value::Queen,
    Value::King,
    Value::Ace,
];

/// The char each value is written as, indexed by rank code.
const VALUE_CHARS: [char; 13] = [
    '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A',
];

impl Value {
    /// Look up a value from the char hand histories use for it.
    pub fn from_char(c: char) -> Option<Self> {
        VALUE_CHARS
            .iter()
            .position(|v| *v == c)
            .map(|idx| VALUES[idx])
    }

    pub fn to_char(self) -> char {
        VALUE_CHARS[self as usize]
    }
}

/// Card suits, ordered by suit code.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

const SUITS: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

impl Suit {
    pub fn from_char(c: char) -> Option<Self> {
        SUIT_CHARS
            .iter()
            .position(|s| *s == c)
            .map(|idx| SUITS[idx])
    }

    pub fn to_char(self) -> char {
        SUIT_CHARS[self as usize]
    }
}

/// A single playing card.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Card {
    pub value: Value,
    pub suit: Suit,
}

impl Card {
    pub fn new(value: Value, suit: Suit) -> Self {
        Self { value, suit }
    }

    /// The 0..52 code of this card: `value + 13 * suit`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_hand_history::core::Card;
    ///
    /// let two_clubs: Card = "2c".parse().unwrap();
    /// assert_eq!(two_clubs.code(), 0);
    /// let ace_spades: Card = "As".parse().unwrap();
    /// assert_eq!(ace_spades.code(), 51);
    /// ```
    pub fn code(&self) -> u8 {
        self.value as u8 + 13 * self.suit as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        if code >= 52 {
            return None;
        }
        Some(Self {
            value: VALUES[(code % 13) as usize],
            suit: SUITS[(code / 13) as usize],
        })
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let value = chars
            .next()
            .and_then(Value::from_char)
            .ok_or(CardError::UnexpectedValueChar)?;
        let suit = chars
            .next()
            .and_then(Suit::from_char)
            .ok_or(CardError::UnexpectedSuitChar)?;
        if chars.next().is_some() {
            return Err(CardError::UnparsedCharsRemaining);
        }
        Ok(Self { value, suit })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value.to_char(), self.suit.to_char())
    }
}

/// A set of cards stored as one bit per card code.
///
/// This is the representation hand evaluators consume, so a board and a
/// pair of hole cards can be combined with a single `|`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct CardMask(u64);

impl CardMask {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn bits(&self) -> u64 {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, card: Card) -> bool {
        self.0 & (1u64 << card.code()) != 0
    }

    /// Insert a card, returning false if it was already there.
    pub fn insert(&mut self, card: Card) -> bool {
        let bit = 1u64 << card.code();
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    /// Iterate over the cards in code order.
    pub fn cards(&self) -> impl Iterator<Item = Card> + '_ {
        (0..52u8)
            .filter(|code| self.0 & (1u64 << code) != 0)
            .filter_map(Card::from_code)
    }
}

impl std::ops::BitOr for CardMask {
    type Output = CardMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        CardMask(self.0 | rhs.0)
    }
}

/// Parses `"AhKd"` or `"Ah Kd"`. A card that shows up twice is an error.
impl FromStr for CardMask {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.len() % 2 != 0 {
            return Err(CardError::UnparsedCharsRemaining);
        }
        let mut mask = CardMask::new();
        for pair in compact.chunks(2) {
            let value = Value::from_char(pair[0]).ok_or(CardError::UnexpectedValueChar)?;
            let suit = Suit::from_char(pair[1]).ok_or(CardError::UnexpectedSuitChar)?;
            let card = Card::new(value, suit);
            if !mask.insert(card) {
                return Err(CardError::DuplicateCard(card));
            }
        }
        Ok(mask)
    }
}

impl fmt::Display for CardMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in self.cards() {
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_value_then_suit() {
        let codes: Vec<u8> = ["2c", "Ac", "2d", "Td", "Kh", "As"]
            .iter()
            .map(|s| s.parse::<Card>().unwrap().code())
            .collect();
        assert_eq!(codes, vec![0, 12, 13, 21, 37, 51]);
    }

    #[test]
    fn test_from_code_inverts_code() {
        for code in 0..52 {
            assert_eq!(Card::from_code(code).unwrap().code(), code);
        }
        assert_eq!(Card::from_code(52), None);
    }

    #[test]
    fn test_bad_card_strings() {
        assert_eq!("1c".parse::<Card>(), Err(CardError::UnexpectedValueChar));
        assert_eq!("Ax".parse::<Card>(), Err(CardError::UnexpectedSuitChar));
        assert_eq!("Ahh".parse::<Card>(), Err(CardError::UnparsedCharsRemaining));
    }

    #[test]
    fn test_mask_parses_spaced_and_compact() {
        let spaced: CardMask = "Qd 8c 3h".parse().unwrap();
        let compact: CardMask = "Qd8c3h".parse().unwrap();
        assert_eq!(spaced, compact);
        assert_eq!(spaced.len(), 3);
        assert!(spaced.contains("8c".parse().unwrap()));
    }

    #[test]
    fn test_mask_rejects_duplicates() {
        let err = "AhKdAh".parse::<CardMask>().unwrap_err();
        assert_eq!(err, CardError::DuplicateCard("Ah".parse().unwrap()));
    }

    #[test]
    fn test_mask_union_and_display() {
        let board: CardMask = "Kd 2c".parse().unwrap();
        let hole: CardMask = "Ah As".parse().unwrap();
        let all = board | hole;
        assert_eq!(all.len(), 4);
        // Display walks code order.
        assert_eq!(all.to_string(), "2cKdAhAs");
    }
}
