//! Five- and seven-card hand ranking for showdown.
//!
//! Hands compare by [`Category`] first, then by tie-break ranks: the ranks of
//! the larger groups come first (trips before the pair of a full house, the
//! higher pair of two pair first), then kickers high to low. Straights compare
//! by their top card only and the wheel (A-2-3-4-5) is the lowest straight.
//! Suits never break ties; identical values split the pot.

mod shape;

use crate::cards::{Card, Rank};
use crate::hand::{validate_holdem, Board, HandError, HoleCards, BOARD_SIZE};
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};
use shape::HandShape;

/// Packed, totally ordered hand strength. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u32);

impl HandValue {
    /// Four bits per rank (ranks top out at 14), category above them.
    fn pack(category: Category, tiebreak: &[Rank]) -> Self {
        let mut v = (category as u32) << 20;
        for (i, r) in tiebreak.iter().take(5).enumerate() {
            v |= (r.value() as u32) << (16 - 4 * i as u32);
        }
        HandValue(v)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub fn category(self) -> Category {
        Category::from_ordinal((self.0 >> 20) as u8)
    }
}

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    fn from_ordinal(v: u8) -> Category {
        match v {
            0 => Category::HighCard,
            1 => Category::Pair,
            2 => Category::TwoPair,
            3 => Category::ThreeOfAKind,
            4 => Category::Straight,
            5 => Category::Flush,
            6 => Category::FullHouse,
            7 => Category::FourOfAKind,
            _ => Category::StraightFlush,
        }
    }
}

/// Result of ranking a hand. Ordering and equality follow `value` only.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    pub category: Category,
    pub best_five: [Card; 5],
    value: HandValue,
}

impl Evaluation {
    pub const fn value(&self) -> HandValue {
        self.value
    }
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Evaluation {}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("not enough cards to evaluate: board has {0}")]
    NotEnoughCards(usize),
}

/// Rank exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> Evaluation {
    let shape = HandShape::of(cards);
    let by_group = shape.ranks_by_group();

    let (category, tiebreak) = match (shape.flush, shape.straight_top, shape.pattern().as_slice()) {
        (true, Some(top), _) => (Category::StraightFlush, vec![top]),
        (_, _, [4, 1]) => (Category::FourOfAKind, by_group),
        (_, _, [3, 2]) => (Category::FullHouse, by_group),
        (true, None, _) => (Category::Flush, by_group),
        (false, Some(top), _) => (Category::Straight, vec![top]),
        (_, _, [3, 1, 1]) => (Category::ThreeOfAKind, by_group),
        (_, _, [2, 2, 1]) => (Category::TwoPair, by_group),
        (_, _, [2, 1, 1, 1]) => (Category::Pair, by_group),
        _ => (Category::HighCard, by_group),
    };

    let mut best_five = *cards;
    best_five.sort_by(|a, b| b.rank().cmp(&a.rank()).then(b.suit().cmp(&a.suit())));
    Evaluation { category, best_five, value: HandValue::pack(category, &tiebreak) }
}

/// Best five of seven cards (all 21 subsets).
pub fn evaluate_seven(cards: &[Card; 7]) -> Evaluation {
    let mut best: Option<Evaluation> = None;
    // Each subset is the seven cards minus one pair (skip_a, skip_b).
    for skip_a in 0..7 {
        for skip_b in (skip_a + 1)..7 {
            let mut five = [cards[0]; 5];
            let kept = (0..7).filter(|&i| i != skip_a && i != skip_b);
            for (slot, i) in five.iter_mut().zip(kept) {
                *slot = cards[i];
            }
            let eval = evaluate_five(&five);
            if best.map_or(true, |b| eval > b) {
                best = Some(eval);
            }
        }
    }
    best.unwrap_or_else(|| evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]))
}

/// Evaluate hole cards against a complete five-card board.
///
/// ```
/// use poker_table::evaluator::{evaluate_holdem, Category};
/// use poker_table::hand::{Board, HoleCards};
///
/// let hole: HoleCards = "As Ah".parse().unwrap();
/// let board: Board = "Qc Jd 9h 3s 2c".parse().unwrap();
/// assert_eq!(evaluate_holdem(&hole, &board).unwrap().category, Category::Pair);
/// ```
pub fn evaluate_holdem(hole: &HoleCards, board: &Board) -> Result<Evaluation, EvalError> {
    validate_holdem(hole, board)?;
    let b = board.as_slice();
    if b.len() < BOARD_SIZE {
        return Err(EvalError::NotEnoughCards(b.len()));
    }
    Ok(evaluate_seven(&[hole.first(), hole.second(), b[0], b[1], b[2], b[3], b[4]]))
}

/// Compare two hands on a shared board.
pub fn compare_holdem(a: &HoleCards, b: &HoleCards, board: &Board) -> Result<Ordering, EvalError> {
    Ok(evaluate_holdem(a, board)?.cmp(&evaluate_holdem(b, board)?))
}
