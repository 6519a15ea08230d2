//! Outbound events and the per-hand action log.

use crate::betting::PlayerActionType;
use crate::cards::Card;
use crate::deck::{DeckHandle, Seed};
use crate::evaluator::Category;
use crate::seats::PlayerId;
use crate::table::GameState;
use serde::{Deserialize, Serialize};

/// What the table tells the outside world after a successful instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum TableEvent {
    TableCreated {
        table_id: u64,
        creator: PlayerId,
    },
    PlayerJoined {
        table_id: u64,
        player: PlayerId,
        position: u8,
        buy_in: u64,
    },
    /// `stack` is the amount cashed out.
    PlayerLeft {
        table_id: u64,
        player: PlayerId,
        position: u8,
        stack: u64,
    },
    HandStarted {
        table_id: u64,
        hand_number: u64,
        button: u8,
        deck: DeckHandle,
    },
    BlindPosted {
        table_id: u64,
        player: PlayerId,
        position: u8,
        amount: u64,
    },
    /// `amount` is the chips moved by the action (0 for fold and check).
    PlayerActioned {
        table_id: u64,
        player: PlayerId,
        action: PlayerActionType,
        amount: u64,
    },
    StreetAdvanced {
        table_id: u64,
        state: GameState,
        revealed: Vec<Card>,
    },
    /// `hand` is `None` when the pot was won without a showdown.
    PotAwarded {
        table_id: u64,
        player: PlayerId,
        position: u8,
        amount: u64,
        hand: Option<Category>,
    },
    /// `winner` is the first paid seat clockwise from the button; `pot` is the total paid out.
    HandComplete {
        table_id: u64,
        winner: PlayerId,
        pot: u64,
    },
    /// The finished hand's seed, so anyone can check it against `deck`.
    DeckRevealed {
        table_id: u64,
        hand_number: u64,
        deck: DeckHandle,
        seed: Seed,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum HandHistoryVerb {
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    Raise,
    Win,
    Split,
}

impl HandHistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HandHistoryVerb::SmallBlind => "SB",
            HandHistoryVerb::BigBlind => "BB",
            HandHistoryVerb::Fold => "Fold",
            HandHistoryVerb::Check => "Check",
            HandHistoryVerb::Call => "Call",
            HandHistoryVerb::Raise => "Raise",
            HandHistoryVerb::Win => "Win",
            HandHistoryVerb::Split => "Split",
        }
    }
}

impl From<PlayerActionType> for HandHistoryVerb {
    fn from(action: PlayerActionType) -> Self {
        match action {
            PlayerActionType::Fold => HandHistoryVerb::Fold,
            PlayerActionType::Check => HandHistoryVerb::Check,
            PlayerActionType::Call => HandHistoryVerb::Call,
            PlayerActionType::Raise => HandHistoryVerb::Raise,
        }
    }
}

/// One line of the current hand's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandHistoryEntry {
    pub position: u8,
    pub verb: HandHistoryVerb,
    pub amount: Option<u64>,
    pub street: GameState,
}

impl std::fmt::Display for HandHistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seat {} {}", self.position, self.verb.label())?;
        if let Some(amount) = self.amount {
            write!(f, " {amount}")?;
        }
        Ok(())
    }
}
