//! Committed, seeded decks.
//!
//! A hand's deck is fixed by a 32-byte [`Seed`] before any card is dealt. The
//! table only ever stores the public [`DeckHandle`] (a SHA-256 commitment to
//! the seed) and the deck positions it dealt; cards are obtained through a
//! [`DeckCommitter`]. Once the hand is over the seed is disclosed with
//! [`DeckCommitter::retire`] and anyone can check it with
//! [`verify_commitment`] and replay the shuffle with [`shuffled_deck`].

use crate::cards::{standard_deck, Card, DECK_SIZE};
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

const COMMIT_DOMAIN: &[u8] = b"poker-table/deck-commitment/v1";
const SHUFFLE_DOMAIN: &[u8] = b"poker-table/deck-shuffle/v1";
const DERIVE_DOMAIN: &[u8] = b"poker-table/hand-seed/v1";

/// Secret randomness that determines one hand's deck order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed([u8; 32]);

impl Seed {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Little-endian `x` padded with zeros. Handy for tests and replays.
    pub fn from_u64(x: u64) -> Self {
        let mut b = [0u8; 32];
        b[..8].copy_from_slice(&x.to_le_bytes());
        Self(b)
    }

    /// Fresh seed from the thread RNG, for hosts that are not replicated.
    pub fn random() -> Self {
        let mut b = [0u8; 32];
        rand::rng().fill_bytes(&mut b);
        Self(b)
    }

    /// Per-hand seed: H(domain || base || table_id || hand_number).
    pub fn derive(&self, table_id: u64, hand_number: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(DERIVE_DOMAIN);
        hasher.update(self.0);
        hasher.update(table_id.to_le_bytes());
        hasher.update(hand_number.to_le_bytes());
        Self(hasher.finalize().into())
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// Seeds end up in logs through Debug on tables and errors; never print them.
impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Public commitment to a seed; the `deckComputation` handle of a hand.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeckHandle([u8; 32]);

impl DeckHandle {
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for DeckHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0[..8] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for DeckHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeckHandle({self})")
    }
}

/// Deck positions of one player's two hole cards; the `holeCardsComputation` handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleCardSlots(pub [u8; 2]);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("no committed deck for handle {0}")]
    UnknownHandle(DeckHandle),
    #[error("a deck with handle {0} is already committed")]
    AlreadyCommitted(DeckHandle),
    #[error("deck position {0} is out of range")]
    IndexOutOfRange(u8),
    #[error("deck produced an invalid deal: {0}")]
    InvalidDeal(String),
}

/// Commit/reveal capability behind which the shuffle lives.
///
/// Implementations must make the permutation a pure function of the committed
/// seed, deal 52 distinct cards, and keep unrevealed positions unpredictable
/// from the handle and from revealed cards.
pub trait DeckCommitter {
    fn commit(&mut self, seed: Seed) -> Result<DeckHandle, DeckError>;
    fn reveal(&self, handle: &DeckHandle, index: u8) -> Result<Card, DeckError>;
    /// Forget the deck and disclose its seed for auditing.
    fn retire(&mut self, handle: &DeckHandle) -> Result<Seed, DeckError>;
}

pub fn commitment(seed: &Seed) -> DeckHandle {
    let mut hasher = Sha256::new();
    hasher.update(COMMIT_DOMAIN);
    hasher.update(seed.0);
    DeckHandle(hasher.finalize().into())
}

pub fn verify_commitment(handle: &DeckHandle, seed: &Seed) -> bool {
    commitment(seed) == *handle
}

/// The full deck order a seed commits to.
pub fn shuffled_deck(seed: &Seed) -> [Card; DECK_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(SHUFFLE_DOMAIN);
    hasher.update(seed.0);
    let mut rng = ChaCha8Rng::from_seed(hasher.finalize().into());
    let mut cards = standard_deck();
    cards.shuffle(&mut rng);
    cards
}

struct CommittedDeck {
    seed: Seed,
    cards: [Card; DECK_SIZE],
}

/// In-process dealer: SHA-256 commitments over a ChaCha8 shuffle.
#[derive(Default)]
pub struct ChaChaDealer {
    decks: HashMap<DeckHandle, CommittedDeck>,
}

impl ChaChaDealer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of decks committed and not yet retired.
    pub fn live_decks(&self) -> usize {
        self.decks.len()
    }
}

impl fmt::Debug for ChaChaDealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaChaDealer").field("live_decks", &self.decks.len()).finish()
    }
}

impl DeckCommitter for ChaChaDealer {
    fn commit(&mut self, seed: Seed) -> Result<DeckHandle, DeckError> {
        let handle = commitment(&seed);
        if self.decks.contains_key(&handle) {
            return Err(DeckError::AlreadyCommitted(handle));
        }
        self.decks.insert(handle, CommittedDeck { seed, cards: shuffled_deck(&seed) });
        Ok(handle)
    }

    fn reveal(&self, handle: &DeckHandle, index: u8) -> Result<Card, DeckError> {
        let deck = self.decks.get(handle).ok_or(DeckError::UnknownHandle(*handle))?;
        deck.cards.get(index as usize).copied().ok_or(DeckError::IndexOutOfRange(index))
    }

    fn retire(&mut self, handle: &DeckHandle) -> Result<Seed, DeckError> {
        self.decks.remove(handle).map(|d| d.seed).ok_or(DeckError::UnknownHandle(*handle))
    }
}
