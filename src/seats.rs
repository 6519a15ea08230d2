//! Player identities, per-seat state, and seat rotation.

use crate::config::MAX_PLAYERS;
use crate::deck::HoleCardSlots;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque caller identity supplied by the hosting runtime (a public key).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId([u8; 32]);

impl PlayerId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<u64> for PlayerId {
    fn from(x: u64) -> Self {
        let mut b = [0u8; 32];
        b[24..].copy_from_slice(&x.to_be_bytes());
        Self(b)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0[24..] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({self})")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    Active,
    Folded,
    AllIn,
}

/// One seated player. Lives exactly as long as the seat is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub(crate) player: PlayerId,
    pub(crate) stack: u64,
    pub(crate) current_bet: u64,
    pub(crate) position: u8,
    pub(crate) status: PlayerStatus,
    pub(crate) has_acted_this_street: bool,
    pub(crate) hole_cards: Option<HoleCardSlots>,
}

impl PlayerState {
    pub(crate) fn seated(player: PlayerId, stack: u64, position: u8) -> Self {
        Self {
            player,
            stack,
            current_bet: 0,
            position,
            status: PlayerStatus::Active,
            has_acted_this_street: false,
            hole_cards: None,
        }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Chips behind.
    pub fn stack(&self) -> u64 {
        self.stack
    }

    /// Chips committed on the current street.
    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn position(&self) -> u8 {
        self.position
    }

    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn has_acted_this_street(&self) -> bool {
        self.has_acted_this_street
    }

    /// Deck positions of this player's hole cards for the current hand.
    pub fn hole_cards(&self) -> Option<HoleCardSlots> {
        self.hole_cards
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Still contesting the pot: active or all-in.
    pub fn in_hand(&self) -> bool {
        self.status != PlayerStatus::Folded
    }

    /// Move up to `amount` chips out of the stack into the street bet.
    /// Returns what was actually paid; an emptied stack goes all-in.
    pub(crate) fn commit_chips(&mut self, amount: u64) -> u64 {
        let paid = self.stack.min(amount);
        self.stack -= paid;
        self.current_bet += paid;
        if self.stack == 0 {
            self.status = PlayerStatus::AllIn;
        }
        paid
    }

    pub(crate) fn reset_for_hand(&mut self) {
        self.current_bet = 0;
        self.has_acted_this_street = false;
        self.hole_cards = None;
        self.status = if self.stack == 0 { PlayerStatus::Folded } else { PlayerStatus::Active };
    }

    pub(crate) fn reset_for_street(&mut self) {
        self.current_bet = 0;
        self.has_acted_this_street = false;
    }
}

/// Seats in clockwise order after `from`, ending with `from` itself.
pub fn seats_after(from: u8) -> impl Iterator<Item = u8> {
    let n = MAX_PLAYERS as u8;
    (1..=n).map(move |step| (from % n + step) % n)
}

/// First seat clockwise after `from` (wrapping, `from` checked last) that
/// satisfies `eligible`.
///
/// ```
/// use poker_table::seats::next_seat;
///
/// let occupied = [0u8, 4, 7];
/// assert_eq!(next_seat(4, |s| occupied.contains(&s)), Some(7));
/// assert_eq!(next_seat(7, |s| occupied.contains(&s)), Some(0));
/// assert_eq!(next_seat(3, |_| false), None);
/// ```
pub fn next_seat<F>(from: u8, mut eligible: F) -> Option<u8>
where
    F: FnMut(u8) -> bool,
{
    seats_after(from).find(|&s| eligible(s))
}
