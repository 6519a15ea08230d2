//! The table aggregate: seats, stakes, and the current hand.
//!
//! Seating and hand start live here; blinds and player actions are in
//! [`crate::betting`], street advancement and payout in [`crate::lifecycle`].
//! Every operation validates fully before touching state, so an `Err` leaves
//! the table exactly as it was.

use crate::config::{TableConfig, MAX_PLAYERS};
use crate::deck::{DeckCommitter, DeckHandle, HoleCardSlots, Seed};
use crate::error::PokerError;
use crate::events::{HandHistoryEntry, HandHistoryVerb, TableEvent};
use crate::hand::Board;
use crate::seats::{next_seat, seats_after, PlayerId, PlayerState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    WaitingForPlayers,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    HandComplete,
}

impl GameState {
    /// Seats may change hands and a new hand may start.
    pub fn between_hands(self) -> bool {
        matches!(self, GameState::WaitingForPlayers | GameState::HandComplete)
    }

    /// PreFlop through Showdown.
    pub fn in_hand(self) -> bool {
        !self.between_hands()
    }

    pub fn is_betting_street(self) -> bool {
        matches!(self, GameState::PreFlop | GameState::Flop | GameState::Turn | GameState::River)
    }

    /// Street that follows a betting street.
    pub(crate) fn next_street(self) -> Option<GameState> {
        match self {
            GameState::PreFlop => Some(GameState::Flop),
            GameState::Flop => Some(GameState::Turn),
            GameState::Turn => Some(GameState::River),
            GameState::River => Some(GameState::Showdown),
            GameState::WaitingForPlayers | GameState::Showdown | GameState::HandComplete => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub(crate) table_id: u64,
    pub(crate) creator: PlayerId,
    pub(crate) config: TableConfig,
    pub(crate) seats: [Option<PlayerState>; MAX_PLAYERS],
    pub(crate) player_count: u8,
    pub(crate) button_position: Option<u8>,
    pub(crate) small_blind_seat: Option<u8>,
    pub(crate) big_blind_seat: Option<u8>,
    pub(crate) current_player_index: u8,
    pub(crate) pot: u64,
    pub(crate) current_bet: u64,
    pub(crate) game_state: GameState,
    pub(crate) hand_number: u64,
    pub(crate) community_cards: Board,
    pub(crate) street_bet_count: u8,
    pub(crate) last_raise_amount: u64,
    pub(crate) last_aggressor_index: Option<u8>,
    /// Bit `n` set once seat `n` has posted its blind this hand.
    pub(crate) blinds_posted: u16,
    pub(crate) deck: Option<DeckHandle>,
    pub(crate) deck_cursor: u8,
    /// Chips each seat put in this hand; stays put if a folded player leaves.
    pub(crate) contributions: [u64; MAX_PLAYERS],
    pub(crate) history: Vec<HandHistoryEntry>,
    pub(crate) winners: Vec<u8>,
}

impl Table {
    /// A fresh, empty table waiting for players.
    pub fn create(
        table_id: u64,
        creator: PlayerId,
        config: TableConfig,
    ) -> Result<(Self, TableEvent), PokerError> {
        config.validate()?;
        let table = Self {
            table_id,
            creator,
            config,
            seats: Default::default(),
            player_count: 0,
            button_position: None,
            small_blind_seat: None,
            big_blind_seat: None,
            current_player_index: 0,
            pot: 0,
            current_bet: 0,
            game_state: GameState::WaitingForPlayers,
            hand_number: 0,
            community_cards: Board::default(),
            street_bet_count: 0,
            last_raise_amount: 0,
            last_aggressor_index: None,
            blinds_posted: 0,
            deck: None,
            deck_cursor: 0,
            contributions: [0; MAX_PLAYERS],
            history: Vec::new(),
            winners: Vec::new(),
        };
        debug!(table_id, ?config, "table created");
        Ok((table, TableEvent::TableCreated { table_id, creator }))
    }

    pub fn table_id(&self) -> u64 {
        self.table_id
    }

    pub fn creator(&self) -> PlayerId {
        self.creator
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Occupant of each seat.
    pub fn players(&self) -> [Option<PlayerId>; MAX_PLAYERS] {
        let mut out = [None; MAX_PLAYERS];
        for (slot, seat) in out.iter_mut().zip(&self.seats) {
            *slot = seat.as_ref().map(|p| p.player);
        }
        out
    }

    pub fn player_count(&self) -> u8 {
        self.player_count
    }

    pub fn seat(&self, position: u8) -> Option<&PlayerState> {
        self.seats.get(position as usize).and_then(Option::as_ref)
    }

    /// Seated players in seat order.
    pub fn player_states(&self) -> impl Iterator<Item = &PlayerState> {
        self.seats.iter().flatten()
    }

    pub fn player_state(&self, player: &PlayerId) -> Option<&PlayerState> {
        self.player_states().find(|p| p.player == *player)
    }

    pub fn button_position(&self) -> Option<u8> {
        self.button_position
    }

    pub fn small_blind_seat(&self) -> Option<u8> {
        self.small_blind_seat
    }

    pub fn big_blind_seat(&self) -> Option<u8> {
        self.big_blind_seat
    }

    pub fn current_player_index(&self) -> u8 {
        self.current_player_index
    }

    /// Every stack plus the pot.
    pub fn chips_on_table(&self) -> u64 {
        self.player_states().fold(self.pot, |sum, p| sum.saturating_add(p.stack))
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    pub fn community_cards(&self) -> &Board {
        &self.community_cards
    }

    pub fn street_bet_count(&self) -> u8 {
        self.street_bet_count
    }

    pub fn last_raise_amount(&self) -> u64 {
        self.last_raise_amount
    }

    pub fn last_aggressor_index(&self) -> Option<u8> {
        self.last_aggressor_index
    }

    pub fn blinds_posted(&self) -> u16 {
        self.blinds_posted
    }

    /// Commitment to the current hand's deck.
    pub fn deck(&self) -> Option<DeckHandle> {
        self.deck
    }

    pub fn contributions(&self) -> &[u64; MAX_PLAYERS] {
        &self.contributions
    }

    /// Action log of the current (or last completed) hand.
    pub fn history(&self) -> &[HandHistoryEntry] {
        &self.history
    }

    /// Up to `n` history entries ending `offset` entries before the latest.
    /// An offset past the start clamps to the oldest full page.
    pub fn history_page(&self, n: usize, offset: usize) -> &[HandHistoryEntry] {
        let len = self.history.len();
        if n == 0 || len == 0 {
            return &[];
        }
        let offset = offset.min(len.saturating_sub(n));
        let end = len - offset;
        &self.history[end.saturating_sub(n)..end]
    }

    /// Seats paid in the last completed hand.
    pub fn winners(&self) -> &[u8] {
        &self.winners
    }

    /// Sit `player` at `position` with `buy_in` chips.
    pub fn join(
        &mut self,
        player: PlayerId,
        buy_in: u64,
        position: u8,
    ) -> Result<TableEvent, PokerError> {
        if !self.game_state.between_hands() {
            return Err(PokerError::GameInProgress);
        }
        if self.seat_of(&player).is_some() {
            return Err(PokerError::AlreadySeated);
        }
        if self.player_count as usize >= MAX_PLAYERS {
            return Err(PokerError::TableFull);
        }
        if !self.config.buy_in_allowed(buy_in) {
            return Err(PokerError::InvalidBuyIn);
        }
        // Every stack, bet and pot is bounded by the chips on the table.
        if self.chips_on_table().checked_add(buy_in).is_none() {
            return Err(PokerError::InvalidBuyIn);
        }
        if position as usize >= MAX_PLAYERS {
            return Err(PokerError::InvalidPosition(position));
        }
        if self.seats[position as usize].is_some() {
            return Err(PokerError::SeatTaken(position));
        }

        self.seats[position as usize] = Some(PlayerState::seated(player, buy_in, position));
        self.player_count += 1;
        debug!(table_id = self.table_id, %player, position, buy_in, "player joined");
        Ok(TableEvent::PlayerJoined { table_id: self.table_id, player, position, buy_in })
    }

    /// Give up the seat and cash out. Folded players may leave mid-hand.
    pub fn leave(&mut self, player: PlayerId) -> Result<TableEvent, PokerError> {
        let position = self.seat_of(&player).ok_or(PokerError::NotAtTable)?;
        let stack = {
            let state = self.seat(position).ok_or(PokerError::NotAtTable)?;
            if self.game_state.in_hand() && state.in_hand() {
                return Err(PokerError::CannotLeaveNow);
            }
            state.stack
        };

        self.seats[position as usize] = None;
        self.player_count -= 1;
        debug!(table_id = self.table_id, %player, position, stack, "player left");
        Ok(TableEvent::PlayerLeft { table_id: self.table_id, player, position, stack })
    }

    /// Begin the next hand: move the button, commit a deck from `seed`, deal
    /// hole-card positions and designate the blinds.
    ///
    /// `seed` must come from the host and stay secret until the deck is
    /// retired; a player who knows it can read every card.
    pub fn start_hand<D: DeckCommitter>(
        &mut self,
        dealer: &mut D,
        seed: Seed,
    ) -> Result<TableEvent, PokerError> {
        if !self.game_state.between_hands() {
            return Err(PokerError::GameInProgress);
        }
        let funded = self.player_states().filter(|p| p.stack > 0).count();
        if funded < 2 {
            return Err(PokerError::NotEnoughPlayers);
        }
        let from = self.button_position.unwrap_or(MAX_PLAYERS as u8 - 1);
        let button = self
            .next_seat_where(from, |p| p.stack > 0)
            .ok_or(PokerError::NotEnoughPlayers)?;
        let deck = dealer.commit(seed)?;

        self.hand_number += 1;
        self.button_position = Some(button);
        self.deck = Some(deck);
        self.pot = 0;
        self.current_bet = 0;
        self.game_state = GameState::PreFlop;
        self.community_cards.clear();
        self.reset_street_bookkeeping();
        self.blinds_posted = 0;
        self.contributions = [0; MAX_PLAYERS];
        self.history.clear();
        self.winners.clear();
        for p in self.seats.iter_mut().flatten() {
            p.reset_for_hand();
        }

        // Two passes, one card per active seat each, starting left of the button.
        let dealt: Vec<u8> =
            seats_after(button).filter(|&s| self.seat_is(s, PlayerState::is_active)).collect();
        let n = dealt.len() as u8;
        for (i, &s) in dealt.iter().enumerate() {
            let i = i as u8;
            if let Some(p) = self.seats[s as usize].as_mut() {
                p.hole_cards = Some(HoleCardSlots([i, n + i]));
            }
        }
        self.deck_cursor = 2 * n;

        let (sb, bb) = if n == 2 {
            let bb = self.next_seat_where(button, PlayerState::is_active).unwrap_or(button);
            (button, bb)
        } else {
            let sb = self.next_seat_where(button, PlayerState::is_active).unwrap_or(button);
            let bb = self.next_seat_where(sb, PlayerState::is_active).unwrap_or(sb);
            (sb, bb)
        };
        self.small_blind_seat = Some(sb);
        self.big_blind_seat = Some(bb);
        self.current_player_index = sb;

        info!(
            table_id = self.table_id,
            hand_number = self.hand_number,
            button,
            small_blind = sb,
            big_blind = bb,
            %deck,
            "hand started"
        );
        Ok(TableEvent::HandStarted {
            table_id: self.table_id,
            hand_number: self.hand_number,
            button,
            deck,
        })
    }

    pub(crate) fn seat_of(&self, player: &PlayerId) -> Option<u8> {
        self.player_states().find(|p| p.player == *player).map(|p| p.position)
    }

    pub(crate) fn seat_mut(&mut self, position: u8) -> Option<&mut PlayerState> {
        self.seats.get_mut(position as usize).and_then(Option::as_mut)
    }

    /// Whether `position` is occupied by a player satisfying `pred`.
    pub(crate) fn seat_is<F>(&self, position: u8, pred: F) -> bool
    where
        F: Fn(&PlayerState) -> bool,
    {
        self.seat(position).is_some_and(pred)
    }

    pub(crate) fn next_seat_where<F>(&self, from: u8, pred: F) -> Option<u8>
    where
        F: Fn(&PlayerState) -> bool,
    {
        next_seat(from, |s| self.seat_is(s, &pred))
    }

    /// Seat that takes the action after `from`: the next active player, or
    /// with nobody left to bet, the next player still in the hand.
    pub(crate) fn next_to_act(&self, from: u8) -> u8 {
        self.next_seat_where(from, PlayerState::is_active)
            .or_else(|| self.next_seat_where(from, PlayerState::in_hand))
            .unwrap_or(from)
    }

    pub(crate) fn count_where<F>(&self, pred: F) -> usize
    where
        F: Fn(&PlayerState) -> bool,
    {
        self.player_states().filter(|p| pred(p)).count()
    }

    pub(crate) fn player_at(&self, position: u8) -> Result<PlayerId, PokerError> {
        self.seat(position).map(|p| p.player).ok_or(PokerError::InvalidWinner(position))
    }

    pub(crate) fn blinds_complete(&self) -> bool {
        match (self.small_blind_seat, self.big_blind_seat) {
            (Some(sb), Some(bb)) => {
                self.blinds_posted & (1 << sb) != 0 && self.blinds_posted & (1 << bb) != 0
            }
            _ => false,
        }
    }

    pub(crate) fn reset_street_bookkeeping(&mut self) {
        self.street_bet_count = 0;
        self.last_raise_amount = 0;
        self.last_aggressor_index = None;
    }

    pub(crate) fn record(&mut self, position: u8, verb: HandHistoryVerb, amount: Option<u64>) {
        self.history.push(HandHistoryEntry { position, verb, amount, street: self.game_state });
    }
}
