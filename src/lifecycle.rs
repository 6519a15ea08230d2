//! Street advancement, showdown, and payout.
//!
//! Hands end one of three ways: everyone but one player folds (auto-win),
//! the river closes and [`Table::showdown`] splits the pot by hand strength,
//! or the host awards the pot directly with [`Table::end_hand`]. All three
//! retire the deck, pay out, and leave the table in `HandComplete`.

use crate::cards::Card;
use crate::config::MAX_PLAYERS;
use crate::deck::{DeckCommitter, DeckError};
use crate::error::PokerError;
use crate::evaluator::{evaluate_holdem, Category, Evaluation};
use crate::events::{HandHistoryVerb, TableEvent};
use crate::hand::HoleCards;
use crate::seats::PlayerState;
use crate::table::{GameState, Table};
use tracing::{debug, info};

/// One seat's share of a finished hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Payout {
    position: u8,
    amount: u64,
    hand: Option<Category>,
    split: bool,
}

impl Table {
    /// Close the current betting street and deal the next one (burn one,
    /// then three cards for the flop or one for the turn and river). From
    /// the river this moves to `Showdown` without dealing.
    pub fn advance_street<D: DeckCommitter>(
        &mut self,
        dealer: &mut D,
    ) -> Result<TableEvent, PokerError> {
        self.ensure_street_closed()?;
        self.step_street(dealer)
    }

    /// Like [`Table::advance_street`], then keeps dealing while nobody can
    /// bet (at most one active player) and resolves the showdown when it is
    /// reached. An all-in hand runs out to payout in one call.
    pub fn advance_street_auto<D: DeckCommitter>(
        &mut self,
        dealer: &mut D,
    ) -> Result<Vec<TableEvent>, PokerError> {
        self.ensure_street_closed()?;
        let snapshot = self.clone();
        let result = self.run_out(dealer);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    /// Pay the pot to the last player standing if everyone else folded.
    /// A no-op between hands or while two or more players are still in.
    pub fn check_auto_win<D: DeckCommitter>(
        &mut self,
        dealer: &mut D,
    ) -> Result<Vec<TableEvent>, PokerError> {
        if !self.game_state.in_hand() {
            return Ok(Vec::new());
        }
        match self.count_where(PlayerState::in_hand) {
            0 => Err(PokerError::NoActivePlayersRemaining),
            1 => {
                let survivor = self
                    .next_seat_where(MAX_PLAYERS as u8 - 1, PlayerState::in_hand)
                    .ok_or(PokerError::NoActivePlayersRemaining)?;
                let revealed = self.retire_deck(dealer)?;
                Ok(self.award_uncontested(survivor, revealed))
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Reveal every remaining hand and split the pot into main and side pots
    /// by contribution level. Tied hands share a pot; odd chips go one at a
    /// time to the tied seats clockwise from the button.
    pub fn showdown<D: DeckCommitter>(
        &mut self,
        dealer: &mut D,
    ) -> Result<Vec<TableEvent>, PokerError> {
        if self.game_state != GameState::Showdown {
            return Err(PokerError::WrongGameState(self.game_state));
        }
        let contenders: Vec<u8> =
            self.player_states().filter(|p| p.in_hand()).map(|p| p.position).collect();
        match contenders.as_slice() {
            [] => return Err(PokerError::NoActivePlayersRemaining),
            [only] => {
                let revealed = self.retire_deck(dealer)?;
                return Ok(self.award_uncontested(*only, revealed));
            }
            _ => {}
        }

        let mut evals = Vec::with_capacity(contenders.len());
        for &position in &contenders {
            let hole = self.reveal_hole_cards(dealer, position)?;
            let eval = evaluate_holdem(&hole, &self.community_cards)
                .map_err(|e| DeckError::InvalidDeal(format!("seat {position}: {e}")))?;
            debug!(
                table_id = self.table_id,
                position,
                hole = %hole_str(&hole),
                category = ?eval.category,
                "hand shown"
            );
            evals.push((position, eval));
        }

        let payouts = self.split_pots(&evals);
        let revealed = self.retire_deck(dealer)?;
        Ok(self.finish_hand(&payouts, revealed))
    }

    /// Host override: the whole pot goes to `winner_position`.
    pub fn end_hand<D: DeckCommitter>(
        &mut self,
        dealer: &mut D,
        winner_position: u8,
    ) -> Result<Vec<TableEvent>, PokerError> {
        if !self.game_state.in_hand() {
            return Err(PokerError::WrongGameState(self.game_state));
        }
        if winner_position as usize >= MAX_PLAYERS {
            return Err(PokerError::InvalidPosition(winner_position));
        }
        if self.count_where(PlayerState::in_hand) == 0 {
            return Err(PokerError::NoActivePlayersRemaining);
        }
        if !self.seat_is(winner_position, PlayerState::in_hand) {
            return Err(PokerError::InvalidWinner(winner_position));
        }
        let revealed = self.retire_deck(dealer)?;
        Ok(self.award_uncontested(winner_position, revealed))
    }

    /// Reveal a seat's hole cards through the dealer.
    pub fn reveal_hole_cards<D: DeckCommitter>(
        &self,
        dealer: &D,
        position: u8,
    ) -> Result<HoleCards, PokerError> {
        let deck = self.deck.ok_or_else(|| DeckError::InvalidDeal("no deck committed".into()))?;
        let slots = self
            .seat(position)
            .and_then(|p| p.hole_cards)
            .ok_or_else(|| DeckError::InvalidDeal(format!("seat {position} has no hole cards")))?;
        let first = dealer.reveal(&deck, slots.0[0])?;
        let second = dealer.reveal(&deck, slots.0[1])?;
        HoleCards::try_new(first, second)
            .map_err(|e| PokerError::Deck(DeckError::InvalidDeal(e.to_string())))
    }

    fn ensure_street_closed(&self) -> Result<(), PokerError> {
        if !self.game_state.is_betting_street() {
            return Err(PokerError::WrongGameState(self.game_state));
        }
        if self.game_state == GameState::PreFlop && !self.blinds_complete() {
            return Err(PokerError::BlindsNotPosted);
        }
        if !self.is_betting_round_complete() {
            return Err(PokerError::BettingRoundNotComplete);
        }
        Ok(())
    }

    fn step_street<D: DeckCommitter>(&mut self, dealer: &D) -> Result<TableEvent, PokerError> {
        let next =
            self.game_state.next_street().ok_or(PokerError::WrongGameState(self.game_state))?;
        let count = match next {
            GameState::Flop => 3,
            GameState::Turn | GameState::River => 1,
            _ => 0,
        };

        let mut cursor = self.deck_cursor;
        let mut revealed: Vec<Card> = Vec::with_capacity(count);
        if count > 0 {
            let deck =
                self.deck.ok_or_else(|| DeckError::InvalidDeal("no deck committed".into()))?;
            cursor += 1; // burn
            for _ in 0..count {
                revealed.push(dealer.reveal(&deck, cursor)?);
                cursor += 1;
            }
        }

        self.community_cards.extend(revealed.iter().copied());
        self.deck_cursor = cursor;
        self.game_state = next;
        self.current_bet = 0;
        self.reset_street_bookkeeping();
        for p in self.seats.iter_mut().flatten() {
            p.reset_for_street();
        }
        let button = self.button_position.unwrap_or(0);
        self.current_player_index = self.next_to_act(button);

        debug!(
            table_id = self.table_id,
            state = ?next,
            board = ?self.community_cards.indices(),
            "street advanced"
        );
        Ok(TableEvent::StreetAdvanced { table_id: self.table_id, state: next, revealed })
    }

    fn run_out<D: DeckCommitter>(&mut self, dealer: &mut D) -> Result<Vec<TableEvent>, PokerError> {
        let mut events = vec![self.step_street(dealer)?];
        while self.game_state.is_betting_street() && self.count_where(PlayerState::is_active) <= 1 {
            events.push(self.step_street(dealer)?);
        }
        if self.game_state == GameState::Showdown {
            events.extend(self.showdown(dealer)?);
        }
        Ok(events)
    }

    /// Disclose the hand's seed. Must run before any payout mutates state.
    pub(crate) fn retire_deck<D: DeckCommitter>(
        &self,
        dealer: &mut D,
    ) -> Result<Option<TableEvent>, PokerError> {
        let Some(deck) = self.deck else {
            return Ok(None);
        };
        let seed = dealer.retire(&deck)?;
        Ok(Some(TableEvent::DeckRevealed {
            table_id: self.table_id,
            hand_number: self.hand_number,
            deck,
            seed,
        }))
    }

    pub(crate) fn award_uncontested(
        &mut self,
        position: u8,
        revealed: Option<TableEvent>,
    ) -> Vec<TableEvent> {
        let payout = Payout { position, amount: self.pot, hand: None, split: false };
        self.finish_hand(&[payout], revealed)
    }

    /// Main pot and side pots by contribution level. Chips at a level no
    /// contender reached roll into the next level.
    fn split_pots(&self, evals: &[(u8, Evaluation)]) -> Vec<Payout> {
        let n = MAX_PLAYERS;
        let start = self.button_position.map_or(0, |b| (b as usize + 1) % n);
        let order = |s: &u8| (*s as usize + n - start) % n;

        let mut levels: Vec<u64> = self.contributions.iter().copied().filter(|&c| c > 0).collect();
        levels.sort_unstable();
        levels.dedup();

        let mut winnings = [0u64; MAX_PLAYERS];
        let mut split = [false; MAX_PLAYERS];
        let mut prev = 0u64;
        let mut carry = 0u64;
        let mut last_winners: Vec<u8> = Vec::new();
        for lvl in levels {
            let contributors = self.contributions.iter().filter(|&&c| c >= lvl).count() as u64;
            let amount = (lvl - prev) * contributors + carry;
            prev = lvl;
            let eligible: Vec<&(u8, Evaluation)> =
                evals.iter().filter(|(s, _)| self.contributions[*s as usize] >= lvl).collect();
            let Some(best) = eligible.iter().map(|(_, e)| *e).max() else {
                carry = amount;
                continue;
            };
            carry = 0;
            let mut pot_winners: Vec<u8> =
                eligible.iter().filter(|(_, e)| *e == best).map(|(s, _)| *s).collect();
            pot_winners.sort_by_key(order);
            share(amount, &pot_winners, &mut winnings, &mut split);
            last_winners = pot_winners;
        }
        if carry > 0 {
            if last_winners.is_empty() {
                if let Some(best) = evals.iter().map(|(_, e)| *e).max() {
                    last_winners =
                        evals.iter().filter(|(_, e)| *e == best).map(|(s, _)| *s).collect();
                    last_winners.sort_by_key(order);
                }
            }
            share(carry, &last_winners, &mut winnings, &mut split);
        }

        let mut seats: Vec<u8> = (0..n as u8).filter(|&s| winnings[s as usize] > 0).collect();
        seats.sort_by_key(order);
        seats
            .into_iter()
            .map(|s| Payout {
                position: s,
                amount: winnings[s as usize],
                hand: evals.iter().find(|(p, _)| *p == s).map(|(_, e)| e.category),
                split: split[s as usize],
            })
            .collect()
    }

    /// Pay out and close the hand. Infallible: callers validate and retire
    /// the deck first.
    fn finish_hand(&mut self, payouts: &[Payout], revealed: Option<TableEvent>) -> Vec<TableEvent> {
        let table_id = self.table_id;
        let mut events = Vec::with_capacity(payouts.len() + 2);
        let mut total = 0u64;
        let mut winner = None;
        for payout in payouts {
            let Some(p) = self.seat_mut(payout.position) else {
                continue;
            };
            p.stack += payout.amount;
            let player = p.player;
            total += payout.amount;
            winner.get_or_insert(player);
            let verb = if payout.split { HandHistoryVerb::Split } else { HandHistoryVerb::Win };
            self.record(payout.position, verb, Some(payout.amount));
            events.push(TableEvent::PotAwarded {
                table_id,
                player,
                position: payout.position,
                amount: payout.amount,
                hand: payout.hand,
            });
        }

        self.winners = payouts.iter().map(|p| p.position).collect();
        self.pot = 0;
        self.current_bet = 0;
        self.reset_street_bookkeeping();
        for p in self.seats.iter_mut().flatten() {
            p.reset_for_street();
        }
        self.deck = None;
        self.game_state = GameState::HandComplete;

        if let Some(winner) = winner {
            events.push(TableEvent::HandComplete { table_id, winner, pot: total });
        }
        events.extend(revealed);
        info!(
            table_id,
            hand_number = self.hand_number,
            winners = ?self.winners,
            pot = total,
            "hand complete"
        );
        events
    }
}

/// Split `amount` evenly; the remainder goes one chip at a time in `winners` order.
fn share(
    amount: u64,
    winners: &[u8],
    winnings: &mut [u64; MAX_PLAYERS],
    split: &mut [bool; MAX_PLAYERS],
) {
    if winners.is_empty() {
        return;
    }
    let k = winners.len() as u64;
    let per = amount / k;
    let mut rem = amount % k;
    for &s in winners {
        let extra = u64::from(rem > 0);
        rem -= extra;
        winnings[s as usize] += per + extra;
        if k > 1 {
            split[s as usize] = true;
        }
    }
}

fn hole_str(hole: &HoleCards) -> String {
    format!("{}{}", hole.first(), hole.second())
}
