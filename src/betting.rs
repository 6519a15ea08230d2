//! Blinds, player actions, and the round-completion rule.
//!
//! A street's betting round is over when every `Active` player has acted
//! since the last raise and has matched the table's current bet. All-in and
//! folded players are out of the rotation. Raises are sized as the increment
//! over the current bet and must be at least the previous raise on the street
//! (the big blind for the first one).

use crate::deck::DeckCommitter;
use crate::error::PokerError;
use crate::events::{HandHistoryVerb, TableEvent};
use crate::seats::{PlayerId, PlayerState, PlayerStatus};
use crate::table::{GameState, Table};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerActionType {
    Fold,
    Check,
    Call,
    Raise,
}

impl Table {
    /// Post the caller's blind. The big blind closes posting and hands the
    /// turn to the first active seat after it.
    pub fn post_blinds(&mut self, player: PlayerId) -> Result<TableEvent, PokerError> {
        if self.game_state != GameState::PreFlop {
            return Err(PokerError::WrongGameState(self.game_state));
        }
        let position = self.seat_of(&player).ok_or(PokerError::NotAtTable)?;
        let (verb, blind) = if self.small_blind_seat == Some(position) {
            (HandHistoryVerb::SmallBlind, self.config.small_blind)
        } else if self.big_blind_seat == Some(position) {
            (HandHistoryVerb::BigBlind, self.config.big_blind)
        } else {
            return Err(PokerError::NotBlindPosition);
        };
        if self.blinds_posted & (1 << position) != 0 {
            return Err(PokerError::AlreadyPostedBlind);
        }

        let paid = match self.seat_mut(position) {
            Some(p) => p.commit_chips(blind),
            None => return Err(PokerError::NotAtTable),
        };
        self.pot += paid;
        self.contributions[position as usize] += paid;
        self.current_bet = self.current_bet.max(paid);
        self.blinds_posted |= 1 << position;
        self.record(position, verb, Some(paid));

        if self.blinds_complete() {
            self.last_raise_amount = self.config.big_blind;
            let bb = self.big_blind_seat.unwrap_or(position);
            self.current_player_index = self.next_to_act(bb);
        }
        debug!(table_id = self.table_id, position, paid, blind = verb.label(), "blind posted");
        Ok(TableEvent::BlindPosted { table_id: self.table_id, player, position, amount: paid })
    }

    /// Act on the caller's turn. `raise_amount` is only read for
    /// [`PlayerActionType::Raise`], where it is the increment above the
    /// current bet.
    ///
    /// A fold that leaves a single player in the hand pays that player
    /// immediately, so `dealer` may be asked to retire the deck.
    pub fn player_action<D: DeckCommitter>(
        &mut self,
        dealer: &mut D,
        player: PlayerId,
        action: PlayerActionType,
        raise_amount: u64,
    ) -> Result<Vec<TableEvent>, PokerError> {
        if !self.game_state.is_betting_street() {
            return Err(PokerError::WrongGameState(self.game_state));
        }
        let position = self.seat_of(&player).ok_or(PokerError::NotAtTable)?;
        if self.game_state == GameState::PreFlop && !self.blinds_complete() {
            return Err(PokerError::BlindsNotPosted);
        }
        let (stack, bet) = match self.seat(position) {
            Some(p) if p.is_active() => (p.stack, p.current_bet),
            Some(_) => return Err(PokerError::PlayerNotActive),
            None => return Err(PokerError::NotAtTable),
        };
        if position != self.current_player_index {
            return Err(PokerError::NotYourTurn);
        }
        if self.is_betting_round_complete() {
            return Err(PokerError::BettingRoundComplete);
        }

        let owed = self.current_bet.saturating_sub(bet);
        let chips = match action {
            PlayerActionType::Fold => 0,
            PlayerActionType::Check if owed > 0 => return Err(PokerError::CannotCheck),
            PlayerActionType::Check => 0,
            PlayerActionType::Call => owed.min(stack),
            PlayerActionType::Raise => {
                let min = self.config.big_blind.max(self.last_raise_amount);
                if raise_amount < min {
                    return Err(PokerError::RaiseTooSmall { min, got: raise_amount });
                }
                let needed = owed.checked_add(raise_amount).unwrap_or(u64::MAX);
                if needed > stack {
                    return Err(PokerError::InsufficientFunds { needed, available: stack });
                }
                needed
            }
        };

        let folds_out =
            action == PlayerActionType::Fold && self.count_where(PlayerState::in_hand) == 2;
        if folds_out {
            // Last opponent folding: retire the deck before anything moves.
            let survivor =
                self.next_seat_where(position, PlayerState::in_hand).unwrap_or(position);
            let revealed = self.retire_deck(dealer)?;
            self.fold(position);
            let mut events = vec![self.actioned(player, action, 0)];
            events.extend(self.award_uncontested(survivor, revealed));
            return Ok(events);
        }

        match action {
            PlayerActionType::Fold => self.fold(position),
            PlayerActionType::Check | PlayerActionType::Call => {
                self.pay(position, chips);
                self.record(position, action.into(), (chips > 0).then_some(chips));
            }
            PlayerActionType::Raise => {
                self.pay(position, chips);
                self.current_bet += raise_amount;
                self.last_raise_amount = raise_amount;
                self.last_aggressor_index = Some(position);
                self.street_bet_count = self.street_bet_count.saturating_add(1);
                for p in self.seats.iter_mut().flatten() {
                    if p.position != position && p.is_active() {
                        p.has_acted_this_street = false;
                    }
                }
                // Logged as the total the raiser is now in for.
                self.record(position, HandHistoryVerb::Raise, Some(self.current_bet));
            }
        }
        if let Some(p) = self.seat_mut(position) {
            p.has_acted_this_street = true;
        }
        self.current_player_index = self.next_to_act(position);
        debug!(
            table_id = self.table_id,
            position,
            ?action,
            chips,
            pot = self.pot,
            next = self.current_player_index,
            "player acted"
        );
        Ok(vec![self.actioned(player, action, chips)])
    }

    /// Every active player has acted and matched the current bet. With at
    /// most one active player left there is nobody to bet against, so the
    /// round closes as soon as that player has matched.
    pub fn is_betting_round_complete(&self) -> bool {
        let active: Vec<&PlayerState> = self.player_states().filter(|p| p.is_active()).collect();
        if active.len() <= 1 {
            return active.iter().all(|p| p.current_bet >= self.current_bet);
        }
        active.iter().all(|p| p.has_acted_this_street && p.current_bet == self.current_bet)
    }

    fn fold(&mut self, position: u8) {
        if let Some(p) = self.seat_mut(position) {
            p.status = PlayerStatus::Folded;
            p.has_acted_this_street = true;
        }
        self.record(position, HandHistoryVerb::Fold, None);
    }

    fn pay(&mut self, position: u8, chips: u64) {
        let paid = match self.seat_mut(position) {
            Some(p) => p.commit_chips(chips),
            None => 0,
        };
        self.pot += paid;
        self.contributions[position as usize] += paid;
    }

    fn actioned(&self, player: PlayerId, action: PlayerActionType, amount: u64) -> TableEvent {
        TableEvent::PlayerActioned { table_id: self.table_id, player, action, amount }
    }
}
