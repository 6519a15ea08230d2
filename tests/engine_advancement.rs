mod common;

use common::{pid, Harness};
use poker_table::{GameState, Instruction, PlayerActionType, PokerError, TableConfig, TableEvent};

/// Check or call around until the street closes, then deal the next one.
fn advance_with_checks(h: &mut Harness, street: GameState) {
    assert_eq!(h.table().game_state(), street);
    let max_steps = h.table().player_count() as usize + 3;
    for _ in 0..max_steps {
        if h.table().is_betting_round_complete() {
            h.run(pid(0), Instruction::AdvanceStreet).unwrap();
            return;
        }
        let t = h.table();
        let owed = t.current_bet() - t.seat(t.current_player_index()).unwrap().current_bet();
        let action = if owed == 0 { PlayerActionType::Check } else { PlayerActionType::Call };
        h.act_next(action, 0);
    }
    panic!("street did not close from {street:?}");
}

fn three_handed() -> Harness {
    let mut h = Harness::new().seated(&[(1, 0), (2, 1), (3, 2)]);
    h.start();
    h.post_blinds();
    h
}

#[test]
fn check_down_reaches_showdown_and_pays_out() {
    let mut h = three_handed();
    advance_with_checks(&mut h, GameState::PreFlop);
    advance_with_checks(&mut h, GameState::Flop);
    advance_with_checks(&mut h, GameState::Turn);
    advance_with_checks(&mut h, GameState::River);
    assert_eq!(h.table().game_state(), GameState::Showdown);
    assert_eq!(h.table().community_cards().len(), 5);
    assert_eq!(h.table().pot(), 60);

    let events = h.run(pid(0), Instruction::Showdown).unwrap();
    assert_eq!(h.table().game_state(), GameState::HandComplete);
    assert_eq!(h.table().pot(), 0);
    assert_eq!(h.chips_in_play(), 3000);
    let paid: u64 = events
        .iter()
        .filter_map(|e| match e {
            TableEvent::PotAwarded { amount, .. } => Some(*amount),
            _ => None,
        })
        .sum();
    assert_eq!(paid, 60);
}

#[test]
fn advancing_resets_street_state() {
    let mut h = three_handed();
    h.act_next(PlayerActionType::Raise, 20);
    h.act_next(PlayerActionType::Call, 0);
    h.act_next(PlayerActionType::Call, 0);
    let events = h.run(pid(0), Instruction::AdvanceStreet).unwrap();
    assert!(matches!(
        &events[0],
        TableEvent::StreetAdvanced { state: GameState::Flop, revealed, .. } if revealed.len() == 3
    ));

    let t = h.table();
    assert_eq!(t.current_bet(), 0);
    assert_eq!(t.street_bet_count(), 0);
    assert_eq!(t.last_raise_amount(), 0);
    assert_eq!(t.last_aggressor_index(), None);
    assert!(t.player_states().all(|p| p.current_bet() == 0 && !p.has_acted_this_street()));
    assert_eq!(t.pot(), 120);
    // First active seat left of the button.
    assert_eq!(t.current_player_index(), 1);
}

#[test]
fn advance_is_refused_until_the_street_closes() {
    let mut h = Harness::new().seated(&[(1, 0), (2, 1), (3, 2)]);
    assert_eq!(
        h.run(pid(0), Instruction::AdvanceStreet),
        Err(PokerError::WrongGameState(GameState::WaitingForPlayers))
    );
    h.start();
    assert_eq!(h.run(pid(0), Instruction::AdvanceStreet), Err(PokerError::BlindsNotPosted));
    h.post_blinds();
    assert_eq!(
        h.run(pid(0), Instruction::AdvanceStreet),
        Err(PokerError::BettingRoundNotComplete)
    );
    assert_eq!(
        h.run(pid(0), Instruction::AdvanceStreetAuto),
        Err(PokerError::BettingRoundNotComplete)
    );
    assert_eq!(
        h.run(pid(0), Instruction::Showdown),
        Err(PokerError::WrongGameState(GameState::PreFlop))
    );
}

#[test]
fn postflop_bet_and_calls_advance() {
    let mut h = three_handed();
    advance_with_checks(&mut h, GameState::PreFlop);
    h.act_next(PlayerActionType::Raise, 20);
    advance_with_checks(&mut h, GameState::Flop);
    assert_eq!(h.table().game_state(), GameState::Turn);
    assert_eq!(h.table().pot(), 120);
    assert_eq!(h.table().community_cards().len(), 4);
}

#[test]
fn auto_advance_deals_one_street_while_players_can_bet() {
    let mut h = three_handed();
    h.act_next(PlayerActionType::Call, 0);
    h.act_next(PlayerActionType::Call, 0);
    h.act_next(PlayerActionType::Check, 0);
    let events = h.run(pid(0), Instruction::AdvanceStreetAuto).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(h.table().game_state(), GameState::Flop);
}

#[test]
fn auto_advance_from_the_river_settles_the_showdown() {
    let mut h = three_handed();
    advance_with_checks(&mut h, GameState::PreFlop);
    advance_with_checks(&mut h, GameState::Flop);
    advance_with_checks(&mut h, GameState::Turn);
    for _ in 0..3 {
        h.act_next(PlayerActionType::Check, 0);
    }
    let events = h.run(pid(0), Instruction::AdvanceStreetAuto).unwrap();
    assert!(matches!(
        events[0],
        TableEvent::StreetAdvanced { state: GameState::Showdown, .. }
    ));
    assert!(events.iter().any(|e| matches!(e, TableEvent::HandComplete { pot: 60, .. })));
    assert_eq!(h.table().game_state(), GameState::HandComplete);
}

#[test]
fn auto_showdown_when_all_players_all_in() {
    let mut h = Harness::with_config(TableConfig::new(5, 10, 20, 1000));
    for (id, seat) in [(1u64, 0u8), (2, 1), (3, 2)] {
        h.join(id, seat, 20);
    }
    h.start();
    h.post_blinds();
    h.act(pid(1), PlayerActionType::Raise, 10).unwrap();
    h.act(pid(2), PlayerActionType::Call, 0).unwrap();
    h.act(pid(3), PlayerActionType::Call, 0).unwrap();
    assert!(h.table().player_states().all(|p| p.stack() == 0));

    let events = h.run(pid(0), Instruction::AdvanceStreetAuto).unwrap();
    let streets = events.iter().filter(|e| matches!(e, TableEvent::StreetAdvanced { .. })).count();
    assert_eq!(streets, 4);
    assert_eq!(h.table().game_state(), GameState::HandComplete);
    assert_eq!(h.table().community_cards().len(), 5);
    assert_eq!(h.chips_in_play(), 60);
}
