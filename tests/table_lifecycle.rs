mod common;

use common::{pid, Harness, TABLE};
use poker_table::config::MAX_BUY_IN;
use poker_table::{
    GameState, Instruction, PlayerActionType, PlayerStatus, PokerError, TableConfig, TableEngine,
    TableEvent, TableRegistry,
};

#[test]
fn join_then_leave_restores_the_table() {
    let mut reg = TableRegistry::new();
    let config = TableConfig::new(5, 10, 100, 1000);
    reg.execute(3, pid(9), Instruction::InitializeTable { config }).unwrap();
    let before = reg.table(3).unwrap().clone();

    let joined = reg
        .execute(3, pid(1), Instruction::JoinTable { buy_in_amount: 500, position: 3 })
        .unwrap();
    assert_eq!(
        joined,
        vec![TableEvent::PlayerJoined { table_id: 3, player: pid(1), position: 3, buy_in: 500 }]
    );
    let t = reg.table(3).unwrap();
    assert_eq!(t.player_count(), 1);
    assert_eq!(t.players()[3], Some(pid(1)));
    let seat = t.seat(3).unwrap();
    assert_eq!((seat.stack(), seat.current_bet(), seat.status()), (500, 0, PlayerStatus::Active));

    let left = reg.execute(3, pid(1), Instruction::LeaveTable).unwrap();
    assert_eq!(
        left,
        vec![TableEvent::PlayerLeft { table_id: 3, player: pid(1), position: 3, stack: 500 }]
    );
    assert_eq!(reg.table(3).unwrap(), &before);
}

#[test]
fn invalid_configs_never_create_a_table() {
    let mut reg = TableRegistry::new();
    let blinds = TableConfig::new(20, 10, 1000, 10_000);
    assert_eq!(
        reg.execute(1, pid(1), Instruction::InitializeTable { config: blinds }),
        Err(PokerError::InvalidBlinds { small_blind: 20, big_blind: 10 })
    );
    let buy_in = TableConfig::new(10, 20, 5000, 1000);
    assert_eq!(
        reg.execute(1, pid(1), Instruction::InitializeTable { config: buy_in }),
        Err(PokerError::InvalidBuyIn)
    );
    assert!(reg.is_empty());
    assert_eq!(
        reg.execute(1, pid(1), Instruction::LeaveTable),
        Err(PokerError::TableNotFound(1))
    );
}

#[test]
fn player_count_tracks_occupied_seats() {
    let mut h = Harness::new();
    for seat in 0..9u8 {
        h.join(10 + seat as u64, seat, 1000);
        let occupied = h.table().players().iter().flatten().count();
        assert_eq!(h.table().player_count() as usize, occupied);
    }
    assert_eq!(
        h.run(pid(99), Instruction::JoinTable { buy_in_amount: 1000, position: 0 }),
        Err(PokerError::TableFull)
    );
    h.run(pid(14), Instruction::LeaveTable).unwrap();
    assert_eq!(h.table().player_count(), 8);
    assert_eq!(h.table().players()[4], None);
    h.join(99, 4, 2000);
    assert_eq!(h.table().player_count(), 9);
}

#[test]
fn only_folded_players_may_leave_mid_hand() {
    let mut h = Harness::new().seated(&[(1, 0), (2, 1), (3, 2)]);
    h.start();
    h.post_blinds();
    assert_eq!(h.run(pid(1), Instruction::LeaveTable), Err(PokerError::CannotLeaveNow));
    assert_eq!(h.run(pid(7), Instruction::LeaveTable), Err(PokerError::NotAtTable));
    assert_eq!(
        h.run(pid(7), Instruction::JoinTable { buy_in_amount: 1000, position: 5 }),
        Err(PokerError::GameInProgress)
    );

    // Button on seat 0 acts first three-handed.
    h.act(pid(1), PlayerActionType::Fold, 0).unwrap();
    let events = h.run(pid(1), Instruction::LeaveTable).unwrap();
    assert!(matches!(events[0], TableEvent::PlayerLeft { stack: 1000, position: 0, .. }));
    assert_eq!(h.table().player_count(), 2);
    assert_eq!(h.table().game_state(), GameState::PreFlop);

    h.act_next(PlayerActionType::Call, 0);
    h.act_next(PlayerActionType::Check, 0);
    assert!(h.table().is_betting_round_complete());
    assert_eq!(h.chips_in_play(), 2000);
}

#[test]
fn everyone_may_leave_once_the_hand_is_over() {
    let mut h = Harness::new().seated(&[(1, 0), (2, 1)]);
    h.start();
    h.post_blinds();
    h.act(pid(1), PlayerActionType::Fold, 0).unwrap();
    assert_eq!(h.table().game_state(), GameState::HandComplete);
    h.run(pid(1), Instruction::LeaveTable).unwrap();
    let events = h.run(pid(2), Instruction::LeaveTable).unwrap();
    assert!(matches!(events[0], TableEvent::PlayerLeft { stack: 1010, .. }));
    assert_eq!(h.table().player_count(), 0);
    assert_eq!(h.reg.table(TABLE).map(|t| t.hand_number()), Some(1));
}

#[test]
fn start_requires_two_funded_players() {
    let mut h = Harness::new().seated(&[(1, 4)]);
    assert_eq!(h.run(pid(1), Instruction::StartHand), Err(PokerError::NotEnoughPlayers));
    h.join(2, 8, 1000);
    let events = h.start();
    assert!(matches!(events[0], TableEvent::HandStarted { hand_number: 1, button: 4, .. }));
    assert_eq!(h.table().game_state(), GameState::PreFlop);
}

#[test]
fn a_hand_with_everyone_all_in_is_still_in_progress() {
    let mut h = Harness::new().seated(&[(1, 0), (2, 1)]);
    h.start();
    h.post_blinds();
    h.act(pid(1), PlayerActionType::Raise, 980).unwrap();
    h.act(pid(2), PlayerActionType::Call, 0).unwrap();
    assert_eq!((h.stack(0), h.stack(1)), (0, 0));
    assert_eq!(h.run(pid(1), Instruction::StartHand), Err(PokerError::GameInProgress));
}

#[test]
fn buy_ins_that_would_overflow_the_table_are_refused() {
    let mut h = Harness::with_config(TableConfig::new(10, 20, 1, MAX_BUY_IN));
    for seat in 0..9u8 {
        h.join(seat as u64 + 1, seat, MAX_BUY_IN);
    }
    assert_eq!(h.table().chips_on_table(), 9 * MAX_BUY_IN);

    // Everyone folds to the big blind; the small blind walks away 10 down.
    h.start();
    h.post_blinds();
    for _ in 0..8 {
        h.act_next(PlayerActionType::Fold, 0);
    }
    assert_eq!(h.table().game_state(), GameState::HandComplete);
    assert_eq!(h.stack(2), MAX_BUY_IN + 10);
    h.run(pid(2), Instruction::LeaveTable).unwrap();

    let room = u64::MAX - h.table().chips_on_table();
    let before = h.table().clone();
    assert_eq!(
        h.run(pid(20), Instruction::JoinTable { buy_in_amount: room + 1, position: 1 }),
        Err(PokerError::InvalidBuyIn)
    );
    assert_eq!(h.table(), &before);
    h.join(20, 1, room);
    assert_eq!(h.table().chips_on_table(), u64::MAX);
}
