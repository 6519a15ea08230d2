//! poker-table: a deterministic No-Limit Hold'em table engine
//!
//! Goals:
//! - One table is a replicated state machine: same instructions, same state
//! - Every instruction validates first and either applies fully or fails with
//!   a typed [`PokerError`] and no state change
//! - The deck is committed before any card is dealt and its seed disclosed
//!   once the hand is over
//!
//! ## Quick start: a heads-up hand
//! ```
//! use poker_table::{GameState, Instruction, PlayerActionType, PlayerId, TableConfig};
//! use poker_table::{TableEngine, TableRegistry};
//!
//! let (alice, bob) = (PlayerId::from(1), PlayerId::from(2));
//! let mut reg = TableRegistry::new();
//! reg.execute(7, alice, Instruction::InitializeTable { config: TableConfig::default() }).unwrap();
//! reg.execute(7, alice, Instruction::JoinTable { buy_in_amount: 1000, position: 0 }).unwrap();
//! reg.execute(7, bob, Instruction::JoinTable { buy_in_amount: 1000, position: 1 }).unwrap();
//! reg.execute(7, alice, Instruction::StartHand).unwrap();
//! reg.execute(7, alice, Instruction::PostBlinds).unwrap();
//! reg.execute(7, bob, Instruction::PostBlinds).unwrap();
//! assert_eq!(reg.table(7).unwrap().pot(), 30);
//!
//! // Alice (button, small blind) folds: Bob takes the pot.
//! let fold = Instruction::PlayerAction { action: PlayerActionType::Fold, raise_amount: 0 };
//! reg.execute(7, alice, fold).unwrap();
//! let table = reg.table(7).unwrap();
//! assert_eq!(table.game_state(), GameState::HandComplete);
//! assert_eq!(table.player_state(&bob).unwrap().stack(), 1010);
//! ```
//!
//! ## Evaluate a Hold'em hand
//! ```
//! use poker_table::evaluator::{evaluate_holdem, Category};
//! use poker_table::hand::{Board, HoleCards};
//!
//! let hole: HoleCards = "As Ah".parse().unwrap();
//! let board: Board = "Kc Qd Jh 3s 2c".parse().unwrap();
//! assert_eq!(evaluate_holdem(&hole, &board).unwrap().category, Category::Pair);
//! ```

pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod hand;
pub mod lifecycle;
pub mod seats;
pub mod table;

pub use betting::PlayerActionType;
pub use config::{TableConfig, MAX_PLAYERS};
pub use deck::{ChaChaDealer, DeckCommitter, DeckHandle, Seed};
pub use engine::{Instruction, TableEngine, TableRegistry};
pub use error::PokerError;
pub use events::TableEvent;
pub use seats::{PlayerId, PlayerState, PlayerStatus};
pub use table::{GameState, Table};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
