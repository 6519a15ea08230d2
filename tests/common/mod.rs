#![allow(dead_code)]

use poker_table::cards::{parse_cards, standard_deck, Card};
use poker_table::deck::{commitment, DeckError};
use poker_table::{
    ChaChaDealer, DeckCommitter, DeckHandle, Instruction, PlayerActionType, PlayerId, PokerError,
    Seed, Table, TableConfig, TableEngine, TableEvent, TableRegistry,
};
use std::collections::HashMap;

pub const TABLE: u64 = 1;

/// Host entropy every harness registry deals from.
pub const ENTROPY: Seed = Seed::from_bytes([7; 32]);

/// The seed behind hand `hand_number` of the harness table.
pub fn hand_seed(hand_number: u64) -> Seed {
    ENTROPY.derive(TABLE, hand_number)
}

pub fn pid(n: u64) -> PlayerId {
    PlayerId::from(n)
}

/// One table in a registry, driven by player ids.
pub struct Harness<D: DeckCommitter = ChaChaDealer> {
    pub reg: TableRegistry<D>,
}

impl Harness<ChaChaDealer> {
    pub fn new() -> Self {
        Self::with_dealer(ChaChaDealer::new())
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::build(ChaChaDealer::new(), config)
    }
}

impl<D: DeckCommitter> Harness<D> {
    pub fn with_dealer(dealer: D) -> Self {
        Self::build(dealer, TableConfig::default())
    }

    pub fn build(dealer: D, config: TableConfig) -> Self {
        let mut reg = TableRegistry::with_entropy(dealer, ENTROPY);
        reg.execute(TABLE, pid(0), Instruction::InitializeTable { config }).expect("create table");
        Self { reg }
    }

    /// Seat `(player, position)` pairs with 1000 chips each.
    pub fn seated(mut self, players: &[(u64, u8)]) -> Self {
        for &(id, position) in players {
            self.run(pid(id), Instruction::JoinTable { buy_in_amount: 1000, position })
                .expect("join");
        }
        self
    }

    pub fn join(&mut self, id: u64, position: u8, buy_in: u64) {
        self.run(pid(id), Instruction::JoinTable { buy_in_amount: buy_in, position })
            .expect("join");
    }

    pub fn run(&mut self, who: PlayerId, ix: Instruction) -> Result<Vec<TableEvent>, PokerError> {
        self.reg.execute(TABLE, who, ix)
    }

    pub fn table(&self) -> &Table {
        self.reg.table(TABLE).expect("table exists")
    }

    pub fn start(&mut self) -> Vec<TableEvent> {
        self.run(pid(0), Instruction::StartHand).expect("start hand")
    }

    pub fn post_blinds(&mut self) {
        for seat in [self.table().small_blind_seat(), self.table().big_blind_seat()] {
            let who = self.player_at(seat.expect("blind seat"));
            self.run(who, Instruction::PostBlinds).expect("post blind");
        }
    }

    pub fn act(
        &mut self,
        who: PlayerId,
        action: PlayerActionType,
        raise_amount: u64,
    ) -> Result<Vec<TableEvent>, PokerError> {
        self.run(who, Instruction::PlayerAction { action, raise_amount })
    }

    /// Whoever's turn it is takes `action`.
    pub fn act_next(&mut self, action: PlayerActionType, raise_amount: u64) -> Vec<TableEvent> {
        let who = self.to_act();
        self.act(who, action, raise_amount).expect("action")
    }

    pub fn to_act(&self) -> PlayerId {
        self.player_at(self.table().current_player_index())
    }

    pub fn player_at(&self, seat: u8) -> PlayerId {
        self.table().seat(seat).expect("occupied seat").player()
    }

    pub fn stack(&self, seat: u8) -> u64 {
        self.table().seat(seat).map(|p| p.stack()).unwrap_or(0)
    }

    /// Stacks plus pot; constant while nobody joins or leaves.
    pub fn chips_in_play(&self) -> u64 {
        self.table().player_states().map(|p| p.stack()).sum::<u64>() + self.table().pot()
    }
}

/// Deals a prearranged deck so hands can be scripted end to end.
pub struct RiggedDealer {
    cards: Vec<Card>,
    live: HashMap<DeckHandle, Seed>,
}

impl RiggedDealer {
    /// `holes` in deal order (first seat left of the button first), then the
    /// five board cards. Burn positions get unused cards.
    pub fn deal(holes: &[&str], board: &str) -> Self {
        let holes: Vec<Vec<Card>> = holes.iter().map(|h| parse_cards(h).expect("hole")).collect();
        let board = parse_cards(board).expect("board");
        let mut used: Vec<Card> = holes.iter().flatten().copied().collect();
        used.extend(&board);
        let mut spare = standard_deck().into_iter().filter(|c| !used.contains(c));
        let mut burn = || spare.next().expect("spare card");

        let mut cards: Vec<Card> = holes.iter().map(|h| h[0]).collect();
        cards.extend(holes.iter().map(|h| h[1]));
        cards.push(burn());
        cards.extend(&board[..3]);
        cards.push(burn());
        cards.push(board[3]);
        cards.push(burn());
        cards.push(board[4]);
        Self { cards, live: HashMap::new() }
    }
}

impl DeckCommitter for RiggedDealer {
    fn commit(&mut self, seed: Seed) -> Result<DeckHandle, DeckError> {
        let handle = commitment(&seed);
        self.live.insert(handle, seed);
        Ok(handle)
    }

    fn reveal(&self, handle: &DeckHandle, index: u8) -> Result<Card, DeckError> {
        if !self.live.contains_key(handle) {
            return Err(DeckError::UnknownHandle(*handle));
        }
        self.cards.get(index as usize).copied().ok_or(DeckError::IndexOutOfRange(index))
    }

    fn retire(&mut self, handle: &DeckHandle) -> Result<Seed, DeckError> {
        self.live.remove(handle).ok_or(DeckError::UnknownHandle(*handle))
    }
}
