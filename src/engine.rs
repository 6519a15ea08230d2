// Instruction boundary. Hosts (a chain runtime, a server, a test harness)
// submit one `Instruction` at a time on behalf of a caller and get back the
// events it produced. Tables are only reachable mutably through `execute`.
// Deck seeds never travel in an instruction: the registry derives them from
// host entropy the callers cannot see.

use crate::betting::PlayerActionType;
use crate::config::TableConfig;
use crate::deck::{ChaChaDealer, DeckCommitter, Seed};
use crate::error::PokerError;
use crate::events::TableEvent;
use crate::hand::HoleCards;
use crate::seats::{PlayerId, PlayerState};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Everything a caller can ask a table to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Instruction {
    InitializeTable { config: TableConfig },
    JoinTable { buy_in_amount: u64, position: u8 },
    LeaveTable,
    StartHand,
    PostBlinds,
    PlayerAction { action: PlayerActionType, raise_amount: u64 },
    AdvanceStreet,
    AdvanceStreetAuto,
    CheckAutoWin,
    Showdown,
    EndHand { winner_position: u8 },
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        match self {
            Instruction::InitializeTable { .. } => "initialize_table",
            Instruction::JoinTable { .. } => "join_table",
            Instruction::LeaveTable => "leave_table",
            Instruction::StartHand => "start_hand",
            Instruction::PostBlinds => "post_blinds",
            Instruction::PlayerAction { .. } => "player_action",
            Instruction::AdvanceStreet => "advance_street",
            Instruction::AdvanceStreetAuto => "advance_street_auto",
            Instruction::CheckAutoWin => "check_auto_win",
            Instruction::Showdown => "showdown",
            Instruction::EndHand { .. } => "end_hand",
        }
    }
}

pub trait TableEngine {
    // Mutation
    fn execute(
        &mut self,
        table_id: u64,
        caller: PlayerId,
        instruction: Instruction,
    ) -> Result<Vec<TableEvent>, PokerError>;

    // Queries
    fn table(&self, table_id: u64) -> Option<&Table>;
    fn player_state(&self, table_id: u64, player: &PlayerId) -> Option<&PlayerState>;
    fn hole_cards(
        &self,
        table_id: u64,
        player: &PlayerId,
    ) -> Result<Option<HoleCards>, PokerError>;
}

/// Arena of tables keyed by id, plus the deck committer they share.
///
/// Hand `n` of table `t` is dealt from `entropy.derive(t, n)`. Replicas of one
/// table must share the entropy and keep it from the players.
#[derive(Debug)]
pub struct TableRegistry<D = ChaChaDealer> {
    tables: BTreeMap<u64, Table>,
    dealer: D,
    entropy: Seed,
}

impl<D: Default> Default for TableRegistry<D> {
    fn default() -> Self {
        Self { tables: BTreeMap::new(), dealer: D::default(), entropy: Seed::random() }
    }
}

impl TableRegistry<ChaChaDealer> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: DeckCommitter> TableRegistry<D> {
    /// Registry with fresh entropy from the thread RNG.
    pub fn with_dealer(dealer: D) -> Self {
        Self::with_entropy(dealer, Seed::random())
    }

    /// Registry whose deck seeds all derive from `entropy`.
    pub fn with_entropy(dealer: D, entropy: Seed) -> Self {
        Self { tables: BTreeMap::new(), dealer, entropy }
    }

    pub fn dealer(&self) -> &D {
        &self.dealer
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Load a persisted table. Only tables between hands survive a restart
    /// with a fresh dealer; a mid-hand table needs the dealer that holds its deck.
    pub fn restore(&mut self, table: Table) -> Result<(), PokerError> {
        let id = table.table_id();
        if self.tables.contains_key(&id) {
            return Err(PokerError::TableExists(id));
        }
        self.tables.insert(id, table);
        Ok(())
    }

    /// Apply one instruction from `caller` to table `table_id`.
    #[tracing::instrument(
        skip(self, caller, instruction),
        fields(caller = %caller, kind = instruction.name())
    )]
    pub fn execute(
        &mut self,
        table_id: u64,
        caller: PlayerId,
        instruction: Instruction,
    ) -> Result<Vec<TableEvent>, PokerError> {
        let result = self.dispatch(table_id, caller, instruction);
        match &result {
            Ok(events) => debug!(events = events.len(), "instruction applied"),
            Err(e) => warn!(code = e.code(), error = %e, "instruction rejected"),
        }
        result
    }

    fn dispatch(
        &mut self,
        table_id: u64,
        caller: PlayerId,
        instruction: Instruction,
    ) -> Result<Vec<TableEvent>, PokerError> {
        if let Instruction::InitializeTable { config } = instruction {
            if self.tables.contains_key(&table_id) {
                return Err(PokerError::TableExists(table_id));
            }
            let (table, event) = Table::create(table_id, caller, config)?;
            self.tables.insert(table_id, table);
            return Ok(vec![event]);
        }

        let entropy = self.entropy;
        let table = self.tables.get_mut(&table_id).ok_or(PokerError::TableNotFound(table_id))?;
        let dealer = &mut self.dealer;
        match instruction {
            Instruction::InitializeTable { .. } => Err(PokerError::TableExists(table_id)),
            Instruction::JoinTable { buy_in_amount, position } => {
                table.join(caller, buy_in_amount, position).map(|e| vec![e])
            }
            Instruction::LeaveTable => table.leave(caller).map(|e| vec![e]),
            Instruction::StartHand => {
                let seed = entropy.derive(table_id, table.hand_number() + 1);
                table.start_hand(dealer, seed).map(|e| vec![e])
            }
            Instruction::PostBlinds => table.post_blinds(caller).map(|e| vec![e]),
            Instruction::PlayerAction { action, raise_amount } => {
                table.player_action(dealer, caller, action, raise_amount)
            }
            Instruction::AdvanceStreet => table.advance_street(dealer).map(|e| vec![e]),
            Instruction::AdvanceStreetAuto => table.advance_street_auto(dealer),
            Instruction::CheckAutoWin => table.check_auto_win(dealer),
            Instruction::Showdown => table.showdown(dealer),
            Instruction::EndHand { winner_position } => table.end_hand(dealer, winner_position),
        }
    }
}

impl<D: DeckCommitter> TableEngine for TableRegistry<D> {
    fn execute(
        &mut self,
        table_id: u64,
        caller: PlayerId,
        instruction: Instruction,
    ) -> Result<Vec<TableEvent>, PokerError> {
        TableRegistry::execute(self, table_id, caller, instruction)
    }

    fn table(&self, table_id: u64) -> Option<&Table> {
        self.tables.get(&table_id)
    }

    fn player_state(&self, table_id: u64, player: &PlayerId) -> Option<&PlayerState> {
        self.tables.get(&table_id).and_then(|t| t.player_state(player))
    }

    /// `None` when no cards are dealt to the player (between hands, or sitting out).
    fn hole_cards(
        &self,
        table_id: u64,
        player: &PlayerId,
    ) -> Result<Option<HoleCards>, PokerError> {
        let table = self.tables.get(&table_id).ok_or(PokerError::TableNotFound(table_id))?;
        let state = table.player_state(player).ok_or(PokerError::NotAtTable)?;
        if state.hole_cards().is_none() || table.deck().is_none() {
            return Ok(None);
        }
        table.reveal_hole_cards(&self.dealer, state.position()).map(Some)
    }
}
