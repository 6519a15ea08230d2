use crate::deck::DeckError;
use crate::table::GameState;

/// Every way a table instruction can be rejected.
///
/// A rejected instruction never changes table state. Codes are stable and
/// start at 6000 in declaration order.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PokerError {
    #[error("table is full")]
    TableFull,
    #[error("a hand is in progress")]
    GameInProgress,
    #[error("buy-in outside the table's range")]
    InvalidBuyIn,
    #[error("invalid seat position {0}")]
    InvalidPosition(u8),
    #[error("seat {0} is taken")]
    SeatTaken(u8),
    #[error("player is not seated at this table")]
    NotAtTable,
    #[error("cannot leave while still in the hand")]
    CannotLeaveNow,
    #[error("not enough players with chips to start a hand")]
    NotEnoughPlayers,
    #[error("not allowed in state {0:?}")]
    WrongGameState(GameState),
    #[error("player is not in a blind position")]
    NotBlindPosition,
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
    #[error("player is not active in this hand")]
    PlayerNotActive,
    #[error("not your turn")]
    NotYourTurn,
    #[error("cannot check when facing a bet")]
    CannotCheck,
    #[error("raise too small: min {min}, got {got}")]
    RaiseTooSmall { min: u64, got: u64 },
    #[error("seat {0} cannot win the pot")]
    InvalidWinner(u8),
    #[error("no players remain in the hand")]
    NoActivePlayersRemaining,
    #[error("blind already posted")]
    AlreadyPostedBlind,
    #[error("betting round is not complete")]
    BettingRoundNotComplete,
    #[error("invalid blinds: small {small_blind}, big {big_blind}")]
    InvalidBlinds { small_blind: u64, big_blind: u64 },
    #[error("player is already seated at this table")]
    AlreadySeated,
    #[error("blinds have not been posted")]
    BlindsNotPosted,
    #[error("betting round is already complete")]
    BettingRoundComplete,
    #[error("table {0} already exists")]
    TableExists(u64),
    #[error("table {0} not found")]
    TableNotFound(u64),
    #[error("deck error: {0}")]
    Deck(#[from] DeckError),
}

impl PokerError {
    /// Stable numeric code surfaced to clients.
    pub const fn code(&self) -> u32 {
        match self {
            PokerError::TableFull => 6000,
            PokerError::GameInProgress => 6001,
            PokerError::InvalidBuyIn => 6002,
            PokerError::InvalidPosition(_) => 6003,
            PokerError::SeatTaken(_) => 6004,
            PokerError::NotAtTable => 6005,
            PokerError::CannotLeaveNow => 6006,
            PokerError::NotEnoughPlayers => 6007,
            PokerError::WrongGameState(_) => 6008,
            PokerError::NotBlindPosition => 6009,
            PokerError::InsufficientFunds { .. } => 6010,
            PokerError::PlayerNotActive => 6011,
            PokerError::NotYourTurn => 6012,
            PokerError::CannotCheck => 6013,
            PokerError::RaiseTooSmall { .. } => 6014,
            PokerError::InvalidWinner(_) => 6015,
            PokerError::NoActivePlayersRemaining => 6016,
            PokerError::AlreadyPostedBlind => 6017,
            PokerError::BettingRoundNotComplete => 6018,
            PokerError::InvalidBlinds { .. } => 6019,
            PokerError::AlreadySeated => 6020,
            PokerError::BlindsNotPosted => 6021,
            PokerError::BettingRoundComplete => 6022,
            PokerError::TableExists(_) => 6023,
            PokerError::TableNotFound(_) => 6024,
            PokerError::Deck(_) => 6025,
        }
    }
}
