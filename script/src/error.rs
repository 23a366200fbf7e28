use thiserror::Error;

/// Every way a spend can be rejected. Exit codes start at 4; the host
/// treats any non-zero exit as script failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum ScriptError {
    /// The running script cannot be loaded or its outer frame is broken
    #[error("ScriptFormat")]
    ScriptFormat = 4,

    /// The lock args are not a valid battle-parameter record
    #[error("ArgsFormat")]
    ArgsFormat = 5,

    /// A round payload fails structural checks
    #[error("RoundFormat")]
    RoundFormat = 6,

    /// No rounds, or more rounds than the protocol cap
    #[error("ExcessiveRounds")]
    ExcessiveRounds = 7,

    /// A round witness exceeds its buffer bound
    #[error("ExcessiveWitnessBytes")]
    ExcessiveWitnessBytes = 8,

    /// A verified round signature resolves to the wrong player
    #[error("WrongUserRound")]
    WrongUserRound = 9,

    /// The transaction shape is neither settlement nor challenge
    #[error("WrongMode")]
    WrongMode = 10,

    /// The posted challenge signature differs from the witness
    #[error("WrongRoundSignature")]
    WrongRoundSignature = 11,

    /// The posted challenge does not mirror the latest round
    #[error("ChallengeFormat")]
    ChallengeFormat = 12,

    /// A player's payout cell is missing from the outputs
    #[error("SettlementFormat")]
    SettlementFormat = 13,

    /// The payout split violates the staking bounds
    #[error("ResultFormat")]
    ResultFormat = 14,

    /// The interpreter context (rule library or cell-dep code) failed to load
    #[error("WrongContextCode")]
    WrongContextCode = 15,

    /// An operation chunk failed, or the winner value is not a player
    #[error("WrongOperationCode")]
    WrongOperationCode = 16,

    /// A no-winner settlement without a defaulting opponent
    #[error("WrongBattleResult")]
    WrongBattleResult = 17,

    /// The timeout claim arrives before the deadline
    #[error("WrongSince")]
    WrongSince = 18,

    /// The spend signer is neither of the two players
    #[error("PubkeyHash")]
    PubkeyHash = 19,

    /// A syscall or witness framing failure outside the cases above
    #[error("Encoding")]
    Encoding = 20,
}

impl ScriptError {
    pub fn exit_code(self) -> i8 {
        self as i8
    }
}
