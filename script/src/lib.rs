//! The Kabletop battle-cell verifier.
//!
//! Given a transaction attempting to spend a battle cell, decide whether
//! the spend is a valid settlement (game over, stakes split between the
//! two players) or a valid challenge (the latest signed round is posted
//! on-chain for the opponent to answer). Everything the verifier reads
//! comes through the [`TransactionSource`] trait; inside a contract
//! build that trait fronts the host syscalls, in tests it fronts an
//! in-memory transaction.

mod error;
mod sign;
mod syscalls;
mod verify;

pub use error::ScriptError;
pub use syscalls::{Source, SyscallError, SyscallResult, TransactionSource};
pub use verify::{BattleVerifier, OperationPolicy};

/// Single-shot entry point: verifies the spend and maps the outcome to
/// the contract's exit code (0 on success).
pub fn run<TS: TransactionSource>(source: &TS) -> i8 {
    match BattleVerifier::new(source).verify() {
        Ok(()) => 0,
        Err(error) => {
            kabletop_logger::debug!("verification failed: {error}");
            error.exit_code()
        }
    }
}
