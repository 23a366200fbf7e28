//! The verification pipeline.
//!
//! Strictly linear: decode the battle parameters, walk the witness
//! chain, detect the spend mode, replay the scripted rounds, then
//! arbitrate the outcome. Any failure aborts with its error; there is
//! no retry and no partial success.

mod args;
mod mode;
mod outcome;
mod replay;
mod witnesses;

#[cfg(test)]
pub(crate) mod tests;

use kabletop_types::constants::SIGNATURE_SIZE;
use kabletop_types::packed::RoundReader;
use kabletop_types::prelude::Reader;

use crate::{ScriptError, TransactionSource};

/// What to do when an operation chunk fails to load or execute.
///
/// The game outcome is computed by those chunks, so skipping one can
/// change the winner; `Strict` therefore fails the spend, while
/// `Lenient` logs and continues for compatibility with histories that
/// carry dead operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationPolicy {
    #[default]
    Strict,
    Lenient,
}

/// One round recovered from a witness: the serialized payload, its
/// signature, and the PRNG seed drawn from the signature head.
pub(crate) struct RoundData {
    pub(crate) payload: Vec<u8>,
    pub(crate) signature: [u8; SIGNATURE_SIZE],
    pub(crate) seed: [u64; 2],
}

impl RoundData {
    /// Payload view; the payload was verified during the witness walk.
    pub(crate) fn reader(&self) -> RoundReader<'_> {
        RoundReader::new_unchecked(&self.payload)
    }
}

/// Verifies one battle-cell spend against the transaction it sits in.
pub struct BattleVerifier<'a, TS> {
    source: &'a TS,
    policy: OperationPolicy,
}

impl<'a, TS: TransactionSource> BattleVerifier<'a, TS> {
    pub fn new(source: &'a TS) -> Self {
        BattleVerifier {
            source,
            policy: OperationPolicy::Strict,
        }
    }

    pub fn with_policy(source: &'a TS, policy: OperationPolicy) -> Self {
        BattleVerifier { source, policy }
    }

    pub fn verify(&self) -> Result<(), ScriptError> {
        let battle_args = args::decode(self.source)?;
        let (signer, rounds) = witnesses::verify_chain(self.source, battle_args.as_reader())?;
        let (mode, input_challenge) = mode::detect(self.source, rounds.len())?;
        let winner = replay::run(self.source, battle_args.as_reader(), &rounds, self.policy)?;
        match mode {
            mode::Mode::Settlement => outcome::verify_settlement(
                self.source,
                battle_args.as_reader(),
                signer,
                input_challenge.as_ref(),
                winner,
            ),
            mode::Mode::Challenge(challenge) => {
                outcome::verify_challenge(&rounds, &challenge)
            }
        }
    }
}
