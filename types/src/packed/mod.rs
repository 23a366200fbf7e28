//! Packed wire records.
//!
//! Hand-written in the shape of molecule-generated code: every record is
//! a `Reader` view (verify first, then bounds-checked zero-copy
//! accessors), an owned entity and a builder. Tables are length-prefixed
//! with an offset header, so each frame is self-describing and is
//! validated before any interior read.

mod args;
mod bytes;
mod challenge;
mod helpers;
mod round;
mod script;
mod witness_args;

#[cfg(test)]
mod tests;

pub use args::{Args, ArgsBuilder, ArgsReader};
pub use bytes::{Bytes, BytesReader, Nfts, NftsReader};
pub use challenge::{Challenge, ChallengeBuilder, ChallengeReader};
pub use round::{Operations, OperationsReader, Round, RoundBuilder, RoundReader};
pub use script::{Script, ScriptBuilder, ScriptReader};
pub use witness_args::{WitnessArgs, WitnessArgsBuilder, WitnessArgsReader};
