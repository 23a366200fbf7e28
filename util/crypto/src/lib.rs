//! Signature primitives for the Kabletop contract crates.
//!
//! Thin wrappers around libsecp256k1 exposing exactly what the verifier
//! needs: recoverable signing, public key recovery and compressed key
//! serialization.

mod error;
pub mod secp;

pub use error::Error;
