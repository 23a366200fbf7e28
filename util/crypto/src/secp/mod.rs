//! secp256k1 keys and recoverable ECDSA signatures.

mod generator;
mod message;
mod privkey;
mod pubkey;
mod signature;

pub use generator::Generator;
pub use message::Message;
pub use privkey::Privkey;
pub use pubkey::Pubkey;
pub use signature::Signature;

use lazy_static::lazy_static;

/// Serialized length of a recoverable signature: r || s || recovery id.
pub const SIGNATURE_SIZE: usize = 65;

lazy_static! {
    pub(crate) static ref SECP256K1: secp256k1::Secp256k1<secp256k1::All> =
        secp256k1::Secp256k1::new();
}
