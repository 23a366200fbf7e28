use super::{Message, Pubkey, Signature, SECP256K1};
use crate::Error;

/// A secp256k1 secret key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Privkey([u8; 32]);

impl Privkey {
    /// Wraps 32 raw bytes without checking they form a valid scalar;
    /// validity surfaces from `pubkey` or `sign_recoverable`.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut inner = [0u8; 32];
        inner.copy_from_slice(&data[..32]);
        Privkey(inner)
    }

    pub fn pubkey(&self) -> Result<Pubkey, Error> {
        let sk = secp256k1::SecretKey::from_slice(&self.0)?;
        Ok(Pubkey::new(secp256k1::PublicKey::from_secret_key(
            &SECP256K1, &sk,
        )))
    }

    /// Signs the message, producing a 65-byte recoverable signature.
    pub fn sign_recoverable(&self, message: &Message) -> Result<Signature, Error> {
        let sk = secp256k1::SecretKey::from_slice(&self.0)?;
        let recoverable = SECP256K1.sign_ecdsa_recoverable(&message.to_secp()?, &sk);
        Ok(Signature::from_recoverable(recoverable))
    }
}
