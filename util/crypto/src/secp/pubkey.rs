use crate::Error;

/// A secp256k1 public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pubkey(secp256k1::PublicKey);

impl Pubkey {
    pub(crate) fn new(inner: secp256k1::PublicKey) -> Self {
        Pubkey(inner)
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, Error> {
        Ok(Pubkey(secp256k1::PublicKey::from_slice(data)?))
    }

    /// Compressed SEC1 serialization (33 bytes), the form key hashes
    /// are computed over.
    pub fn serialize(&self) -> Vec<u8> {
        self.0.serialize().to_vec()
    }
}
