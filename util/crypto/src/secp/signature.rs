use super::{Message, Pubkey, SECP256K1, SIGNATURE_SIZE};
use crate::Error;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};

/// A 65-byte recoverable ECDSA signature: r || s || recovery id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    pub fn from_slice(data: &[u8]) -> Result<Self, Error> {
        if data.len() != SIGNATURE_SIZE {
            return Err(Error::InvalidSignature);
        }
        let mut inner = [0u8; SIGNATURE_SIZE];
        inner.copy_from_slice(data);
        Ok(Signature(inner))
    }

    pub(crate) fn from_recoverable(recoverable: RecoverableSignature) -> Self {
        let (recid, data) = recoverable.serialize_compact();
        let mut inner = [0u8; SIGNATURE_SIZE];
        inner[..64].copy_from_slice(&data);
        inner[64] = recid.to_i32() as u8;
        Signature(inner)
    }

    /// Recovers the signing public key from the signature and message.
    pub fn recover(&self, message: &Message) -> Result<Pubkey, Error> {
        let recid = RecoveryId::from_i32(i32::from(self.0[64]))?;
        let recoverable = RecoverableSignature::from_compact(&self.0[..64], recid)?;
        let key = SECP256K1
            .recover_ecdsa(&message.to_secp()?, &recoverable)
            .map_err(|_| Error::RecoveryFailed)?;
        Ok(Pubkey::from_slice(&key.serialize())?)
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }
}
