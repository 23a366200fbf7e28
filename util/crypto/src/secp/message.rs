use crate::Error;

/// A 32-byte message digest to be signed or recovered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message([u8; 32]);

impl Message {
    pub fn from_slice(data: &[u8]) -> Result<Self, Error> {
        if data.len() != 32 {
            return Err(Error::InvalidMessage);
        }
        let mut inner = [0u8; 32];
        inner.copy_from_slice(data);
        Ok(Message(inner))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub(crate) fn to_secp(self) -> Result<secp256k1::Message, Error> {
        secp256k1::Message::from_slice(&self.0).map_err(Into::into)
    }
}

impl From<[u8; 32]> for Message {
    fn from(inner: [u8; 32]) -> Self {
        Message(inner)
    }
}
