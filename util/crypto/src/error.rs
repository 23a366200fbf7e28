use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("invalid private key")]
    InvalidPrivKey,

    #[error("invalid public key")]
    InvalidPubKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid message")]
    InvalidMessage,

    #[error("invalid recovery id")]
    InvalidRecoveryId,

    #[error("failed to recover public key")]
    RecoveryFailed,
}

impl From<secp256k1::Error> for Error {
    fn from(e: secp256k1::Error) -> Self {
        match e {
            secp256k1::Error::InvalidSecretKey => Error::InvalidPrivKey,
            secp256k1::Error::InvalidPublicKey => Error::InvalidPubKey,
            secp256k1::Error::InvalidMessage => Error::InvalidMessage,
            secp256k1::Error::InvalidRecoveryId => Error::InvalidRecoveryId,
            _ => Error::InvalidSignature,
        }
    }
}
