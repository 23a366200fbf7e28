//! Traits shared by all packed readers.

use molecule::error::VerificationResult;

/// A zero-copy view over a serialized record.
///
/// `verify` walks the outer frame with explicit length checks;
/// accessors on a verified reader never read out of bounds.
pub trait Reader<'r>: Sized {
    const NAME: &'static str;

    /// Wraps the slice without validating it. Accessors on an
    /// unverified reader may panic on malformed input.
    fn new_unchecked(slice: &'r [u8]) -> Self;

    fn as_slice(&self) -> &'r [u8];

    fn verify(slice: &[u8]) -> VerificationResult<()>;

    fn from_slice(slice: &'r [u8]) -> VerificationResult<Self> {
        Self::verify(slice)?;
        Ok(Self::new_unchecked(slice))
    }
}
