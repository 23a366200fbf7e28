//! Hash functions shared by the Kabletop contract crates.
//!
//! Everything here is blake2b-256 with an empty key and empty
//! personalization, which is what the round chain-link digest and the
//! blake160 key/NFT identifiers are defined over.

pub use blake2b_rs::{Blake2b, Blake2bBuilder};

/// Output size of the full digest, in bytes.
pub const BLAKE2B_LEN: usize = 32;
/// Output size of the truncated digest, in bytes.
pub const BLAKE160_LEN: usize = 20;

/// Creates a streaming blake2b-256 hasher.
pub fn new_blake2b() -> Blake2b {
    Blake2bBuilder::new(BLAKE2B_LEN).build()
}

/// Hashes the input with blake2b-256.
pub fn blake2b_256<T: AsRef<[u8]>>(s: T) -> [u8; 32] {
    let mut result = [0u8; BLAKE2B_LEN];
    let mut blake2b = new_blake2b();
    blake2b.update(s.as_ref());
    blake2b.finalize(&mut result);
    result
}

/// First 20 bytes of the blake2b-256 digest.
///
/// Used for public key hashes and NFT identifiers.
pub fn blake160<T: AsRef<[u8]>>(s: T) -> [u8; 20] {
    let mut result = [0u8; BLAKE160_LEN];
    result.copy_from_slice(&blake2b_256(s)[..BLAKE160_LEN]);
    result
}
