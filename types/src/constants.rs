//! Protocol bounds of the battle cell.

/// Hard cap on rounds carried by one spend.
pub const MAX_ROUND_COUNT: usize = 256;
/// Hard cap on scripted operations inside one round.
pub const MAX_OPERATIONS_PER_ROUND: usize = 32;
/// Every round witness must fit this buffer.
pub const MAX_ROUND_SIZE: usize = 2048;
/// Challenge cell data must stay under this size.
pub const MAX_CHALLENGE_DATA_SIZE: usize = 2048;
/// The running script, including lock args, must fit this buffer.
pub const MAX_SCRIPT_SIZE: usize = 32768;

/// Recoverable signature length: r || s || recovery id.
pub const SIGNATURE_SIZE: usize = 65;
/// Truncated digest length for key hashes and NFT identifiers.
pub const BLAKE160_SIZE: usize = 20;
/// Full blake2b digest length.
pub const BLAKE2B_BLOCK_SIZE: usize = 32;
/// Per-round PRNG seed, taken from the head of the round signature.
pub const SEED_SIZE: usize = 16;

/// Cell-dep data carrying this prefix contributes interpreter chunks.
pub const CELLDEP_CODE_PREFIX: &[u8] = b"kabletop:";
