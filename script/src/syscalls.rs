//! The data access layer between the verifier and its host.
//!
//! Inside a contract build every method is a thin front over the
//! corresponding host syscall; the test suites implement the trait over
//! an in-memory transaction instead.

use kabletop_types::bytes::Bytes;

/// Where a cell or witness is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// All transaction inputs.
    Input,
    /// All transaction outputs.
    Output,
    /// Cell dependencies.
    CellDep,
    /// Inputs sharing the currently running lock; index 0 is the battle
    /// cell itself.
    GroupInput,
}

/// Non-success syscall statuses. `IndexOutOfBound` is the iteration
/// sentinel; everything else is surfaced as an encoding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallError {
    IndexOutOfBound,
    ItemMissing,
}

pub type SyscallResult<T> = Result<T, SyscallError>;

/// Read-only view of the transaction under verification.
pub trait TransactionSource {
    /// Serialized form of the currently running script.
    fn load_script(&self) -> SyscallResult<Bytes>;

    /// Hash of the currently running script.
    fn load_script_hash(&self) -> SyscallResult<[u8; 32]>;

    /// Hash of the transaction being verified.
    fn load_tx_hash(&self) -> SyscallResult<[u8; 32]>;

    /// Serialized lock script of the indexed cell.
    fn load_cell_lock(&self, index: usize, source: Source) -> SyscallResult<Bytes>;

    /// Lock script hash of the indexed cell.
    fn load_cell_lock_hash(&self, index: usize, source: Source) -> SyscallResult<[u8; 32]>;

    /// Capacity of the indexed cell.
    fn load_cell_capacity(&self, index: usize, source: Source) -> SyscallResult<u64>;

    /// Raw data of the indexed cell.
    fn load_cell_data(&self, index: usize, source: Source) -> SyscallResult<Bytes>;

    /// Raw witness bytes at the index.
    fn load_witness(&self, index: usize, source: Source) -> SyscallResult<Bytes>;

    /// The `since` field of the indexed input.
    fn load_input_since(&self, index: usize, source: Source) -> SyscallResult<u64>;

    /// Number of transaction inputs; round witnesses start right after.
    fn inputs_len(&self) -> usize;
}
