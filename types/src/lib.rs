//! Wire records and core types of the Kabletop battle cell.
//!
//! The `packed` module holds the tagged binary records exchanged through
//! lock arguments, witnesses and cell data. Readers are zero-copy views
//! over a verified slice; entities own their buffer; builders assemble
//! valid buffers for tests and off-chain clients.

pub mod constants;
pub mod core;
pub mod packed;
pub mod prelude;

pub use bytes;
pub use molecule;
