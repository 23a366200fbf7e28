//! Deterministic bytecode interpreter for Kabletop game operations.
//!
//! Game rules are not computed by the on-chain verifier; they are scripted
//! by the players as operation chunks and replayed inside this machine to
//! reach a `_winner` verdict. The machine therefore has to be bit-for-bit
//! deterministic across every node that replays a transaction: there are
//! no floats, no host clock, no I/O, and the only entropy source is the
//! machine's own PRNG, reseeded by the caller from signature bytes.
//!
//! # Machine model
//!
//! A stack machine with 64-bit signed integers, byte strings and lists as
//! values, plus a named global environment. Execution is bounded: the
//! value stack holds at most [`MAX_STACK`] entries and a chunk may run at
//! most [`MAX_STEPS`] instructions, so replay always terminates.
//!
//! # Instruction set
//!
//! Operands are little-endian. `name` operands are a `u8` length followed
//! by that many bytes of UTF-8. Relative jump targets are measured from
//! the end of the jump instruction and must land on an instruction
//! boundary (or one past the last instruction).
//!
//! | Byte | Mnemonic    | Operands      | Semantics |
//! |------|-------------|---------------|-----------|
//! | 0x00 | `HALT`      |               | stop executing the chunk |
//! | 0x01 | `PUSH_INT`  | `i64`         | push integer |
//! | 0x02 | `PUSH_BYTES`| `u8` len, raw | push byte string |
//! | 0x03 | `LOAD`      | name          | push the named global; error if undefined |
//! | 0x04 | `STORE`     | name          | pop into the named global |
//! | 0x10 | `ADD`       |               | pop b, a; push `a + b` (wrapping) |
//! | 0x11 | `SUB`       |               | pop b, a; push `a - b` (wrapping) |
//! | 0x12 | `MUL`       |               | pop b, a; push `a * b` (wrapping) |
//! | 0x13 | `DIV`       |               | pop b, a; push `a / b`; error if `b == 0` |
//! | 0x14 | `MOD`       |               | pop b, a; push `a % b`; error if `b == 0` |
//! | 0x18 | `EQ`        |               | pop b, a; push 1 if equal else 0 (any types) |
//! | 0x19 | `NE`        |               | complement of `EQ` |
//! | 0x1a | `LT`        |               | pop b, a; push 1 if `a < b` else 0 (ints) |
//! | 0x1b | `GT`        |               | pop b, a; push 1 if `a > b` else 0 (ints) |
//! | 0x1e | `NOT`       |               | pop a; push 1 if `a == 0` else 0 (int) |
//! | 0x30 | `JMP`       | `i16`         | jump unconditionally |
//! | 0x31 | `JZ`        | `i16`         | pop a (int); jump if `a == 0` |
//! | 0x40 | `RAND`      |               | pop n (int > 0); push uniform pick in `[0, n)` |
//! | 0x41 | `SEED`      |               | pop y, x (ints); reseed the PRNG |
//! | 0x50 | `LEN`       |               | pop list or bytes; push its length |
//! | 0x51 | `INDEX`     |               | pop i, s; push `s[i]` (list element, or byte as int) |
//! | 0x60 | `DEBUG`     |               | pop a value and log it |
//! | 0x61 | `POP`       |               | drop the top of stack |
//! | 0x62 | `DUP`       |               | duplicate the top of stack |
//! | 0x63 | `SWAP`      |               | swap the two top entries |
//!
//! Any other byte fails chunk verification. Arithmetic and comparison
//! opcodes other than `EQ`/`NE` require integers; `RAND` requires a
//! strictly positive bound; `INDEX` requires `0 <= i < len`. Violations
//! abort the chunk with a [`VmError`].
//!
//! Falling off the end of a chunk is equivalent to `HALT`.

mod asm;
mod chunk;
mod error;
mod library;
mod rng;
mod value;
#[allow(clippy::module_inception)]
mod vm;


pub use asm::{Asm, Label};
pub use chunk::Chunk;
pub use error::VmError;
pub use library::rule_library;
pub use value::Value;
pub use vm::Vm;

/// Value-stack depth limit.
pub const MAX_STACK: usize = 256;
/// Instruction budget for a single chunk execution.
pub const MAX_STEPS: usize = 65536;
