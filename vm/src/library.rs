//! The built-in rule library, linked into the verifier at build time.
//!
//! Operations scripted by the players run against the globals installed
//! here: per-player hit points and the shared round counter. Extensions
//! shipped as cell-dep chunks may overwrite or add to these before the
//! first round executes.

use once_cell::sync::Lazy;

use crate::Asm;

static RULE_LIBRARY: Lazy<Vec<u8>> = Lazy::new(|| {
    let mut asm = Asm::new();
    asm.push_int(100)
        .store("_user1_hp")
        .push_int(100)
        .store("_user2_hp")
        .push_int(0)
        .store("_round_counter")
        .finish()
});

/// Bytecode of the built-in rule library.
pub fn rule_library() -> &'static [u8] {
    &RULE_LIBRARY
}
