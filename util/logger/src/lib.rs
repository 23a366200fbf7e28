//! Logging facade.
//!
//! Domain crates log through this crate so the sink can be swapped
//! without touching call sites; inside a contract build the sink is the
//! host's debug syscall, in tests it is `env_logger`.

pub use log::{debug, error, info, log_enabled, trace, warn, Level};
