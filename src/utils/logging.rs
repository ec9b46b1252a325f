//! Logging macros gated on a module-level `ENABLE_LOGS` flag.
//!
//! The per-record paths (CSV decoding, event extraction) can emit one line per
//! row. Modules on those paths declare
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//! ```
//!
//! and use `log_debug!` / `log_info!` / `log_warn!` so the chatter can be
//! silenced per module without touching `RUST_LOG`.

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}
