//! Logging abstraction layer.
//!
//! The engine logs through five crate-level macros that forward to either the
//! [`log`](https://docs.rs/log) or the [`tracing`](https://docs.rs/tracing)
//! crate, chosen by Cargo feature. Enable at most one backend; with neither
//! enabled every macro compiles to nothing.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! # What gets logged where
//!
//! | Level | Events |
//! |-------|--------|
//! | `trace_log!` | per-route match attempts, per-guard verdicts, cache hits |
//! | `debug_log!` | exact/scan match results, cache misses and invalidations |
//! | `info_log!`  | route registration, navigation start and commit |
//! | `warn_log!`  | guard vetoes, adapter failures, unresolved theme variables |
//! | `error_log!` | panicking guards and listeners |
//!
//! ```ignore
//! use polyshell::{trace_log, debug_log, info_log, warn_log, error_log};
//!
//! trace_log!("Matching '{}' against {} routes", path, count);
//! debug_log!("Guard '{}' approved '{}'", name, path);
//! info_log!("Navigation committed: '{}'", path);
//! warn_log!("Theme variable '{}' is not defined", token);
//! error_log!("Route listener panicked while handling '{}'", path);
//! ```

/// Forward a message to whichever backend is compiled in.
#[doc(hidden)]
#[macro_export]
macro_rules! __polyshell_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!($($arg)*);
    };
}

/// Emit a **trace**-level log message.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        $crate::__polyshell_log!(trace, $($arg)*)
    };
}

/// Emit a **debug**-level log message.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::__polyshell_log!(debug, $($arg)*)
    };
}

/// Emit an **info**-level log message.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        $crate::__polyshell_log!(info, $($arg)*)
    };
}

/// Emit a **warn**-level log message.
///
/// Used for every non-fatal condition the engine swallows on purpose, such as
/// a vetoed navigation or a theme token that does not resolve.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::__polyshell_log!(warn, $($arg)*)
    };
}

/// Emit an **error**-level log message.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::__polyshell_log!(error, $($arg)*)
    };
}
