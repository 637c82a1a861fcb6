//! Logging facade used throughout the adapter.
//!
//! The crate never talks to a logging backend directly. Every diagnostic goes
//! through one of the macros below, which forward to [`log`](https://docs.rs/log)
//! or [`tracing`](https://docs.rs/tracing) depending on the enabled feature.
//! Enable at most one of the two features.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! With neither feature enabled the macros expand to nothing.
//!
//! ```ignore
//! use region_navigator::{debug_log, warn_log};
//!
//! debug_log!("Pushed '{}' (depth {})", path, depth);
//! warn_log!("No navigation service bound to adapter '{}'", name);
//! ```

/// Emit a **trace**-level message (`format!`-style arguments).
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Emit a **debug**-level message (`format!`-style arguments).
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Emit an **info**-level message (`format!`-style arguments).
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Emit a **warn**-level message (`format!`-style arguments).
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Emit an **error**-level message (`format!`-style arguments).
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
