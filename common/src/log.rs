//! Logging shorthands used across the workspace.
//!
//! They forward to `tracing`; the binary decides how events are rendered.

/// Target used for "operation succeeded" lines.
pub const SUCCESS_TARGET: &str = "ntlbox::success";

/// Target used for raw terminal output that must not carry a status symbol.
pub const PRINT_TARGET: &str = "ntlbox::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "ntlbox::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::tracing::error!($($arg)*)
    };
}
