//! Backtrace defaults.

use std::sync::Once;

static INIT: Once = Once::new();

/// Turns on backtraces unless `RUST_BACKTRACE` is already set.
///
/// Must be called before any other thread is spawned.
pub fn enable() {
    INIT.call_once(|| {
        if std::env::var_os("RUST_BACKTRACE").is_none() {
            // SAFETY: called once from `main` before the runtime starts.
            unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
        }
    });
}
