//! Process-wide diagnostics verbosity, mirroring the `VERBOSE` global in
//! `original_source/src/*.cpp`. The corpus doesn't pull in a logging crate
//! for this repo's size of problem, so we don't either: a single atomic
//! level plus `eprintln!` gives callers the same "turn it up to see what's
//! happening" knob without a new dependency.

use std::sync::atomic::{AtomicI32, Ordering};

static VERBOSE: AtomicI32 = AtomicI32::new(0);

/// Sets the global verbosity level. `0` is silent, higher values print more.
pub fn set_verbosity(level: i32) {
    VERBOSE.store(level, Ordering::Relaxed);
}

/// Reads the current verbosity level.
pub fn verbosity() -> i32 {
    VERBOSE.load(Ordering::Relaxed)
}

/// Prints `message` to stderr if the current verbosity is at least `level`.
pub fn report(level: i32, message: impl std::fmt::Display) {
    if verbosity() >= level {
        eprintln!("{message}");
    }
}

macro_rules! trace {
    ($level:expr, $($arg:tt)*) => {
        $crate::diagnostics::report($level, format_args!($($arg)*))
    };
}
pub(crate) use trace;
