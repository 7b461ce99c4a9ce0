//! Logging macros
//!
//! `defmt` when the feature is on, otherwise the `log` facade if enabled.
//! With neither, the macros only borrow their arguments.

#![allow(unused_imports, unused_macros)]

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, info, trace, warn};

#[cfg(all(feature = "log", not(feature = "defmt")))]
pub(crate) use log::{debug, info, trace, warn};

#[cfg(not(any(feature = "log", feature = "defmt")))]
mod silent {
    macro_rules! trace {
        ($s:literal $(, $x:expr)* $(,)?) => {{
            let _ = ($(&$x),*);
        }};
    }

    macro_rules! debug {
        ($s:literal $(, $x:expr)* $(,)?) => {{
            let _ = ($(&$x),*);
        }};
    }

    macro_rules! info {
        ($s:literal $(, $x:expr)* $(,)?) => {{
            let _ = ($(&$x),*);
        }};
    }

    macro_rules! warn {
        ($s:literal $(, $x:expr)* $(,)?) => {{
            let _ = ($(&$x),*);
        }};
    }

    pub(crate) use {debug, info, trace, warn};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
pub(crate) use silent::{debug, info, trace, warn};
