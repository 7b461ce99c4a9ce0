//! Incremental screen updates
//!
//! The [`RenderCache`] remembers what each region last showed. The
//! [`RedrawScheduler`] compares it with the live state on a fixed cadence
//! and repaints only the regions that differ.

mod cache;
mod scheduler;

pub use cache::{Cached, RenderCache};
pub use scheduler::RedrawScheduler;
