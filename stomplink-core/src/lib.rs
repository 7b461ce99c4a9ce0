//! Board-agnostic logic shared by the Stomplink nodes
//!
//! This crate contains everything between the serial bytes and the
//! pixels that does not depend on a specific board:
//!
//! - Device state model and role-based field ownership
//! - Input debouncing (encoder, footswitch, touch)
//! - Command dispatch with level coalescing
//! - Dirty-tracking redraw scheduler
//! - Meter quantization
//! - Node configuration and its TOML reader
//! - Control and audio node loops

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod config;
pub mod dispatch;
pub mod input;
pub mod meter;
pub mod node;
pub mod render;
pub mod state;
pub mod time;
pub mod traits;

pub use config::{parse_config, ConfigError, NodeConfig};
pub use dispatch::CommandDispatcher;
pub use input::{InputDebouncer, IntentEvent, TouchTarget};
pub use node::{AudioNode, ControlNode, InputSample, NoMonitor};
pub use render::RedrawScheduler;
pub use state::{DeviceState, NodeRole};
pub use time::Millis;
