//! Stomplink Link Protocol
//!
//! This crate defines the UART protocol between the control node (encoder,
//! footswitch, touch panel, display) and the audio node (signal chain). The
//! protocol is plain ASCII so either end can be watched or driven from a
//! serial terminal.
//!
//! # Protocol Overview
//!
//! One message per line, fields separated by commas:
//! ```text
//! ┌─────┬───┬─────────┬───┬─────────┬─────┬────┐
//! │ TAG │ , │ FIELD 1 │ , │ FIELD 2 │ ... │ \n │
//! └─────┴───┴─────────┴───┴─────────┴─────┴────┘
//! ```
//!
//! Control messages (`VOL`, `LVL`, `MTR`, `DLY`, `REV`, `CH`) carry
//! positional fields. Telemetry (`DBG`) carries `KEY=value` pairs so fields
//! can be added, dropped or reordered freely.
//!
//! There is no checksum and no acknowledgement. A garbled line is dropped
//! and the sender's next periodic update restores the state.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod debug;
pub mod line;
pub mod message;

pub use debug::{DebugFields, DebugKey, DebugValue, MAX_DEBUG_FIELDS, MAX_KEY_LEN};
pub use line::{Line, LineReceiver, LINE_CAPACITY, MAX_WIRE_LEN};
pub use message::{decode, encode, Effect, Message, Tag, CHANNEL_MAX, LEVEL_MAX, METER_MAX};
