//! Stomplink Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the node loops in
//! `stomplink-core` are generic over. Board crates (the RP2040 control
//! firmware, a Teensy audio port, host-side test doubles) implement them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Node loops (stomplink-core::node)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  stomplink-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  stomplink-   │       │  in-memory    │
//! │  firmware     │       │  test pipes   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital input (footswitch, encoder phases)
//! - [`uart::SerialRx`], [`uart::SerialTx`] - Non-blocking serial link

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{ActiveLow, InputPin};
pub use uart::{SerialError, SerialRx, SerialTx, UartConfig};
