//! Text-mode display support for Stomplink
//!
//! This crate provides:
//! - `DisplayBackend` trait for character-cell displays
//! - `Screen`, an in-memory cell buffer with per-row dirty tracking
//! - `TextPanel`, which lays out the node's regions on a backend and
//!   implements the core `Panel` trait
//!
//! # Layout (21 x 8 cells, 128x64 OLED with a 6x8 cell)
//!
//! ```text
//!   0         1         2
//!   012345678901234567890
//! 0 LEVEL  50       LINK
//! 1 DLY ON  REV OFF  CH 1
//! 2 IN  [######  ]
//! 3 OUT [###     ]
//! 4 DRY  1.00 WET  0.35
//! 5 DT    180 PKI  0.12
//! 6 ...
//! 7 ...
//! ```

#![no_std]

pub mod backend;
pub mod panel;
pub mod screen;

pub use backend::{DisplayBackend, DisplayError};
pub use panel::TextPanel;
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
