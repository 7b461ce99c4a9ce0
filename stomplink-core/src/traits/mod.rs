//! Hardware abstraction traits
//!
//! These traits define the seams between the node logic and the parts of
//! the system it only drives: the screen and the audio signal chain.

pub mod audio;
pub mod display;

pub use audio::{AudioEngine, Peaks};
pub use display::{Content, Panel, PanelError, Region};
