//! Embassy tasks
//!
//! Everything that awaits lives here. The node loop itself is synchronous
//! and runs inside `control_task` on a fixed tick.

mod control;
mod display;
mod input;
mod link;

pub use control::control_task;
pub use display::display_task;
pub use input::{encoder_task, touch_task};
pub use link::{link_rx_task, link_tx_task};
