//! Node configuration
//!
//! Every timing and limit constant a node uses lives in [`NodeConfig`].
//! Defaults match the shipped pedal; boards may override them from a
//! `node.toml` read with [`parse_config`].

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ConfigError};
pub use types::*;
