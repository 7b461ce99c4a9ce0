//! Node configuration loading

use defmt::*;

use stomplink_core::{parse_config, NodeConfig};

/// Parse the embedded node.toml
///
/// build.rs already rejects a broken file, so the fallback only matters
/// when the two validators disagree.
pub fn load(source: &str) -> NodeConfig {
    match parse_config(source) {
        Ok(config) => {
            info!(
                "Config: link timeout {} ms, coalesce {} ms, redraw {} ms",
                config.link.timeout_ms,
                config.link.level_coalesce_ms,
                config.display.redraw_interval_ms
            );
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            warn!("Using default configuration");
            NodeConfig::default()
        }
    }
}
