//! Minimal TOML reader for `node.toml`
//!
//! Handles only what the node configuration needs:
//! - `[section]` headers (`link`, `input`, `display`, `telemetry`)
//! - `key = integer` pairs, `_` digit separators allowed
//! - Comments (`#`), full-line or trailing
//!
//! Anything else is an error. Keys that are not set keep their defaults.

use super::types::NodeConfig;

/// Configuration parse error
///
/// `line` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Line is neither a header, a pair nor a comment
    Malformed { line: u16 },
    /// Section header names an unknown section
    UnknownSection { line: u16 },
    /// Key is not valid in its section
    UnknownKey { line: u16 },
    /// Value is not an integer or does not fit the field
    InvalidValue { line: u16 },
    /// Values parsed but the combination is unusable
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Link,
    Input,
    Display,
    Telemetry,
}

/// Parse a TOML document into a [`NodeConfig`]
pub fn parse_config(input: &str) -> Result<NodeConfig, ConfigError> {
    let mut config = NodeConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line = u16::try_from(index + 1).unwrap_or(u16::MAX);
        let text = strip_comment(raw).trim();

        if text.is_empty() {
            continue;
        }

        if let Some(header) = text.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(ConfigError::Malformed { line })?;
            section = parse_section_header(name.trim()).ok_or(ConfigError::UnknownSection { line })?;
            continue;
        }

        let (key, value) = text.split_once('=').ok_or(ConfigError::Malformed { line })?;
        let key = key.trim();
        let value = parse_int(value.trim()).ok_or(ConfigError::InvalidValue { line })?;
        apply_value(&mut config, section, key, value, line)?;
    }

    if !config.is_valid() {
        return Err(ConfigError::OutOfRange);
    }

    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_section_header(name: &str) -> Option<Section> {
    match name {
        "link" => Some(Section::Link),
        "input" => Some(Section::Input),
        "display" => Some(Section::Display),
        "telemetry" => Some(Section::Telemetry),
        _ => None,
    }
}

/// Parse a decimal integer, allowing `_` between digits
fn parse_int(value: &str) -> Option<i64> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return None;
    }

    let mut result: i64 = 0;
    for b in digits.bytes() {
        match b {
            b'_' => continue,
            b'0'..=b'9' => {
                result = result.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
            }
            _ => return None,
        }
    }
    Some(if negative { -result } else { result })
}

fn apply_value(
    config: &mut NodeConfig,
    section: Section,
    key: &str,
    value: i64,
    line: u16,
) -> Result<(), ConfigError> {
    let invalid = ConfigError::InvalidValue { line };
    let as_u32 = || u32::try_from(value).map_err(|_| invalid);
    let as_u8 = || u8::try_from(value).map_err(|_| invalid);

    match (section, key) {
        (Section::Link, "timeout_ms") => config.link.timeout_ms = as_u32()?,
        (Section::Link, "level_coalesce_ms") => config.link.level_coalesce_ms = as_u32()?,
        (Section::Input, "debounce_ms") => config.input.debounce_ms = as_u32()?,
        (Section::Input, "ticks_per_step") => config.input.ticks_per_step = as_u8()?,
        (Section::Input, "touch_spacing_ms") => config.input.touch_spacing_ms = as_u32()?,
        (Section::Input, "default_level") => config.input.default_level = as_u8()?,
        (Section::Display, "redraw_interval_ms") => {
            config.display.redraw_interval_ms = as_u32()?
        }
        (Section::Telemetry, "meter_period_ms") => config.telemetry.meter_period_ms = as_u32()?,
        (Section::Telemetry, "debug_period_ms") => config.telemetry.debug_period_ms = as_u32()?,
        _ => return Err(ConfigError::UnknownKey { line }),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(parse_config(""), Ok(NodeConfig::default()));
        assert_eq!(parse_config("# only a comment\n\n"), Ok(NodeConfig::default()));
    }

    #[test]
    fn test_overrides() {
        let input = r#"
# Stomplink node
[link]
timeout_ms = 1_500   # slower link
level_coalesce_ms = 20

[input]
debounce_ms = 150
ticks_per_step = 4
default_level = 70

[display]
redraw_interval_ms = 33

[telemetry]
meter_period_ms = 40
debug_period_ms = 500
"#;
        let config = parse_config(input).unwrap();
        assert_eq!(config.link.timeout_ms, 1500);
        assert_eq!(config.link.level_coalesce_ms, 20);
        assert_eq!(config.input.debounce_ms, 150);
        assert_eq!(config.input.ticks_per_step, 4);
        assert_eq!(config.input.touch_spacing_ms, 250);
        assert_eq!(config.input.default_level, 70);
        assert_eq!(config.display.redraw_interval_ms, 33);
        assert_eq!(config.telemetry.meter_period_ms, 40);
        assert_eq!(config.telemetry.debug_period_ms, 500);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[link]\ntimeout_ms = 5\n[jar.one]\n"),
            Err(ConfigError::UnknownSection { line: 3 })
        );
    }

    #[test]
    fn test_unknown_key_and_root_keys() {
        assert_eq!(
            parse_config("[input]\nspeed = 3\n"),
            Err(ConfigError::UnknownKey { line: 2 })
        );
        assert_eq!(
            parse_config("timeout_ms = 3\n"),
            Err(ConfigError::UnknownKey { line: 1 })
        );
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            parse_config("[input]\nticks_per_step = 300\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[link]\ntimeout_ms = -1\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[link]\ntimeout_ms = \"fast\"\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
        assert_eq!(
            parse_config("[link]\ntimeout_ms = 1__\n"),
            Err(ConfigError::InvalidValue { line: 2 })
        );
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(parse_config("[link\n"), Err(ConfigError::Malformed { line: 1 }));
        assert_eq!(
            parse_config("[link]\ntimeout_ms\n"),
            Err(ConfigError::Malformed { line: 2 })
        );
    }

    #[test]
    fn test_out_of_range_combination() {
        assert_eq!(
            parse_config("[input]\ndefault_level = 101\n"),
            Err(ConfigError::OutOfRange)
        );
        assert_eq!(
            parse_config("[input]\nticks_per_step = 0\n"),
            Err(ConfigError::OutOfRange)
        );
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("-7"), Some(-7));
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("_1"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("0x10"), None);
    }
}
