//! Message types for the Stomplink protocol
//!
//! Tags are divided by who normally sends them:
//! - Control → Audio: `VOL` (and `DLY`/`REV` as commands)
//! - Audio → Control: `LVL`, `MTR`, `DLY`, `REV`, `DBG`
//! - Either way: `CH`
//!
//! Decoding is permissive. An unknown tag drops the line, but a bad field
//! only drops that field: it decodes as `None` and the receiver keeps its
//! previous value. Numeric fields outside their range are clamped.

use core::fmt::Write;
use core::num::IntErrorKind;

use heapless::String;

use crate::debug::DebugFields;
use crate::line::{Line, LINE_CAPACITY};

/// Highest output level (percent)
pub const LEVEL_MAX: u8 = 100;

/// Highest meter segment count
pub const METER_MAX: u8 = 8;

/// Highest dry-channel index
pub const CHANNEL_MAX: u8 = 2;

/// Wire tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tag {
    Vol,
    Lvl,
    Mtr,
    Dly,
    Rev,
    Ch,
    Dbg,
}

impl Tag {
    /// Parse a tag token
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "VOL" => Some(Tag::Vol),
            "LVL" => Some(Tag::Lvl),
            "MTR" => Some(Tag::Mtr),
            "DLY" => Some(Tag::Dly),
            "REV" => Some(Tag::Rev),
            "CH" => Some(Tag::Ch),
            "DBG" => Some(Tag::Dbg),
            _ => None,
        }
    }

    /// Wire spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Vol => "VOL",
            Tag::Lvl => "LVL",
            Tag::Mtr => "MTR",
            Tag::Dly => "DLY",
            Tag::Rev => "REV",
            Tag::Ch => "CH",
            Tag::Dbg => "DBG",
        }
    }
}

/// Switchable effects in the audio chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    Delay,
    Reverb,
}

impl Effect {
    /// Tag used to carry this effect's on/off state
    pub fn tag(self) -> Tag {
        match self {
            Effect::Delay => Tag::Dly,
            Effect::Reverb => Tag::Rev,
        }
    }
}

/// A decoded protocol message
///
/// `None` fields were present on the wire but unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Message {
    /// Set output level (`VOL`)
    Volume(Option<u8>),
    /// Authoritative level readback (`LVL`)
    Level(Option<u8>),
    /// Meter segment counts (`MTR`)
    Meter {
        input: Option<u8>,
        output: Option<u8>,
    },
    /// Effect enabled state (`DLY` / `REV`)
    Effect {
        effect: Effect,
        enabled: Option<bool>,
    },
    /// Dry-channel selection (`CH`)
    Channel(Option<u8>),
    /// Free-form telemetry (`DBG`)
    Debug(DebugFields),
}

impl Message {
    /// Wire tag for this message
    pub fn tag(&self) -> Tag {
        match self {
            Message::Volume(_) => Tag::Vol,
            Message::Level(_) => Tag::Lvl,
            Message::Meter { .. } => Tag::Mtr,
            Message::Effect { effect, .. } => effect.tag(),
            Message::Channel(_) => Tag::Ch,
            Message::Debug(_) => Tag::Dbg,
        }
    }
}

/// Parse an integer field and clamp it into `0..=max`
///
/// Digits too long for an `i32` saturate before the clamp.
fn parse_clamped(field: Option<&str>, max: u8) -> Option<u8> {
    let value = match field?.trim().parse::<i32>() {
        Ok(value) => value,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i32::MAX,
            IntErrorKind::NegOverflow => i32::MIN,
            _ => return None,
        },
    };
    Some(value.clamp(0, i32::from(max)) as u8)
}

fn parse_flag(field: Option<&str>) -> Option<bool> {
    parse_clamped(field, 1).map(|v| v != 0)
}

/// Decode a line into a message
///
/// Returns `None` for non-UTF-8 lines and unknown tags.
pub fn decode(line: &Line) -> Option<Message> {
    let text = line.as_str()?;
    let mut fields = text.split(',');
    let tag = Tag::parse(fields.next()?.trim())?;

    let message = match tag {
        Tag::Vol => Message::Volume(parse_clamped(fields.next(), LEVEL_MAX)),
        Tag::Lvl => Message::Level(parse_clamped(fields.next(), LEVEL_MAX)),
        Tag::Mtr => {
            let input = parse_clamped(fields.next(), METER_MAX);
            let output = parse_clamped(fields.next(), METER_MAX);
            Message::Meter { input, output }
        }
        Tag::Dly => Message::Effect {
            effect: Effect::Delay,
            enabled: parse_flag(fields.next()),
        },
        Tag::Rev => Message::Effect {
            effect: Effect::Reverb,
            enabled: parse_flag(fields.next()),
        },
        Tag::Ch => Message::Channel(parse_clamped(fields.next(), CHANNEL_MAX)),
        Tag::Dbg => Message::Debug(DebugFields::parse_pairs(fields)),
    };

    Some(message)
}

/// Writes `,value` or a bare `,` for an unreadable field
fn write_field<T: core::fmt::Display>(out: &mut String<LINE_CAPACITY>, value: Option<T>) {
    let _ = out.push(',');
    if let Some(v) = value {
        let _ = write!(out, "{}", v);
    }
}

/// Encode a message into a line (terminator not included)
///
/// Positional messages always fit. `DBG` pairs that would overflow the
/// line are left out.
pub fn encode(message: &Message) -> Line {
    let mut out: String<LINE_CAPACITY> = String::new();
    let _ = out.push_str(message.tag().as_str());

    match message {
        Message::Volume(level) | Message::Level(level) => write_field(&mut out, *level),
        Message::Meter { input, output } => {
            write_field(&mut out, *input);
            write_field(&mut out, *output);
        }
        Message::Effect { enabled, .. } => write_field(&mut out, enabled.map(u8::from)),
        Message::Channel(channel) => write_field(&mut out, *channel),
        Message::Debug(fields) => fields.write_pairs(&mut out),
    }

    // Tags, digits and validated keys only, so no terminator can appear
    Line::from_vec(out.into_bytes())
}
