//! `DBG` telemetry fields
//!
//! The audio node reports internal values (dry/wet gains, delay time,
//! per-stage peaks) as `KEY=value` pairs. Keys are short upper-case tokens;
//! values are integers or decimals printed with two places.
//!
//! Values are kept in fixed point so that a decoded value re-encodes to the
//! same text and compares exactly.

use core::fmt::{self, Write};

use heapless::{String, Vec};

/// Maximum key length in bytes
pub const MAX_KEY_LEN: usize = 6;

/// Maximum number of pairs tracked per message / per node
pub const MAX_DEBUG_FIELDS: usize = 12;

/// Telemetry key, e.g. `PKI`
pub type DebugKey = String<MAX_KEY_LEN>;

/// A telemetry value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebugValue {
    /// Integer value as sent (`DT=180`)
    Int(i32),
    /// Decimal value in hundredths (`WET=0.35` is `Centi(35)`)
    Centi(i32),
}

impl DebugValue {
    /// Parse a value token
    ///
    /// Decimals are rounded to two places. Returns `None` for anything
    /// that is not a plain decimal number.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        match text.split_once('.') {
            None => text.parse::<i32>().ok().map(DebugValue::Int),
            Some((whole, frac)) => {
                let (negative, whole) = match whole.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, whole.strip_prefix('+').unwrap_or(whole)),
                };
                if whole.is_empty() && frac.is_empty() {
                    return None;
                }
                if !whole.bytes().all(|b| b.is_ascii_digit())
                    || !frac.bytes().all(|b| b.is_ascii_digit())
                {
                    return None;
                }

                let whole: i64 = if whole.is_empty() {
                    0
                } else {
                    whole.parse().ok()?
                };

                // First three fractional digits, zero padded; the third rounds
                let mut digits = [0i64; 3];
                for (slot, b) in digits.iter_mut().zip(frac.bytes()) {
                    *slot = i64::from(b - b'0');
                }
                let mut hundredths = digits[0] * 10 + digits[1];
                if digits[2] >= 5 {
                    hundredths += 1;
                }

                let magnitude = whole.checked_mul(100)?.checked_add(hundredths)?;
                let value = if negative { -magnitude } else { magnitude };
                i32::try_from(value).ok().map(DebugValue::Centi)
            }
        }
    }

    /// Value as a float, for display and arithmetic
    pub fn as_f32(self) -> f32 {
        match self {
            DebugValue::Int(v) => v as f32,
            DebugValue::Centi(v) => v as f32 / 100.0,
        }
    }

    /// Build a two-decimal value from a float, rounding to the nearest hundredth
    pub fn from_f32(value: f32) -> Self {
        let scaled = value * 100.0;
        let rounded = if scaled >= 0.0 {
            scaled + 0.5
        } else {
            scaled - 0.5
        };
        // `as` saturates at the i32 bounds and maps NaN to zero
        DebugValue::Centi(rounded as i32)
    }
}

impl fmt::Display for DebugValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DebugValue::Int(v) => write!(f, "{}", v),
            DebugValue::Centi(v) => {
                let sign = if v < 0 { "-" } else { "" };
                let abs = v.unsigned_abs();
                write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
            }
        }
    }
}

fn valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Sparse set of telemetry values, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebugFields {
    entries: Vec<(DebugKey, DebugValue), MAX_DEBUG_FIELDS>,
}

impl DebugFields {
    /// Create an empty set
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse `KEY=value` tokens, skipping any malformed pair
    pub fn parse_pairs<'a, I: Iterator<Item = &'a str>>(tokens: I) -> Self {
        let mut fields = Self::new();
        for token in tokens {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            let Some(value) = DebugValue::parse(value) else {
                continue;
            };
            fields.insert(key.trim(), value);
        }
        fields
    }

    /// Set `key` to `value`
    ///
    /// Returns `false` if the key is malformed or the set is full.
    pub fn insert(&mut self, key: &str, value: DebugValue) -> bool {
        if !valid_key(key) {
            return false;
        }
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k.as_str() == key) {
            entry.1 = value;
            return true;
        }
        let mut owned = DebugKey::new();
        if owned.push_str(key).is_err() {
            return false;
        }
        self.entries.push((owned, value)).is_ok()
    }

    /// Latest value for `key`, `None` if never received
    pub fn get(&self, key: &str) -> Option<DebugValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| *v)
    }

    /// Overwrite with every pair in `other`, keeping keys `other` lacks
    pub fn merge(&mut self, other: &DebugFields) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }

    /// Iterate pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, DebugValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of known keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no key has been received yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every key
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Write `,KEY=value` for each pair that still fits in `out`
    ///
    /// Pairs are written whole or not at all.
    pub(crate) fn write_pairs<const N: usize>(&self, out: &mut String<N>) {
        for (key, value) in self.iter() {
            let mut pair: String<24> = String::new();
            if write!(pair, ",{}={}", key, value).is_err() {
                continue;
            }
            if out.len() + pair.len() <= N {
                let _ = out.push_str(&pair);
            }
        }
    }
}
