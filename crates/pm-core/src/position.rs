//! Dense ordering keys for manually ordered issue lists.
//!
//! A [`Position`] is a base-36 fraction written without its leading `0.`:
//! `"i"` is 18/36, `"0i"` is 18/1296. Keys compare lexicographically, which
//! for these digits is the same as comparing the fractions, so a new key can
//! always be placed strictly between two neighbours without touching any other
//! row. Keys never end in `0`, which keeps every value unique and leaves room
//! below the smallest key.
//!
//! Each insertion between two adjacent keys may lengthen the result by one
//! digit. Once a key would exceed [`MAX_POSITION_LEN`], [`between`] returns
//! [`PositionError::Exhausted`] and the caller re-spaces the whole sequence
//! with [`rebalance`].

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const BASE: usize = DIGITS.len();

/// Longest key [`between`] will produce.
pub const MAX_POSITION_LEN: usize = 48;

/// An ordering key. See the module docs for the encoding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Position(String);

impl TryFrom<String> for Position {
    type Error = PositionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::try_from(s).map_err(de::Error::custom)
    }
}

/// Errors from position arithmetic.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PositionError {
    /// No key of acceptable length fits between the neighbours.
    #[error("position space exhausted between {prev:?} and {next:?}; rebalance required")]
    Exhausted {
        prev: Option<String>,
        next: Option<String>,
    },

    /// `prev` does not sort strictly before `next`.
    #[error("position {prev} does not sort before {next}")]
    OutOfOrder { prev: String, next: String },

    /// The string is not a valid key.
    #[error("invalid position key '{0}'")]
    Invalid(String),
}

impl Position {
    /// Parse and validate a stored key.
    ///
    /// # Errors
    ///
    /// Returns `PositionError::Invalid` for an empty string, a character
    /// outside `0-9a-z`, or a trailing `0`.
    pub fn parse(s: impl Into<String>) -> Result<Self, PositionError> {
        let s = s.into();
        let valid = !s.is_empty()
            && s.bytes().all(|b| DIGITS.contains(&b))
            && !s.ends_with('0');
        if valid {
            Ok(Self(s))
        } else {
            Err(PositionError::Invalid(s))
        }
    }

    /// The key used for the first item of an empty list.
    #[must_use]
    pub fn origin() -> Self {
        Self(char::from(DIGITS[BASE / 2]).to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn digits(&self) -> Vec<usize> {
        self.0.bytes().map(digit_value).collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute a key strictly between `prev` and `next`.
///
/// `None` stands for the open end of the list on that side, so
/// `between(None, None)` is [`Position::origin`].
///
/// # Errors
///
/// Returns `PositionError::OutOfOrder` when `prev >= next`, and
/// `PositionError::Exhausted` when the result would be longer than
/// [`MAX_POSITION_LEN`].
pub fn between(prev: Option<&Position>, next: Option<&Position>) -> Result<Position, PositionError> {
    if let (Some(p), Some(n)) = (prev, next) {
        if p >= n {
            return Err(PositionError::OutOfOrder {
                prev: p.0.clone(),
                next: n.0.clone(),
            });
        }
    }

    let lower = prev.map(Position::digits).unwrap_or_default();
    let upper = next.map(Position::digits);

    let mut out = Vec::new();
    midpoint(&lower, upper.as_deref(), &mut out);

    if out.len() > MAX_POSITION_LEN {
        return Err(PositionError::Exhausted {
            prev: prev.map(|p| p.0.clone()),
            next: next.map(|n| n.0.clone()),
        });
    }
    Ok(Position(encode(&out)))
}

/// Produce `count` evenly spaced, strictly increasing keys of equal width.
///
/// Used to relabel a whole list after [`between`] reports exhaustion.
#[must_use]
pub fn rebalance(count: usize) -> Vec<Position> {
    if count == 0 {
        return Vec::new();
    }

    let slots = count as u128 + 1;
    let mut width = 1;
    let mut span = BASE as u128;
    while span < slots {
        width += 1;
        span *= BASE as u128;
    }

    (1..=count as u128)
        .map(|i| {
            let mut value = span * i / slots;
            let mut digits = vec![0; width];
            for slot in digits.iter_mut().rev() {
                *slot = (value % BASE as u128) as usize;
                value /= BASE as u128;
            }
            while digits.last() == Some(&0) {
                digits.pop();
            }
            Position(encode(&digits))
        })
        .collect()
}

/// Append to `out` the digits of a fraction strictly between `a` and `b`.
///
/// `a` is the lower bound (empty means zero), `b` the upper bound (`None`
/// means one). Requires `a < b` and that neither ends in a zero digit.
fn midpoint(a: &[usize], b: Option<&[usize]>, out: &mut Vec<usize>) {
    if let Some(b) = b {
        // Shared prefix, reading missing digits of `a` as zero.
        let mut n = 0;
        while n < b.len() && a.get(n).copied().unwrap_or(0) == b[n] {
            n += 1;
        }
        if n > 0 {
            out.extend_from_slice(&b[..n]);
            midpoint(a.get(n..).unwrap_or(&[]), Some(&b[n..]), out);
            return;
        }
    }

    let lo = a.first().copied().unwrap_or(0);
    let hi = b.and_then(|b| b.first().copied()).unwrap_or(BASE);

    if hi - lo > 1 {
        out.push(lo + (hi - lo) / 2);
    } else if let Some(b) = b.filter(|b| b.len() > 1) {
        // `b` truncated to its first digit is still above `a` and below `b`.
        out.push(b[0]);
    } else {
        out.push(lo);
        midpoint(a.get(1..).unwrap_or(&[]), None, out);
    }
}

fn digit_value(b: u8) -> usize {
    DIGITS.iter().position(|&d| d == b).unwrap_or(0)
}

fn encode(digits: &[usize]) -> String {
    digits.iter().map(|&d| char::from(DIGITS[d])).collect()
}
