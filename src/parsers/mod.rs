//! Field parsers: free-text page fragments to typed listing fields.
//!
//! Each parser distinguishes "the fragment does not contain this field"
//! ([`ParseError::NotFound`]) from "the field is there but malformed"
//! ([`ParseError::Format`]). Callers treat both as non-fatal for optional
//! fields and leave the zero default in place.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("can't find {0} in input")]
    NotFound(&'static str),

    #[error("malformed {what}: {reason}")]
    Format { what: &'static str, reason: String },
}

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9][0-9 ]+) kr").unwrap());
static AREA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+) m²").unwrap());
static ROOMS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)(½?) rum").unwrap());
static FLOOR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)(½?) tr").unwrap());

/// Extracts the listing id from the trailing path segment of a URL.
///
/// The id is a precondition for storage, so unlike the other parsers this
/// one has no "not found" case: a non-numeric trailing segment is always a
/// [`ParseError::Format`].
pub fn parse_id(url: &str) -> Result<i64, ParseError> {
    let segment = url.rsplit('/').next().unwrap_or(url);
    segment.parse().map_err(|e| ParseError::Format {
        what: "listing id",
        reason: format!("{segment:?}: {e}"),
    })
}

/// Extracts a price from a string like `4 000 000 kr`, stripping the
/// thousands-separating spaces.
pub fn parse_price(s: &str) -> Result<i64, ParseError> {
    let caps = PRICE_RE.captures(s).ok_or(ParseError::NotFound("price"))?;
    let digits = caps[1].replace(' ', "");
    digits.parse().map_err(|e| ParseError::Format {
        what: "price",
        reason: format!("{digits:?}: {e}"),
    })
}

/// Extracts the living area in square meters from a string like `75 m²`.
pub fn parse_area(s: &str) -> Result<i32, ParseError> {
    let caps = AREA_RE.captures(s).ok_or(ParseError::NotFound("area"))?;
    caps[1].parse().map_err(|e| ParseError::Format {
        what: "area",
        reason: format!("{:?}: {e}", &caps[1]),
    })
}

/// Extracts the room count from a string like `3 rum` or `3½ rum`.
/// The half glyph adds exactly 0.5.
pub fn parse_rooms(s: &str) -> Result<f64, ParseError> {
    parse_half_step(&ROOMS_RE, s, "number of rooms")
}

/// Extracts the floor from a string like `2 tr` or `2½ tr`.
pub fn parse_floor(s: &str) -> Result<f64, ParseError> {
    parse_half_step(&FLOOR_RE, s, "floor")
}

fn parse_half_step(re: &Regex, s: &str, what: &'static str) -> Result<f64, ParseError> {
    let caps = re.captures(s).ok_or(ParseError::NotFound(what))?;
    let mut value: f64 = caps[1].parse().map_err(|e| ParseError::Format {
        what,
        reason: format!("{:?}: {e}", &caps[1]),
    })?;
    if !caps[2].is_empty() {
        value += 0.5;
    }
    Ok(value)
}
