//! Request grammar.
//!
//! ```text
//! <operation>[;<token>{,<token>}]
//! token := "<string>" | <integer>
//! ```
//!
//! Integers follow C `strtol` with base auto-detection (`0x` hex, leading
//! `0` octal, decimal otherwise) and are truncated to 32 bits. At most one
//! quoted string is kept, cut to [`MAX_STRING_LEN`] bytes on a character
//! boundary.
//!
//! In [`ParseMode::Lenient`] a malformed token ends the scan and whatever
//! was parsed so far is kept. [`ParseMode::Strict`] turns the same cases
//! into a [`ParseError`]. Exceeding [`MAX_PARAMS`] is an error in both.

use crate::config::ParseMode;
use crate::error::ParseError;

/// Capacity of the integer parameter list.
pub const MAX_PARAMS: usize = 32;

/// Capacity of the string argument in bytes.
pub const MAX_STRING_LEN: usize = 31;

/// One parsed request. Borrows the operation name from the request text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
    operation: &'a str,
    params: heapless::Vec<i32, MAX_PARAMS>,
    string: Option<heapless::String<MAX_STRING_LEN>>,
}

impl<'a> Request<'a> {
    /// Parse a request line. A trailing NUL and surrounding whitespace are
    /// ignored.
    pub fn parse(text: &'a str, mode: ParseMode) -> Result<Self, ParseError> {
        let text = text.trim_end_matches('\0').trim();
        let (operation, list) = match text.split_once(';') {
            Some((op, list)) => (op, list),
            None => (text, ""),
        };

        let mut req = Self {
            operation,
            params: heapless::Vec::new(),
            string: None,
        };
        req.parse_list(list, mode)?;
        Ok(req)
    }

    fn parse_list(&mut self, list: &str, mode: ParseMode) -> Result<(), ParseError> {
        let strict = mode == ParseMode::Strict;
        let mut rest = list;

        while !rest.is_empty() {
            let token = rest.trim_start();
            if let Some(body) = token.strip_prefix('"') {
                let (value, after) = match body.find('"') {
                    Some(end) => (&body[..end], &body[end + 1..]),
                    None if strict => return Err(ParseError::UnterminatedString),
                    None => (body, ""),
                };
                if self.string.is_some() {
                    if strict {
                        return Err(ParseError::DuplicateString);
                    }
                } else {
                    self.string = Some(truncated(value));
                }
                rest = after;
            } else {
                let Some((value, used)) = strtol(token.as_bytes()) else {
                    if strict {
                        return Err(ParseError::InvalidNumber);
                    }
                    break;
                };
                self.params
                    .push(value as i32)
                    .map_err(|_| ParseError::TooManyParameters)?;
                rest = &token[used..];
            }

            if rest.is_empty() {
                break;
            }
            match rest.strip_prefix(',') {
                Some(next) => rest = next,
                None if strict => return Err(ParseError::TrailingCharacters),
                None => break,
            }
        }
        Ok(())
    }

    pub fn operation(&self) -> &'a str {
        self.operation
    }

    pub fn params(&self) -> &[i32] {
        &self.params
    }

    /// Parameter `i`, or 0 when the request carried fewer.
    pub fn param(&self, i: usize) -> i32 {
        self.params.get(i).copied().unwrap_or(0)
    }

    /// Parameter `i` reinterpreted as an unsigned handle or code.
    pub fn param_u32(&self, i: usize) -> u32 {
        self.param(i) as u32
    }

    pub fn string(&self) -> Option<&str> {
        self.string.as_deref()
    }
}

/// Copy at most [`MAX_STRING_LEN`] bytes of `s`, never splitting a character.
fn truncated(s: &str) -> heapless::String<MAX_STRING_LEN> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// `strtol(s, &end, 0)` on a 64-bit `long`.
///
/// Returns the value and the number of bytes consumed, or `None` when no
/// digits were found. Out-of-range values saturate.
fn strtol(s: &[u8]) -> Option<(i64, usize)> {
    let mut i = s.iter().take_while(|b| b.is_ascii_whitespace()).count();

    let negative = match s.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let radix = match (s.get(i), s.get(i + 1), s.get(i + 2)) {
        (Some(b'0'), Some(b'x' | b'X'), Some(d)) if d.is_ascii_hexdigit() => {
            i += 2;
            16
        }
        (Some(b'0'), _, _) => 8,
        _ => 10,
    };

    let start = i;
    let mut magnitude: u64 = 0;
    while let Some(digit) = s.get(i).and_then(|&b| (b as char).to_digit(radix)) {
        magnitude = magnitude
            .saturating_mul(u64::from(radix))
            .saturating_add(u64::from(digit));
        i += 1;
    }
    if i == start {
        return None;
    }

    let value = if negative {
        if magnitude > i64::MAX as u64 {
            i64::MIN
        } else {
            -(magnitude as i64)
        }
    } else {
        magnitude.min(i64::MAX as u64) as i64
    };
    Some((value, i))
}
