//! Line decoding.
//!
//! Every structural and data line is written with the four symbols
//! `f a r d`, read as the base-4 digits `0 1 2 3`. Numbers are plain base-4
//! numerals; text is read four digits (one byte) per character.

use num_bigint::BigUint;
use thiserror::Error;

use crate::lang::header::Header;

/// The encoding alphabet, in digit order.
pub const SYMBOLS: [char; 4] = ['f', 'a', 'r', 'd'];

/// Largest codepoint a single 4-symbol group can carry.
pub const MAX_TEXT_CODEPOINT: u32 = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// `column` is 1-based within the trimmed line.
    #[error("invalid symbol {symbol:?} at column {column}")]
    InvalidSymbol { symbol: char, column: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("character {ch:?} (U+{code:04X}) does not fit in one symbol group")]
    Unrepresentable { ch: char, code: u32 },
}

pub fn digit_of(symbol: char) -> Option<u8> {
    SYMBOLS.iter().position(|&s| s == symbol).map(|d| d as u8)
}

/// True if the trimmed line is non-empty and uses only alphabet symbols.
pub fn is_symbol_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| digit_of(c).is_some())
}

/// Number of 4-symbol groups in the trimmed line, if its length is a
/// positive multiple of 4. The symbols themselves are not checked.
pub fn quad_count(line: &str) -> Option<usize> {
    let len = line.trim().chars().count();
    (len > 0 && len % 4 == 0).then_some(len / 4)
}

fn digits(line: &str) -> impl Iterator<Item = Result<u8, DecodeError>> + '_ {
    line.chars().enumerate().map(|(i, symbol)| {
        digit_of(symbol).ok_or(DecodeError::InvalidSymbol {
            symbol,
            column: i + 1,
        })
    })
}

/// Decode a data line as a base-4 numeral. An empty line is 0.
pub fn decode_number(line: &str) -> Result<BigUint, DecodeError> {
    digits(line.trim()).try_fold(
        BigUint::from(0u32),
        |acc, digit| -> Result<BigUint, DecodeError> { Ok(acc * 4u32 + u32::from(digit?)) },
    )
}

/// Decode a data line as text.
///
/// The line is left-padded with `f` to a multiple of 4, so a short group
/// reads as having high-order zero digits. Each group becomes the
/// character with that codepoint.
pub fn decode_text(line: &str) -> Result<String, DecodeError> {
    let line = line.trim();
    let pad = (4 - line.chars().count() % 4) % 4;

    let mut text = String::new();
    let mut code = 0u32;
    let mut filled = pad;
    for digit in digits(line) {
        code = code * 4 + u32::from(digit?);
        filled += 1;
        if filled == 4 {
            // Four base-4 digits never exceed 255.
            text.extend(char::from_u32(code));
            code = 0;
            filled = 0;
        }
    }
    Ok(text)
}

pub fn encode_number(n: &BigUint) -> String {
    n.to_radix_be(4)
        .into_iter()
        .map(|d| SYMBOLS[usize::from(d)])
        .collect()
}

/// Encode text as one 4-symbol group per character.
pub fn encode_text(text: &str) -> Result<String, EncodeError> {
    let mut out = String::with_capacity(text.len() * 4);
    for ch in text.chars() {
        let code = u32::from(ch);
        if code > MAX_TEXT_CODEPOINT {
            return Err(EncodeError::Unrepresentable { ch, code });
        }
        for shift in [6, 4, 2, 0] {
            out.push(SYMBOLS[((code >> shift) & 0b11) as usize]);
        }
    }
    Ok(out)
}

/// The canonical spelling of a header line: `fard` repeated.
pub fn encode_header(header: Header) -> String {
    "fard".repeat(header.reps())
}
