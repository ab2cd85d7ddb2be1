use std::fmt;

use smallvec::SmallVec;

use super::{Entries, UNSIGNED_MAX};

/// Error type for [`Permutation::parse`][super::Permutation::parse].
#[derive(Debug)]
pub struct ParseError {
    kind: ParseErrorKind,
    bytes_left: usize,
}

impl ParseError {
    fn unexpected(bytes: &[u8]) -> Self {
        Self {
            kind: if bytes.is_empty() {
                ParseErrorKind::UnexpectedEnd
            } else {
                ParseErrorKind::UnexpectedCharacter
            },
            bytes_left: bytes.len(),
        }
    }

    /// Number of input bytes following the error position
    pub fn bytes_left(&self) -> usize {
        self.bytes_left
    }

    /// Splits the input string at the error position
    ///
    /// This can panic with out of bounds indexing when the `input` parameter does not match the
    /// input passed to the parsing function.
    pub fn split_input_on_error<'a>(&self, input: &'a str) -> (&'a str, &'a str) {
        input.split_at(input.len() - self.bytes_left)
    }
}

#[derive(Debug)]
enum ParseErrorKind {
    UnexpectedCharacter,
    UnexpectedEnd,
    InvalidEntry,
    TooManyEntries,
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseErrorKind::UnexpectedCharacter => write!(f, "unexpected character"),
            ParseErrorKind::UnexpectedEnd => write!(f, "unexpected end of input"),
            ParseErrorKind::InvalidEntry => write!(f, "entry out of range"),
            ParseErrorKind::TooManyEntries => {
                write!(f, "more than {UNSIGNED_MAX} entries")
            }
        }
    }
}

fn skip_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let mut pending = bytes;
    while let Some((&first, rest)) = pending.split_first() {
        if !first.is_ascii_whitespace() {
            break;
        }
        pending = rest;
    }
    pending
}

fn split_ascii_digits(bytes: &[u8]) -> (&[u8], &[u8]) {
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    bytes.split_at(digits)
}

fn parse_entry(bytes: &[u8]) -> Result<(i16, &[u8]), ParseError> {
    let (negative, unsigned) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, bytes),
    };

    let (digits, rest) = split_ascii_digits(unsigned);
    if digits.is_empty() {
        return Err(ParseError::unexpected(unsigned));
    }

    let magnitude = digits
        .iter()
        .try_fold(0i16, |acc, &digit| {
            acc.checked_mul(10)?.checked_add(i16::from(digit - b'0'))
        })
        .ok_or(ParseError {
            kind: ParseErrorKind::InvalidEntry,
            bytes_left: bytes.len(),
        })?;

    Ok((
        if negative { -magnitude } else { magnitude },
        skip_ascii_whitespace(rest),
    ))
}

/// Parses comma separated signed decimal entries.
///
/// Range and bijection checks are left to the permutation constructors.
pub fn parse_entries(mut pending: &[u8]) -> Result<Entries, ParseError> {
    let mut entries: Entries = SmallVec::new();

    pending = skip_ascii_whitespace(pending);

    loop {
        if entries.len() == UNSIGNED_MAX {
            return Err(ParseError {
                kind: ParseErrorKind::TooManyEntries,
                bytes_left: pending.len(),
            });
        }

        let (entry, rest) = parse_entry(pending)?;
        entries.push(entry);
        pending = rest;

        match pending.split_first() {
            None => return Ok(entries),
            Some((b',', rest)) => pending = skip_ascii_whitespace(rest),
            Some(_) => return Err(ParseError::unexpected(pending)),
        }
    }
}
