use std::fmt;

use crate::ParseError;

pub const BYTERANGE_TAG: &str = "#EXT-X-BYTERANGE";

/// A sub-range of a segment resource, as carried by #EXT-X-BYTERANGE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub length: u64,
    pub offset: Option<u64>,
}

impl ByteRange {
    pub fn new(length: u64, offset: Option<u64>) -> Self {
        Self { length, offset }
    }

    /// Parse from "length@offset" or "length" format.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let s = s.trim();
        let invalid = || ParseError::InvalidByteRange(s.to_string());

        let (length, offset) = match s.split_once('@') {
            Some((len, off)) => (len, Some(off.parse::<u64>().map_err(|_| invalid())?)),
            None => (s, None),
        };
        let length: u64 = length.parse().map_err(|_| invalid())?;
        if length == 0 || offset.is_some_and(|o| o.checked_add(length).is_none()) {
            return Err(invalid());
        }

        Ok(Self { length, offset })
    }

    /// Parse from #EXT-X-BYTERANGE tag content.
    pub fn parse_from_tag(line: &str) -> Result<Self, ParseError> {
        let value = line
            .trim()
            .strip_prefix(BYTERANGE_TAG)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| ParseError::InvalidByteRange(line.to_string()))?;
        Self::parse(value)
    }

    /// End offset, when the start is known and the end fits in a `u64`.
    pub fn end_offset(&self) -> Option<u64> {
        self.offset.and_then(|o| o.checked_add(self.length))
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{}:{}@{}", BYTERANGE_TAG, self.length, offset),
            None => write!(f, "{}:{}", BYTERANGE_TAG, self.length),
        }
    }
}
