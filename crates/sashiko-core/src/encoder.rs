//! Text to bit string encoding

use std::fmt;
use std::str::FromStr;

use crate::codebook::Codebook;
use crate::error::{CoreError, Result};

/// Fallback pattern used whenever a source string encodes to nothing
pub const DEFAULT_BITS: &str = "01010101";

/// A sequence of binary digits, stored as `'0'`/`'1'` text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitString(String);

impl BitString {
    /// The shared non-empty fallback pattern
    pub fn default_pattern() -> Self {
        Self(DEFAULT_BITS.to_string())
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no character was encoded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw `'0'`/`'1'` text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bit at `index`, if in range
    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.as_bytes().get(index).map(|b| *b == b'1')
    }

    /// Iterate bits in order
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.bytes().map(|b| b == b'1')
    }

    /// Replace an empty bit string with [`DEFAULT_BITS`]
    pub fn or_default_pattern(self) -> Self {
        if self.is_empty() {
            log::warn!(
                "Empty bit string, substituting default pattern {}",
                DEFAULT_BITS
            );
            Self::default_pattern()
        } else {
            self
        }
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BitString {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        if s.bytes().all(|b| b == b'0' || b == b'1') {
            Ok(Self(s.to_string()))
        } else {
            Err(CoreError::InvalidBits(s.to_string()))
        }
    }
}

/// Encode `text` by concatenating the code of every recognised character.
///
/// Restricted codebooks upper-case the text first and drop characters they
/// do not know, so the result may be empty. The universal codebook encodes
/// every character.
pub fn encode(text: &str, codebook: &Codebook) -> BitString {
    let width = codebook.width();
    let mut bits = String::with_capacity(text.len() * width);

    let normalized;
    let source = if codebook.normalizes_case() {
        normalized = text.to_uppercase();
        normalized.as_str()
    } else {
        text
    };

    let mut skipped = 0usize;
    for ch in source.chars() {
        match codebook.code(ch) {
            Some(code) => bits.push_str(&code),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!(
            "Codebook '{}' skipped {} unrecognised character(s)",
            codebook.name(),
            skipped
        );
    }

    BitString(bits)
}

/// Encode, substituting [`DEFAULT_BITS`] when nothing was recognised
pub fn encode_or_default(text: &str, codebook: &Codebook) -> BitString {
    encode(text, codebook).or_default_pattern()
}
