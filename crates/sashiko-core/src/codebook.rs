//! Character codebooks
//!
//! A codebook maps a character to a fixed-width binary code. Two policies
//! exist:
//!
//! - **Restricted**: a closed alphabet where each character's code is its
//!   index in the alphabet. Lookup is case-insensitive (text is upper-cased
//!   first) and characters outside the alphabet are skipped.
//! - **Universal**: every character maps to `code_point % 256` as an 8-bit
//!   code. Nothing is skipped, but code points above 255 collide.
//!
//! The built-in tables are process-wide statics created on first use.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Code width of the universal policy
pub const UNIVERSAL_WIDTH: usize = 8;

/// Space, Latin, Ukrainian and Russian Cyrillic, digits, punctuation
const STANDARD_ALPHABET: &str = concat!(
    " ",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "АБВГҐДЕЄЖЗИІЇЙКЛМНОПРСТУФХЦЧШЩЬЮЯ",
    "ЁЪЫЭ",
    "0123456789",
    ".,!?-':;",
);

/// Space, Latin letters and four punctuation marks; fits in five bits
const LATIN_ALPHABET: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZ.,!?";

static STANDARD: Lazy<Codebook> = Lazy::new(|| {
    Codebook::Restricted(RestrictedTable::build("standard", STANDARD_ALPHABET))
});

static LATIN: Lazy<Codebook> =
    Lazy::new(|| Codebook::Restricted(RestrictedTable::build("latin", LATIN_ALPHABET)));

static UNIVERSAL: Lazy<Codebook> = Lazy::new(|| Codebook::Universal);

/// A closed alphabet with index-derived codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictedTable {
    name: String,
    width: usize,
    alphabet: Vec<char>,
    codes: HashMap<char, u32>,
}

impl RestrictedTable {
    /// Build a table from an ordered alphabet.
    ///
    /// Every character is stored upper-cased. The code width is the smallest
    /// number of bits able to represent the largest index.
    pub fn new(name: impl Into<String>, alphabet: &str) -> Result<Self> {
        let name = name.into();
        let mut chars = Vec::new();
        let mut codes = HashMap::new();

        for ch in alphabet.chars().flat_map(char::to_uppercase) {
            if codes.insert(ch, chars.len() as u32).is_some() {
                return Err(CoreError::InvalidAlphabet(format!(
                    "duplicate character {:?} in '{}'",
                    ch, name
                )));
            }
            chars.push(ch);
        }

        if chars.len() < 2 {
            return Err(CoreError::InvalidAlphabet(format!(
                "'{}' needs at least two characters",
                name
            )));
        }

        let max_index = (chars.len() - 1) as u32;
        let width = (u32::BITS - max_index.leading_zeros()) as usize;

        Ok(Self {
            name,
            width,
            alphabet: chars,
            codes,
        })
    }

    // Only used for the built-in alphabets above, which are known to be valid.
    fn build(name: &str, alphabet: &str) -> Self {
        match Self::new(name, alphabet) {
            Ok(table) => table,
            Err(e) => panic!("built-in alphabet is invalid: {}", e),
        }
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Code width in bits
    pub fn width(&self) -> usize {
        self.width
    }

    /// Characters in code order
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Code index of an already upper-cased character
    pub fn index_of(&self, ch: char) -> Option<u32> {
        self.codes.get(&ch).copied()
    }
}

/// Character-to-code mapping policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Codebook {
    /// Closed alphabet, unknown characters dropped
    Restricted(RestrictedTable),
    /// 8-bit ordinal of every character, lossy above 255
    Universal,
}

impl Codebook {
    /// The 7-bit Latin + Cyrillic + digits + punctuation table
    pub fn standard() -> &'static Codebook {
        &STANDARD
    }

    /// The 5-bit Latin-only table
    pub fn latin() -> &'static Codebook {
        &LATIN
    }

    /// The 8-bit ordinal policy
    pub fn universal() -> &'static Codebook {
        &UNIVERSAL
    }

    /// Build a custom restricted codebook
    pub fn restricted(name: impl Into<String>, alphabet: &str) -> Result<Codebook> {
        RestrictedTable::new(name, alphabet).map(Codebook::Restricted)
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        match self {
            Self::Restricted(table) => table.name(),
            Self::Universal => "universal",
        }
    }

    /// Width of every code in bits
    pub fn width(&self) -> usize {
        match self {
            Self::Restricted(table) => table.width(),
            Self::Universal => UNIVERSAL_WIDTH,
        }
    }

    /// Whether lookups upper-case their input first
    pub fn normalizes_case(&self) -> bool {
        matches!(self, Self::Restricted(_))
    }

    /// Numeric code for a single character, `None` if it is not in the table.
    ///
    /// Restricted tables expect the character already upper-cased.
    pub fn code_value(&self, ch: char) -> Option<u32> {
        match self {
            Self::Restricted(table) => table.index_of(ch),
            Self::Universal => Some(u32::from(ch) % 256),
        }
    }

    /// Binary code string for a single character
    pub fn code(&self, ch: char) -> Option<String> {
        let width = self.width();
        self.code_value(ch)
            .map(|value| format!("{:0width$b}", value, width = width))
    }
}

/// Named codebook selection, as used in settings and on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CodebookPolicy {
    /// [`Codebook::standard`]
    #[default]
    Standard,
    /// [`Codebook::latin`]
    Latin,
    /// [`Codebook::universal`]
    Universal,
}

impl CodebookPolicy {
    /// Resolve to the process-wide table
    pub fn codebook(self) -> &'static Codebook {
        match self {
            Self::Standard => Codebook::standard(),
            Self::Latin => Codebook::latin(),
            Self::Universal => Codebook::universal(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Latin => "latin",
            Self::Universal => "universal",
        }
    }
}

impl fmt::Display for CodebookPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodebookPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "restricted" => Ok(Self::Standard),
            "latin" => Ok(Self::Latin),
            "universal" | "ordinal" => Ok(Self::Universal),
            _ => Err(CoreError::UnknownCodebook(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_width_and_first_letter() {
        let book = Codebook::standard();
        assert_eq!(book.width(), 7);
        assert_eq!(book.code('A').as_deref(), Some("0000001"));
        assert_eq!(book.code(' ').as_deref(), Some("0000000"));
    }

    #[test]
    fn test_latin_is_five_bits() {
        let book = Codebook::latin();
        assert_eq!(book.width(), 5);
        assert_eq!(book.code('A').as_deref(), Some("00001"));
        assert_eq!(book.code('Z').as_deref(), Some("11010"));
        assert_eq!(book.code('Ж'), None);
    }

    #[test]
    fn test_standard_covers_cyrillic_and_digits() {
        let book = Codebook::standard();
        for ch in ['Ї', 'Ґ', 'Є', 'Ы', '7', '?', ';'] {
            assert!(book.code(ch).is_some(), "missing {:?}", ch);
        }
        assert!(book.code('@').is_none());
    }

    #[test]
    fn test_all_codes_share_width() {
        let book = Codebook::standard();
        if let Codebook::Restricted(table) = book {
            for ch in table.alphabet() {
                assert_eq!(book.code(*ch).map(|c| c.len()), Some(7));
            }
        } else {
            panic!("standard should be restricted");
        }
    }

    #[test]
    fn test_universal_reduces_modulo_256() {
        let book = Codebook::universal();
        assert_eq!(book.code('A').as_deref(), Some("01000001"));
        // 'Ā' is U+0100, which wraps to zero.
        assert_eq!(book.code('Ā').as_deref(), Some("00000000"));
        assert_eq!(book.code('Ж'), book.code('\u{16}'));
    }

    #[test]
    fn test_custom_alphabet_rejects_duplicates() {
        let err = Codebook::restricted("dup", "ABA").unwrap_err();
        assert!(matches!(err, CoreError::InvalidAlphabet(_)));
    }

    #[test]
    fn test_custom_alphabet_width() {
        let book = Codebook::restricted("tiny", "xyz").unwrap();
        assert_eq!(book.width(), 2);
        assert_eq!(book.code('Y').as_deref(), Some("01"));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("latin".parse::<CodebookPolicy>().unwrap(), CodebookPolicy::Latin);
        assert_eq!(
            "Universal".parse::<CodebookPolicy>().unwrap(),
            CodebookPolicy::Universal
        );
        assert!("morse".parse::<CodebookPolicy>().is_err());
        assert_eq!(CodebookPolicy::default().codebook().width(), 7);
    }
}
