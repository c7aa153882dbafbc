//! Word and Byte Helpers.
//!
//! Words are stored big-endian: the high byte sits at the lower address. This module
//! also carries the radix used by display helpers when rendering register and memory
//! contents for a viewer.

use std::fmt;

/// Splits a word into its two bytes in address order.
#[inline]
pub const fn word_to_bytes(word: u16) -> [u8; 2] {
    word.to_be_bytes()
}

/// Joins two bytes in address order into a word.
#[inline]
pub const fn bytes_to_word(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Numeric base used when rendering values for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Radix {
    /// Signed decimal, the way the values are interpreted by arithmetic.
    #[default]
    Decimal,
    /// Zero-padded upper-case hexadecimal with a `0x` prefix.
    Hex,
}

impl Radix {
    /// Formats a 16-bit word.
    pub fn word(self, value: u16) -> String {
        match self {
            Self::Decimal => format!("{}", value as i16),
            Self::Hex => format!("0x{value:04X}"),
        }
    }

    /// Formats a single byte.
    pub fn byte(self, value: u8) -> String {
        match self {
            Self::Decimal => format!("{}", value as i8),
            Self::Hex => format!("0x{value:02X}"),
        }
    }

    /// Formats an address, padding hex output to the width needed by `capacity`.
    pub fn address(self, address: u32, capacity: u32) -> String {
        match self {
            Self::Decimal => format!("{address}"),
            Self::Hex => {
                let digits = hex_digits(capacity.saturating_sub(1));
                format!("0x{address:0digits$X}")
            }
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal => write!(f, "dec"),
            Self::Hex => write!(f, "hex"),
        }
    }
}

fn hex_digits(max: u32) -> usize {
    let bits = u32::BITS - max.leading_zeros();
    (bits.div_ceil(4) as usize).max(1)
}
