//! Line-level parsing helpers.
//!
//! This module splits a source line into its parts and parses literals. It provides:
//! 1. **Comments:** Everything from the first `#` is dropped.
//! 2. **Labels:** An optional `label:` prefix, checked for emptiness and charset.
//! 3. **Statements:** The mnemonic and its comma-separated operands.
//! 4. **Integers:** Decimal `-?[0-9]+` and hexadecimal `0x[0-9a-f]+` literals.

use crate::common::error::AsmErrorKind;

/// A source line with its comment and label removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    /// Label defined on this line.
    pub label: Option<&'a str>,
    /// Mnemonic of the instruction, pseudo-instruction or directive.
    pub mnemonic: &'a str,
    /// Trimmed operands, in order.
    pub operands: Vec<&'a str>,
}

/// Splits one (lower-cased) source line.
///
/// # Returns
///
/// `None` for blank and comment-only lines, otherwise the parsed line or a label error.
pub fn split_line(text: &str) -> Result<Option<Line<'_>>, AsmErrorKind> {
    let code = text.split_once('#').map_or(text, |(code, _)| code).trim();
    if code.is_empty() {
        return Ok(None);
    }

    let (label, statement) = match code.split_once(':') {
        Some((label, rest)) => {
            let label = label.trim();
            if label.is_empty() {
                return Err(AsmErrorKind::EmptyLabel);
            }
            if !is_valid_label(label) {
                return Err(AsmErrorKind::InvalidLabel(label.to_string()));
            }
            let rest = rest.trim();
            if rest.is_empty() {
                return Err(AsmErrorKind::LabelWithoutInstruction(label.to_string()));
            }
            (Some(label), rest)
        }
        None => (None, code),
    };

    let (mnemonic, rest) = statement
        .split_once(char::is_whitespace)
        .unwrap_or((statement, ""));
    let rest = rest.trim();
    let operands = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(str::trim).collect()
    };

    Ok(Some(Line {
        label,
        mnemonic,
        operands,
    }))
}

/// Whether `label` uses only `[A-Za-z0-9._]`.
pub fn is_valid_label(label: &str) -> bool {
    label
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

/// Parses an integer literal, or returns `None` if `token` is not one.
///
/// Accepts `-?[0-9]+` in decimal and `0[xX][0-9a-fA-F]+` in hexadecimal. Values that
/// overflow `i32` are not integers.
pub fn try_parse_integer(token: &str) -> Option<i32> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        return i32::from_str_radix(hex, 16).ok();
    }

    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Parses an integer literal.
pub fn parse_integer(token: &str) -> Result<i32, AsmErrorKind> {
    try_parse_integer(token).ok_or_else(|| AsmErrorKind::InvalidInteger(token.to_string()))
}
